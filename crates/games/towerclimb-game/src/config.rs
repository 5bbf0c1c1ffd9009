use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Window width in pixels.
pub const WINDOW_WIDTH: i32 = 500;
/// Window height in pixels.
pub const WINDOW_HEIGHT: i32 = 800;

/// Horizontal displacement per tick while a move is held.
pub const MOVE_STRENGTH: i32 = 6;
/// Upward speed given by a jump (pixels per tick).
pub const JUMP_VELOCITY: i32 = 15;
/// Velocity gained per tick while airborne.
pub const GRAVITY: i32 = 1;
/// Fall speed is capped at `JUMP_VELOCITY - FALL_VELOCITY_MARGIN`.
pub const FALL_VELOCITY_MARGIN: i32 = 3;
pub const PLAYER_WIDTH: i32 = 30;
pub const PLAYER_HEIGHT: i32 = 50;
/// Gap between the spawned player and the base floor.
pub const SPAWN_CLEARANCE: i32 = 10;

pub const LEVEL_COUNT: usize = 100;
/// Vertical distance between consecutive generated floors.
pub const PLATFORM_GAP: i32 = 90;
pub const FLOOR_THICKNESS: i32 = 4;
pub const WALL_THICKNESS: i32 = 4;
/// Largest horizontal distance the player can clear between two levels.
pub const MAX_JUMP: i32 = 230;
/// Kept between the offset cap and `MAX_JUMP` so levels do not all look alike.
pub const JUMP_MARGIN: i32 = 10;
pub const INITIAL_OFFSET: i32 = -68;
pub const OFFSET_STEP: i32 = 8;
pub const OFFSET_SIGMA: f64 = 4.0;
pub const INITIAL_FLOOR_WIDTH: i32 = 105;
pub const FLOOR_WIDTH_STEP: i32 = 5;
pub const MIN_FLOOR_WIDTH: i32 = 5;
/// Inset of the virtual reference floor from each window edge.
pub const REFERENCE_INSET: i32 = 100;

pub const TICK_RATE_HZ: u32 = 60;
pub const EPISODE_DURATION_SECS: f64 = 20.0;
/// Score removed over a full episode.
pub const TIME_PENALTY: f64 = 100.0;
/// Screen-space line the player's top is never allowed above.
pub const SCROLL_THRESHOLD: i32 = 400;
/// Pixels the player may sink below the window bottom before the episode ends.
pub const FALL_MARGIN: i32 = 4;

pub const IMPORTANT_FLOORS: usize = 6;

/// Upper bound on the magnitude of any configured pixel quantity.
pub const MAX_DIMENSION: i32 = 1 << 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
        }
    }
}

/// Player physics parameters, in pixels and pixels per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub move_strength: i32,
    pub jump_velocity: i32,
    pub gravity: i32,
    pub fall_velocity_margin: i32,
    pub player_width: i32,
    pub player_height: i32,
    pub spawn_clearance: i32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            move_strength: MOVE_STRENGTH,
            jump_velocity: JUMP_VELOCITY,
            gravity: GRAVITY,
            fall_velocity_margin: FALL_VELOCITY_MARGIN,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            spawn_clearance: SPAWN_CLEARANCE,
        }
    }
}

impl PhysicsConfig {
    /// Largest downward velocity the player can reach.
    pub fn max_fall_velocity(&self) -> i32 {
        self.jump_velocity - self.fall_velocity_margin
    }
}

/// Level generator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub level_count: usize,
    pub platform_gap: i32,
    pub floor_thickness: i32,
    pub wall_thickness: i32,
    pub max_jump: i32,
    pub jump_margin: i32,
    pub initial_offset: i32,
    pub offset_step: i32,
    pub offset_sigma: f64,
    pub initial_floor_width: i32,
    pub floor_width_step: i32,
    pub min_floor_width: i32,
    pub reference_inset: i32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            level_count: LEVEL_COUNT,
            platform_gap: PLATFORM_GAP,
            floor_thickness: FLOOR_THICKNESS,
            wall_thickness: WALL_THICKNESS,
            max_jump: MAX_JUMP,
            jump_margin: JUMP_MARGIN,
            initial_offset: INITIAL_OFFSET,
            offset_step: OFFSET_STEP,
            offset_sigma: OFFSET_SIGMA,
            initial_floor_width: INITIAL_FLOOR_WIDTH,
            floor_width_step: FLOOR_WIDTH_STEP,
            min_floor_width: MIN_FLOOR_WIDTH,
            reference_inset: REFERENCE_INSET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    pub tick_rate_hz: u32,
    pub duration_secs: f64,
    pub time_penalty: f64,
    pub scroll_threshold: i32,
    pub fall_margin: i32,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICK_RATE_HZ,
            duration_secs: EPISODE_DURATION_SECS,
            time_penalty: TIME_PENALTY,
            scroll_threshold: SCROLL_THRESHOLD,
            fall_margin: FALL_MARGIN,
        }
    }
}

impl EpisodeConfig {
    pub fn tick_secs(&self) -> f64 {
        1.0 / f64::from(self.tick_rate_hz)
    }

    /// Number of ticks after which the episode times out.
    pub fn episode_ticks(&self) -> u32 {
        (self.duration_secs * f64::from(self.tick_rate_hz)).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationConfig {
    /// Floors kept in the observation window.
    pub important_floors: usize,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            important_floors: IMPORTANT_FLOORS,
        }
    }
}

/// Top-level Tower Climb configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimberConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub level: LevelConfig,
    pub episode: EpisodeConfig,
    pub observation: ObservationConfig,
}

impl ClimberConfig {
    /// Load config from the file named by `TOWERCLIMB_CONFIG`, then
    /// `config/towerclimb.toml`, falling back to defaults if neither is
    /// readable or parseable.
    pub fn load() -> Self {
        let path = std::env::var("TOWERCLIMB_CONFIG")
            .unwrap_or_else(|_| "config/towerclimb.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    Self::default()
                },
            },
            Err(_) => Self::default(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims: [(&'static str, i64); 9] = [
            ("window.width", i64::from(self.window.width)),
            ("window.height", i64::from(self.window.height)),
            ("physics.player_width", i64::from(self.physics.player_width)),
            ("physics.player_height", i64::from(self.physics.player_height)),
            ("level.platform_gap", i64::from(self.level.platform_gap)),
            ("level.floor_thickness", i64::from(self.level.floor_thickness)),
            ("level.wall_thickness", i64::from(self.level.wall_thickness)),
            ("level.min_floor_width", i64::from(self.level.min_floor_width)),
            ("physics.jump_velocity", i64::from(self.physics.jump_velocity)),
        ];
        for (field, value) in dims {
            if value <= 0 {
                return Err(ConfigError::InvalidDimension { field, value });
            }
        }

        for (field, value) in self.bounded_values() {
            if value.abs() > MAX_DIMENSION {
                return Err(invalid(
                    field,
                    format!("{value} exceeds the limit of {MAX_DIMENSION} pixels"),
                ));
            }
        }
        let tower_height = i64::try_from(self.level.level_count)
            .unwrap_or(i64::MAX)
            .saturating_mul(i64::from(self.level.platform_gap));
        if tower_height > i64::from(MAX_DIMENSION) * 64 {
            return Err(invalid(
                "level.level_count",
                format!("tower of {tower_height} pixels is too tall"),
            ));
        }

        // The player spawns with its left edge at the window centre.
        let spawn_left = self.window.width / 2;
        let shaft_right = self.window.width - self.level.wall_thickness;
        if spawn_left < self.level.wall_thickness
            || spawn_left + self.physics.player_width > shaft_right
        {
            return Err(invalid(
                "physics.player_width",
                format!(
                    "player spawned at x={spawn_left} with width {} does not fit before the \
                     right wall at x={shaft_right}",
                    self.physics.player_width
                ),
            ));
        }
        let spawn_height = self.physics.player_height
            + self.level.floor_thickness
            + self.physics.spawn_clearance;
        if self.physics.spawn_clearance < 0 || spawn_height >= self.window.height {
            return Err(invalid(
                "physics.spawn_clearance",
                "player must spawn inside the window above the base floor".to_string(),
            ));
        }
        if self.physics.gravity <= 0 {
            return Err(invalid("physics.gravity", "must be positive".to_string()));
        }
        if self.physics.move_strength < 0 {
            return Err(invalid("physics.move_strength", "must not be negative".to_string()));
        }
        if self.physics.max_fall_velocity() <= 0 {
            return Err(invalid(
                "physics.fall_velocity_margin",
                "must leave a positive fall speed".to_string(),
            ));
        }
        if self.level.initial_floor_width < self.level.min_floor_width {
            return Err(invalid(
                "level.initial_floor_width",
                "must be at least level.min_floor_width".to_string(),
            ));
        }
        if self.level.min_floor_width > self.window.width {
            return Err(invalid(
                "level.min_floor_width",
                "must fit inside the window".to_string(),
            ));
        }
        if self.level.floor_width_step < 0 || self.level.offset_step < 0 {
            return Err(invalid("level", "steps must not be negative".to_string()));
        }
        let sigma = self.level.offset_sigma;
        if !(sigma.is_finite() && (0.0..=f64::from(MAX_DIMENSION)).contains(&sigma)) {
            return Err(invalid(
                "level.offset_sigma",
                format!("must lie in [0, {MAX_DIMENSION}], got {sigma}"),
            ));
        }
        if self.episode.tick_rate_hz == 0 {
            return Err(invalid("episode.tick_rate_hz", "must be positive".to_string()));
        }
        if !(self.episode.duration_secs.is_finite() && self.episode.duration_secs > 0.0) {
            return Err(invalid(
                "episode.duration_secs",
                format!("must be positive, got {}", self.episode.duration_secs),
            ));
        }
        if !self.episode.time_penalty.is_finite() {
            return Err(invalid("episode.time_penalty", "must be finite".to_string()));
        }
        if self.observation.important_floors == 0 {
            return Err(invalid(
                "observation.important_floors",
                "must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl ClimberConfig {
    /// Pixel quantities kept within `MAX_DIMENSION` so level and physics
    /// arithmetic stays inside `i32`.
    fn bounded_values(&self) -> [(&'static str, i32); 20] {
        let (w, p, l) = (&self.window, &self.physics, &self.level);
        [
            ("window.width", w.width),
            ("window.height", w.height),
            ("physics.move_strength", p.move_strength),
            ("physics.jump_velocity", p.jump_velocity),
            ("physics.gravity", p.gravity),
            ("physics.player_width", p.player_width),
            ("physics.player_height", p.player_height),
            ("physics.fall_velocity_margin", p.fall_velocity_margin),
            ("physics.spawn_clearance", p.spawn_clearance),
            ("level.platform_gap", l.platform_gap),
            ("level.floor_thickness", l.floor_thickness),
            ("level.wall_thickness", l.wall_thickness),
            ("level.max_jump", l.max_jump),
            ("level.jump_margin", l.jump_margin),
            ("level.initial_offset", l.initial_offset),
            ("level.offset_step", l.offset_step),
            ("level.initial_floor_width", l.initial_floor_width),
            ("level.floor_width_step", l.floor_width_step),
            ("level.min_floor_width", l.min_floor_width),
            ("level.reference_inset", l.reference_inset),
        ]
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidValue { field, reason }
}
