use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use towerclimb_core::geometry::Rect;

use crate::collision::{resolve_horizontal, resolve_vertical};
use crate::config::ClimberConfig;
use crate::error::ConfigError;
use crate::level_gen::{Floor, Wall, build_level, build_walls};
use crate::physics::{Intents, PlayerState, apply_intents, physics_update};
use crate::scoring;
use crate::scroll::update_offset;

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    /// The player dropped below the bottom of the visible window.
    Fell,
    /// The episode ran for its full duration.
    TimeUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Active,
    Ended(EndCause),
}

impl SessionState {
    pub fn is_ended(self) -> bool {
        matches!(self, SessionState::Ended(_))
    }
}

/// Read-only per-frame view handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub player: Rect,
    pub floors: Vec<Rect>,
    pub walls: Vec<Rect>,
    pub scroll_offset: i32,
    pub score: f64,
    pub elapsed_secs: f64,
    pub state: SessionState,
}

/// One Tower Climb episode: owns the player, the level and the random
/// source the level is generated from.
#[derive(Debug, Clone)]
pub struct GameSession<R = StdRng> {
    config: ClimberConfig,
    rng: R,
    player: PlayerState,
    floors: Vec<Floor>,
    walls: [Wall; 2],
    scroll_offset: i32,
    elapsed_ticks: u32,
    score: f64,
    state: SessionState,
}

impl GameSession<StdRng> {
    /// Build a session whose level generator is seeded with `seed`.
    pub fn new(config: ClimberConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + SeedableRng> GameSession<R> {
    /// Build a session drawing its levels from `rng`.
    pub fn with_rng(config: ClimberConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let floors = build_level(&mut rng, &config.window, &config.level);
        let walls = build_walls(&config.window, &config.level);
        let player = spawn_player(&config);
        Ok(Self {
            config,
            rng,
            player,
            floors,
            walls,
            scroll_offset: 0,
            elapsed_ticks: 0,
            score: 0.0,
            state: SessionState::Active,
        })
    }

    /// Start a fresh episode on a newly generated level, continuing the
    /// current random stream. Always succeeds.
    pub fn reset(&mut self) {
        self.reset_with_seed(None);
    }

    /// Like `reset`, reseeding the generator first when `seed` is given.
    pub fn reset_with_seed(&mut self, seed: Option<u64>) {
        if let Some(seed) = seed {
            self.rng = R::seed_from_u64(seed);
        }
        self.floors = build_level(&mut self.rng, &self.config.window, &self.config.level);
        self.walls = build_walls(&self.config.window, &self.config.level);
        self.player = spawn_player(&self.config);
        self.scroll_offset = 0;
        self.elapsed_ticks = 0;
        self.score = 0.0;
        self.state = SessionState::Active;
        tracing::debug!(?seed, floors = self.floors.len(), "Session reset");
    }

    /// Advance one tick: intents, physics, wall then floor collision,
    /// scroll, clock and score, then the end-of-episode check.
    ///
    /// Ticking an ended session changes nothing; call `reset` to play again.
    pub fn tick(&mut self, intents: Intents) -> SessionState {
        if self.state.is_ended() {
            tracing::warn!(state = ?self.state, "Tick on ended session ignored");
            return self.state;
        }

        let physics = &self.config.physics;
        apply_intents(&mut self.player, intents, physics);
        physics_update(&mut self.player, physics);
        resolve_horizontal(&mut self.player, &self.walls, self.scroll_offset);
        resolve_vertical(&mut self.player, &self.floors);
        update_offset(
            &mut self.scroll_offset,
            &self.player.rect,
            self.config.episode.scroll_threshold,
        );

        self.elapsed_ticks += 1;
        self.score = self.compute_score();

        if let Some(cause) = self.end_cause() {
            self.state = SessionState::Ended(cause);
            tracing::info!(
                ?cause,
                score = self.score,
                ticks = self.elapsed_ticks,
                "Episode ended"
            );
        }
        tracing::trace!(
            x = self.player.rect.x,
            y = self.player.rect.y,
            vy = self.player.vy,
            grounded = self.player.grounded,
            offset = self.scroll_offset,
            "tick"
        );
        self.state
    }

    fn compute_score(&self) -> f64 {
        let episode = &self.config.episode;
        scoring::score(
            self.floors_beneath(),
            self.elapsed_secs(),
            episode.duration_secs,
            episode.time_penalty,
        )
    }

    fn end_cause(&self) -> Option<EndCause> {
        if self.has_fallen() {
            Some(EndCause::Fell)
        } else if self.timed_out() {
            Some(EndCause::TimeUp)
        } else {
            None
        }
    }
}

impl<R> GameSession<R> {
    /// Player's screen-space bottom is below the window plus the fall margin.
    pub fn has_fallen(&self) -> bool {
        self.player.rect.bottom() + self.scroll_offset
            > self.config.window.height + self.config.episode.fall_margin
    }

    pub fn timed_out(&self) -> bool {
        self.elapsed_ticks >= self.config.episode.episode_ticks()
    }

    pub fn floors_beneath(&self) -> usize {
        scoring::floors_beneath(&self.player.rect, &self.floors)
    }

    pub fn elapsed_secs(&self) -> f64 {
        f64::from(self.elapsed_ticks) * self.config.episode.tick_secs()
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        self.state.is_ended()
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Floors bottom to top; index 0 is the full-width base floor.
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn walls(&self) -> &[Wall; 2] {
        &self.walls
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    pub fn config(&self) -> &ClimberConfig {
        &self.config
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            player: self.player.rect,
            floors: self.floors.iter().map(|f| f.rect).collect(),
            walls: self.walls.iter().map(|w| w.rect).collect(),
            scroll_offset: self.scroll_offset,
            score: self.score,
            elapsed_secs: self.elapsed_secs(),
            state: self.state,
        }
    }

    /// MessagePack encoding of `snapshot()`, for out-of-process renderers.
    pub fn serialize_snapshot(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec(&self.snapshot())
    }
}

/// Player centred horizontally, resting `spawn_clearance` above the base
/// floor.
fn spawn_player(config: &ClimberConfig) -> PlayerState {
    let physics = &config.physics;
    let x = config.window.width / 2;
    let y = config.window.height
        - physics.player_height
        - config.level.floor_thickness
        - physics.spawn_clearance;
    PlayerState::new(x, y, physics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LevelConfig, MAX_DIMENSION, WindowConfig};
    use crate::env::TowerClimberEnv;
    use crate::physics::MoveDir;
    use towerclimb_core::env::Environment;

    fn session(seed: u64) -> GameSession {
        GameSession::new(ClimberConfig::default(), seed).unwrap()
    }

    fn idle(session: &mut GameSession, n: usize) {
        for _ in 0..n {
            session.tick(Intents::IDLE);
        }
    }

    #[test]
    fn spawn_matches_window_layout() {
        let s = session(42);
        assert_eq!(s.player().rect, Rect::new(250, 736, 30, 50));
        assert_eq!(s.floors()[0].rect, Rect::new(0, 796, 500, 4));
        assert_eq!(s.state(), SessionState::Active);
        assert_eq!(s.elapsed_ticks(), 0);
        assert_eq!(s.score(), 0.0);
    }

    #[test]
    fn first_tick_moves_by_previous_velocity() {
        let mut s = session(42);
        s.tick(Intents::IDLE);
        assert_eq!(s.player().rect.y, 736);
        assert_eq!(s.player().vy, 1);
        s.tick(Intents::IDLE);
        assert_eq!(s.player().rect.y, 737);
        assert_eq!(s.player().vy, 2);
    }

    #[test]
    fn player_settles_on_base_floor() {
        let mut s = session(42);
        idle(&mut s, 60);
        assert!(s.player().grounded);
        assert_eq!(s.player().rect.bottom(), 797);
        assert_eq!(s.player().vy, 0);
        assert_eq!(s.floors_beneath(), 1);
    }

    #[test]
    fn jump_from_ground_rises() {
        let mut s = session(42);
        idle(&mut s, 60);
        let y = s.player().rect.y;
        s.tick(Intents::new(true, MoveDir::None));
        assert_eq!(s.player().rect.y, y - 15);
        assert!(!s.player().grounded);
        // No double jump mid-air.
        s.tick(Intents::new(true, MoveDir::None));
        assert_eq!(s.player().vy, -13);
    }

    #[test]
    fn times_out_after_episode_ticks() {
        let mut s = session(42);
        idle(&mut s, 1199);
        assert_eq!(s.state(), SessionState::Active);
        assert_eq!(s.tick(Intents::IDLE), SessionState::Ended(EndCause::TimeUp));
        assert!(s.timed_out());
        assert!((s.score() - 0.0).abs() < 1e-9, "one floor minus full penalty");
    }

    #[test]
    fn ended_session_ignores_ticks() {
        let mut s = session(42);
        idle(&mut s, 1200);
        let before = s.snapshot();
        s.tick(Intents::new(true, MoveDir::Left));
        assert_eq!(s.snapshot(), before);
        assert_eq!(s.elapsed_ticks(), 1200);
    }

    #[test]
    fn falling_off_screen_ends_episode() {
        let mut s = session(42);
        s.floors.clear();
        let mut state = SessionState::Active;
        for _ in 0..60 {
            state = s.tick(Intents::IDLE);
            if state.is_ended() {
                break;
            }
        }
        assert_eq!(state, SessionState::Ended(EndCause::Fell));
    }

    #[test]
    fn reset_restores_initial_pose() {
        let mut s = session(42);
        idle(&mut s, 100);
        s.tick(Intents::new(true, MoveDir::Right));
        s.reset();
        assert_eq!(s.player().rect, Rect::new(250, 736, 30, 50));
        assert_eq!(s.player().vy, 0);
        assert_eq!(s.scroll_offset(), 0);
        assert_eq!(s.elapsed_ticks(), 0);
        assert_eq!(s.score(), 0.0);
        assert_eq!(s.state(), SessionState::Active);
    }

    #[test]
    fn reset_leaves_ended_state() {
        let mut s = session(42);
        idle(&mut s, 1200);
        assert!(s.is_ended());
        s.reset();
        assert!(!s.is_ended());
        s.tick(Intents::IDLE);
        assert_eq!(s.elapsed_ticks(), 1);
    }

    #[test]
    fn seeded_reset_reproduces_level() {
        let mut a = session(1);
        let b = session(99);
        a.reset_with_seed(Some(99));
        assert_eq!(a.floors(), b.floors());
    }

    #[test]
    fn unseeded_reset_draws_new_level() {
        let mut s = session(5);
        let first = s.floors().to_vec();
        s.reset();
        assert_ne!(s.floors(), first.as_slice());
        assert_eq!(s.floors()[0], first[0], "base floor never changes");
    }

    #[test]
    fn invalid_config_fails_fast() {
        let mut cfg = ClimberConfig::default();
        cfg.window.height = -1;
        assert!(GameSession::new(cfg, 0).is_err());
    }

    #[test]
    fn extreme_offset_sigma_rejected_at_construction() {
        let mut cfg = ClimberConfig::default();
        cfg.level.offset_sigma = 1e12;
        assert!(matches!(
            GameSession::new(cfg, 1),
            Err(ConfigError::InvalidValue {
                field: "level.offset_sigma",
                ..
            })
        ));
    }

    #[test]
    fn largest_accepted_level_parameters_generate() {
        let mut cfg = ClimberConfig::default();
        cfg.level.offset_sigma = f64::from(MAX_DIMENSION);
        cfg.level.initial_offset = MAX_DIMENSION;
        cfg.level.offset_step = MAX_DIMENSION;
        cfg.level.max_jump = MAX_DIMENSION;
        cfg.level.jump_margin = -MAX_DIMENSION;
        let s = GameSession::new(cfg, 3).unwrap();
        assert!(s.floors().iter().all(|f| f.rect.left() >= 0 && f.rect.right() <= 500));
    }

    #[test]
    fn fall_on_final_tick_is_not_truncated() {
        let mut free_fall = session(42);
        free_fall.floors.clear();
        let mut fall_tick = 0u32;
        while !free_fall.is_ended() {
            free_fall.tick(Intents::IDLE);
            fall_tick += 1;
        }
        assert_eq!(free_fall.state(), SessionState::Ended(EndCause::Fell));

        let mut cfg = ClimberConfig::default();
        cfg.episode.duration_secs = f64::from(fall_tick) / 60.0;
        let mut s = GameSession::new(cfg, 42).unwrap();
        s.floors.clear();
        let mut env = TowerClimberEnv::from_session(s);
        let mut last = None;
        for _ in 0..fall_tick {
            last = Some(env.step(Intents::IDLE));
        }
        let last = last.unwrap();
        assert!(env.session().timed_out(), "fall and time limit coincide");
        assert_eq!(last.info.end_cause, Some(EndCause::Fell));
        assert!(last.terminated);
        assert!(!last.truncated);
    }

    #[test]
    fn walls_rebuilt_identically() {
        let mut s = session(3);
        let walls = *s.walls();
        s.reset();
        assert_eq!(*s.walls(), walls);
        assert_eq!(
            walls,
            build_walls(&WindowConfig::default(), &LevelConfig::default())
        );
    }

    #[test]
    fn snapshot_roundtrip() {
        let mut s = session(8);
        idle(&mut s, 10);
        let bytes = s.serialize_snapshot().unwrap();
        let decoded: FrameSnapshot = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(decoded, s.snapshot());
        assert_eq!(decoded.floors.len(), 101);
        assert_eq!(decoded.walls.len(), 2);
    }

    #[test]
    fn walking_into_wall_stops_at_wall() {
        let mut s = session(4);
        idle(&mut s, 60);
        for _ in 0..100 {
            s.tick(Intents::new(false, MoveDir::Right));
        }
        assert_eq!(s.player().rect.right(), 496);
        for _ in 0..200 {
            s.tick(Intents::new(false, MoveDir::Left));
        }
        assert_eq!(s.player().rect.left(), 4);
    }
}
