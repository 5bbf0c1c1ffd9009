use std::time::Duration;

use serde::{Deserialize, Serialize};

use towerclimb_core::env::{EnvMetadata, Environment, SpaceInfo, StepResult};

use crate::config::ClimberConfig;
use crate::error::{ActionError, ConfigError};
use crate::observation::{AGENT_LEN, Observation, encode};
use crate::physics::Intents;
use crate::session::{EndCause, FrameSnapshot, GameSession, SessionState};

/// Per-step diagnostics returned alongside each observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub score: f64,
    pub elapsed_secs: f64,
    pub floors_beneath: usize,
    pub scroll_offset: i32,
    pub grounded: bool,
    pub end_cause: Option<EndCause>,
}

pub type ClimberStep = StepResult<Observation, StepInfo>;

/// Agent-facing wrapper around a `GameSession`. The reward of a step is the
/// change in score since the previous step.
#[derive(Debug, Clone)]
pub struct TowerClimberEnv {
    session: GameSession,
    previous_score: f64,
}

impl TowerClimberEnv {
    pub fn new(config: ClimberConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self::from_session(GameSession::new(config, seed)?))
    }

    pub fn from_session(session: GameSession) -> Self {
        Self {
            previous_score: session.score(),
            session,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Step with an undecoded `[jump, move]` pair. Out-of-range actions are
    /// rejected before touching the session.
    pub fn step_raw(&mut self, action: [u8; 2]) -> Result<ClimberStep, ActionError> {
        let intents = Intents::try_from(action)?;
        Ok(self.step(intents))
    }

    /// Renderer view of the current frame.
    pub fn frame(&self) -> FrameSnapshot {
        self.session.snapshot()
    }

    fn info(&self) -> StepInfo {
        let s = &self.session;
        StepInfo {
            score: s.score(),
            elapsed_secs: s.elapsed_secs(),
            floors_beneath: s.floors_beneath(),
            scroll_offset: s.scroll_offset(),
            grounded: s.player().grounded,
            end_cause: match s.state() {
                SessionState::Ended(cause) => Some(cause),
                SessionState::Active => None,
            },
        }
    }
}

impl Environment for TowerClimberEnv {
    type Observation = Observation;
    type Action = Intents;
    type Info = StepInfo;

    fn metadata(&self) -> EnvMetadata {
        EnvMetadata {
            name: "Tower Climb".to_string(),
            description: "Climb as many floors as possible before time runs out".to_string(),
            episode_duration: Duration::from_secs_f64(
                self.session.config().episode.duration_secs,
            ),
        }
    }

    fn reset_with_seed(&mut self, seed: Option<u64>) -> (Observation, StepInfo) {
        self.session.reset_with_seed(seed);
        self.previous_score = self.session.score();
        (encode(&self.session), self.info())
    }

    fn step(&mut self, action: Intents) -> ClimberStep {
        self.session.tick(action);
        let score = self.session.score();
        let reward = score - self.previous_score;
        self.previous_score = score;
        ClimberStep {
            observation: encode(&self.session),
            reward,
            terminated: self.session.is_ended(),
            truncated: self.session.state() == SessionState::Ended(EndCause::TimeUp),
            info: self.info(),
        }
    }

    fn observation_space(&self) -> Vec<SpaceInfo> {
        let floors = 2 * self.session.config().observation.important_floors;
        vec![
            SpaceInfo::unit_box("agent", AGENT_LEN),
            SpaceInfo::unit_box("important_floors_x", floors),
            SpaceInfo::unit_box("important_floors_y", floors),
        ]
    }

    fn action_space(&self) -> SpaceInfo {
        SpaceInfo::multi_discrete("action", vec![2, 3])
    }

    fn tick_rate(&self) -> f32 {
        self.session.config().episode.tick_rate_hz as f32
    }
}
