use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Core trait for episodic environments driven by an external agent.
///
/// The driver owns the instance for its whole life; an environment is never
/// shared between drivers. `reset` must always succeed and leave the
/// environment ready for `step`.
pub trait Environment {
    type Observation;
    type Action;
    type Info;

    /// Environment metadata for drivers and logs.
    fn metadata(&self) -> EnvMetadata;

    /// Start a new episode, continuing the current random stream.
    fn reset(&mut self) -> (Self::Observation, Self::Info) {
        self.reset_with_seed(None)
    }

    /// Start a new episode, reseeding the random source first when a seed is
    /// given.
    fn reset_with_seed(&mut self, seed: Option<u64>) -> (Self::Observation, Self::Info);

    /// Advance exactly one simulation tick.
    fn step(&mut self, action: Self::Action) -> StepResult<Self::Observation, Self::Info>;

    /// Named observation components, in the order the observation carries them.
    fn observation_space(&self) -> Vec<SpaceInfo>;

    fn action_space(&self) -> SpaceInfo;

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }
}

/// Result of a single environment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult<O, I> {
    pub observation: O,
    pub reward: f64,
    /// The episode reached a terminal state.
    pub terminated: bool,
    /// The episode hit its time limit.
    pub truncated: bool,
    pub info: I,
}

impl<O, I> StepResult<O, I> {
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Descriptive metadata for an environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvMetadata {
    pub name: String,
    pub description: String,
    pub episode_duration: Duration,
}

/// Shape and bounds of one observation or action component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceInfo {
    pub name: String,
    pub shape: Vec<usize>,
    pub kind: SpaceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpaceKind {
    /// Continuous values, every element within `[low, high]`.
    Box { low: f64, high: f64 },
    /// One categorical choice per element, with the given cardinalities.
    MultiDiscrete(Vec<usize>),
}

impl SpaceInfo {
    pub fn unit_box(name: &str, len: usize) -> Self {
        Self {
            name: name.to_string(),
            shape: vec![len],
            kind: SpaceKind::Box {
                low: 0.0,
                high: 1.0,
            },
        }
    }

    pub fn multi_discrete(name: &str, nvec: Vec<usize>) -> Self {
        Self {
            name: name.to_string(),
            shape: vec![nvec.len()],
            kind: SpaceKind::MultiDiscrete(nvec),
        }
    }

    /// Whether `values` has this space's length and lies within its bounds.
    pub fn contains(&self, values: &[f64]) -> bool {
        if self.shape.iter().product::<usize>() != values.len() {
            return false;
        }
        match &self.kind {
            SpaceKind::Box { low, high } => values.iter().all(|v| *v >= *low && *v <= *high),
            SpaceKind::MultiDiscrete(nvec) => values
                .iter()
                .zip(nvec)
                .all(|(v, n)| v.fract() == 0.0 && *v >= 0.0 && *v < *n as f64),
        }
    }
}
