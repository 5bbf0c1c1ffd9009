//! Tower Climb: a deterministic platform-climbing simulation.
//!
//! A [`session::GameSession`] advances one tick per call from decoded
//! [`physics::Intents`]; [`env::TowerClimberEnv`] wraps it in the episodic
//! agent interface and [`play::run`] drives it from an input source and
//! renderer.

pub mod collision;
pub mod config;
pub mod env;
pub mod error;
pub mod level_gen;
pub mod observation;
pub mod physics;
pub mod play;
pub mod pool;
pub mod scoring;
pub mod scroll;
pub mod session;

pub use config::ClimberConfig;
pub use env::{ClimberStep, StepInfo, TowerClimberEnv};
pub use error::{ActionError, ConfigError};
pub use observation::Observation;
pub use physics::{Intents, MoveDir};
pub use pool::EnvPool;
pub use session::{EndCause, FrameSnapshot, GameSession, SessionState};
