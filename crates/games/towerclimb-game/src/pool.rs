//! Independently seeded environments stepped in parallel.
//!
//! Each environment owns its session and random source; nothing is shared
//! between them, so stepping them on rayon's thread pool gives the same
//! results as stepping them one by one.

use rayon::prelude::*;

use towerclimb_core::env::Environment;

use crate::config::ClimberConfig;
use crate::env::{ClimberStep, StepInfo, TowerClimberEnv};
use crate::error::{ActionError, ConfigError};
use crate::observation::Observation;
use crate::physics::Intents;

/// A batch of Tower Climb environments. Environment `i` is seeded with
/// `base_seed + i`.
pub struct EnvPool {
    envs: Vec<TowerClimberEnv>,
    base_seed: u64,
    episodes: Vec<u64>,
}

impl EnvPool {
    pub fn new(
        config: &ClimberConfig,
        base_seed: u64,
        num_envs: usize,
    ) -> Result<Self, ConfigError> {
        let envs = (0..num_envs)
            .map(|i| TowerClimberEnv::new(config.clone(), base_seed.wrapping_add(i as u64)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            envs,
            base_seed,
            episodes: vec![0; num_envs],
        })
    }

    pub fn num_envs(&self) -> usize {
        self.envs.len()
    }

    /// Episodes finished so far by each environment.
    pub fn episodes(&self) -> &[u64] {
        &self.episodes
    }

    pub fn env(&self, index: usize) -> Option<&TowerClimberEnv> {
        self.envs.get(index)
    }

    /// Reseed every environment from the pool's base seed and reset it.
    pub fn reset(&mut self) -> Vec<(Observation, StepInfo)> {
        let base = self.base_seed;
        self.episodes.iter_mut().for_each(|e| *e = 0);
        self.envs
            .par_iter_mut()
            .enumerate()
            .map(|(i, env)| env.reset_with_seed(Some(base.wrapping_add(i as u64))))
            .collect()
    }

    /// Step every environment with its raw `[jump, move]` action.
    ///
    /// All actions are validated before any environment advances. An
    /// environment that reports a finished episode is reset immediately, so
    /// its next step starts a new episode; the returned result still carries
    /// the terminal observation.
    pub fn step(&mut self, actions: &[[u8; 2]]) -> Result<Vec<ClimberStep>, ActionError> {
        if actions.len() != self.envs.len() {
            return Err(ActionError::CountMismatch {
                expected: self.envs.len(),
                got: actions.len(),
            });
        }
        let intents = actions
            .iter()
            .map(|a| Intents::try_from(*a))
            .collect::<Result<Vec<_>, _>>()?;

        let results: Vec<ClimberStep> = self
            .envs
            .par_iter_mut()
            .zip(intents.par_iter())
            .map(|(env, &intent)| {
                let result = env.step(intent);
                if result.is_done() {
                    env.reset();
                }
                result
            })
            .collect();

        for (count, result) in self.episodes.iter_mut().zip(&results) {
            if result.is_done() {
                *count += 1;
            }
        }
        Ok(results)
    }
}
