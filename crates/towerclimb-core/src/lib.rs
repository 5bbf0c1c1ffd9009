pub mod env;
pub mod frame;
pub mod geometry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::fmt::Debug;

    use crate::env::Environment;

    /// Run `n` steps with the same action, returning the accumulated reward
    /// and whether any step ended the episode.
    pub fn run_steps<E>(env: &mut E, action: E::Action, n: usize) -> (f64, bool)
    where
        E: Environment,
        E::Action: Clone,
    {
        let mut total = 0.0;
        for _ in 0..n {
            let result = env.step(action.clone());
            total += result.reward;
            if result.is_done() {
                return (total, true);
            }
        }
        (total, false)
    }

    // ================================================================
    // Environment Contract Tests
    // ================================================================
    // Generic checks every Environment implementation must pass. Game
    // crates call them from their own #[cfg(test)] modules with a concrete
    // environment and a flattening function that lists the observation
    // components in `observation_space()` order.

    /// reset() must produce an observation inside the declared spaces.
    pub fn contract_reset_is_valid<E, F>(env: &mut E, flatten: F)
    where
        E: Environment,
        F: Fn(&E::Observation) -> Vec<Vec<f64>>,
    {
        let (obs, _info) = env.reset();
        let spaces = env.observation_space();
        let components = flatten(&obs);
        assert_eq!(
            components.len(),
            spaces.len(),
            "observation must have one component per declared space"
        );
        for (space, values) in spaces.iter().zip(&components) {
            assert!(
                space.contains(values),
                "component {} = {values:?} lies outside its space",
                space.name
            );
        }
    }

    /// step() must advance the info the environment reports.
    pub fn contract_step_advances_state<E>(env: &mut E, action: E::Action)
    where
        E: Environment,
        E::Info: PartialEq + Debug,
    {
        let (_obs, before) = env.reset();
        let result = env.step(action);
        assert_ne!(before, result.info, "step() must advance the environment");
    }

    /// Repeating an action must eventually end the episode.
    pub fn contract_episode_eventually_terminates<E>(
        env: &mut E,
        action: E::Action,
        max_steps: usize,
    ) where
        E: Environment,
        E::Action: Clone,
    {
        env.reset();
        let (_reward, done) = run_steps(env, action, max_steps);
        assert!(done, "episode must end within {max_steps} steps");
    }

    /// Two environments seeded alike and fed the same actions must produce
    /// identical step results.
    pub fn contract_seeded_determinism<E, M>(make: M, seed: u64, actions: &[E::Action])
    where
        E: Environment,
        M: Fn() -> E,
        E::Action: Clone,
        E::Observation: PartialEq + Debug,
        E::Info: PartialEq + Debug,
    {
        let mut a = make();
        let mut b = make();
        let (obs_a, _) = a.reset_with_seed(Some(seed));
        let (obs_b, _) = b.reset_with_seed(Some(seed));
        assert_eq!(obs_a, obs_b, "seeded resets must match");
        for (i, action) in actions.iter().enumerate() {
            let ra = a.step(action.clone());
            let rb = b.step(action.clone());
            assert_eq!(ra, rb, "step {i} diverged");
            if ra.is_done() {
                break;
            }
        }
    }
}
