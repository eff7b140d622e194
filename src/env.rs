use crate::agent::Agent;
use crate::error::Result;
use crate::policy::State;
use crate::utils::{shared_rng, SharedRng};

/// Domain side of a [`Simulation`](crate::simulation::Simulation): owns the
/// world, applies actions and hands out rewards. Agents are addressed by
/// their registration slot.
pub trait Environment<S: State> {
    /// Where the agent in `slot` starts every episode.
    fn default_state(&mut self, slot: usize) -> S;

    /// Clears per-episode world state. Called before the agents are reset.
    fn reset(&mut self, _episode: usize) {}

    /// Applies `action` for the agent in `slot`: must move the agent with
    /// [`Agent::set_state`] and then pay it with [`Agent::reward`].
    fn execute(
        &mut self,
        slot: usize,
        agent: &mut dyn Agent<S>,
        action: usize,
        episode: usize,
    ) -> Result<()>;

    /// Checked once every agent has acted on `time_step`.
    fn is_terminal(&self, time_step: usize, episode: usize) -> bool;
}

#[derive(Debug, Clone)]
pub struct Configuration {
    max_episodes: usize,
    max_steps: Option<usize>,
    seed: Option<u64>,
    rng: SharedRng,
}

impl Configuration {
    pub fn new(max_episodes: usize) -> Self {
        Self {
            max_episodes,
            max_steps: None,
            seed: None,
            rng: shared_rng(None),
        }
    }

    /// Reseeds the shared randomness source so that runs are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = shared_rng(Some(seed));
        self.seed = Some(seed);
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn max_episodes(&self) -> usize {
        self.max_episodes
    }

    pub fn max_steps(&self) -> Option<usize> {
        self.max_steps
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Handle to the shared randomness source.
    pub fn rng(&self) -> SharedRng {
        self.rng.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::rc::Rc;

    #[test]
    fn rng_handles_share_one_source() {
        let config = Configuration::new(10);
        assert!(Rc::ptr_eq(&config.rng(), &config.rng()));
    }

    #[test]
    fn seeded_configurations_replay() {
        let a = Configuration::new(1).with_seed(5);
        let b = Configuration::new(1).with_seed(5);
        let x: u64 = a.rng().borrow_mut().gen();
        let y: u64 = b.rng().borrow_mut().gen();
        assert_eq!(x, y);
        assert_eq!(a.seed(), Some(5));
    }

    #[test]
    fn builder_sets_limits() {
        let config = Configuration::new(30).with_max_steps(12);
        assert_eq!(config.max_episodes(), 30);
        assert_eq!(config.max_steps(), Some(12));
        assert_eq!(config.seed(), None);
    }
}
