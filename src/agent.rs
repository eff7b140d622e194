use std::fmt::Debug;

use tracing::{debug, trace};

use crate::algorithms::{EnumLearningAlgorithm, LearningAlgorithm};
use crate::env::{Configuration, Environment};
use crate::error::{Error, Result};
use crate::policy::State;

/// Builds an agent's learning algorithm when it is bound to a simulation.
pub type LearnerFactory<S> = Box<dyn Fn(&Configuration) -> Result<EnumLearningAlgorithm<S>>>;

pub trait Agent<S: State> {
    fn state(&self) -> Option<&S>;

    fn prev_state(&self) -> Option<&S>;

    /// Moves the agent; the replaced state becomes the previous one.
    fn set_state(&mut self, state: S);

    fn initialize(&mut self, config: &Configuration) -> Result<()>;

    /// Puts the agent back on the environment's default state for `episode`.
    fn reset(&mut self, env: &mut dyn Environment<S>, slot: usize, episode: usize) -> Result<()>;

    /// Picks one action and has the environment execute it.
    fn update(
        &mut self,
        env: &mut dyn Environment<S>,
        slot: usize,
        time_step: usize,
        episode: usize,
    ) -> Result<()>;

    fn reward(&mut self, value: f64, is_terminal: bool, episode: usize) -> Result<()>;

    fn set_follow_policy(&mut self, follow_policy: bool);

    /// Sum of the rewards received since the last reset.
    fn episode_reward(&self) -> f64;
}

pub struct TabularAgent<S: State> {
    name: String,
    state: Option<S>,
    prev_state: Option<S>,
    action: usize,
    episode_reward: f64,
    learner: Option<EnumLearningAlgorithm<S>>,
    learner_factory: LearnerFactory<S>,
}

impl<S: State> Debug for TabularAgent<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabularAgent")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("prev_state", &self.prev_state)
            .field("action", &self.action)
            .field("episode_reward", &self.episode_reward)
            .field("learner", &self.learner)
            .finish()
    }
}

impl<S: State> TabularAgent<S> {
    pub fn new(name: impl Into<String>, learner_factory: LearnerFactory<S>) -> Self {
        Self {
            name: name.into(),
            state: None,
            prev_state: None,
            action: 0,
            episode_reward: 0.0,
            learner: None,
            learner_factory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last action handed to the environment.
    pub fn action(&self) -> usize {
        self.action
    }

    pub fn learner(&self) -> Option<&EnumLearningAlgorithm<S>> {
        self.learner.as_ref()
    }

    pub fn learner_mut(&mut self) -> Option<&mut EnumLearningAlgorithm<S>> {
        self.learner.as_mut()
    }
}

impl<S: State> Agent<S> for TabularAgent<S> {
    fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }

    fn prev_state(&self) -> Option<&S> {
        self.prev_state.as_ref()
    }

    fn set_state(&mut self, state: S) {
        self.prev_state = self.state.replace(state);
    }

    fn initialize(&mut self, config: &Configuration) -> Result<()> {
        self.learner = Some((self.learner_factory)(config)?);
        debug!(name = %self.name, "agent initialized");
        Ok(())
    }

    fn reset(&mut self, env: &mut dyn Environment<S>, slot: usize, episode: usize) -> Result<()> {
        let learner = self.learner.as_mut().ok_or(Error::NotInitialized)?;
        let default_state = env.default_state(slot);
        self.action = 0;
        self.episode_reward = 0.0;
        self.prev_state = Some(default_state.clone());
        self.state = Some(default_state);
        learner.after_episode(episode);
        Ok(())
    }

    fn update(
        &mut self,
        env: &mut dyn Environment<S>,
        slot: usize,
        time_step: usize,
        episode: usize,
    ) -> Result<()> {
        let state = self.state.as_ref().ok_or(Error::NotInitialized)?;
        let learner = self.learner.as_mut().ok_or(Error::NotInitialized)?;
        let action = learner.select_action(state)?;
        trace!(name = %self.name, time_step, action, "agent acting");
        self.action = action;
        env.execute(slot, self, action, episode)
    }

    fn reward(&mut self, value: f64, _is_terminal: bool, _episode: usize) -> Result<()> {
        let learner = self.learner.as_mut().ok_or(Error::NotInitialized)?;
        let (prev_state, state) = match (&self.prev_state, &self.state) {
            (Some(prev_state), Some(state)) => (prev_state, state),
            _ => return Err(Error::NotInitialized),
        };
        learner.update(prev_state, state, self.action, value)?;
        self.episode_reward += value;
        Ok(())
    }

    fn set_follow_policy(&mut self, follow_policy: bool) {
        if let Some(learner) = self.learner.as_mut() {
            learner.set_follow_policy(follow_policy);
        }
    }

    fn episode_reward(&self) -> f64 {
        self.episode_reward
    }
}
