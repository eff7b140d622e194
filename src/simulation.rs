use tracing::debug;

use crate::agent::Agent;
use crate::env::{Configuration, Environment};
use crate::error::{Error, Result};
use crate::policy::State;

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub steps: usize,
    /// Reached a terminal condition rather than the step limit.
    pub terminated: bool,
    /// Accumulated reward of every agent, in registration order.
    pub rewards: Vec<f64>,
}

/// Drives one environment and its agents through episodes.
///
/// Every timestep updates the agents in registration order, so an agent sees
/// the world as left by the ones registered before it.
pub struct Simulation<S: State, E: Environment<S>> {
    config: Configuration,
    environment: E,
    agents: Vec<Box<dyn Agent<S>>>,
    time_step: usize,
}

impl<S: State, E: Environment<S>> Simulation<S, E> {
    pub fn new(config: Configuration, environment: E) -> Self {
        Self {
            config,
            environment,
            agents: vec![],
            time_step: 0,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.environment
    }

    pub fn agents(&self) -> &[Box<dyn Agent<S>>] {
        &self.agents
    }

    pub fn time_step(&self) -> usize {
        self.time_step
    }

    /// Registers an agent and returns its slot.
    pub fn add_agent(&mut self, agent: Box<dyn Agent<S>>) -> usize {
        self.agents.push(agent);
        self.agents.len() - 1
    }

    pub fn initialize(&mut self) -> Result<()> {
        for agent in self.agents.iter_mut() {
            agent.initialize(&self.config)?;
        }
        debug!(agents = self.agents.len(), "simulation initialized");
        Ok(())
    }

    pub fn reset(&mut self, episode: usize) -> Result<()> {
        self.time_step = 0;
        self.environment.reset(episode);
        for (slot, agent) in self.agents.iter_mut().enumerate() {
            agent.reset(&mut self.environment, slot, episode)?;
        }
        Ok(())
    }

    /// Plays one timestep for every agent; returns whether the episode ended.
    pub fn update(&mut self, episode: usize) -> Result<bool> {
        for (slot, agent) in self.agents.iter_mut().enumerate() {
            agent.update(&mut self.environment, slot, self.time_step, episode)?;
        }
        let terminal = self.environment.is_terminal(self.time_step, episode);
        self.time_step += 1;
        Ok(terminal)
    }

    /// Applies an action for one agent outside of its own selection.
    pub fn execute(&mut self, slot: usize, action: usize, episode: usize) -> Result<()> {
        let agents = self.agents.len();
        let agent = self
            .agents
            .get_mut(slot)
            .ok_or(Error::UnknownAgent { slot, agents })?;
        self.environment.execute(slot, agent.as_mut(), action, episode)
    }

    pub fn set_follow_policy(&mut self, follow_policy: bool) {
        for agent in self.agents.iter_mut() {
            agent.set_follow_policy(follow_policy);
        }
    }

    /// Resets, then steps until the environment reports a terminal condition
    /// or the configured step limit is hit.
    pub fn run_episode(&mut self, episode: usize) -> Result<EpisodeSummary> {
        self.reset(episode)?;
        let max_steps = self.config.max_steps();
        let mut steps: usize = 0;
        let terminated = loop {
            let terminal = self.update(episode)?;
            steps += 1;
            if terminal {
                break true;
            }
            if max_steps.map_or(false, |max| steps >= max) {
                break false;
            }
        };
        let rewards: Vec<f64> = self.agents.iter().map(|a| a.episode_reward()).collect();
        debug!(episode, steps, terminated, ?rewards, "episode finished");
        Ok(EpisodeSummary {
            episode,
            steps,
            terminated,
            rewards,
        })
    }

    pub fn run(&mut self) -> Result<Vec<EpisodeSummary>> {
        (0..self.config.max_episodes())
            .map(|episode| self.run_episode(episode))
            .collect()
    }
}
