use std::fmt::Debug;

use rand::Rng;
use tracing::debug;

use crate::error::{non_negative, Result};
use crate::policy::QValues;
use crate::utils::{select_max, select_random, SharedRng};

use super::{ActionSelection, Decay};

#[derive(Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    rng: SharedRng,
    epsilon_decay: Option<Decay>,
}

impl Debug for EpsilonGreedy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EpsilonGreedy")
            .field("epsilon", &self.epsilon)
            .field("decays", &self.epsilon_decay.is_some())
            .finish()
    }
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64, rng: SharedRng, epsilon_decay: Option<Decay>) -> Result<Self> {
        let epsilon = non_negative("epsilon", epsilon)?;
        debug!(epsilon, decays = epsilon_decay.is_some(), "epsilon greedy selection");
        Ok(Self {
            epsilon,
            rng,
            epsilon_decay,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl ActionSelection for EpsilonGreedy {
    fn select(&mut self, values: &QValues) -> Result<usize> {
        let mut rng = self.rng.borrow_mut();
        if rng.gen::<f64>() < self.epsilon {
            select_random(values, &mut *rng)
        } else {
            select_max(values, &mut *rng)
        }
    }

    fn update(&mut self, episode: usize) {
        if let Some(decay) = &self.epsilon_decay {
            self.epsilon = decay(self.epsilon, episode);
        }
    }

    fn parameter(&self) -> f64 {
        self.epsilon
    }
}
