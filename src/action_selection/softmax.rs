use std::fmt::Debug;

use rand::Rng;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::policy::QValues;
use crate::utils::{categorical_sample, select_max, SharedRng};

use super::{ActionSelection, Decay};

/// Boltzmann selection: action `i` is drawn with probability proportional to
/// `exp(values[i] / tau)`.
#[derive(Clone)]
pub struct Softmax {
    tau: f64,
    rng: SharedRng,
    tau_decay: Option<Decay>,
}

impl Debug for Softmax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Softmax")
            .field("tau", &self.tau)
            .field("decays", &self.tau_decay.is_some())
            .finish()
    }
}

impl Softmax {
    /// Fails unless `tau > 0`.
    pub fn new(tau: f64, rng: SharedRng, tau_decay: Option<Decay>) -> Result<Self> {
        if !(tau > 0.0) {
            return Err(Error::InvalidParameter {
                name: "tau",
                value: tau,
                expected: "expected > 0",
            });
        }
        debug!(tau, decays = tau_decay.is_some(), "softmax selection");
        Ok(Self {
            tau,
            rng,
            tau_decay,
        })
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    fn exponent(&self, value: f64) -> f64 {
        if value != 0.0 {
            value / self.tau
        } else {
            0.0
        }
    }

    /// Selection probability of every action under the current temperature.
    ///
    /// Exponents are shifted by their maximum before `exp`, which leaves the
    /// distribution unchanged and keeps it finite for large or very negative values.
    pub fn probabilities(&self, values: &QValues) -> Vec<f64> {
        let exponents: Vec<f64> = values.iter().map(|&v| self.exponent(v)).collect();
        let max = exponents.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = exponents.iter().map(|e| (e - max).exp()).collect();
        let sum_exp: f64 = exps.iter().sum();
        exps.iter().map(|e| e / sum_exp).collect()
    }
}

impl ActionSelection for Softmax {
    fn select(&mut self, values: &QValues) -> Result<usize> {
        if values.is_empty() {
            return Err(Error::EmptyValues);
        }
        let mut rng = self.rng.borrow_mut();
        if self.tau <= 0.0 {
            return select_max(values, &mut *rng);
        }
        let random: f64 = rng.gen();
        Ok(categorical_sample(&self.probabilities(values), random))
    }

    fn update(&mut self, episode: usize) {
        if let Some(decay) = &self.tau_decay {
            let tau = decay(self.tau, episode);
            if tau <= 0.0 && self.tau > 0.0 {
                warn!(tau, episode, "temperature decayed to zero, selecting greedily");
            }
            self.tau = tau;
        }
    }

    fn parameter(&self) -> f64 {
        self.tau
    }
}
