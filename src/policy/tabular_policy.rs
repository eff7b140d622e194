use fxhash::FxHashMap;
use ndarray::Array1;
use tracing::trace;

use crate::error::{check_action, Error, Result};

use super::{DiscretePolicy, QValues, State};

/// Sparse state -> values table. Unseen states are never missing, only not
/// yet materialized: the first lookup stores a vector filled with the default.
#[derive(Debug, Clone)]
pub struct TabularPolicy<S: State> {
    num_actions: usize,
    default_value: f64,
    policy: FxHashMap<S, QValues>,
}

impl<S: State> TabularPolicy<S> {
    pub fn new(num_actions: usize, default_value: f64) -> Result<Self> {
        if num_actions == 0 {
            return Err(Error::InvalidParameter {
                name: "num_actions",
                value: 0.0,
                expected: "expected at least one action",
            });
        }
        Ok(Self {
            num_actions,
            default_value,
            policy: FxHashMap::default(),
        })
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Value of one state-action pair, materializing the state if needed.
    pub fn value(&mut self, state: &S, action: usize) -> Result<f64> {
        let action = check_action(action, self.num_actions)?;
        Ok(self.get(state)[action])
    }

    pub fn len(&self) -> usize {
        self.policy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policy.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &QValues)> {
        self.policy.iter()
    }

    pub fn reset(&mut self) {
        self.policy.clear()
    }
}

impl<S: State> DiscretePolicy<S> for TabularPolicy<S> {
    fn get(&mut self, state: &S) -> &mut QValues {
        let (num_actions, default_value) = (self.num_actions, self.default_value);
        self.policy.entry(state.clone()).or_insert_with(|| {
            trace!(?state, "materializing values");
            Array1::from_elem(num_actions, default_value)
        })
    }

    fn set(&mut self, state: &S, action: usize, value: f64) -> Result<()> {
        let num_actions = self.num_actions;
        let values = self.get(state);
        values[check_action(action, num_actions)?] = value;
        Ok(())
    }

    fn contains(&self, state: &S) -> bool {
        self.policy.contains_key(state)
    }

    fn num_actions(&self) -> usize {
        self.num_actions
    }
}
