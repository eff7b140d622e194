mod tabular_policy;

use std::fmt::Debug;
use std::hash::Hash;

use ndarray::Array1;

use crate::error::Result;

pub use tabular_policy::TabularPolicy;

/// Action scores of a single state, indexed by action number.
pub type QValues = Array1<f64>;

/// Anything usable as a table key: compared and hashed by value.
pub trait State: Hash + PartialEq + Eq + Clone + Debug {}

impl<T: Hash + PartialEq + Eq + Clone + Debug> State for T {}

pub trait DiscretePolicy<S: State> {
    /// Values of `state`, materialized with the default fill on first access.
    fn get(&mut self, state: &S) -> &mut QValues;

    fn set(&mut self, state: &S, action: usize, value: f64) -> Result<()>;

    fn contains(&self, state: &S) -> bool;

    fn num_actions(&self) -> usize;
}
