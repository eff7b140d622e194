mod decay;
mod epsilon_greedy;
mod softmax;

use std::rc::Rc;

use enum_dispatch::enum_dispatch;

use crate::error::Result;
use crate::policy::QValues;

pub use decay::constant_decay;
pub use epsilon_greedy::EpsilonGreedy;
pub use softmax::Softmax;

/// Per-episode schedule for a policy parameter: `(current value, episode) -> new value`.
pub type Decay = Rc<dyn Fn(f64, usize) -> f64>;

#[enum_dispatch]
pub trait ActionSelection {
    fn select(&mut self, values: &QValues) -> Result<usize>;

    /// Applies the decay function, if any, for the given episode.
    fn update(&mut self, episode: usize);

    /// Current epsilon or temperature.
    fn parameter(&self) -> f64;
}

#[derive(Debug, Clone)]
#[enum_dispatch(ActionSelection)]
pub enum EnumActionSelection {
    EpsilonGreedy(EpsilonGreedy),
    Softmax(Softmax),
}
