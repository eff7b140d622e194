mod qlearning;
mod sarsa;

use enum_dispatch::enum_dispatch;

use crate::action_selection::EnumActionSelection;
use crate::error::Result;
use crate::policy::{State, TabularPolicy};

pub use qlearning::QLearning;
pub use sarsa::Sarsa;

/// One-step temporal difference control over a [`TabularPolicy`].
///
/// Per episode: `after_episode`, then `select_action` / `update` once per step.
#[enum_dispatch]
pub trait LearningAlgorithm<S: State> {
    /// Evaluation mode: actions are picked greedily, bypassing exploration.
    fn follow_policy(&self) -> bool;

    fn set_follow_policy(&mut self, follow_policy: bool);

    fn select_action(&mut self, state: &S) -> Result<usize>;

    fn update(&mut self, prev_state: &S, new_state: &S, action: usize, reward: f64) -> Result<()>;

    /// Episode boundary, forwarded to the selection policy's decay.
    fn after_episode(&mut self, episode: usize);

    fn table(&self) -> &TabularPolicy<S>;

    fn selection(&self) -> &EnumActionSelection;
}

#[derive(Debug, Clone)]
#[enum_dispatch(LearningAlgorithm<S>)]
pub enum EnumLearningAlgorithm<S: State> {
    QLearning(QLearning<S>),
    Sarsa(Sarsa<S>),
}
