use tracing::{debug, trace};

use crate::action_selection::{ActionSelection, EnumActionSelection};
use crate::error::{non_negative, Result};
use crate::policy::{DiscretePolicy, State, TabularPolicy};
use crate::utils::{select_max, SharedRng};

use super::LearningAlgorithm;

/// Off-policy control: bootstraps from the greedy value of the next state,
/// whatever action is actually taken there.
#[derive(Debug, Clone)]
pub struct QLearning<S: State> {
    policy: TabularPolicy<S>,
    action_selection: EnumActionSelection,
    learning_rate: f64,
    discount_factor: f64,
    rng: SharedRng,
    follow_policy: bool,
}

impl<S: State> QLearning<S> {
    pub fn new(
        policy: TabularPolicy<S>,
        action_selection: EnumActionSelection,
        learning_rate: f64,
        discount_factor: f64,
        rng: SharedRng,
    ) -> Result<Self> {
        let learning_rate = non_negative("alpha", learning_rate)?;
        let discount_factor = non_negative("gamma", discount_factor)?;
        debug!(
            num_actions = policy.num_actions(),
            learning_rate, discount_factor, "q-learning"
        );
        Ok(Self {
            policy,
            action_selection,
            learning_rate,
            discount_factor,
            rng,
            follow_policy: false,
        })
    }

    /// Starts from an empty table filled with zeros.
    pub fn with_actions(
        num_actions: usize,
        action_selection: EnumActionSelection,
        learning_rate: f64,
        discount_factor: f64,
        rng: SharedRng,
    ) -> Result<Self> {
        Self::new(
            TabularPolicy::new(num_actions, 0.0)?,
            action_selection,
            learning_rate,
            discount_factor,
            rng,
        )
    }

    pub fn table_mut(&mut self) -> &mut TabularPolicy<S> {
        &mut self.policy
    }
}

impl<S: State> LearningAlgorithm<S> for QLearning<S> {
    fn follow_policy(&self) -> bool {
        self.follow_policy
    }

    fn set_follow_policy(&mut self, follow_policy: bool) {
        self.follow_policy = follow_policy;
    }

    fn select_action(&mut self, state: &S) -> Result<usize> {
        let values = self.policy.get(state);
        let action = if self.follow_policy {
            select_max(values, &mut *self.rng.borrow_mut())?
        } else {
            self.action_selection.select(values)?
        };
        trace!(?state, action, "q-learning selected");
        Ok(action)
    }

    fn update(&mut self, prev_state: &S, new_state: &S, action: usize, reward: f64) -> Result<()> {
        let old_value = self.policy.value(prev_state, action)?;
        let next_q_values = self.policy.get(new_state);
        let best_next = select_max(next_q_values, &mut *self.rng.borrow_mut())?;
        let future_q_value = next_q_values[best_next];
        let new_value = old_value
            + self.learning_rate * (reward + self.discount_factor * future_q_value - old_value);
        self.policy.set(prev_state, action, new_value)
    }

    fn after_episode(&mut self, episode: usize) {
        self.action_selection.update(episode);
    }

    fn table(&self) -> &TabularPolicy<S> {
        &self.policy
    }

    fn selection(&self) -> &EnumActionSelection {
        &self.action_selection
    }
}
