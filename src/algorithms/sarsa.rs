use tracing::{debug, trace};

use crate::action_selection::{ActionSelection, EnumActionSelection};
use crate::error::{non_negative, Result};
use crate::policy::{DiscretePolicy, State, TabularPolicy};
use crate::utils::{select_max, SharedRng};

use super::LearningAlgorithm;

/// On-policy control: bootstraps from the action the selection policy will
/// actually take in the next state.
///
/// That action is drawn during `update` and kept until the next
/// `select_action` on the same state, so the step taken and the step learned
/// from come out of a single stochastic draw.
#[derive(Debug, Clone)]
pub struct Sarsa<S: State> {
    policy: TabularPolicy<S>,
    action_selection: EnumActionSelection,
    learning_rate: f64,
    discount_factor: f64,
    rng: SharedRng,
    follow_policy: bool,
    possible: Option<(S, usize)>,
}

impl<S: State> Sarsa<S> {
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
            learning_rate, discount_factor, "sarsa"
        );
        Ok(Self {
            policy,
            action_selection,
            learning_rate,
            discount_factor,
            rng,
            follow_policy: false,
            possible: None,
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

    /// Next state and action drawn by the last `update`, if not consumed yet.
    pub fn possible(&self) -> Option<(&S, usize)> {
        self.possible.as_ref().map(|(state, action)| (state, *action))
    }
}

impl<S: State> LearningAlgorithm<S> for Sarsa<S> {
    fn follow_policy(&self) -> bool {
        self.follow_policy
    }

    fn set_follow_policy(&mut self, follow_policy: bool) {
        self.follow_policy = follow_policy;
    }

    fn select_action(&mut self, state: &S) -> Result<usize> {
        if self.follow_policy {
            return select_max(self.policy.get(state), &mut *self.rng.borrow_mut());
        }
        match self.possible.take() {
            Some((possible_state, action)) if &possible_state == state => {
                trace!(?state, action, "sarsa reused next action");
                Ok(action)
            }
            possible => {
                self.possible = possible;
                let action = self.action_selection.select(self.policy.get(state))?;
                trace!(?state, action, "sarsa selected");
                Ok(action)
            }
        }
    }

    fn update(&mut self, prev_state: &S, new_state: &S, action: usize, reward: f64) -> Result<()> {
        let old_value = self.policy.value(prev_state, action)?;
        self.possible = None;
        let possible_action = self.select_action(new_state)?;
        self.possible = Some((new_state.clone(), possible_action));
        let next_value = self.policy.get(new_state)[possible_action];
        let new_value = old_value
            + self.learning_rate * (reward + self.discount_factor * next_value - old_value);
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
