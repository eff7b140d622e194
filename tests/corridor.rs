use tabular_rl::action_selection::{constant_decay, ActionSelection, EpsilonGreedy, Softmax};
use tabular_rl::agent::LearnerFactory;
use tabular_rl::algorithms::{EnumLearningAlgorithm, LearningAlgorithm, QLearning, Sarsa};
use tabular_rl::{
    Agent, Configuration, EpisodeSummary, Environment, Error, Result, Simulation, TabularAgent,
};

const LENGTH: i64 = 5;
const LEFT: usize = 0;
const RIGHT: usize = 1;

/// Agent walks a corridor from cell 0 to cell `LENGTH`, paying 1 per move.
struct Corridor;

impl Environment<i64> for Corridor {
    fn default_state(&mut self, _slot: usize) -> i64 {
        0
    }

    fn execute(
        &mut self,
        _slot: usize,
        agent: &mut dyn Agent<i64>,
        action: usize,
        episode: usize,
    ) -> Result<()> {
        let position = *agent.state().ok_or(Error::NotInitialized)?;
        let next = match action {
            LEFT => (position - 1).max(0),
            RIGHT => (position + 1).min(LENGTH),
            _ => {
                return Err(Error::ActionOutOfRange {
                    action,
                    num_actions: 2,
                })
            }
        };
        agent.set_state(next);
        agent.reward(-1.0, next == LENGTH, episode)
    }

    fn is_terminal(&self, _time_step: usize, _episode: usize) -> bool {
        false
    }
}

/// Same corridor, but the episode ends when the walker reaches the end.
struct EndingCorridor {
    reached: bool,
}

impl Environment<i64> for EndingCorridor {
    fn default_state(&mut self, slot: usize) -> i64 {
        Corridor.default_state(slot)
    }

    fn reset(&mut self, _episode: usize) {
        self.reached = false;
    }

    fn execute(
        &mut self,
        slot: usize,
        agent: &mut dyn Agent<i64>,
        action: usize,
        episode: usize,
    ) -> Result<()> {
        Corridor.execute(slot, agent, action, episode)?;
        self.reached = agent.state() == Some(&LENGTH);
        Ok(())
    }

    fn is_terminal(&self, _time_step: usize, _episode: usize) -> bool {
        self.reached
    }
}

fn qlearning_factory() -> LearnerFactory<i64> {
    Box::new(|config: &Configuration| -> Result<EnumLearningAlgorithm<i64>> {
        let selection = EpsilonGreedy::new(0.1, config.rng(), None)?.into();
        Ok(QLearning::with_actions(2, selection, 0.5, 0.9, config.rng())?.into())
    })
}

fn sarsa_factory() -> LearnerFactory<i64> {
    Box::new(|config: &Configuration| -> Result<EnumLearningAlgorithm<i64>> {
        let selection = EpsilonGreedy::new(0.1, config.rng(), None)?.into();
        Ok(Sarsa::with_actions(2, selection, 0.5, 0.9, config.rng())?.into())
    })
}

fn train(
    factory: LearnerFactory<i64>,
    seed: u64,
) -> (Simulation<i64, EndingCorridor>, Vec<EpisodeSummary>) {
    let config = Configuration::new(300).with_seed(seed).with_max_steps(200);
    let mut simulation = Simulation::new(config, EndingCorridor { reached: false });
    simulation.add_agent(Box::new(TabularAgent::new("walker", factory)));
    simulation.initialize().unwrap();
    let summaries = simulation.run().unwrap();
    (simulation, summaries)
}

fn greedy_episode(simulation: &mut Simulation<i64, EndingCorridor>) -> EpisodeSummary {
    simulation.set_follow_policy(true);
    simulation.run_episode(10_000).unwrap()
}

#[test]
fn qlearning_finds_the_shortest_path() {
    let (mut simulation, summaries) = train(qlearning_factory(), 7);
    assert!(summaries.iter().all(|s| s.terminated));
    let evaluation = greedy_episode(&mut simulation);
    assert!(evaluation.terminated);
    assert_eq!(evaluation.steps, LENGTH as usize);
    assert_eq!(evaluation.rewards, vec![-(LENGTH as f64)]);
}

#[test]
fn sarsa_finds_the_shortest_path() {
    let (mut simulation, _) = train(sarsa_factory(), 7);
    let evaluation = greedy_episode(&mut simulation);
    assert!(evaluation.terminated);
    assert_eq!(evaluation.steps, LENGTH as usize);
}

#[test]
fn same_seed_replays_the_same_training() {
    let (_, first) = train(qlearning_factory(), 21);
    let (_, second) = train(qlearning_factory(), 21);
    assert_eq!(first, second);
}

#[test]
fn step_limit_bounds_an_endless_corridor() {
    let config = Configuration::new(2).with_seed(1).with_max_steps(25);
    let mut simulation = Simulation::new(config, Corridor);
    simulation.add_agent(Box::new(TabularAgent::new("walker", qlearning_factory())));
    simulation.initialize().unwrap();
    for summary in simulation.run().unwrap() {
        assert_eq!(summary.steps, 25);
        assert!(!summary.terminated);
    }
}

#[test]
fn decayed_exploration_becomes_greedy() {
    let factory: LearnerFactory<i64> =
        Box::new(|config: &Configuration| -> Result<EnumLearningAlgorithm<i64>> {
            let decay = constant_decay(0, 100, 1.0, 0.0);
            let selection = EpsilonGreedy::new(1.0, config.rng(), Some(decay))?.into();
            Ok(QLearning::with_actions(2, selection, 0.5, 0.9, config.rng())?.into())
        });
    let mut agent = TabularAgent::new("walker", factory);
    let mut env = EndingCorridor { reached: false };
    agent.initialize(&Configuration::new(1).with_seed(9)).unwrap();
    for episode in 0..=100 {
        agent.reset(&mut env, 0, episode).unwrap();
    }
    let learner = agent.learner().unwrap();
    assert_eq!(learner.selection().parameter(), 0.0);
    assert!(!learner.follow_policy());
}

#[test]
fn softmax_agents_learn_too() {
    let factory: LearnerFactory<i64> =
        Box::new(|config: &Configuration| -> Result<EnumLearningAlgorithm<i64>> {
            let selection = Softmax::new(0.5, config.rng(), None)?.into();
            Ok(QLearning::with_actions(2, selection, 0.5, 0.9, config.rng())?.into())
        });
    let (mut simulation, _) = train(factory, 11);
    let evaluation = greedy_episode(&mut simulation);
    assert_eq!(evaluation.steps, LENGTH as usize);
}
