use std::time::Instant;

use kdam::{tqdm, BarExt};
use rand::Rng;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use tabular_rl::action_selection::{constant_decay, EnumActionSelection, EpsilonGreedy, Softmax};
use tabular_rl::algorithms::{EnumLearningAlgorithm, QLearning, Sarsa};
use tabular_rl::utils::{moving_average, SharedRng};
use tabular_rl::{Agent, Configuration, Environment, Error, Result, Simulation, TabularAgent};

/// Train a stateless agent on a Bernoulli multi-armed bandit
#[derive(StructOpt, Debug)]
#[structopt(name = "TabularRL - Bandit")]
struct Cli {
    /// Success probability of every arm
    #[structopt(long = "arms", use_delimiter = true, default_value = "0.1,0.3,0.5,0.7,0.9")]
    arms: Vec<f64>,

    /// Number of episodes for the training
    #[structopt(long = "n_episodes", short = "n", default_value = "2000")]
    n_episodes: usize,

    /// Pulls per episode
    #[structopt(long = "pulls", default_value = "10")]
    pulls: usize,

    /// Number of greedy episodes played after training
    #[structopt(long = "eval_episodes", default_value = "100")]
    eval_episodes: usize,

    /// Learning algorithm: qlearning or sarsa
    #[structopt(long = "algorithm", default_value = "qlearning", possible_values = &["qlearning", "sarsa"])]
    algorithm: String,

    /// Action selection: egreedy or softmax
    #[structopt(long = "selection", default_value = "egreedy", possible_values = &["egreedy", "softmax"])]
    selection: String,

    /// Learning rate of the RL agent
    #[structopt(long = "learning_rate", default_value = "0.1")]
    learning_rate: f64,

    /// Discount factor used on the temporal difference
    #[structopt(long = "discount_factor", default_value = "0.0")]
    discount_factor: f64,

    /// Initial epsilon (egreedy) or temperature (softmax)
    #[structopt(long = "initial_parameter", default_value = "1.0")]
    initial_parameter: f64,

    /// Final epsilon (egreedy) or temperature (softmax)
    #[structopt(long = "final_parameter", default_value = "0.01")]
    final_parameter: f64,

    /// Fraction of the episodes over which the parameter decays
    #[structopt(long = "exploration_time", default_value = "0.5")]
    exploration_time: f64,

    /// Moving average window used to report rewards
    #[structopt(long = "moving_average_window", default_value = "10")]
    moving_average_window: usize,

    /// Seed for reproducibility
    #[structopt(long = "seed", default_value = "42")]
    seed: u64,
}

struct BanditEnv {
    arms: Vec<f64>,
    pulls: usize,
    pulled: usize,
    counts: Vec<usize>,
    rng: SharedRng,
}

impl BanditEnv {
    fn new(arms: Vec<f64>, pulls: usize, rng: SharedRng) -> Self {
        let counts = vec![0; arms.len()];
        Self {
            arms,
            pulls,
            pulled: 0,
            counts,
            rng,
        }
    }
}

impl Environment<()> for BanditEnv {
    fn default_state(&mut self, _slot: usize) {}

    fn reset(&mut self, _episode: usize) {
        self.pulled = 0;
    }

    fn execute(
        &mut self,
        _slot: usize,
        agent: &mut dyn Agent<()>,
        action: usize,
        episode: usize,
    ) -> Result<()> {
        let p = *self.arms.get(action).ok_or(Error::ActionOutOfRange {
            action,
            num_actions: self.arms.len(),
        })?;
        let reward: f64 = if self.rng.borrow_mut().gen_bool(p) { 1.0 } else { 0.0 };
        self.pulled += 1;
        self.counts[action] += 1;
        agent.set_state(());
        agent.reward(reward, self.pulled >= self.pulls, episode)
    }

    fn is_terminal(&self, _time_step: usize, _episode: usize) -> bool {
        self.pulled >= self.pulls
    }
}

fn learner(cli: &Cli, config: &Configuration) -> Result<EnumLearningAlgorithm<()>> {
    let decay_until = (cli.exploration_time * cli.n_episodes as f64) as usize;
    let decay = Some(constant_decay(
        0,
        decay_until,
        cli.initial_parameter,
        cli.final_parameter,
    ));
    let selection: EnumActionSelection = if cli.selection == "softmax" {
        Softmax::new(cli.initial_parameter, config.rng(), decay)?.into()
    } else {
        EpsilonGreedy::new(cli.initial_parameter, config.rng(), decay)?.into()
    };
    let n_actions = cli.arms.len();
    Ok(if cli.algorithm == "sarsa" {
        Sarsa::with_actions(
            n_actions,
            selection,
            cli.learning_rate,
            cli.discount_factor,
            config.rng(),
        )?
        .into()
    } else {
        QLearning::with_actions(
            n_actions,
            selection,
            cli.learning_rate,
            cli.discount_factor,
            config.rng(),
        )?
        .into()
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli: Cli = Cli::from_args();
    if let Some(&p) = cli.arms.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(Error::InvalidParameter {
            name: "arms",
            value: p,
            expected: "expected a probability within [0, 1]",
        });
    }
    let config = Configuration::new(cli.n_episodes).with_seed(cli.seed);
    let env = BanditEnv::new(cli.arms.clone(), cli.pulls, config.rng());

    let n_episodes = cli.n_episodes;
    let eval_episodes = cli.eval_episodes;
    let window = cli.moving_average_window;
    let name = format!("{}-{}", cli.algorithm, cli.selection);

    let mut simulation = Simulation::new(config, env);
    simulation.add_agent(Box::new(TabularAgent::new(
        name.clone(),
        Box::new(move |config: &Configuration| learner(&cli, config)),
    )));
    simulation.initialize()?;

    let mut training_reward: Vec<f64> = vec![];
    let now: Instant = Instant::now();
    let mut pb = tqdm!(total = n_episodes);
    pb.set_description(name.clone());
    for episode in 0..n_episodes {
        let summary = simulation.run_episode(episode)?;
        training_reward.push(summary.rewards[0]);
        if episode % 100 == 0 {
            pb.set_postfix(format!("reward={}", summary.rewards[0]));
        }
        pb.update(1);
    }
    let elapsed: std::time::Duration = now.elapsed();
    println!();
    println!("{} has:", name);
    println!(" - training time of {:.2?}", elapsed);
    let ma_reward = moving_average(n_episodes / window.max(1), &training_reward);
    if let (Some(first), Some(last)) = (ma_reward.first(), ma_reward.last()) {
        println!(" - moving average reward from {:.3} to {:.3}", first, last);
    }

    let trained_counts = simulation.environment().counts.clone();
    simulation.set_follow_policy(true);
    let mut eval_reward: f64 = 0.0;
    for episode in 0..eval_episodes {
        eval_reward += simulation.run_episode(n_episodes + episode)?.rewards[0];
    }
    let eval_counts: Vec<usize> = simulation
        .environment()
        .counts
        .iter()
        .zip(trained_counts.iter())
        .map(|(total, trained)| total - trained)
        .collect();
    println!(
        " - mean evaluation reward of {:.3} per episode",
        eval_reward / eval_episodes.max(1) as f64
    );
    println!(" - arms pulled during evaluation: {:?}", eval_counts);
    Ok(())
}
