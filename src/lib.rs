pub mod action_selection;
pub mod agent;
pub mod algorithms;
pub mod env;
pub mod error;
pub mod policy;
pub mod simulation;
pub mod utils;

pub use agent::{Agent, TabularAgent};
pub use env::{Configuration, Environment};
pub use error::{Error, Result};
pub use simulation::{EpisodeSummary, Simulation};
