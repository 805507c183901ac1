//! Bellman evaluation step for a slippery grid-world MDP: the expected
//! discounted utility of each move from a cell, and the best of them.
//! The iterating solver around it lives elsewhere.

#[cfg(test)]
mod envs;
pub mod mdps;

pub use mdps::bellman::*;
pub use mdps::config::StepConfig;
pub use mdps::error::{BellmanError, Result};
pub use mdps::grid::{Action, Position, Reward, RewardGrid};
pub use mdps::utility::{ActionUtilPair, UtilityTable};

pub type Discrete = i32;
