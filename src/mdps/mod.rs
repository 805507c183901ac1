pub mod bellman;
pub mod config;
pub mod error;
pub mod grid;
pub mod simulate;
pub mod utility;
