use super::bellman::Discount;
use super::error::Result;
use serde::{Deserialize, Serialize};

/// Settings a solver hands to the Bellman step, e.g. `{"gamma": 0.9}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    pub gamma: f64,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self { gamma: 0.99 }
    }
}

impl StepConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn discount(&self) -> Result<Discount> {
        Discount::new(self.gamma)
    }
}
