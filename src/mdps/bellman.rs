//! One Bellman backup for a slippery grid agent.
//!
//! An agent that intends to move in some direction gets there with
//! probability [`PROB_INTENDED`] and veers 90° to either side with
//! probability [`PROB_PERPENDICULAR`] each. It never moves backwards by
//! chance; it only stays put when the move rule bounces it off an edge or a
//! wall.

use super::config::StepConfig;
use super::error::{BellmanError, Result};
use super::grid::{Action, Position, RewardGrid};
use super::simulate::{pick_next, Weighted};
use super::utility::{ActionUtilPair, UtilityTable};
use crate::Discrete;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub const PROB_INTENDED: f64 = 0.8;
pub const PROB_PERPENDICULAR: f64 = 0.1;

/// Discount factor γ, always in (0, 1].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Discount(f64);

impl Discount {
    pub fn new(gamma: f64) -> Result<Self> {
        if gamma > 0. && gamma <= 1. {
            Ok(Self(gamma))
        } else {
            Err(BellmanError::InvalidDiscount(gamma))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Discount {
    type Error = BellmanError;

    fn try_from(gamma: f64) -> Result<Self> {
        Self::new(gamma)
    }
}

impl From<Discount> for f64 {
    fn from(d: Discount) -> Self {
        d.0
    }
}

/// A hypothetical next-state and the chance of landing there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outcome {
    pub next: Position,
    pub probability: f64,
}

impl Weighted<Position> for Outcome {
    fn s(&self) -> Position {
        self.next
    }

    fn p(&self) -> f64 {
        self.probability
    }
}

/// Evaluates actions against the previous utility iterate. Holds nothing
/// but γ, so one instance can be shared by every thread of a sweep as long
/// as results go into a separate table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BellmanStep {
    gamma: Discount,
}

impl BellmanStep {
    pub fn new(gamma: Discount) -> Self {
        Self { gamma }
    }

    pub fn from_config(config: &StepConfig) -> Result<Self> {
        Ok(Self::new(config.discount()?))
    }

    pub fn gamma(&self) -> f64 {
        self.gamma.value()
    }

    /// Intended, left-perpendicular and right-perpendicular landing cells,
    /// in that order.
    pub fn outcomes(grid: &RewardGrid, s: Position, a: Action) -> [Outcome; 3] {
        let (left, right) = a.perpendiculars();

        [
            (a, PROB_INTENDED),
            (left, PROB_PERPENDICULAR),
            (right, PROB_PERPENDICULAR),
        ]
        .map(|(dir, probability)| Outcome {
            next: grid.step(s, dir),
            probability,
        })
    }

    /// `γ · Σ P(s'|s,a) U(s') + R(s)`. The reward is the one of the cell
    /// being evaluated, not of the cell landed in.
    pub fn action_utility(
        &self,
        grid: &RewardGrid,
        utils: &UtilityTable,
        s: Position,
        a: Action,
    ) -> Result<f64> {
        let reward = grid.reward(s)?;
        let mut expected = 0.;
        for o in Self::outcomes(grid, s, a) {
            expected += o.probability
                * utils
                    .utility(o.next)
                    .inspect_err(|e| debug!(%s, ?a, error = %e, "action utility failed"))?;
        }

        Ok(self.gamma.value() * expected + reward)
    }

    /// [`Self::action_utility`] for an action index in gymnasium numbering.
    pub fn action_utility_discrete(
        &self,
        grid: &RewardGrid,
        utils: &UtilityTable,
        s: Position,
        a: Discrete,
    ) -> Result<f64> {
        let a = Action::try_from(a)?;
        self.action_utility(grid, utils, s, a)
    }

    /// Highest-utility action at `s`. Actions are tried in [`Action::ALL`]
    /// order and a later one wins only if strictly better, so ties go to
    /// Up, then Down, then Left.
    pub fn best_action(
        &self,
        grid: &RewardGrid,
        utils: &UtilityTable,
        s: Position,
    ) -> Result<ActionUtilPair> {
        let mut best = ActionUtilPair::new(Action::Up, f64::NEG_INFINITY);
        for (i, a) in Action::ALL.into_iter().enumerate() {
            let u = self.action_utility(grid, utils, s, a)?;
            trace!(%s, ?a, u, "candidate");
            if i == 0 || u > best.utility {
                best = ActionUtilPair::new(a, u);
            }
        }

        debug!(%s, action = ?best.action, utility = best.utility, "best action");
        Ok(best)
    }

    /// Draws where a slippery agent at `s` trying `a` actually ends up.
    pub fn sample_next<R: Rng + ?Sized>(
        &self,
        grid: &RewardGrid,
        s: Position,
        a: Action,
        rng: &mut R,
    ) -> Result<Position> {
        pick_next(rng, &Self::outcomes(grid, s, a))
    }
}
