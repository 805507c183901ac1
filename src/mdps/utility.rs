use super::error::{BellmanError, Result};
use super::grid::{Action, Position, RewardGrid};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::{HashMap, Iter};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionUtilPair {
    pub action: Action,
    pub utility: f64,
}

impl ActionUtilPair {
    pub fn new(action: Action, utility: f64) -> Self {
        Self { action, utility }
    }
}

/// One iterate of the value function: best action so far and its utility,
/// per position. Owned by the solver, read-only during a Bellman step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UtilityTable {
    entries: HashMap<Position, ActionUtilPair>,
}

impl UtilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Utility of every cell (walls included) starts at the cell's own
    /// reward.
    pub fn seeded_from_rewards(grid: &RewardGrid, action: Action) -> Self {
        grid.positions()
            .map(|p| {
                let r = grid.reward(p).unwrap_or_default();
                (p, ActionUtilPair::new(action, r))
            })
            .collect()
    }

    pub fn zeroed(grid: &RewardGrid) -> Self {
        grid.positions()
            .map(|p| (p, ActionUtilPair::new(Action::Up, 0.)))
            .collect()
    }

    pub fn insert(&mut self, pos: Position, pair: ActionUtilPair) -> Option<ActionUtilPair> {
        self.entries.insert(pos, pair)
    }

    pub fn get(&self, pos: Position) -> Option<&ActionUtilPair> {
        self.entries.get(&pos)
    }

    /// Numeric utility at `pos`. A missing entry is the caller's bug and is
    /// never read as 0.
    pub fn utility(&self, pos: Position) -> Result<f64> {
        self.entries
            .get(&pos)
            .map(|p| p.utility)
            .ok_or(BellmanError::MissingUtilityEntry(pos))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Position, ActionUtilPair> {
        self.entries.iter()
    }
}

impl FromIterator<(Position, ActionUtilPair)> for UtilityTable {
    fn from_iter<T: IntoIterator<Item = (Position, ActionUtilPair)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a UtilityTable {
    type Item = (&'a Position, &'a ActionUtilPair);
    type IntoIter = Iter<'a, Position, ActionUtilPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
