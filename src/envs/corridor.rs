use crate::mdps::bellman::{BellmanStep, Discount};
use crate::mdps::grid::{Action, Reward, RewardGrid};
use crate::mdps::utility::UtilityTable;

/// A single row of three cells, the last one worth 10. Utilities start at
/// the rewards themselves.
pub struct Corridor {
    pub grid: RewardGrid,
    pub utils: UtilityTable,
    pub step: BellmanStep,
}

impl Corridor {
    pub fn new(gamma: f64) -> Self {
        let grid = RewardGrid::from_rows(&[vec![
            Reward::Open(0.),
            Reward::Open(0.),
            Reward::Open(10.),
        ]])
        .unwrap();
        let utils = UtilityTable::seeded_from_rewards(&grid, Action::Up);

        Self {
            grid,
            utils,
            step: BellmanStep::new(Discount::new(gamma).unwrap()),
        }
    }
}

/// 6×6 maze with walls, green and brown cells.
pub fn maze() -> RewardGrid {
    "G#...G
     .B.G#B
     ..B.G.
     ...B.G
     .###B.
     ......"
        .parse()
        .unwrap()
}

/// Every cell open with the same reward.
pub fn uniform(cols: usize, rows: usize, reward: f64) -> RewardGrid {
    RewardGrid::from_rows(&vec![vec![Reward::Open(reward); cols]; rows]).unwrap()
}
