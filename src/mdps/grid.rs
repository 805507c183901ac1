use super::error::{BellmanError, Result};
use crate::Discrete;
use itertools::iproduct;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A grid cell, addressed by (column, row). Row 0 is the top row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub col: usize,
    pub row: usize,
}

impl Position {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// The four cardinal moves. Declaration order is the evaluation order used
/// when picking the best action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

/// (left, right) of each action from the agent's point of view, indexed by
/// `Action as usize`.
const PERPENDICULARS: [(Action, Action); 4] = [
    (Action::Left, Action::Right),
    (Action::Right, Action::Left),
    (Action::Down, Action::Up),
    (Action::Up, Action::Down),
];

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// The directions the agent veers into when it slips, as
    /// (left-perpendicular, right-perpendicular).
    pub fn perpendiculars(self) -> (Action, Action) {
        PERPENDICULARS[self as usize]
    }

    /// (column, row) offset of a single move.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }
}

/// Gymnasium grid environments (FrozenLake, CliffWalking) number their
/// actions 0: Left, 1: Down, 2: Right, 3: Up.
impl TryFrom<Discrete> for Action {
    type Error = BellmanError;

    fn try_from(a: Discrete) -> Result<Self> {
        match a {
            0 => Ok(Action::Left),
            1 => Ok(Action::Down),
            2 => Ok(Action::Right),
            3 => Ok(Action::Up),
            a => Err(BellmanError::InvalidAction(a)),
        }
    }
}

impl From<Action> for Discrete {
    fn from(a: Action) -> Self {
        match a {
            Action::Left => 0,
            Action::Down => 1,
            Action::Right => 2,
            Action::Up => 3,
        }
    }
}

/// Immediate reward of a cell. In JSON an open cell is a number and a wall
/// is `null`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reward {
    Open(f64),
    Wall,
}

impl Reward {
    pub const fn white() -> Self {
        Reward::Open(-0.04)
    }

    pub const fn green() -> Self {
        Reward::Open(1.0)
    }

    pub const fn brown() -> Self {
        Reward::Open(-1.0)
    }

    /// Walls are never entered, their reward only matters if a solver seeds
    /// them, so it is 0.
    pub fn value(&self) -> f64 {
        match self {
            Reward::Open(r) => *r,
            Reward::Wall => 0.,
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Reward::Wall)
    }
}

/// Reward map of a `cols × rows` maze, indexed `[col, row]`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Vec<Reward>>")]
pub struct RewardGrid {
    cells: Array2<Reward>,
}

impl RewardGrid {
    /// `cells` is indexed `[col, row]`.
    pub fn new(cells: Array2<Reward>) -> Result<Self> {
        if cells.is_empty() {
            return Err(BellmanError::InvalidGrid("grid has no cells".into()));
        }

        Ok(Self { cells })
    }

    /// Builds a grid from row-major input, the way a maze is written down.
    pub fn from_rows(rows: &[Vec<Reward>]) -> Result<Self> {
        let n_cols = rows.first().map_or(0, Vec::len);
        if n_cols == 0 {
            return Err(BellmanError::InvalidGrid("grid has no cells".into()));
        }
        if let Some(r) = rows.iter().position(|r| r.len() != n_cols) {
            return Err(BellmanError::InvalidGrid(format!(
                "row {} has {} cells, expected {}",
                r,
                rows[r].len(),
                n_cols
            )));
        }

        Self::new(Array2::from_shape_fn((n_cols, rows.len()), |(c, r)| {
            rows[r][c]
        }))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn cols(&self) -> usize {
        self.cells.nrows()
    }

    pub fn rows(&self) -> usize {
        self.cells.ncols()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.col < self.cols() && pos.row < self.rows()
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        matches!(self.cells.get((pos.col, pos.row)), Some(Reward::Wall))
    }

    pub fn cell(&self, pos: Position) -> Result<Reward> {
        self.cells
            .get((pos.col, pos.row))
            .copied()
            .ok_or(BellmanError::OutOfGrid(pos))
    }

    pub fn reward(&self, pos: Position) -> Result<f64> {
        self.cell(pos).map(|c| c.value())
    }

    /// Every cell, walls included, column by column.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        iproduct!(0..self.cols(), 0..self.rows()).map(|(col, row)| Position::new(col, row))
    }

    /// The move rule: the adjacent cell in direction `a`, or `pos` itself
    /// when that cell is off the grid or a wall.
    pub fn step(&self, pos: Position, a: Action) -> Position {
        let (dc, dr) = a.delta();
        let next = pos
            .col
            .checked_add_signed(dc)
            .zip(pos.row.checked_add_signed(dr))
            .map(|(col, row)| Position::new(col, row));

        match next {
            Some(n) if self.contains(n) && !self.is_wall(n) => n,
            _ => pos,
        }
    }
}

impl TryFrom<Vec<Vec<Reward>>> for RewardGrid {
    type Error = BellmanError;

    fn try_from(rows: Vec<Vec<Reward>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

/// Text maze, one line per row: `.` or `W` white, `G` green, `B` brown,
/// `#` wall. Blank lines and surrounding whitespace are ignored.
impl FromStr for RewardGrid {
    type Err = BellmanError;

    fn from_str(s: &str) -> Result<Self> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| l.chars().map(glyph_reward).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()?;

        Self::from_rows(&rows)
    }
}

fn glyph_reward(c: char) -> Result<Reward> {
    match c {
        '.' | 'W' => Ok(Reward::white()),
        'G' => Ok(Reward::green()),
        'B' => Ok(Reward::brown()),
        '#' => Ok(Reward::Wall),
        c => Err(BellmanError::InvalidGrid(format!("unknown cell glyph '{c}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertor::*;
    use float_eq::*;
    use insta::assert_debug_snapshot;
    use rstest::rstest;

    #[rstest]
    #[case(Action::Up, (Action::Left, Action::Right))]
    #[case(Action::Down, (Action::Right, Action::Left))]
    #[case(Action::Left, (Action::Down, Action::Up))]
    #[case(Action::Right, (Action::Up, Action::Down))]
    fn perpendicular_pairs(#[case] a: Action, #[case] expected: (Action, Action)) {
        assert_eq!(a.perpendiculars(), expected);
    }

    #[test]
    fn perpendiculars_are_never_the_action_or_its_reverse() {
        for a in Action::ALL {
            let (l, r) = a.perpendiculars();
            let (dc, dr) = a.delta();
            for p in [l, r] {
                let (pc, pr) = p.delta();
                assert_eq!(dc * pc + dr * pr, 0, "{a:?} / {p:?}");
            }
            assert_ne!(l, r);
        }
    }

    #[test]
    fn evaluation_order() {
        assert_debug_snapshot!(Action::ALL, @r###"
        [
            Up,
            Down,
            Left,
            Right,
        ]
        "###);
    }

    #[rstest]
    #[case(0, Action::Left)]
    #[case(1, Action::Down)]
    #[case(2, Action::Right)]
    #[case(3, Action::Up)]
    fn discrete_actions(#[case] d: Discrete, #[case] a: Action) {
        assert_eq!(Action::try_from(d), Ok(a));
        assert_eq!(Discrete::from(a), d);
    }

    #[rstest]
    #[case(-1)]
    #[case(4)]
    #[case(Discrete::MAX)]
    fn invalid_discrete_action(#[case] d: Discrete) {
        assert_eq!(Action::try_from(d), Err(BellmanError::InvalidAction(d)));
    }

    #[test]
    fn parse_text_maze() {
        let g = "G#.\n.B.\n".parse::<RewardGrid>().unwrap();

        assert_eq!(g.cols(), 3);
        assert_eq!(g.rows(), 2);
        assert!(g.is_wall(Position::new(1, 0)));
        assert_float_eq!(g.reward(Position::new(0, 0)).unwrap(), 1., abs <= 1e-12);
        assert_float_eq!(g.reward(Position::new(1, 1)).unwrap(), -1., abs <= 1e-12);
        assert_float_eq!(g.reward(Position::new(2, 1)).unwrap(), -0.04, abs <= 1e-12);
        assert_float_eq!(g.reward(Position::new(1, 0)).unwrap(), 0., abs <= 1e-12);
    }

    #[test]
    fn parse_rejects_bad_mazes() {
        assert!(matches!(
            "G.\n.".parse::<RewardGrid>(),
            Err(BellmanError::InvalidGrid(_))
        ));
        assert!(matches!(
            "G?".parse::<RewardGrid>(),
            Err(BellmanError::InvalidGrid(_))
        ));
        assert!(matches!(
            "\n\n".parse::<RewardGrid>(),
            Err(BellmanError::InvalidGrid(_))
        ));
    }

    #[test]
    fn grid_from_json() {
        let g = RewardGrid::from_json("[[0.0, null], [1.5, -2.0]]").unwrap();

        assert!(g.is_wall(Position::new(1, 0)));
        assert_float_eq!(g.reward(Position::new(0, 1)).unwrap(), 1.5, abs <= 1e-12);
        assert_float_eq!(g.reward(Position::new(1, 1)).unwrap(), -2., abs <= 1e-12);

        assert!(matches!(
            RewardGrid::from_json("[[0.0], [1.0, 2.0]]"),
            Err(BellmanError::Json(_))
        ));
    }

    #[test]
    fn reward_off_grid() {
        let g = "..".parse::<RewardGrid>().unwrap();

        assert_eq!(
            g.reward(Position::new(2, 0)),
            Err(BellmanError::OutOfGrid(Position::new(2, 0)))
        );
    }

    #[test]
    fn positions_cover_grid_column_major() {
        let g = "..\n..\n..".parse::<RewardGrid>().unwrap();
        let ps = g.positions().collect::<Vec<_>>();

        assert_that!(ps.len()).is_equal_to(6);
        assert_eq!(ps[0], Position::new(0, 0));
        assert_eq!(ps[1], Position::new(0, 1));
        assert_eq!(ps[3], Position::new(1, 0));
    }

    #[rstest]
    #[case(Position::new(1, 1), Action::Up, Position::new(1, 0))]
    #[case(Position::new(1, 1), Action::Down, Position::new(1, 2))]
    #[case(Position::new(1, 1), Action::Left, Position::new(1, 1))]
    #[case(Position::new(1, 1), Action::Right, Position::new(2, 1))]
    #[case(Position::new(0, 0), Action::Up, Position::new(0, 0))]
    #[case(Position::new(0, 0), Action::Left, Position::new(0, 0))]
    #[case(Position::new(2, 2), Action::Down, Position::new(2, 2))]
    #[case(Position::new(2, 2), Action::Right, Position::new(2, 2))]
    #[case(Position::new(0, 2), Action::Up, Position::new(0, 2))]
    fn move_rule(#[case] from: Position, #[case] a: Action, #[case] to: Position) {
        let g = "...\n#..\n#..".parse::<RewardGrid>().unwrap();

        assert_eq!(g.step(from, a), to);
    }

    #[test]
    fn step_does_not_touch_its_input() {
        let g = "...".parse::<RewardGrid>().unwrap();
        let s = Position::new(1, 0);

        let moved = g.step(s, Action::Right);

        assert_eq!(moved, Position::new(2, 0));
        assert_eq!(s, Position::new(1, 0));
    }
}
