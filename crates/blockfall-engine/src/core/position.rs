use serde::{Deserialize, Serialize};

/// A cell coordinate on the board, or an offset between two coordinates.
///
/// # Coordinate System
///
/// - (0, 0) is the top-left cell of the grid
/// - `row` increases downward, `col` increases rightward
/// - Both components are signed: candidate positions may leave the grid
///   (most notably above row 0) while a move is being evaluated
///
/// # Example
///
/// ```
/// use blockfall_engine::Position;
///
/// let anchor = Position::new(3, 5);
/// assert_eq!(anchor + Position::DOWN, Position::new(4, 5));
/// assert_eq!(anchor.offset(-4, 0).row(), -1);
/// ```
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::Display,
)]
#[display("({row}, {col})")]
pub struct Position {
    row: i32,
    col: i32,
}

impl Position {
    pub const ORIGIN: Self = Self::new(0, 0);
    pub const LEFT: Self = Self::new(0, -1);
    pub const RIGHT: Self = Self::new(0, 1);
    pub const DOWN: Self = Self::new(1, 0);

    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn row(self) -> i32 {
        self.row
    }

    #[must_use]
    pub const fn col(self) -> i32 {
        self.col
    }

    #[must_use]
    pub const fn offset(self, rows: i32, cols: i32) -> Self {
        Self::new(self.row + rows, self.col + cols)
    }
}
