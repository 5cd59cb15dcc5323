use super::{grid::Grid, position::Position, shape::Orientation};

/// Decides whether `orientation` anchored at `anchor` fits on `grid`.
///
/// A placement is blocked when any covered cell:
///
/// - lies left of column 0 or at/after column `grid.width()`
/// - lies at/below row `grid.height()`
/// - overlaps an occupied grid cell
///
/// Cells above row 0 do **not** block a placement by themselves, so pieces
/// can rotate and spawn partially above the visible board.
///
/// This is the only check consulted before moving or rotating the active
/// piece.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Grid, OrientationIndex, PieceKind, Position, can_place};
///
/// let grid = Grid::new(10, 10);
/// let square = PieceKind::O.orientation(OrientationIndex::new(0));
/// assert!(can_place(square, Position::new(8, 4), &grid));
/// assert!(!can_place(square, Position::new(9, 4), &grid));
/// assert!(can_place(square, Position::new(-1, 4), &grid));
/// ```
#[must_use]
pub fn can_place(orientation: &Orientation, anchor: Position, grid: &Grid) -> bool {
    orientation
        .occupied_offsets()
        .map(|offset| anchor + offset)
        .all(|pos| !is_blocked(pos, grid))
}

fn is_blocked(pos: Position, grid: &Grid) -> bool {
    let width = i32::try_from(grid.width()).unwrap_or(i32::MAX);
    let height = i32::try_from(grid.height()).unwrap_or(i32::MAX);
    pos.col() < 0 || pos.col() >= width || pos.row() >= height || grid.is_occupied(pos)
}
