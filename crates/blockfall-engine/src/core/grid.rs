use serde::{Deserialize, Serialize};

use super::{palette::Palette, piece::ActivePiece, position::Position};

/// A single cell of the board grid.
///
/// Serialized as `null` when empty, or as the occupying palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// No locked block.
    #[default]
    Empty,
    /// Locked block carrying the palette of the piece it came from.
    Filled(Palette),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn palette(self) -> Option<Palette> {
        match self {
            Cell::Empty => None,
            Cell::Filled(palette) => Some(palette),
        }
    }
}

fn is_row_filled(row: &[Cell]) -> bool {
    row.iter().all(|cell| !cell.is_empty())
}

/// Fixed-size board of locked cells.
///
/// The grid only changes in two ways:
///
/// - [`lock_piece`](Self::lock_piece) writes a piece's palette into the cells it covers
/// - [`clear_filled_rows`](Self::clear_filled_rows) removes full rows and
///   inserts empty rows at the top
///
/// Its dimensions never change after construction.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Grid, Palette, Position, Rgb};
///
/// let mut grid = Grid::new(4, 3);
/// let palette = Palette::from_primary(Rgb::new(255, 0, 0));
/// for col in 0..3 {
///     grid.fill_cell(Position::new(3, col), palette);
/// }
/// assert_eq!(grid.clear_filled_rows(), 1);
/// assert!(grid.rows().flatten().all(|cell| cell.is_empty()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Creates an empty grid with `height` rows and `width` columns.
    #[must_use]
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Cell::Empty; width]; height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    fn index(&self, pos: Position) -> Option<(usize, usize)> {
        let row = usize::try_from(pos.row()).ok()?;
        let col = usize::try_from(pos.col()).ok()?;
        (row < self.height && col < self.width).then_some((row, col))
    }

    /// Returns the cell at `pos`, or `None` if `pos` is outside the grid.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        let (row, col) = self.index(pos)?;
        Some(self.rows[row][col])
    }

    /// Returns the cell at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    #[must_use]
    pub fn cell(&self, pos: Position) -> Cell {
        let Some(cell) = self.get(pos) else {
            panic!(
                "cell {pos} is outside the {}x{} grid",
                self.height, self.width
            );
        };
        cell
    }

    /// Returns whether the cell at `pos` holds a locked block.
    ///
    /// Positions outside the grid are reported as unoccupied.
    #[must_use]
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(|cell| !cell.is_empty())
    }

    /// Fills a single cell with `palette`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    pub fn fill_cell(&mut self, pos: Position, palette: Palette) {
        let Some((row, col)) = self.index(pos) else {
            panic!(
                "cell {pos} is outside the {}x{} grid",
                self.height, self.width
            );
        };
        self.rows[row][col] = Cell::Filled(palette);
    }

    /// Writes the piece's palette into every cell the piece covers.
    ///
    /// Placement is not re-validated: the piece is expected to have been moved
    /// only through accepted placements. A covered cell outside the grid is a
    /// caller bug; it trips a debug assertion and is skipped otherwise.
    pub fn lock_piece(&mut self, piece: &ActivePiece) {
        let cell = Cell::Filled(piece.palette());
        for pos in piece.cells() {
            let index = self.index(pos);
            debug_assert!(index.is_some(), "locking cell {pos} outside the grid");
            if let Some((row, col)) = index {
                self.rows[row][col] = cell;
            }
        }
    }

    /// Returns whether every cell of `row` is occupied.
    ///
    /// # Panics
    ///
    /// Panics if `row` is outside the grid.
    #[must_use]
    pub fn is_row_filled(&self, row: usize) -> bool {
        is_row_filled(&self.rows[row])
    }

    /// Clears filled rows and returns the number of rows cleared.
    ///
    /// Every fully occupied row is removed in the same pass. The remaining rows
    /// keep their relative order and shift down, and as many empty rows as were
    /// removed are inserted at the top.
    pub fn clear_filled_rows(&mut self) -> usize {
        let mut count = 0;
        for y in (0..self.height).rev() {
            if is_row_filled(&self.rows[y]) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows.swap(y, y + count);
            }
        }
        for row in &mut self.rows[..count] {
            row.fill(Cell::Empty);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OrientationIndex, PieceKind, Rgb};

    fn palette(n: u8) -> Palette {
        Palette::from_primary(Rgb::new(n, n, n))
    }

    fn fill_row(grid: &mut Grid, row: i32, palette: Palette) {
        for col in 0..grid.width() {
            grid.fill_cell(Position::new(row, i32::try_from(col).unwrap()), palette);
        }
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(18, 13);
        assert_eq!(grid.height(), 18);
        assert_eq!(grid.width(), 13);
        assert_eq!(grid.rows().count(), 18);
        assert!(grid.rows().all(|row| row.len() == 13));
        assert!(grid.rows().flatten().all(|cell| cell.is_empty()));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.get(Position::new(0, 0)), Some(Cell::Empty));
        assert_eq!(grid.get(Position::new(-1, 0)), None);
        assert_eq!(grid.get(Position::new(0, -1)), None);
        assert_eq!(grid.get(Position::new(3, 0)), None);
        assert_eq!(grid.get(Position::new(0, 3)), None);
        assert!(!grid.is_occupied(Position::new(-1, 1)));
    }

    #[test]
    #[should_panic(expected = "outside the 3x3 grid")]
    fn test_cell_out_of_bounds_panics() {
        let grid = Grid::new(3, 3);
        let _ = grid.cell(Position::new(3, 1));
    }

    #[test]
    fn test_lock_piece_writes_exactly_covered_cells() {
        let mut grid = Grid::new(6, 6);
        let piece = ActivePiece::new(
            PieceKind::T,
            OrientationIndex::new(1),
            Position::new(2, 1),
            palette(7),
        );
        grid.lock_piece(&piece);

        let covered: Vec<_> = piece.cells().into_iter().collect();
        assert_eq!(
            covered,
            [
                Position::new(2, 2),
                Position::new(3, 2),
                Position::new(3, 3),
                Position::new(4, 2),
            ]
        );
        for row in 0..6 {
            for col in 0..6 {
                let pos = Position::new(row, col);
                let expected = if covered.contains(&pos) {
                    Cell::Filled(palette(7))
                } else {
                    Cell::Empty
                };
                assert_eq!(grid.cell(pos), expected, "at {pos}");
            }
        }
    }

    #[test]
    fn test_clear_without_filled_rows_is_noop() {
        let mut grid = Grid::new(5, 4);
        grid.fill_cell(Position::new(4, 0), palette(1));
        grid.fill_cell(Position::new(3, 2), palette(2));
        let before = grid.clone();

        assert_eq!(grid.clear_filled_rows(), 0);
        assert_eq!(grid, before);
        assert_eq!(grid.clear_filled_rows(), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_clear_single_bottom_row() {
        let mut grid = Grid::new(5, 4);
        fill_row(&mut grid, 4, palette(1));
        grid.fill_cell(Position::new(3, 1), palette(2));

        assert!(grid.is_row_filled(4));
        assert_eq!(grid.clear_filled_rows(), 1);
        assert_eq!(grid.cell(Position::new(4, 1)), Cell::Filled(palette(2)));
        assert_eq!(grid.rows().flatten().filter(|c| !c.is_empty()).count(), 1);
        assert!(grid.rows().next().unwrap().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_clear_non_adjacent_rows_preserves_order() {
        let mut grid = Grid::new(6, 3);
        // Row 0 empty, row 1 marker A, row 2 full, row 3 marker B, row 4 full, row 5 marker C
        grid.fill_cell(Position::new(1, 0), palette(10));
        fill_row(&mut grid, 2, palette(1));
        grid.fill_cell(Position::new(3, 1), palette(20));
        fill_row(&mut grid, 4, palette(1));
        grid.fill_cell(Position::new(5, 2), palette(30));

        assert_eq!(grid.clear_filled_rows(), 2);
        assert_eq!(grid.height(), 6);

        // Two empty rows on top, then the empty row 0, then A, B, C in order
        for row in 0..3 {
            assert!(grid.rows().nth(row).unwrap().iter().all(|c| c.is_empty()));
        }
        assert_eq!(grid.cell(Position::new(3, 0)), Cell::Filled(palette(10)));
        assert_eq!(grid.cell(Position::new(4, 1)), Cell::Filled(palette(20)));
        assert_eq!(grid.cell(Position::new(5, 2)), Cell::Filled(palette(30)));
        assert_eq!(grid.rows().flatten().filter(|c| !c.is_empty()).count(), 3);
    }

    #[test]
    fn test_clear_all_rows() {
        let mut grid = Grid::new(4, 4);
        for row in 0..4 {
            fill_row(&mut grid, row, palette(1));
        }
        assert_eq!(grid.clear_filled_rows(), 4);
        assert_eq!(grid, Grid::new(4, 4));
    }

    #[test]
    fn test_horizontal_i_clears_width_four_grid() {
        let mut grid = Grid::new(6, 4);
        // Horizontal I occupies the second row of its window.
        let piece = ActivePiece::new(
            PieceKind::I,
            OrientationIndex::new(0),
            Position::new(4, 0),
            palette(5),
        );
        grid.lock_piece(&piece);
        assert!(grid.is_row_filled(5));

        assert_eq!(grid.clear_filled_rows(), 1);
        assert_eq!(grid, Grid::new(6, 4));
    }

    #[test]
    fn test_cell_serialization() {
        let mut grid = Grid::new(1, 2);
        grid.fill_cell(Position::new(0, 1), Palette::from_primary(Rgb::new(200, 0, 0)));
        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(json["rows"][0][0], serde_json::Value::Null);
        assert_eq!(json["rows"][0][1]["primary"], "#c80000");
        assert_eq!(json["rows"][0][1]["secondary"], "#b40000");
    }
}
