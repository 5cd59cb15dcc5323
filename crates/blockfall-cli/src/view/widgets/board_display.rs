use blockfall_engine::{ActivePiece, Grid, Position};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::CellDisplay;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    grid: &'a Grid,
    ghost: Option<ActivePiece>,
    falling_piece: Option<ActivePiece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: ActivePiece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn falling_piece(self, piece: ActivePiece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        super::saturating_u16(self.grid.width())
            .saturating_mul(CellDisplay::width())
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        super::saturating_u16(self.grid.height())
            .saturating_mul(CellDisplay::height())
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }

    /// The falling piece is drawn over the ghost, the ghost over the grid.
    fn cell_at(&self, pos: Position) -> CellDisplay {
        if let Some(piece) = self.falling_piece
            && piece.cells().contains(&pos)
        {
            return CellDisplay::from_palette(piece.palette());
        }
        if let Some(ghost) = self.ghost
            && ghost.cells().contains(&pos)
        {
            return CellDisplay::GHOST;
        }
        CellDisplay::from_cell(self.grid.cell(pos))
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let board_width =
            super::saturating_u16(self.grid.width()).saturating_mul(CellDisplay::width());
        let left = area.x + area.width.saturating_sub(board_width) / 2;

        for (row, y) in (0..self.grid.height()).zip(area.top()..area.bottom()) {
            for col in 0..self.grid.width() {
                let x = left.saturating_add(
                    super::saturating_u16(col).saturating_mul(CellDisplay::width()),
                );
                if x >= area.right() {
                    break;
                }
                let cell_area = Rect::new(x, y, CellDisplay::width(), CellDisplay::height())
                    .intersection(area);
                if cell_area.is_empty() {
                    continue;
                }
                #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let pos = Position::new(row as i32, col as i32);
                self.cell_at(pos).render(cell_area, buf);
            }
        }
    }
}
