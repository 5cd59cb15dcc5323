use blockfall_engine::{Cell, Palette, Rgb};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Paragraph, Widget},
};

use super::style;

/// One grid cell, two terminal columns wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

impl CellDisplay {
    pub const EMPTY: Self = Self::new(style::EMPTY_DOT, " .");
    pub const GHOST: Self = Self::new(style::GHOST, "[]");

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn width() -> u16 {
        2
    }

    pub const fn height() -> u16 {
        1
    }

    /// A block filled with the primary color and outlined with the secondary one.
    pub fn from_palette(palette: Palette) -> Self {
        let style = Style::new()
            .fg(to_color(palette.secondary()))
            .bg(to_color(palette.primary()));
        Self::new(style, "▕▏")
    }

    pub fn from_cell(cell: Cell) -> Self {
        match cell {
            Cell::Empty => Self::EMPTY,
            Cell::Filled(palette) => Self::from_palette(palette),
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Paragraph fills the whole area, not just the cells under the symbol
        Paragraph::new(self.symbol).style(self.style).render(area, buf);
    }
}
