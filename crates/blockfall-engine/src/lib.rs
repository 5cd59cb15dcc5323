pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Invalid [`SessionConfig`](engine::SessionConfig).
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },
    #[display("grid is {cols} columns wide, narrower than the widest piece ({min_cols})")]
    GridTooNarrow { cols: usize, min_cols: usize },
    #[display("spawn column {col} is outside the grid (0..{cols})")]
    SpawnOutOfGrid { col: usize, cols: usize },
    #[display(
        "pieces spawned at column {col} need {piece_width} columns, but the grid has only {cols}"
    )]
    SpawnOverhang {
        col: usize,
        cols: usize,
        piece_width: usize,
    },
    #[display("base fall interval must be greater than zero")]
    ZeroFallInterval,
    #[display("grid is {}x{}, expected {}x{}", actual.0, actual.1, expected.0, expected.1)]
    GridSizeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

/// Malformed [`PieceSeed`](engine::PieceSeed) text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SeedParseError {
    #[display("invalid hex: expected 32 characters, got {_0}")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid hex: {_0}")]
    InvalidDigit(#[error(not(source))] String),
}
