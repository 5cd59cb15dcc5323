pub use self::{grid::*, palette::*, piece::*, placement::*, position::*, shape::*};

pub(crate) mod grid;
pub(crate) mod palette;
pub(crate) mod piece;
pub(crate) mod placement;
pub(crate) mod position;
pub(crate) mod shape;
