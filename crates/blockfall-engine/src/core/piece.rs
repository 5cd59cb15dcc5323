use arrayvec::ArrayVec;
use rand::Rng;
use serde::Serialize;

use super::{
    grid::Grid,
    palette::Palette,
    placement::can_place,
    position::Position,
    shape::{MAX_ORIENTATION_SIZE, Orientation, OrientationIndex, PieceKind, RotationDirection},
};

/// Result of a movement or rotation attempt.
///
/// A rejected move is a normal gameplay outcome: the piece stays exactly as it
/// was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveOutcome {
    Accepted,
    Rejected,
}

/// The falling piece.
///
/// Holds a kind, an index into that kind's orientation list, the anchor the
/// orientation mask is laid out from, and the palette the piece will leave in
/// the grid when it locks.
///
/// Candidate moves are built with [`shifted`](Self::shifted) and
/// [`rotated`](Self::rotated), which never touch `self`. The `move_*` and
/// [`rotate`](Self::rotate) methods commit a candidate only after
/// [`can_place`] accepts it.
///
/// # Example
///
/// ```
/// use blockfall_engine::{
///     ActivePiece, Grid, OrientationIndex, Palette, PieceKind, Position, Rgb,
/// };
///
/// let grid = Grid::new(10, 10);
/// let palette = Palette::from_primary(Rgb::new(0, 128, 255));
/// let mut piece = ActivePiece::new(PieceKind::O, OrientationIndex::new(0), Position::new(0, 4), palette);
///
/// assert!(piece.move_left(&grid).is_accepted());
/// assert_eq!(piece.drop_to_bottom(&grid), 8);
/// assert!(piece.move_down(&grid).is_rejected());
/// ```
///
/// Pieces serialize for snapshots but are only ever built through
/// [`ActivePiece::new`], which checks the orientation index against the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivePiece {
    kind: PieceKind,
    orientation: OrientationIndex,
    anchor: Position,
    palette: Palette,
}

impl ActivePiece {
    /// # Panics
    ///
    /// Panics if `orientation` is not a valid index for `kind`.
    #[must_use]
    pub fn new(
        kind: PieceKind,
        orientation: OrientationIndex,
        anchor: Position,
        palette: Palette,
    ) -> Self {
        assert!(
            orientation.as_usize() < kind.orientation_count(),
            "{kind:?} has no orientation {}",
            orientation.as_usize()
        );
        Self {
            kind,
            orientation,
            anchor,
            palette,
        }
    }

    /// Creates a piece of random kind, orientation and palette at `anchor`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, anchor: Position) -> Self {
        let kind: PieceKind = rng.random();
        let orientation = kind.random_orientation(rng);
        let palette = rng.random();
        Self::new(kind, orientation, anchor, palette)
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn orientation_index(&self) -> OrientationIndex {
        self.orientation
    }

    #[must_use]
    pub fn orientation(&self) -> &'static Orientation {
        self.kind.orientation(self.orientation)
    }

    #[must_use]
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Returns the absolute positions covered by the piece.
    #[must_use]
    pub fn cells(&self) -> ArrayVec<Position, { MAX_ORIENTATION_SIZE * MAX_ORIENTATION_SIZE }> {
        self.orientation()
            .occupied_offsets()
            .map(|offset| self.anchor + offset)
            .collect()
    }

    /// Returns whether the piece, as it is, fits on `grid`.
    #[must_use]
    pub fn fits(&self, grid: &Grid) -> bool {
        can_place(self.orientation(), self.anchor, grid)
    }

    /// Returns a copy moved by `delta`.
    #[must_use]
    pub fn shifted(&self, delta: Position) -> Self {
        Self {
            anchor: self.anchor + delta,
            ..*self
        }
    }

    /// Returns a copy one orientation step away in `direction`.
    ///
    /// `self` keeps its orientation, so peeking a rotation has no side effect.
    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        Self {
            orientation: direction.step(self.kind, self.orientation),
            ..*self
        }
    }

    /// Replaces `self` with `candidate` if it fits on `grid`.
    fn commit_if_fits(&mut self, candidate: Self, grid: &Grid) -> MoveOutcome {
        if !candidate.fits(grid) {
            return MoveOutcome::Rejected;
        }
        *self = candidate;
        MoveOutcome::Accepted
    }

    pub fn move_left(&mut self, grid: &Grid) -> MoveOutcome {
        self.commit_if_fits(self.shifted(Position::LEFT), grid)
    }

    pub fn move_right(&mut self, grid: &Grid) -> MoveOutcome {
        self.commit_if_fits(self.shifted(Position::RIGHT), grid)
    }

    /// Moves one row down. A rejection means the piece has landed.
    pub fn move_down(&mut self, grid: &Grid) -> MoveOutcome {
        self.commit_if_fits(self.shifted(Position::DOWN), grid)
    }

    /// Steps to the next orientation in `direction`, keeping the anchor.
    ///
    /// A rejected rotation leaves both the orientation and the cycle position
    /// unchanged.
    pub fn rotate(&mut self, direction: RotationDirection, grid: &Grid) -> MoveOutcome {
        self.commit_if_fits(self.rotated(direction), grid)
    }

    /// Moves down until blocked and returns the number of rows fallen.
    pub fn drop_to_bottom(&mut self, grid: &Grid) -> usize {
        let mut rows = 0;
        while self.move_down(grid).is_accepted() {
            rows += 1;
        }
        rows
    }

    /// Returns where [`drop_to_bottom`](Self::drop_to_bottom) would leave the
    /// piece.
    #[must_use]
    pub fn drop_position(&self, grid: &Grid) -> Self {
        let mut dropped = *self;
        dropped.drop_to_bottom(grid);
        dropped
    }
}
