use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::position::Position;

/// Largest side of an orientation window.
pub const MAX_ORIENTATION_SIZE: usize = 4;

/// One discrete rotation state of a piece.
///
/// An orientation is an immutable occupancy mask over a small rectangular
/// window (at most 4×4). Bit `c` of `rows[r]` is set when the piece covers the
/// cell at `anchor + (r, c)`.
///
/// Every rotation state is stored as-is in the catalog; no rotation transform
/// is computed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    rows: [u8; MAX_ORIENTATION_SIZE],
    width: u8,
    height: u8,
}

impl Orientation {
    /// Builds an orientation from rows of `#` (occupied) and `.` (empty).
    ///
    /// The window width is the length of the longest row.
    const fn from_pattern(pattern: &[&[u8]]) -> Self {
        assert!(!pattern.is_empty() && pattern.len() <= MAX_ORIENTATION_SIZE);
        let mut rows = [0; MAX_ORIENTATION_SIZE];
        let mut width = 0;
        let mut r = 0;
        while r < pattern.len() {
            let row = pattern[r];
            assert!(row.len() <= MAX_ORIENTATION_SIZE);
            if row.len() > width {
                width = row.len();
            }
            let mut c = 0;
            while c < row.len() {
                match row[c] {
                    b'#' => rows[r] |= 1 << c,
                    b'.' => {}
                    _ => panic!("orientation pattern must only contain '#' and '.'"),
                }
                c += 1;
            }
            r += 1;
        }
        #[expect(clippy::cast_possible_truncation)]
        let (width, height) = (width as u8, pattern.len() as u8);
        Self {
            rows,
            width,
            height,
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    /// Returns whether the relative cell `(row, col)` is covered.
    ///
    /// Cells outside the window are never covered.
    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width() && (self.rows[row] & (1 << col)) != 0
    }

    /// Returns the covered cells as offsets from the anchor, row by row.
    pub fn occupied_offsets(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height()).flat_map(move |row| {
            (0..self.width())
                .filter(move |&col| self.is_occupied(row, col))
                .map(move |col| offset(row, col))
        })
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn offset(row: usize, col: usize) -> Position {
    Position::new(row as i32, col as i32)
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece (square, single orientation).
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Returns the ordered, cyclic list of rotation states of this kind.
    #[must_use]
    pub fn orientations(self) -> &'static [Orientation] {
        CATALOG[self as usize]
    }

    /// Returns the number of rotation states (1, 2 or 4).
    #[must_use]
    pub fn orientation_count(self) -> usize {
        self.orientations().len()
    }

    /// Returns the orientation at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not belong to this kind.
    #[must_use]
    pub fn orientation(self, index: OrientationIndex) -> &'static Orientation {
        &self.orientations()[index.as_usize()]
    }

    /// Returns the index after `index`, wrapping around to 0.
    #[must_use]
    pub fn next_orientation(self, index: OrientationIndex) -> OrientationIndex {
        let count = self.orientation_count();
        OrientationIndex::from_usize((index.as_usize() + 1) % count)
    }

    /// Returns the index before `index`, wrapping around to the last one.
    #[must_use]
    pub fn previous_orientation(self, index: OrientationIndex) -> OrientationIndex {
        let count = self.orientation_count();
        OrientationIndex::from_usize((index.as_usize() + count - 1) % count)
    }

    /// Draws a uniformly random orientation index valid for this kind.
    pub fn random_orientation<R: Rng + ?Sized>(self, rng: &mut R) -> OrientationIndex {
        OrientationIndex::from_usize(rng.random_range(0..self.orientation_count()))
    }
}

/// Index into a piece kind's orientation list.
///
/// Only meaningful together with the [`PieceKind`] it was produced for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OrientationIndex(u8);

impl OrientationIndex {
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[expect(clippy::cast_possible_truncation)]
    fn from_usize(index: usize) -> Self {
        debug_assert!(index < MAX_ORIENTATION_SIZE);
        Self(index as u8)
    }
}

/// Which way `rotate` steps through a kind's orientation list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationDirection {
    #[default]
    Forward,
    Backward,
}

impl RotationDirection {
    /// Returns the index one step from `index` in this direction.
    #[must_use]
    pub fn step(self, kind: PieceKind, index: OrientationIndex) -> OrientationIndex {
        match self {
            RotationDirection::Forward => kind.next_orientation(index),
            RotationDirection::Backward => kind.previous_orientation(index),
        }
    }
}

/// Width of the widest orientation window in the catalog.
///
/// A grid narrower than this cannot host every orientation.
pub const MAX_ORIENTATION_WIDTH: usize = {
    let mut max = 0;
    let mut k = 0;
    while k < CATALOG.len() {
        let mut i = 0;
        while i < CATALOG[k].len() {
            let width = CATALOG[k][i].width as usize;
            if width > max {
                max = width;
            }
            i += 1;
        }
        k += 1;
    }
    max
};

const fn o(pattern: &[&[u8]]) -> Orientation {
    Orientation::from_pattern(pattern)
}

// Indexed by `PieceKind as usize`.
const CATALOG: [&[Orientation]; PieceKind::LEN] = [
    // I-piece
    &[
        o(&[b"....", b"####"]),
        o(&[b".#", b".#", b".#", b".#"]),
    ],
    // O-piece
    &[o(&[b"##", b"##"])],
    // S-piece
    &[
        o(&[b".##", b"##."]),
        o(&[b"#.", b"##", b".#"]),
    ],
    // Z-piece
    &[
        o(&[b"##.", b".##"]),
        o(&[b".#", b"##", b"#."]),
    ],
    // J-piece
    &[
        o(&[b"#..", b"###"]),
        o(&[b"##", b"#.", b"#."]),
        o(&[b"###", b"..#"]),
        o(&[b".#", b".#", b"##"]),
    ],
    // L-piece
    &[
        o(&[b"..#", b"###"]),
        o(&[b"#.", b"#.", b"##"]),
        o(&[b"###", b"#.."]),
        o(&[b"##", b".#", b".#"]),
    ],
    // T-piece
    &[
        o(&[b".#.", b"###"]),
        o(&[b".#.", b".##", b".#."]),
        o(&[b"...", b"###", b".#."]),
        o(&[b".#.", b"##.", b".#."]),
    ],
];
