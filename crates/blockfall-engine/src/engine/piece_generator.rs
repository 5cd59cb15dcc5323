use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    SeedParseError,
    core::{piece::ActivePiece, position::Position},
};

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number
/// generator for piece generation. Using the same seed will produce the same
/// sequence of pieces (kinds, orientations and palettes), enabling
/// reproducible sessions and deterministic tests.
///
/// Its text form is 32 hex digits, used both by serde and by
/// [`FromStr`]/[`Display`](fmt::Display).
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameSession, PieceSeed, SessionConfig};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
///
/// let session1 = GameSession::with_seed(SessionConfig::default(), seed).unwrap();
/// let session2 = GameSession::with_seed(SessionConfig::default(), seed).unwrap();
/// assert_eq!(session1.active_piece(), session2.active_piece());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(SeedParseError::InvalidLength(s.len()));
        }
        let num = u128::from_str_radix(s, 16)
            .map_err(|e| SeedParseError::InvalidDigit(format!("{s} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Source of freshly spawned pieces.
///
/// Every piece gets a uniformly random kind, a uniformly random orientation
/// of that kind, and a random palette.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    seed: PieceSeed,
    rng: Pcg32,
}

impl PieceGenerator {
    /// Creates a generator whose piece sequence is fully determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Returns the seed this generator started from.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    /// Generates the next piece, anchored at `anchor`.
    pub fn next_piece(&mut self, anchor: Position) -> ActivePiece {
        ActivePiece::random(&mut self.rng, anchor)
    }
}
