use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{
        position::Position,
        shape::{MAX_ORIENTATION_WIDTH, RotationDirection},
    },
};

/// How the session detects that the stack has reached the top.
///
/// Exactly one rule is active per session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopOutRule {
    /// A freshly spawned piece that does not fit at the spawn anchor ends the
    /// game. The grid is left untouched.
    #[default]
    SpawnCollision,
    /// Spawning is not validated. A piece that locks while its anchor is still
    /// on the spawn row ends the game without being written into the grid.
    LockAtSpawnRow,
}

/// Fall interval as a function of lines cleared.
///
/// `interval(lines) = max(min, base - lines * per_line)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FallSpeed {
    pub base_interval_ms: u64,
    pub per_line_decrement_ms: u64,
    pub min_interval_ms: u64,
}

impl Default for FallSpeed {
    fn default() -> Self {
        Self {
            base_interval_ms: 1000,
            per_line_decrement_ms: 15,
            min_interval_ms: 100,
        }
    }
}

impl FallSpeed {
    /// Returns the delay between two automatic falls after `lines_cleared`
    /// lines have been cleared.
    #[must_use]
    pub fn interval(&self, lines_cleared: usize) -> Duration {
        let lines = u64::try_from(lines_cleared).unwrap_or(u64::MAX);
        let millis = self
            .base_interval_ms
            .saturating_sub(lines.saturating_mul(self.per_line_decrement_ms))
            .max(self.min_interval_ms.min(self.base_interval_ms));
        Duration::from_millis(millis)
    }
}

/// Parameters of a game session.
///
/// Every field has a default, so a config file only needs the fields it
/// overrides:
///
/// ```
/// use blockfall_engine::{SessionConfig, TopOutRule};
///
/// let config: SessionConfig =
///     serde_json::from_str(r#"{ "rows": 20, "cols": 10, "top_out": "lock-at-spawn-row" }"#).unwrap();
/// assert_eq!(config.rows, 20);
/// assert_eq!(config.top_out, TopOutRule::LockAtSpawnRow);
/// assert_eq!(config.fall_speed.base_interval_ms, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Number of grid rows.
    pub rows: usize,
    /// Number of grid columns.
    pub cols: usize,
    /// Column of the spawn anchor. Defaults to the horizontal center.
    pub spawn_col: Option<usize>,
    /// Direction `rotate` steps through orientations.
    pub rotation: RotationDirection,
    pub top_out: TopOutRule,
    pub fall_speed: FallSpeed,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: 18,
            cols: 13,
            spawn_col: None,
            rotation: RotationDirection::Forward,
            top_out: TopOutRule::SpawnCollision,
            fall_speed: FallSpeed::default(),
        }
    }
}

impl SessionConfig {
    /// Row of the spawn anchor.
    pub const SPAWN_ROW: i32 = 0;

    /// Returns where new pieces are anchored.
    #[must_use]
    pub fn spawn_anchor(&self) -> Position {
        let col = self.spawn_col.unwrap_or(self.cols / 2);
        Position::new(Self::SPAWN_ROW, i32::try_from(col).unwrap_or(i32::MAX))
    }

    /// Checks that the grid is usable and that every orientation fits at the
    /// spawn anchor of an empty grid.
    ///
    /// Orientation windows extend to the right of the anchor, so the spawn
    /// column must leave [`MAX_ORIENTATION_WIDTH`] columns. With the default
    /// centered anchor this needs at least 7 columns.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self {
            rows,
            cols,
            spawn_col,
            fall_speed,
            ..
        } = *self;
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyGrid { rows, cols });
        }
        if cols < MAX_ORIENTATION_WIDTH {
            return Err(ConfigError::GridTooNarrow {
                cols,
                min_cols: MAX_ORIENTATION_WIDTH,
            });
        }
        if let Some(col) = spawn_col
            && col >= cols
        {
            return Err(ConfigError::SpawnOutOfGrid { col, cols });
        }
        let col = spawn_col.unwrap_or(cols / 2);
        if col + MAX_ORIENTATION_WIDTH > cols {
            return Err(ConfigError::SpawnOverhang {
                col,
                cols,
                piece_width: MAX_ORIENTATION_WIDTH,
            });
        }
        if fall_speed.base_interval_ms == 0 {
            return Err(ConfigError::ZeroFallInterval);
        }
        Ok(())
    }
}
