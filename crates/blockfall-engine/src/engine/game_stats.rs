use serde::Serialize;

/// Number of histogram buckets: 0 to 4 lines cleared by a single lock.
const CLEAR_BUCKETS: usize = 5;

/// Game statistics tracking lines cleared and pieces locked.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_lock(0);
/// stats.record_lock(2);
///
/// assert_eq!(stats.pieces_locked(), 2);
/// assert_eq!(stats.total_cleared_lines(), 2);
/// assert_eq!(stats.clear_histogram()[2], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    pieces_locked: usize,
    total_cleared_lines: usize,
    clear_histogram: [usize; CLEAR_BUCKETS],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pieces_locked: 0,
            total_cleared_lines: 0,
            clear_histogram: [0; CLEAR_BUCKETS],
        }
    }

    /// Returns the total number of pieces that have been locked into the grid.
    #[must_use]
    pub const fn pieces_locked(&self) -> usize {
        self.pieces_locked
    }

    /// Returns the total number of lines cleared.
    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns how many locks cleared 0, 1, 2, 3 and 4 lines.
    #[must_use]
    pub const fn clear_histogram(&self) -> &[usize; CLEAR_BUCKETS] {
        &self.clear_histogram
    }

    /// Updates statistics after a piece locks and `cleared_lines` rows are cleared.
    pub const fn record_lock(&mut self, cleared_lines: usize) {
        self.pieces_locked += 1;
        self.total_cleared_lines += cleared_lines;
        if cleared_lines < CLEAR_BUCKETS {
            self.clear_histogram[cleared_lines] += 1;
        }
    }
}
