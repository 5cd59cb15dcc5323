use std::time::Duration;

use rand::Rng as _;
use serde::Serialize;

use crate::{
    ConfigError,
    core::{
        grid::Grid,
        piece::{ActivePiece, MoveOutcome},
    },
};

use super::{
    config::{SessionConfig, TopOutRule},
    game_stats::GameStats,
    piece_generator::{PieceGenerator, PieceSeed},
};

/// Run state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    /// Accepting commands and ticks.
    Playing,
    /// Ticks and commands are ignored until resumed.
    Paused,
    /// Terminal state.
    GameOver,
}

/// Discrete input commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
}

impl Command {
    pub const ALL: [Self; 5] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::Rotate,
        Command::HardDrop,
    ];
}

/// What happened when the falling piece locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    /// Rows removed by this lock.
    pub cleared_lines: usize,
    /// Whether this lock (or the spawn that followed it) ended the game.
    pub game_over: bool,
}

/// Result of [`GameSession::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum CommandOutcome {
    /// The piece moved or rotated.
    Accepted,
    /// The move was blocked; nothing changed.
    Rejected,
    /// The piece could not move down and was locked.
    Locked(LockReport),
    /// The session is paused or over.
    Ignored,
}

/// Result of [`GameSession::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// The piece fell one row.
    Fell,
    /// The piece could not fall and was locked.
    Locked(LockReport),
    /// The session is paused or over.
    Ignored,
}

/// Counters exposed to a HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub lines_cleared: usize,
    pub pieces_locked: usize,
    pub game_over: bool,
}

/// Read-only copy of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub seed: PieceSeed,
    pub state: SessionState,
    pub grid: Grid,
    pub active_piece: ActivePiece,
    pub stats: GameStats,
}

/// The game cycle controller.
///
/// Owns the grid and the single falling piece, and runs
/// spawn → move/tick → lock → line clear → spawn until top-out. The lock,
/// clear and spawn steps run to completion inside the call that triggered
/// them, so callers only ever observe [`SessionState::Playing`],
/// [`SessionState::Paused`] or [`SessionState::GameOver`].
///
/// Sessions are plain values with no shared state; any number of them can
/// coexist.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    grid: Grid,
    piece: ActivePiece,
    generator: PieceGenerator,
    stats: GameStats,
    state: SessionState,
}

impl GameSession {
    /// Starts a session on an empty grid with a random seed.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    pub fn with_seed(config: SessionConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        let grid = Grid::new(config.rows, config.cols);
        Self::with_grid(config, grid, seed)
    }

    /// Starts a session on a pre-filled grid.
    ///
    /// The grid must match the configured dimensions. If the first piece
    /// already tops out, the session starts in [`SessionState::GameOver`].
    pub fn with_grid(
        config: SessionConfig,
        grid: Grid,
        seed: PieceSeed,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if (grid.height(), grid.width()) != (config.rows, config.cols) {
            return Err(ConfigError::GridSizeMismatch {
                expected: (config.rows, config.cols),
                actual: (grid.height(), grid.width()),
            });
        }

        let mut generator = PieceGenerator::with_seed(seed);
        let piece = generator.next_piece(config.spawn_anchor());
        let mut session = Self {
            config,
            grid,
            piece,
            generator,
            stats: GameStats::new(),
            state: SessionState::Playing,
        };
        log::debug!("session started with seed {seed}");
        session.check_spawn();
        Ok(session)
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn active_piece(&self) -> &ActivePiece {
        &self.piece
    }

    /// Returns where the active piece would land on a hard drop.
    #[must_use]
    pub fn drop_position(&self) -> ActivePiece {
        self.piece.drop_position(&self.grid)
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.generator.seed()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            lines_cleared: self.stats.total_cleared_lines(),
            pieces_locked: self.stats.pieces_locked(),
            game_over: self.is_game_over(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            seed: self.seed(),
            state: self.state,
            grid: self.grid.clone(),
            active_piece: self.piece,
            stats: self.stats.clone(),
        }
    }

    /// Returns the delay the clock should wait before the next [`tick`](Self::tick).
    ///
    /// Shrinks as lines are cleared; re-read it after every lock.
    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        self.config
            .fall_speed
            .interval(self.stats.total_cleared_lines())
    }

    /// Switches between playing and paused. Has no effect once the game is over.
    ///
    /// Pausing never changes the grid or the falling piece.
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    pub fn pause(&mut self) {
        if self.state.is_playing() {
            self.state = SessionState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state.is_paused() {
            self.state = SessionState::Playing;
        }
    }

    /// Advances the falling piece by one row, locking it if it cannot fall.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_playing() {
            return TickOutcome::Ignored;
        }
        match self.piece.move_down(&self.grid) {
            MoveOutcome::Accepted => TickOutcome::Fell,
            MoveOutcome::Rejected => TickOutcome::Locked(self.lock_and_spawn()),
        }
    }

    /// Applies one input command.
    ///
    /// Only a blocked downward move (soft or hard drop) locks the piece;
    /// blocked horizontal moves and rotations are plain rejections.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        if !self.state.is_playing() {
            return CommandOutcome::Ignored;
        }
        let outcome = match command {
            Command::MoveLeft => self.piece.move_left(&self.grid),
            Command::MoveRight => self.piece.move_right(&self.grid),
            Command::Rotate => self.piece.rotate(self.config.rotation, &self.grid),
            Command::SoftDrop => self.piece.move_down(&self.grid),
            Command::HardDrop => {
                self.piece.drop_to_bottom(&self.grid);
                return CommandOutcome::Locked(self.lock_and_spawn());
            }
        };
        match (command, outcome) {
            (_, MoveOutcome::Accepted) => CommandOutcome::Accepted,
            (Command::SoftDrop, MoveOutcome::Rejected) => {
                CommandOutcome::Locked(self.lock_and_spawn())
            }
            (_, MoveOutcome::Rejected) => CommandOutcome::Rejected,
        }
    }

    fn lock_and_spawn(&mut self) -> LockReport {
        if self.config.top_out == TopOutRule::LockAtSpawnRow
            && self.piece.anchor().row() == SessionConfig::SPAWN_ROW
        {
            self.end_game("piece locked on the spawn row");
            return LockReport {
                cleared_lines: 0,
                game_over: true,
            };
        }

        self.grid.lock_piece(&self.piece);
        let cleared_lines = self.grid.clear_filled_rows();
        self.stats.record_lock(cleared_lines);
        log::debug!(
            "locked {:?} at {}, cleared {cleared_lines} line(s)",
            self.piece.kind(),
            self.piece.anchor()
        );

        self.piece = self.generator.next_piece(self.config.spawn_anchor());
        self.check_spawn();
        LockReport {
            cleared_lines,
            game_over: self.is_game_over(),
        }
    }

    fn check_spawn(&mut self) {
        log::debug!(
            "spawned {:?} (orientation {}) at {}",
            self.piece.kind(),
            self.piece.orientation_index().as_usize(),
            self.piece.anchor()
        );
        if self.config.top_out == TopOutRule::SpawnCollision && !self.piece.fits(&self.grid) {
            self.end_game("spawned piece collides at the spawn anchor");
        }
    }

    fn end_game(&mut self, reason: &str) {
        self.state = SessionState::GameOver;
        log::info!(
            "game over ({reason}): {} line(s) cleared, {} piece(s) locked",
            self.stats.total_cleared_lines(),
            self.stats.pieces_locked()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OrientationIndex, Palette, PieceKind, Position, Rgb, RotationDirection};

    const SEED: &str = "0123456789abcdef0123456789abcdef";

    fn seed() -> PieceSeed {
        SEED.parse().unwrap()
    }

    fn palette() -> Palette {
        Palette::from_primary(Rgb::new(40, 40, 40))
    }

    fn config(rows: usize, cols: usize) -> SessionConfig {
        SessionConfig {
            rows,
            cols,
            ..SessionConfig::default()
        }
    }

    fn session(config: SessionConfig) -> GameSession {
        GameSession::with_seed(config, seed()).unwrap()
    }

    fn fill_rows(grid: &mut Grid, rows: std::ops::Range<i32>) {
        for row in rows {
            for col in 0..10 {
                grid.fill_cell(Position::new(row, col), palette());
            }
        }
    }

    /// Replaces the falling piece, for scenarios that need a specific kind.
    fn set_piece(session: &mut GameSession, kind: PieceKind, anchor: Position) {
        session.piece = ActivePiece::new(kind, OrientationIndex::new(0), anchor, palette());
    }

    #[test]
    fn test_new_session_spawns_at_anchor() {
        let session = session(SessionConfig::default());
        assert!(session.session_state().is_playing());
        assert_eq!(session.active_piece().anchor(), Position::new(0, 6));
        assert_eq!(session.summary(), SessionSummary {
            lines_cleared: 0,
            pieces_locked: 0,
            game_over: false,
        });
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = GameSession::with_seed(config(0, 10), seed()).unwrap_err();
        assert_eq!(err, ConfigError::EmptyGrid { rows: 0, cols: 10 });

        let err = GameSession::with_grid(config(10, 10), Grid::new(10, 9), seed()).unwrap_err();
        assert_eq!(err, ConfigError::GridSizeMismatch {
            expected: (10, 10),
            actual: (10, 9),
        });
    }

    #[test]
    fn test_spawn_collision_ends_game_without_mutation() {
        let mut grid = Grid::new(10, 10);
        fill_rows(&mut grid, 0..2);
        let before = grid.clone();

        let mut session = GameSession::with_grid(config(10, 10), grid, seed()).unwrap();
        assert!(session.is_game_over());
        assert_eq!(session.grid(), &before);

        // Sink state: nothing is accepted anymore.
        assert_eq!(session.tick(), TickOutcome::Ignored);
        for command in Command::ALL {
            assert_eq!(session.apply(command), CommandOutcome::Ignored);
        }
        session.toggle_pause();
        assert!(session.is_game_over());
        assert_eq!(session.grid(), &before);
    }

    #[test]
    fn test_tick_falls_then_locks_and_respawns() {
        let mut session = session(config(10, 10));
        set_piece(&mut session, PieceKind::O, Position::new(0, 4));

        for _ in 0..8 {
            assert_eq!(session.tick(), TickOutcome::Fell);
        }
        assert_eq!(
            session.tick(),
            TickOutcome::Locked(LockReport {
                cleared_lines: 0,
                game_over: false,
            })
        );
        assert!(session.grid().is_occupied(Position::new(9, 4)));
        assert!(session.grid().is_occupied(Position::new(8, 5)));
        assert_eq!(session.stats().pieces_locked(), 1);
        assert_eq!(session.active_piece().anchor(), Position::new(0, 5));
    }

    #[test]
    fn test_hard_drop_square_on_empty_board() {
        let mut session = session(config(10, 10));
        set_piece(&mut session, PieceKind::O, Position::new(0, 5));

        let mut dropped = *session.active_piece();
        let _ = dropped.drop_to_bottom(session.grid());
        assert_eq!(dropped.anchor().row(), 8);
        assert!(!crate::can_place(
            dropped.orientation(),
            dropped.anchor() + Position::DOWN,
            session.grid()
        ));
        assert_eq!(session.drop_position(), dropped);

        assert!(session.apply(Command::HardDrop).is_locked());
        for pos in dropped.cells() {
            assert!(session.grid().is_occupied(pos));
        }
    }

    #[test]
    fn test_soft_drop_locks_when_blocked() {
        let mut session = session(config(10, 10));
        set_piece(&mut session, PieceKind::O, Position::new(8, 0));
        assert!(session.apply(Command::SoftDrop).is_locked());
        assert_eq!(session.stats().pieces_locked(), 1);
    }

    #[test]
    fn test_blocked_horizontal_move_does_not_lock() {
        let mut session = session(config(10, 10));
        set_piece(&mut session, PieceKind::O, Position::new(8, 0));
        assert_eq!(session.apply(Command::MoveLeft), CommandOutcome::Rejected);
        assert_eq!(session.stats().pieces_locked(), 0);
        assert_eq!(session.active_piece().anchor(), Position::new(8, 0));
    }

    #[test]
    fn test_rejected_rotation_does_not_lock() {
        let mut session = session(SessionConfig {
            spawn_col: Some(0),
            ..config(10, 4)
        });
        session.piece = ActivePiece::new(
            PieceKind::I,
            OrientationIndex::new(1),
            Position::new(2, 2),
            palette(),
        );
        assert_eq!(session.apply(Command::Rotate), CommandOutcome::Rejected);
        assert_eq!(
            session.active_piece().orientation_index(),
            OrientationIndex::new(1)
        );
        assert_eq!(session.stats().pieces_locked(), 0);
    }

    #[test]
    fn test_backward_rotation_config() {
        let mut session = session(SessionConfig {
            rotation: RotationDirection::Backward,
            ..config(20, 10)
        });
        session.piece = ActivePiece::new(
            PieceKind::T,
            OrientationIndex::new(0),
            Position::new(5, 3),
            palette(),
        );
        assert!(session.apply(Command::Rotate).is_accepted());
        assert_eq!(
            session.active_piece().orientation_index(),
            OrientationIndex::new(3)
        );
    }

    #[test]
    fn test_line_clear_updates_stats_and_speed() {
        let mut grid = Grid::new(10, 4);
        // Bottom row filled except the two right-most cells.
        grid.fill_cell(Position::new(9, 0), palette());
        grid.fill_cell(Position::new(9, 1), palette());
        let config = SessionConfig {
            spawn_col: Some(0),
            ..config(10, 4)
        };
        let mut session = GameSession::with_grid(config, grid, seed()).unwrap();
        set_piece(&mut session, PieceKind::O, Position::new(0, 2));

        let initial_interval = session.fall_interval();
        let outcome = session.apply(Command::HardDrop);
        assert_eq!(
            outcome,
            CommandOutcome::Locked(LockReport {
                cleared_lines: 1,
                game_over: false,
            })
        );
        assert_eq!(session.summary().lines_cleared, 1);
        assert_eq!(session.stats().clear_histogram()[1], 1);
        assert!(session.fall_interval() < initial_interval);

        // The upper half of the square dropped into the bottom row.
        assert!(session.grid().is_occupied(Position::new(9, 2)));
        assert!(session.grid().is_occupied(Position::new(9, 3)));
        assert!(!session.grid().is_occupied(Position::new(9, 0)));
        assert!(!session.grid().is_occupied(Position::new(8, 2)));
    }

    #[test]
    fn test_pause_preserves_state() {
        let mut session = session(config(10, 10));
        let before = session.snapshot();

        session.pause();
        assert!(session.session_state().is_paused());
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.apply(Command::HardDrop), CommandOutcome::Ignored);

        session.resume();
        assert!(session.session_state().is_playing());
        assert_eq!(session.snapshot(), before);

        session.toggle_pause();
        session.toggle_pause();
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = session(config(12, 8));
        let mut b = session(config(12, 8));
        let script = [
            Command::Rotate,
            Command::MoveLeft,
            Command::HardDrop,
            Command::MoveRight,
            Command::MoveRight,
            Command::SoftDrop,
        ];
        for command in script.iter().cycle().take(60) {
            assert_eq!(a.apply(*command), b.apply(*command));
            assert_eq!(a.tick(), b.tick());
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_session_eventually_tops_out() {
        let mut session = session(config(8, 8));
        for _ in 0..10_000 {
            if session.is_game_over() {
                break;
            }
            session.apply(Command::HardDrop);
        }
        assert!(session.is_game_over());
        assert!(session.summary().game_over);
    }

    /// 10x10 grid with rows 2-9 filled except column 0.
    fn stacked_grid() -> Grid {
        let mut grid = Grid::new(10, 10);
        for row in 2..10 {
            for col in 1..10 {
                grid.fill_cell(Position::new(row, col), palette());
            }
        }
        grid
    }

    #[test]
    fn test_lock_at_spawn_row_rule() {
        let mut session = session(SessionConfig {
            top_out: TopOutRule::LockAtSpawnRow,
            ..config(10, 10)
        });
        session.grid = stacked_grid();
        set_piece(&mut session, PieceKind::O, Position::new(0, 4));
        assert!(session.session_state().is_playing());

        // The square cannot descend, and locking on the spawn row ends the
        // game without writing the piece.
        assert_eq!(
            session.tick(),
            TickOutcome::Locked(LockReport {
                cleared_lines: 0,
                game_over: true,
            })
        );
        assert!(session.is_game_over());
        assert_eq!(session.grid(), &stacked_grid());
        assert_eq!(session.stats().pieces_locked(), 0);
    }

    #[test]
    fn test_spawn_collision_rule_locks_on_spawn_row() {
        // Same board under the default rule: the square locks on the spawn
        // row, and the game only ends if the next spawn collides.
        let mut session = session(config(10, 10));
        session.grid = stacked_grid();
        set_piece(&mut session, PieceKind::O, Position::new(0, 4));

        let TickOutcome::Locked(report) = session.tick() else {
            panic!("expected the square to lock");
        };
        assert_eq!(report.cleared_lines, 0);
        assert_eq!(session.stats().pieces_locked(), 1);
        assert!(session.grid().is_occupied(Position::new(0, 4)));
        assert!(session.grid().is_occupied(Position::new(1, 5)));
        assert_eq!(
            report.game_over,
            !session.active_piece().fits(session.grid())
        );
        assert_eq!(report.game_over, session.is_game_over());
    }

    #[test]
    fn test_snapshot_serialization() {
        let session = session(config(4, 8));
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["seed"], SEED);
        assert_eq!(json["state"], "playing");
        assert_eq!(json["grid"]["height"], 4);
        assert_eq!(json["stats"]["pieces_locked"], 0);
        assert!(json["active_piece"]["kind"].is_string());
    }
}
