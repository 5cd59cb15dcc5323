use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{GameSession, PieceSeed, RotationDirection, SessionConfig, TopOutRule};
use rand::Rng as _;

use crate::util;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum RotationArg {
    Forward,
    Backward,
}

impl From<RotationArg> for RotationDirection {
    fn from(arg: RotationArg) -> Self {
        match arg {
            RotationArg::Forward => RotationDirection::Forward,
            RotationArg::Backward => RotationDirection::Backward,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum TopOutArg {
    SpawnCollision,
    LockAtSpawnRow,
}

impl From<TopOutArg> for TopOutRule {
    fn from(arg: TopOutArg) -> Self {
        match arg {
            TopOutArg::SpawnCollision => TopOutRule::SpawnCollision,
            TopOutArg::LockAtSpawnRow => TopOutRule::LockAtSpawnRow,
        }
    }
}

/// Options shared by every command that starts a session.
///
/// Command-line values override the config file.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SessionArg {
    /// Session config file (JSON)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Number of grid rows
    #[clap(long)]
    rows: Option<usize>,
    /// Number of grid columns
    #[clap(long)]
    cols: Option<usize>,
    /// Piece seed as 32 hex digits (random if omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Direction of the rotate command
    #[clap(long, value_enum)]
    rotation: Option<RotationArg>,
    /// How the end of the game is detected
    #[clap(long, value_enum)]
    top_out: Option<TopOutArg>,
}

impl SessionArg {
    pub(crate) fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_session_config_file(path)?,
            None => SessionConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(rotation) = self.rotation {
            config.rotation = rotation.into();
        }
        if let Some(top_out) = self.top_out {
            config.top_out = top_out.into();
        }
        Ok(config)
    }

    pub(crate) fn start_session(&self) -> anyhow::Result<GameSession> {
        let config = self.session_config()?;
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        let session = GameSession::with_seed(config, seed).context("Invalid session config")?;
        log::info!(
            "new {}x{} session, seed {seed}",
            session.config().rows,
            session.config().cols
        );
        Ok(session)
    }
}
