use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::logging;

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod session_arg;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Append engine logs to this file
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
    /// Maximum level written to the log file
    #[clap(long, global = true, default_value_t = LevelFilter::Debug)]
    log_level: LevelFilter,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Run a session headless with random commands and print the result as JSON
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    if let Some(path) = &args.log_file {
        logging::init_file_logger(path, args.log_level)?;
    }

    let result = match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg),
        Mode::Simulate(arg) => simulate::run(&arg),
    };
    log::logger().flush();
    result
}
