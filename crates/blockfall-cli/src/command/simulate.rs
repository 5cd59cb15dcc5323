use std::path::PathBuf;

use blockfall_engine::{Command, GameSession, SessionSnapshot, SessionSummary};
use rand::{Rng, SeedableRng as _, rngs::StdRng};
use serde::Serialize;

use crate::{command::session_arg::SessionArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    session: SessionArg,
    /// Stop after this many clock ticks if the game is still running
    #[clap(long, default_value_t = 10_000)]
    max_ticks: usize,
    /// Random commands issued between two ticks
    #[clap(long, default_value_t = 2)]
    commands_per_tick: usize,
    /// Seed for the random command stream
    #[clap(long, default_value_t = 0)]
    command_seed: u64,
    /// Include the final grid and piece in the output
    #[clap(long)]
    snapshot: bool,
    /// Output file (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    ticks: usize,
    commands: usize,
    summary: SessionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<SessionSnapshot>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        session,
        max_ticks,
        commands_per_tick,
        command_seed,
        snapshot,
        output,
    } = arg;

    let mut session = session.start_session()?;
    let mut rng = StdRng::seed_from_u64(*command_seed);
    let (ticks, commands) = simulate(&mut session, &mut rng, *max_ticks, *commands_per_tick);
    log::info!(
        "simulation finished after {ticks} tick(s): {:?}",
        session.summary()
    );

    let report = SimulationReport {
        ticks,
        commands,
        summary: session.summary(),
        snapshot: snapshot.then(|| session.snapshot()),
    };
    Output::save_json(&report, output.clone())
}

/// Drives `session` with random commands until game over or `max_ticks`.
///
/// Returns the number of ticks and commands issued.
fn simulate<R>(
    session: &mut GameSession,
    rng: &mut R,
    max_ticks: usize,
    commands_per_tick: usize,
) -> (usize, usize)
where
    R: Rng + ?Sized,
{
    let mut ticks = 0;
    let mut commands = 0;
    while ticks < max_ticks && !session.is_game_over() {
        for _ in 0..commands_per_tick {
            if session.is_game_over() {
                break;
            }
            let command = Command::ALL[rng.random_range(0..Command::ALL.len())];
            session.apply(command);
            commands += 1;
        }
        session.tick();
        ticks += 1;
    }
    (ticks, commands)
}
