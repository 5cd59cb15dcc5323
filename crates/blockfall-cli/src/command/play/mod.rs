use crate::{command::session_arg::SessionArg, tui::Runtime};

use self::app::PlayApp;

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    session: SessionArg,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let session = arg.session.start_session()?;
    let seed = session.seed();

    let mut app = PlayApp::new(session);
    Runtime::new().run(&mut app)?;

    let summary = app.session().summary();
    println!(
        "Lines cleared: {}, pieces locked: {} (seed {seed})",
        summary.lines_cleared, summary.pieces_locked
    );
    Ok(())
}
