mod app;
mod cli;
mod error;
mod monitor;
mod process;
mod render;
mod table;

use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use app::RefreshLoop;
use cli::Args;
use monitor::SnapshotCollector;
use render::TerminalSink;
use table::ProjectionSpec;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    //Reject bad column or sort names before touching /proc
    let spec = ProjectionSpec::parse(&args.columns, &args.sort_by, args.descending, args.limit)?;

    anyhow::ensure!(
        args.interval.is_finite() && args.interval > 0.0,
        "interval must be a positive number of seconds"
    );

    //Ctrl-C feeds the cancellation channel the refresh loop waits on
    let (cancel_tx, cancel_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = cancel_tx.send(());
    })
    .context("failed to install the Ctrl-C handler")?;

    let refresh = RefreshLoop::new(Duration::from_secs_f64(args.interval), args.live_update);
    let mut collector = SnapshotCollector::new();
    let mut sink = TerminalSink::new();

    refresh.run(&mut collector, &spec, &mut sink, cancel_rx)?;
    Ok(())
}
