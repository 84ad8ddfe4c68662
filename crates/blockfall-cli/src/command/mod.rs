use std::io;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{preview_bag::PreviewBagArg, simulate::SimulateArg};

mod preview_bag;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log engine events at debug level (overridden by `RUST_LOG`)
    #[clap(long, global = true)]
    verbose: bool,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run a headless session and print the final snapshot as JSON
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print the piece sequence a seed produces
    PreviewBag(#[clap(flatten)] PreviewBagArg),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::PreviewBag(arg) => preview_bag::run(&arg)?,
    }
    Ok(())
}
