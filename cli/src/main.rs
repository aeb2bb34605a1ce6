mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{convert, import, search};
use tracing::Level;

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Convert(args) => convert::run(&cli, args),
        Commands::Import(args) => import::run(&cli, args),
        Commands::Search(args) => search::run(&cli, args),
    }
}

/// Log to stderr; -v raises the level from WARN to INFO, DEBUG, then TRACE.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> { run() }
