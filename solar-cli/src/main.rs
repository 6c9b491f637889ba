use clap::Parser;
use tracing::debug;

use solar_cli::{Cli, logging, run};

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;
    debug!(?cli, "starting");

    let report = run(&cli)?;
    print!("{report}");

    Ok(())
}
