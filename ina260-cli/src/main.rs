use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use ina260::{DeviceConfig, Ina260};
use tracing_subscriber::EnvFilter;

use cli::Commands;

mod alert;
mod backend;
mod cli;
mod config;
mod measure;
mod status;
mod util;

const READY_INTERVAL: Duration = Duration::from_millis(50);

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    let transport = backend::open(&cli)?;
    let config = *DeviceConfig::new()
        .with_address(cli.address)
        .with_frequency(cli.frequency);
    let mut ina = Ina260::new(transport, &config);
    let ready = ina.wait_until_ready(cli.attempts, READY_INTERVAL);

    match cli.command {
        // Status reports whatever state was reached.
        Commands::Status => status::action(&mut ina),
        _ if !ready => bail!(
            "INA260 at {:#04X} not ready after {} attempts ({:?})",
            ina.address(),
            cli.attempts,
            ina.state()
        ),
        Commands::Measure {
            count,
            interval_ms,
        } => measure::action(&mut ina, count, Duration::from_millis(interval_ms)),
        Commands::Config(command) => config::action(&mut ina, command)?,
        Commands::Alert(command) => alert::action(&mut ina, command)?,
    }
    Ok(())
}
