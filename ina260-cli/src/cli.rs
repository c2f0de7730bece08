use crate::alert::AlertCommand;
use crate::config::ConfigCommand;
use crate::util;

use clap::Parser;

/// CLI for the INA260 current, voltage and power monitor
///
/// The chip is reached either through a Microchip MCP2221 USB-to-I2C bridge
/// or through a built-in simulator holding fixed sample readings.
///
/// Every command first brings the chip up (initializes the bus and checks the
/// chip identity), retrying a few times to allow for power-on settling.
///
/// Set RUST_LOG, or pass -v (debug) or -vv (trace), to see bus activity.
#[derive(Debug, Parser)]
#[command(version, about)]
pub(crate) struct Cli {
    /// Bus backend to reach the chip through
    #[arg(short, long, value_enum, default_value_t = Backend::Sim)]
    pub(crate) backend: Backend,
    /// 7-bit device address in hexadecimal
    #[arg(short, long, default_value = "0x40", value_parser = util::u8_from_hex)]
    pub(crate) address: u8,
    /// Bus frequency in Hz, rounded up to a speed the chip supports
    #[arg(short, long, default_value_t = 100_000)]
    pub(crate) frequency: u32,
    /// MCP2221 vendor ID in hexadecimal
    #[arg(long = "vid", default_value = "0x4D8", value_parser = util::u16_from_hex)]
    pub(crate) vid: u16,
    /// MCP2221 product ID in hexadecimal
    #[arg(long = "pid", default_value = "0xDD", value_parser = util::u16_from_hex)]
    pub(crate) pid: u16,
    /// Bring-up attempts before giving up
    #[arg(long, default_value_t = 10)]
    pub(crate) attempts: usize,
    /// Log more (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Backend {
    /// In-memory simulated INA260
    Sim,
    /// MCP2221 USB-to-I2C bridge
    Mcp2221,
}

#[derive(Debug, Parser)]
pub(crate) enum Commands {
    /// Show the bring-up state, chip identity and register contents.
    Status,
    /// Print voltage, current and power readings.
    Measure {
        /// Number of readings to take
        #[arg(short, long, default_value_t = 1)]
        count: usize,
        /// Delay between readings in milliseconds
        #[arg(short, long = "interval-ms", default_value_t = 1000)]
        interval_ms: u64,
    },
    /// Read or change the configuration register.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Read or change the alert function and limit.
    #[command(subcommand)]
    Alert(AlertCommand),
}
