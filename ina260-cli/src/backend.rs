use ina260::Transport;
use ina260::constants::RegisterAddress;
use ina260::transport::sim::SimulatedTransport;

use crate::cli::{Backend, Cli};

/// Open the transport selected on the command line.
pub(crate) fn open(cli: &Cli) -> anyhow::Result<Box<dyn Transport>> {
    match cli.backend {
        Backend::Sim => Ok(Box::new(bench())),
        Backend::Mcp2221 => mcp2221(cli.vid, cli.pid),
    }
}

/// A simulated chip on a 12 V, 1 A load.
fn bench() -> SimulatedTransport {
    let mut sim = SimulatedTransport::with_ina260_defaults();
    sim.set_word(RegisterAddress::Voltage, 9_600)
        .set_word(RegisterAddress::Current, 800)
        .set_word(RegisterAddress::Power, 1_200);
    sim
}

#[cfg(feature = "mcp2221")]
fn mcp2221(vid: u16, pid: u16) -> anyhow::Result<Box<dyn Transport>> {
    use anyhow::Context;
    use ina260::transport::mcp2221::Mcp2221;

    let bridge = Mcp2221::connect_with_vid_and_pid(vid, pid)
        .with_context(|| format!("opening MCP2221 {vid:04X}:{pid:04X}"))?;
    Ok(Box::new(bridge))
}

#[cfg(not(feature = "mcp2221"))]
fn mcp2221(vid: u16, pid: u16) -> anyhow::Result<Box<dyn Transport>> {
    anyhow::bail!(
        "cannot open MCP2221 {vid:04X}:{pid:04X}: built without the `mcp2221` feature"
    )
}
