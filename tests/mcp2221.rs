//! Test against an INA260 behind a real MCP2221.
//!
//! These need the hardware attached, so they are ignored by default. Run them
//! with `--features mcp2221 -- --ignored --test-threads=1`: the USB device
//! cannot be opened from two threads at once.
#![cfg(feature = "mcp2221")]

use std::time::Duration;

use ina260::registers::{AlertLimit, Configuration};
use ina260::transport::mcp2221::{Error, Mcp2221};
use ina260::{DeviceConfig, Ina260, State};

fn connect() -> Result<Ina260<Mcp2221>, Error> {
    let bridge = Mcp2221::connect()?;
    Ok(Ina260::new(bridge, &DeviceConfig::new()))
}

#[test]
#[ignore = "needs an MCP2221 with an INA260 at 0x40"]
fn comes_up_ready() -> Result<(), Error> {
    let mut ina = connect()?;
    assert!(ina.wait_until_ready(10, Duration::from_millis(50)));
    assert_eq!(ina.state(), State::Ready);
    Ok(())
}

#[test]
#[ignore = "needs an MCP2221 with an INA260 at 0x40"]
fn identity_and_measurements() -> Result<(), Box<dyn std::error::Error>> {
    let mut ina = connect()?;
    assert!(ina.wait_until_ready(10, Duration::from_millis(50)));
    assert!(ina.read_manufacturer_id()?.is_texas_instruments());
    assert!(ina.read_device_id()?.is_ina260());
    assert!(ina.voltage()? >= 0.0);
    Ok(())
}

#[test]
#[ignore = "needs an MCP2221 with an INA260 at 0x40"]
fn alert_limit_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let mut ina = connect()?;
    assert!(ina.wait_until_ready(10, Duration::from_millis(50)));
    ina.write_alert_limit(AlertLimit::new(0x1234))?;
    assert_eq!(ina.read_alert_limit()?.limit(), 0x1234);
    ina.write_alert_limit(AlertLimit::default())?;
    ina.write_configuration(Configuration::default())?;
    Ok(())
}

#[test]
#[ignore = "needs an MCP2221"]
fn too_fast_for_the_bridge() -> Result<(), Error> {
    let bridge = Mcp2221::connect()?;
    let config = *DeviceConfig::new().with_frequency(1_000_000);
    let mut ina = Ina260::new(bridge, &config);
    assert!(!ina.initialize());
    assert_eq!(ina.state(), State::Uninitialized);
    Ok(())
}
