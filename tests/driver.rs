//! Driver behaviour against the simulated transport.
use std::time::Duration;

use ina260::constants::RegisterAddress;
use ina260::registers::{
    AdcTime, AlertLimit, AveragingCount, Configuration, MaskEnable, OperatingMode, OperatingType,
    Register,
};
use ina260::transport::sim::{SimulatedTransport, Transaction};
use ina260::{DeviceConfig, Error, Ina260, Measurement, State, Transport};

fn ready_driver() -> Ina260<SimulatedTransport> {
    let mut ina = Ina260::new(SimulatedTransport::with_ina260_defaults(), &DeviceConfig::new());
    assert!(ina.initialize());
    assert!(ina.check_ready());
    ina
}

/// Address and frequency are normalised before anything reaches the bus.
#[test]
fn construction_masks_address_and_clamps_frequency() {
    let config = *DeviceConfig::new().with_address(0xC5).with_frequency(150_000);
    let mut ina = Ina260::new(SimulatedTransport::with_ina260_defaults(), &config);
    assert_eq!(ina.address(), 0x45);
    assert_eq!(ina.frequency(), 400_000);
    assert_eq!(ina.state(), State::Uninitialized);
    assert!(ina.transport().transactions().is_empty());

    assert!(ina.initialize());
    assert_eq!(ina.transport().bus(), Some((0x45, 400_000)));
}

#[test]
fn ready_on_expected_identity() {
    let ina = ready_driver();
    assert_eq!(ina.state(), State::Ready);
}

/// A one-byte answer to the identity read is a failure, not a panic.
#[test]
fn not_ready_on_short_identity_read() {
    let mut ina = Ina260::new(SimulatedTransport::with_ina260_defaults(), &DeviceConfig::new());
    assert!(ina.initialize());
    ina.transport_mut().limit_reads(Some(1));
    assert!(!ina.check_ready());
    assert_eq!(ina.state(), State::Initialized);
}

/// Byte-swapped identity is caught by the wire comparison.
#[test]
fn not_ready_on_swapped_identity() {
    let mut sim = SimulatedTransport::with_ina260_defaults();
    sim.set_bytes(RegisterAddress::DeviceId.addr(), [0x70, 0x22]);
    let mut ina = Ina260::new(sim, &DeviceConfig::new());
    assert!(ina.initialize());
    assert!(!ina.check_ready());
    assert_eq!(ina.state(), State::Initialized);
}

#[test]
fn failed_check_keeps_initialized_state() {
    let mut ina = ready_driver();
    ina.transport_mut().limit_reads(Some(0));
    assert!(!ina.check_ready());
    assert_eq!(ina.state(), State::Initialized);
}

#[test]
fn identity_without_initialize_is_not_ready() {
    // The bus is already open, so the identity read succeeds.
    let mut sim = SimulatedTransport::with_ina260_defaults();
    assert!(sim.initialize(0x40, 100_000));
    let mut ina = Ina260::new(&mut sim, &DeviceConfig::new());
    assert!(ina.check_ready());
    assert_eq!(ina.state(), State::Uninitialized);

    assert!(ina.initialize());
    assert!(ina.check_ready());
    assert_eq!(ina.state(), State::Ready);
}

#[test]
fn failed_initialize_returns_to_uninitialized() {
    let mut ina = ready_driver();
    ina.transport_mut().fail_initialize(true);
    assert!(!ina.initialize());
    assert_eq!(ina.state(), State::Uninitialized);
}

#[test]
fn initialize_is_idempotent() {
    let mut ina = ready_driver();
    assert!(ina.initialize());
    assert!(ina.initialize());
    assert_eq!(ina.transport().initializations(), 1);
    assert_eq!(ina.state(), State::Ready);
}

#[test]
fn wait_until_ready_polls_until_identity_appears() {
    let mut sim = SimulatedTransport::with_ina260_defaults();
    sim.fail_initialize(true);
    let mut ina = Ina260::new(sim, &DeviceConfig::new());
    assert!(!ina.wait_until_ready(3, Duration::ZERO));
    assert_eq!(ina.transport().transactions().len(), 3);

    ina.transport_mut().fail_initialize(false);
    assert!(ina.wait_until_ready(3, Duration::ZERO));
    assert_eq!(ina.state(), State::Ready);
}

#[test]
fn voltage_is_scaled_by_lsb() -> Result<(), Error> {
    let mut ina = ready_driver();
    ina.transport_mut().set_word(RegisterAddress::Voltage, 100);
    assert_eq!(ina.read_measurement(Measurement::Voltage)?, 125.0);
    assert_eq!(ina.voltage()?, 125.0);
    Ok(())
}

#[test]
fn current_and_power_are_scaled() -> Result<(), Error> {
    let mut ina = ready_driver();
    ina.transport_mut()
        .set_word(RegisterAddress::Current, 800)
        .set_word(RegisterAddress::Power, 1_200);
    assert_eq!(ina.current()?, 1_000.0);
    assert_eq!(ina.power()?, 12_000.0);
    Ok(())
}

/// Measurements go to the bus every time.
#[test]
fn measurements_are_never_cached() -> Result<(), Error> {
    let mut ina = ready_driver();
    ina.transport_mut().set_word(RegisterAddress::Power, 1);
    assert_eq!(ina.power()?, 10.0);
    ina.transport_mut().set_word(RegisterAddress::Power, 2);
    assert_eq!(ina.power()?, 20.0);
    Ok(())
}

#[test]
fn short_measurement_read_is_an_error() {
    let mut ina = ready_driver();
    ina.transport_mut().limit_reads(Some(1));
    assert_eq!(
        ina.current(),
        Err(Error::ShortRead {
            register: 0x01,
            requested: 2,
            transferred: 1
        })
    );
}

#[test]
fn configuration_read_decodes_fields() -> Result<(), Error> {
    let mut ina = ready_driver();
    let config = ina.read_configuration()?;
    // The chip's set reserved bits are dropped.
    assert_eq!(config.raw(), 0x0127);
    assert_eq!(config, Configuration::default());
    assert_eq!(config.operating_type(), OperatingType::Power);
    assert_eq!(config.operating_mode(), OperatingMode::Continuous);
    Ok(())
}

#[test]
fn write_sends_device_order_and_updates_cache() -> Result<(), Error> {
    let mut ina = ready_driver();
    ina.transport_mut().clear_transactions();
    let config = Configuration::new(
        OperatingType::Voltage,
        OperatingMode::Triggered,
        AdcTime::Us140,
        AdcTime::Ms8_244,
        AveragingCount::N1024,
        false,
    );
    ina.write_configuration(config)?;

    let [high, low] = config.raw().to_be_bytes();
    assert_eq!(
        ina.transport().transactions(),
        &[Transaction::Write {
            register: 0x00,
            data: vec![high, low]
        }]
    );
    assert_eq!(ina.transport().word(RegisterAddress::Configuration), Some(config.raw()));
    assert_eq!(ina.configuration(), config);
    assert_eq!(ina.read_configuration()?, config);
    Ok(())
}

/// A one-byte write fails and leaves the cached value alone.
#[test]
fn short_write_leaves_cache_unchanged() {
    let mut ina = ready_driver();
    let before = ina.configuration();
    ina.transport_mut().limit_writes(Some(1));
    let changed = before.with_averaging(AveragingCount::N4);
    assert_eq!(
        ina.write_configuration(changed),
        Err(Error::ShortWrite {
            register: 0x00,
            requested: 2,
            transferred: 1
        })
    );
    assert_eq!(ina.configuration(), before);
    assert_eq!(*ina.cache(), ina260::registers::RegisterCache::default());
}

#[test]
fn alert_registers_round_trip() -> Result<(), Error> {
    let mut ina = ready_driver();
    let mask = MaskEnable::new().with_under_voltage(true).with_alert_latch_enable(true);
    let limit = AlertLimit::from_scaled(Measurement::Voltage, 11_000.0);
    ina.write_mask_enable(mask)?;
    ina.write_alert_limit(limit)?;
    assert_eq!(ina.mask_enable(), mask);
    assert_eq!(ina.alert_limit(), limit);
    assert_eq!(ina.read_mask_enable()?, mask);
    assert_eq!(ina.read_alert_limit()?.limit(), 8_800);
    Ok(())
}

#[test]
fn configured_cache_is_initial_state() {
    let limit = AlertLimit::new(0x0F00);
    let ina = Ina260::new(
        SimulatedTransport::new(),
        DeviceConfig::new().with_alert_limit(limit),
    );
    assert_eq!(ina.alert_limit(), limit);
    assert_eq!(ina.configuration(), Configuration::default());
}

#[test]
fn identity_registers() -> Result<(), Error> {
    let mut ina = ready_driver();
    let device = ina.read_device_id()?;
    assert!(device.is_ina260());
    assert_eq!(device.revision(), 0);
    assert!(ina.read_manufacturer_id()?.is_texas_instruments());
    Ok(())
}

/// Missing registers fail without touching any other state.
#[test]
fn absent_register_reads_fail() {
    let mut ina = ready_driver();
    ina.transport_mut().remove(RegisterAddress::AlertLimit);
    assert!(matches!(ina.read_alert_limit(), Err(Error::ShortRead { transferred: 0, .. })));
    assert_eq!(ina.state(), State::Ready);
}

#[test]
fn boxed_and_borrowed_transports() -> Result<(), Error> {
    let mut sim = SimulatedTransport::with_ina260_defaults();
    {
        let mut borrowed = Ina260::new(&mut sim, &DeviceConfig::new());
        assert!(borrowed.wait_until_ready(1, Duration::ZERO));
        borrowed.write_alert_limit(AlertLimit::new(7))?;
    }
    assert_eq!(sim.word(RegisterAddress::AlertLimit), Some(7));

    let boxed: Box<dyn ina260::Transport> = Box::new(sim);
    let mut ina = Ina260::new(boxed, &DeviceConfig::new());
    assert!(ina.wait_until_ready(1, Duration::ZERO));
    assert_eq!(ina.read_alert_limit()?.limit(), 7);
    Ok(())
}

#[test]
fn release_returns_transport() {
    let ina = ready_driver();
    let sim = ina.release();
    assert!(sim.bus().is_some());
}
