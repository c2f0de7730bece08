use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::bytes::{Native, reorder};
use crate::config::DeviceConfig;
use crate::constants::{DeviceOrder, REGISTER_WIDTH, mask_device_address, min_supported_frequency};
use crate::error::{Error, Result};
use crate::measurement::Measurement;
use crate::registers::{
    AlertLimit, Configuration, DeviceId, ManufacturerId, MaskEnable, Register, RegisterCache,
    Writable,
};
use crate::transport::Transport;

/// Where the driver is in bringing up the chip.
///
/// Operations do not check the state. It records what has been confirmed so
/// far so callers can decide when measurements are meaningful.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// The transport has not been (successfully) initialized.
    #[default]
    Uninitialized,
    /// The transport is initialized but the chip has not identified itself.
    Initialized,
    /// The chip answered with the expected identity after a successful
    /// initialize.
    Ready,
}

/// Driver for one INA260 behind a [`Transport`].
///
/// # Quick start
///
/// Build a [`DeviceConfig`], hand it to [`Ina260::new`] with the transport for
/// your bus, then bring the chip up with [`Ina260::initialize`] and
/// [`Ina260::check_ready`] (or both in a loop with
/// [`Ina260::wait_until_ready`]):
///
/// ```
/// use ina260::transport::sim::SimulatedTransport;
/// use ina260::{DeviceConfig, Ina260, State};
///
/// let mut ina = Ina260::new(SimulatedTransport::with_ina260_defaults(), &DeviceConfig::new());
/// assert!(ina.initialize());
/// assert!(ina.check_ready());
/// assert_eq!(ina.state(), State::Ready);
///
/// let millivolts = ina.voltage()?;
/// # assert_eq!(millivolts, 0.0);
/// # Ok::<(), ina260::Error>(())
/// ```
///
/// # Overview
///
/// Every operation is one blocking transport call. Register values are
/// converted to and from the chip's byte order at the transport boundary, so
/// callers only see host-order [`Register`] values.
///
/// The driver keeps a copy of the last value successfully written to each
/// writable register (see [`Ina260::cache`]). A failed write leaves that copy
/// unchanged. Measurements are never cached.
#[derive(Debug)]
pub struct Ina260<T> {
    transport: T,
    address: u8,
    frequency: u32,
    state: State,
    cache: RegisterCache,
}

impl<T: Transport> Ina260<T> {
    ////////////////////////////////////////////////////////////////////////////////
    // Construction and bring-up
    ////////////////////////////////////////////////////////////////////////////////

    /// Create a driver that owns `transport`.
    ///
    /// The configured address is masked to 7 bits and the frequency is rounded
    /// up to the nearest bus speed the chip supports. Nothing is sent on the bus.
    pub fn new(transport: T, config: &DeviceConfig) -> Self {
        Self {
            transport,
            address: mask_device_address(config.address),
            frequency: min_supported_frequency(config.frequency),
            state: State::Uninitialized,
            cache: RegisterCache {
                configuration: config.configuration,
                mask_enable: config.mask_enable,
                alert_limit: config.alert_limit,
            },
        }
    }

    /// Initialize the transport for this device's address and frequency.
    ///
    /// On success the state becomes at least [`State::Initialized`]; a driver
    /// that is already ready stays ready. On failure it drops back to
    /// [`State::Uninitialized`].
    pub fn initialize(&mut self) -> bool {
        let ok = self.transport.initialize(self.address, self.frequency);
        debug!(address = self.address, frequency = self.frequency, ok, "initialize");
        self.state = match (ok, self.state) {
            (false, _) => State::Uninitialized,
            (true, State::Ready) => State::Ready,
            (true, _) => State::Initialized,
        };
        ok
    }

    /// Check that the chip answers with the INA260 identity.
    ///
    /// Reads the two DEVICE_ID bytes and compares them with the expected
    /// identity in the chip's byte order, so a transport that swaps bytes is
    /// caught here. On success an initialized driver becomes [`State::Ready`];
    /// one never initialized stays [`State::Uninitialized`]. A short read or a
    /// mismatch returns `false` without lowering the state below
    /// [`State::Initialized`].
    pub fn check_ready(&mut self) -> bool {
        let register = DeviceId::ADDRESS.addr();
        let mut bytes = [0u8; REGISTER_WIDTH];
        let count = self.transport.read(register, &mut bytes);
        if count != REGISTER_WIDTH {
            warn!(register, requested = REGISTER_WIDTH, transferred = count, "short identity read");
            self.demote_from_ready();
            return false;
        }

        let expected = DeviceId::default();
        if expected != bytes {
            warn!(received = ?bytes, expected = ?expected.to_device_bytes(), "device identity mismatch");
            self.demote_from_ready();
            return false;
        }

        // Ready is only reachable through Initialized.
        if self.state == State::Uninitialized {
            debug!("device identified before initialize");
        } else {
            debug!("device ready");
            self.state = State::Ready;
        }
        true
    }

    /// Repeat [`Ina260::initialize`] and [`Ina260::check_ready`] until both
    /// succeed, up to `attempts` times, sleeping `interval` between attempts.
    ///
    /// Returns whether the chip became ready. This mirrors the settling time a
    /// freshly powered chip needs before its registers are valid.
    pub fn wait_until_ready(&mut self, attempts: usize, interval: Duration) -> bool {
        for attempt in 1..=attempts {
            if self.initialize() && self.check_ready() {
                return true;
            }
            debug!(attempt, attempts, "device not ready");
            if attempt < attempts {
                std::thread::sleep(interval);
            }
        }
        false
    }

    fn demote_from_ready(&mut self) {
        if self.state == State::Ready {
            self.state = State::Initialized;
        }
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Register access
    ////////////////////////////////////////////////////////////////////////////////

    /// Read a register.
    ///
    /// # Errors
    ///
    /// [`Error::ShortRead`] if the transport returns anything but two bytes.
    pub fn read_register<R: Register>(&mut self) -> Result<R> {
        let bytes = self.read_bytes(R::ADDRESS.addr())?;
        let value = R::from_device_bytes(bytes);
        trace!(register = R::ADDRESS.addr(), raw = value.raw(), "register read");
        Ok(value)
    }

    /// Write a register, updating the driver's copy on success.
    ///
    /// # Errors
    ///
    /// [`Error::ShortWrite`] if the transport accepts anything but two bytes.
    /// The driver's copy of the register is left unchanged.
    pub fn write_register<R: Writable>(&mut self, value: R) -> Result<()> {
        let register = R::ADDRESS.addr();
        let bytes = value.to_device_bytes();
        let transferred = self.transport.write(register, &bytes);
        if transferred != REGISTER_WIDTH {
            warn!(register, requested = REGISTER_WIDTH, transferred, "short register write");
            return Err(Error::ShortWrite {
                register,
                requested: REGISTER_WIDTH,
                transferred,
            });
        }
        trace!(register, raw = value.raw(), "register written");
        value.store(&mut self.cache);
        Ok(())
    }

    fn read_bytes(&mut self, register: u8) -> Result<[u8; REGISTER_WIDTH]> {
        let mut bytes = [0u8; REGISTER_WIDTH];
        let transferred = self.transport.read(register, &mut bytes);
        if transferred != REGISTER_WIDTH {
            warn!(register, requested = REGISTER_WIDTH, transferred, "short register read");
            return Err(Error::ShortRead {
                register,
                requested: REGISTER_WIDTH,
                transferred,
            });
        }
        Ok(bytes)
    }

    /// Read the configuration register.
    ///
    /// # Errors
    ///
    /// See [`Ina260::read_register`].
    pub fn read_configuration(&mut self) -> Result<Configuration> {
        self.read_register()
    }

    /// Write the configuration register.
    ///
    /// # Errors
    ///
    /// See [`Ina260::write_register`].
    pub fn write_configuration(&mut self, configuration: Configuration) -> Result<()> {
        self.write_register(configuration)
    }

    /// Read the Mask/Enable register.
    ///
    /// On the chip, this read also clears the latched alert and conversion
    /// ready flags.
    ///
    /// # Errors
    ///
    /// See [`Ina260::read_register`].
    pub fn read_mask_enable(&mut self) -> Result<MaskEnable> {
        self.read_register()
    }

    /// Write the Mask/Enable register.
    ///
    /// # Errors
    ///
    /// See [`Ina260::write_register`].
    pub fn write_mask_enable(&mut self, mask_enable: MaskEnable) -> Result<()> {
        self.write_register(mask_enable)
    }

    /// Read the alert limit register.
    ///
    /// # Errors
    ///
    /// See [`Ina260::read_register`].
    pub fn read_alert_limit(&mut self) -> Result<AlertLimit> {
        self.read_register()
    }

    /// Write the alert limit register.
    ///
    /// # Errors
    ///
    /// See [`Ina260::write_register`].
    pub fn write_alert_limit(&mut self, alert_limit: AlertLimit) -> Result<()> {
        self.write_register(alert_limit)
    }

    /// Read the device identity.
    ///
    /// # Errors
    ///
    /// See [`Ina260::read_register`].
    pub fn read_device_id(&mut self) -> Result<DeviceId> {
        self.read_register()
    }

    /// Read the manufacturer identity.
    ///
    /// # Errors
    ///
    /// See [`Ina260::read_register`].
    pub fn read_manufacturer_id(&mut self) -> Result<ManufacturerId> {
        self.read_register()
    }

    ////////////////////////////////////////////////////////////////////////////////
    // Measurements
    ////////////////////////////////////////////////////////////////////////////////

    /// Read a measurement register and scale it to milli-units
    /// (see [`Measurement::unit`]).
    ///
    /// # Errors
    ///
    /// [`Error::ShortRead`] if the transport returns anything but two bytes.
    pub fn read_measurement(&mut self, measurement: Measurement) -> Result<f64> {
        let register = measurement.address().addr();
        let bytes = self.read_bytes(register)?;
        let raw = reorder::<Native, DeviceOrder, u16>(u16::from_ne_bytes(bytes));
        trace!(register, raw, %measurement, "measurement read");
        Ok(measurement.scale(raw))
    }

    /// Current in mA.
    ///
    /// # Errors
    ///
    /// See [`Ina260::read_measurement`].
    pub fn current(&mut self) -> Result<f64> {
        self.read_measurement(Measurement::Current)
    }

    /// Bus voltage in mV.
    ///
    /// # Errors
    ///
    /// See [`Ina260::read_measurement`].
    pub fn voltage(&mut self) -> Result<f64> {
        self.read_measurement(Measurement::Voltage)
    }

    /// Power in mW.
    ///
    /// # Errors
    ///
    /// See [`Ina260::read_measurement`].
    pub fn power(&mut self) -> Result<f64> {
        self.read_measurement(Measurement::Power)
    }
}

impl<T> Ina260<T> {
    ////////////////////////////////////////////////////////////////////////////////
    // Accessors
    ////////////////////////////////////////////////////////////////////////////////

    /// Bring-up progress.
    pub fn state(&self) -> State {
        self.state
    }

    /// 7-bit device address in use.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Bus frequency in use, in Hz.
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Last successfully written values of the writable registers.
    pub fn cache(&self) -> &RegisterCache {
        &self.cache
    }

    /// Cached configuration register.
    pub fn configuration(&self) -> Configuration {
        self.cache.configuration
    }

    /// Cached Mask/Enable register.
    pub fn mask_enable(&self) -> MaskEnable {
        self.cache.mask_enable
    }

    /// Cached alert limit register.
    pub fn alert_limit(&self) -> AlertLimit {
        self.cache.alert_limit
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the driver and give back the transport.
    pub fn release(self) -> T {
        self.transport
    }
}
