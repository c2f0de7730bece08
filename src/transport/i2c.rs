use embedded_hal::i2c::{Error as _, I2c, Operation};
use tracing::debug;

use super::Transport;

/// [`Transport`] over any [`embedded_hal::i2c::I2c`] bus.
///
/// The bus clock belongs to the HAL that built the bus, so `initialize` only
/// records the device address (and the requested frequency for reference).
/// Transfers before the first `initialize` fail.
///
/// Bus errors are logged at debug level with their [`ErrorKind`] and reported
/// as zero bytes transferred.
///
/// [`ErrorKind`]: embedded_hal::i2c::ErrorKind
#[derive(Debug)]
pub struct I2cTransport<I> {
    bus: I,
    target: Option<(u8, u32)>,
}

impl<I: I2c> I2cTransport<I> {
    /// Wrap a bus.
    pub fn new(bus: I) -> Self {
        Self { bus, target: None }
    }

    /// Give the bus back.
    pub fn release(self) -> I {
        self.bus
    }

    fn address(&self) -> Option<u8> {
        self.target.map(|(address, _)| address)
    }
}

impl<I: I2c> Transport for I2cTransport<I> {
    fn initialize(&mut self, address: u8, frequency: u32) -> bool {
        if self.target != Some((address, frequency)) {
            debug!(address, frequency, "i2c target set");
            self.target = Some((address, frequency));
        }
        true
    }

    fn write(&mut self, register: u8, data: &[u8]) -> usize {
        let Some(address) = self.address() else {
            return 0;
        };
        let register_address = [register];
        let mut operations = [Operation::Write(&register_address), Operation::Write(data)];
        match self.bus.transaction(address, &mut operations) {
            Ok(()) => data.len(),
            Err(e) => {
                debug!(address, register, kind = ?e.kind(), "i2c write failed");
                0
            }
        }
    }

    fn read(&mut self, register: u8, data: &mut [u8]) -> usize {
        let Some(address) = self.address() else {
            return 0;
        };
        match self.bus.write_read(address, &[register], data) {
            Ok(()) => data.len(),
            Err(e) => {
                debug!(address, register, kind = ?e.kind(), "i2c read failed");
                0
            }
        }
    }
}
