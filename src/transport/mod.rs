//! Bus bindings underneath the driver.
//!
//! The driver only ever talks to a [`Transport`]. Each physical backend
//! implements the trait once, and the register logic runs unchanged over any of
//! them:
//!
//! - [`I2cTransport`] adapts any [`embedded_hal::i2c::I2c`] bus.
//! - `sim::SimulatedTransport` is an in-memory register file for tests and
//!   demos (feature `sim`, on by default).
//! - `mcp2221::Mcp2221` drives the chip through a Microchip MCP2221 USB-to-I2C
//!   bridge (feature `mcp2221`).

mod i2c;
#[cfg(feature = "mcp2221")]
pub mod mcp2221;
#[cfg(feature = "sim")]
pub mod sim;

pub use i2c::I2cTransport;

/// Raw addressed byte transfers to a single device.
///
/// Each `write` and `read` is one bus transaction: send the register address,
/// then transfer `data.len()` bytes. The return value is the number of bytes
/// actually transferred. Callers treat any count other than `data.len()` as a
/// failure of that call, so implementations return 0 when the transaction
/// fails at all.
///
/// No retry or timeout behaviour is required. A transport that needs one owns
/// it internally.
pub trait Transport {
    /// Prepare the bus to talk to the device at `address` (7-bit) at
    /// `frequency` Hz.
    ///
    /// Calling this again with the same parameters after a success returns
    /// `true` without touching the bus. Different parameters are applied anew.
    fn initialize(&mut self, address: u8, frequency: u32) -> bool;

    /// Write `data` to `register`, returning the number of data bytes written.
    fn write(&mut self, register: u8, data: &[u8]) -> usize;

    /// Read `data.len()` bytes from `register`, returning the number read.
    fn read(&mut self, register: u8, data: &mut [u8]) -> usize;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn initialize(&mut self, address: u8, frequency: u32) -> bool {
        T::initialize(self, address, frequency)
    }

    fn write(&mut self, register: u8, data: &[u8]) -> usize {
        T::write(self, register, data)
    }

    fn read(&mut self, register: u8, data: &mut [u8]) -> usize {
        T::read(self, register, data)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn initialize(&mut self, address: u8, frequency: u32) -> bool {
        T::initialize(self, address, frequency)
    }

    fn write(&mut self, register: u8, data: &[u8]) -> usize {
        T::write(self, register, data)
    }

    fn read(&mut self, register: u8, data: &mut [u8]) -> usize {
        T::read(self, register, data)
    }
}
