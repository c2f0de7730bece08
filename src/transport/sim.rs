//! In-memory stand-in for an INA260 on a bus.

use std::collections::BTreeMap;

use tracing::trace;

use super::Transport;
use crate::constants::{DEVICE_ID, DEVICE_REVISION, MANUFACTURER_ID, REGISTER_WIDTH, RegisterAddress};

/// One call made through a [`SimulatedTransport`], in the order received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// `initialize` was called.
    Initialize {
        /// Requested device address.
        address: u8,
        /// Requested bus frequency.
        frequency: u32,
    },
    /// `write` was called with these bytes.
    Write {
        /// Register address sent.
        register: u8,
        /// Data bytes offered.
        data: Vec<u8>,
    },
    /// `read` was called for this many bytes.
    Read {
        /// Register address sent.
        register: u8,
        /// Number of bytes requested.
        len: usize,
    },
}

/// A software register file that behaves like an INA260 behind a bus.
///
/// Registers hold their contents as wire bytes, most significant first. Reads
/// and writes of registers that do not exist transfer nothing, as do all
/// transfers before a successful `initialize`. Writes to read-only registers
/// are accepted and ignored, as on the chip.
///
/// Failure paths can be exercised with [`SimulatedTransport::fail_initialize`]
/// and the transfer limits, which cut every read or write short after a fixed
/// number of bytes.
///
/// ```
/// use ina260::constants::RegisterAddress;
/// use ina260::transport::sim::SimulatedTransport;
///
/// let mut sim = SimulatedTransport::with_ina260_defaults();
/// sim.set_word(RegisterAddress::Voltage, 100);
/// assert_eq!(sim.word(RegisterAddress::Voltage), Some(100));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulatedTransport {
    registers: BTreeMap<u8, [u8; REGISTER_WIDTH]>,
    bus: Option<(u8, u32)>,
    initializations: usize,
    fail_initialize: bool,
    read_limit: Option<usize>,
    write_limit: Option<usize>,
    log: Vec<Transaction>,
}

impl SimulatedTransport {
    /// An empty register file: every register is absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// A register file holding the INA260's power-on contents.
    ///
    /// The configuration register reads 0x6127, with the two reserved bits the
    /// chip reports as set.
    pub fn with_ina260_defaults() -> Self {
        let mut sim = Self::new();
        sim.set_word(RegisterAddress::Configuration, 0x6127);
        sim.set_word(RegisterAddress::Current, 0);
        sim.set_word(RegisterAddress::Voltage, 0);
        sim.set_word(RegisterAddress::Power, 0);
        sim.set_word(RegisterAddress::MaskEnable, 0);
        sim.set_word(RegisterAddress::AlertLimit, 0);
        sim.set_word(RegisterAddress::ManufacturerId, MANUFACTURER_ID);
        sim.set_word(
            RegisterAddress::DeviceId,
            (DEVICE_ID << 4) | u16::from(DEVICE_REVISION),
        );
        sim
    }

    /// Set a register's contents, creating it if absent.
    pub fn set_word(&mut self, register: RegisterAddress, value: u16) -> &mut Self {
        self.registers.insert(register.addr(), value.to_be_bytes());
        self
    }

    /// Set a register's raw wire bytes, creating it if absent.
    pub fn set_bytes(&mut self, register: u8, bytes: [u8; REGISTER_WIDTH]) -> &mut Self {
        self.registers.insert(register, bytes);
        self
    }

    /// Remove a register, so transfers to it fail.
    pub fn remove(&mut self, register: RegisterAddress) -> &mut Self {
        self.registers.remove(&register.addr());
        self
    }

    /// A register's contents, if it exists.
    pub fn word(&self, register: RegisterAddress) -> Option<u16> {
        self.registers
            .get(&register.addr())
            .map(|bytes| u16::from_be_bytes(*bytes))
    }

    /// Make subsequent `initialize` calls fail.
    ///
    /// A failed call also forgets any earlier successful configuration.
    pub fn fail_initialize(&mut self, fail: bool) -> &mut Self {
        self.fail_initialize = fail;
        self
    }

    /// Transfer at most `limit` bytes per read, or lift the limit with `None`.
    pub fn limit_reads(&mut self, limit: Option<usize>) -> &mut Self {
        self.read_limit = limit;
        self
    }

    /// Transfer at most `limit` bytes per write, or lift the limit with `None`.
    ///
    /// A cut-short write leaves the register unchanged.
    pub fn limit_writes(&mut self, limit: Option<usize>) -> &mut Self {
        self.write_limit = limit;
        self
    }

    /// The address and frequency the bus is configured for, if initialized.
    pub fn bus(&self) -> Option<(u8, u32)> {
        self.bus
    }

    /// How many times the bus configuration has actually been applied.
    ///
    /// Repeated `initialize` calls with unchanged parameters do not count.
    pub fn initializations(&self) -> usize {
        self.initializations
    }

    /// Every call made so far.
    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }

    /// Forget the recorded calls.
    pub fn clear_transactions(&mut self) {
        self.log.clear();
    }

    fn is_writable(register: u8) -> bool {
        matches!(
            RegisterAddress::try_from(register),
            Ok(RegisterAddress::Configuration | RegisterAddress::MaskEnable | RegisterAddress::AlertLimit)
        )
    }
}

impl Transport for SimulatedTransport {
    fn initialize(&mut self, address: u8, frequency: u32) -> bool {
        self.log.push(Transaction::Initialize { address, frequency });
        if self.fail_initialize {
            self.bus = None;
            return false;
        }
        if self.bus != Some((address, frequency)) {
            self.bus = Some((address, frequency));
            self.initializations += 1;
        }
        true
    }

    fn write(&mut self, register: u8, data: &[u8]) -> usize {
        self.log.push(Transaction::Write {
            register,
            data: data.to_vec(),
        });
        if self.bus.is_none() {
            return 0;
        }
        let Some(stored) = self.registers.get_mut(&register) else {
            return 0;
        };
        let accepted = data
            .len()
            .min(REGISTER_WIDTH)
            .min(self.write_limit.unwrap_or(usize::MAX));
        if accepted == REGISTER_WIDTH && Self::is_writable(register) {
            stored.copy_from_slice(&data[..REGISTER_WIDTH]);
        }
        trace!(register, accepted, "simulated write");
        accepted
    }

    fn read(&mut self, register: u8, data: &mut [u8]) -> usize {
        self.log.push(Transaction::Read {
            register,
            len: data.len(),
        });
        if self.bus.is_none() {
            return 0;
        }
        let Some(stored) = self.registers.get(&register) else {
            return 0;
        };
        let count = data
            .len()
            .min(REGISTER_WIDTH)
            .min(self.read_limit.unwrap_or(usize::MAX));
        data[..count].copy_from_slice(&stored[..count]);
        trace!(register, count, "simulated read");
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> SimulatedTransport {
        let mut sim = SimulatedTransport::with_ina260_defaults();
        assert!(sim.initialize(0x40, 100_000));
        sim
    }

    #[test]
    fn transfers_need_initialization() {
        let mut sim = SimulatedTransport::with_ina260_defaults();
        let mut buf = [0u8; 2];
        assert_eq!(sim.read(0xFF, &mut buf), 0);
        assert_eq!(sim.write(0x00, &[0x01, 0x27]), 0);
        assert!(sim.initialize(0x40, 100_000));
        assert_eq!(sim.read(0xFF, &mut buf), 2);
        assert_eq!(buf, [0x22, 0x70]);
    }

    #[test]
    fn initialize_applies_only_changed_parameters() {
        let mut sim = ready();
        assert!(sim.initialize(0x40, 100_000));
        assert_eq!(sim.initializations(), 1);
        assert!(sim.initialize(0x41, 100_000));
        assert_eq!(sim.initializations(), 2);
        assert_eq!(sim.bus(), Some((0x41, 100_000)));
    }

    #[test]
    fn failed_initialize_drops_bus() {
        let mut sim = ready();
        sim.fail_initialize(true);
        assert!(!sim.initialize(0x40, 100_000));
        assert_eq!(sim.bus(), None);
    }

    #[test]
    fn writes_store_only_complete_writes_to_writable_registers() {
        let mut sim = ready();
        assert_eq!(sim.write(0x07, &[0x12, 0x34]), 2);
        assert_eq!(sim.word(RegisterAddress::AlertLimit), Some(0x1234));

        assert_eq!(sim.write(0xFF, &[0x00, 0x00]), 2);
        assert_eq!(sim.word(RegisterAddress::DeviceId), Some(0x2270));

        sim.limit_writes(Some(1));
        assert_eq!(sim.write(0x07, &[0xAB, 0xCD]), 1);
        assert_eq!(sim.word(RegisterAddress::AlertLimit), Some(0x1234));
    }

    #[test]
    fn overlong_writes_transfer_one_register() {
        let mut sim = ready();
        assert_eq!(sim.write(0x07, &[0x12, 0x34, 0x56]), 2);
        assert_eq!(sim.word(RegisterAddress::AlertLimit), Some(0x1234));
    }

    #[test]
    fn unknown_registers_transfer_nothing() {
        let mut sim = ready();
        let mut buf = [0u8; 2];
        assert_eq!(sim.read(0x04, &mut buf), 0);
        assert_eq!(sim.write(0x05, &[0, 0]), 0);
    }

    #[test]
    fn reads_can_be_cut_short() {
        let mut sim = ready();
        sim.limit_reads(Some(1));
        let mut buf = [0u8; 2];
        assert_eq!(sim.read(0xFF, &mut buf), 1);
        assert_eq!(buf, [0x22, 0x00]);
    }

    #[test]
    fn transactions_are_logged_in_order() {
        let mut sim = ready();
        let mut buf = [0u8; 2];
        sim.read(0x02, &mut buf);
        sim.write(0x06, &[0x80, 0x00]);
        assert_eq!(
            sim.transactions(),
            &[
                Transaction::Initialize {
                    address: 0x40,
                    frequency: 100_000
                },
                Transaction::Read {
                    register: 0x02,
                    len: 2
                },
                Transaction::Write {
                    register: 0x06,
                    data: vec![0x80, 0x00]
                },
            ]
        );
        sim.clear_transactions();
        assert!(sim.transactions().is_empty());
    }
}
