//! The embedded-hal binding against a hand-written I2C bus fake.
use std::collections::HashMap;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use ina260::registers::{AveragingCount, Configuration};
use ina260::transport::I2cTransport;
use ina260::{DeviceConfig, Error, Ina260, State, Transport};

const ADDRESS: u8 = 0x40;

/// An INA260-like target: the first written byte selects a register, any
/// further written bytes replace it, and reads return it.
#[derive(Debug, Default)]
struct FakeBus {
    registers: HashMap<u8, [u8; 2]>,
    transactions: usize,
}

impl FakeBus {
    fn ina260() -> Self {
        let mut registers = HashMap::new();
        registers.insert(0x00, [0x61, 0x27]);
        registers.insert(0x02, [0x25, 0x80]);
        registers.insert(0xFF, [0x22, 0x70]);
        Self {
            registers,
            transactions: 0,
        }
    }
}

impl ErrorType for FakeBus {
    type Error = ErrorKind;
}

impl I2c for FakeBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;
        if address != ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        let mut pointer = None;
        let mut written = Vec::new();
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    for &byte in bytes.iter() {
                        match pointer {
                            None => pointer = Some(byte),
                            Some(_) => written.push(byte),
                        }
                    }
                }
                Operation::Read(buffer) => {
                    let register = pointer.ok_or(ErrorKind::Other)?;
                    let stored = self
                        .registers
                        .get(&register)
                        .ok_or(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data))?;
                    for (slot, byte) in buffer.iter_mut().zip(stored.iter().cycle()) {
                        *slot = *byte;
                    }
                }
            }
        }
        if let Some(register) = pointer {
            if !written.is_empty() {
                let value: [u8; 2] = written.try_into().map_err(|_| ErrorKind::Other)?;
                self.registers.insert(register, value);
            }
        }
        Ok(())
    }
}

#[test]
fn transfers_fail_before_initialize() {
    let mut transport = I2cTransport::new(FakeBus::ina260());
    let mut buf = [0u8; 2];
    assert_eq!(transport.read(0xFF, &mut buf), 0);
    assert_eq!(transport.write(0x00, &[0, 0]), 0);
    assert_eq!(transport.release().transactions, 0);
}

#[test]
fn read_uses_register_pointer() {
    let mut transport = I2cTransport::new(FakeBus::ina260());
    assert!(transport.initialize(ADDRESS, 100_000));
    let mut buf = [0u8; 2];
    assert_eq!(transport.read(0xFF, &mut buf), 2);
    assert_eq!(buf, [0x22, 0x70]);
}

#[test]
fn write_is_one_transaction() {
    let mut transport = I2cTransport::new(FakeBus::ina260());
    assert!(transport.initialize(ADDRESS, 400_000));
    assert_eq!(transport.write(0x07, &[0x12, 0x34]), 2);
    let bus = transport.release();
    assert_eq!(bus.transactions, 1);
    assert_eq!(bus.registers[&0x07], [0x12, 0x34]);
}

/// A NACK from the wrong address shows up as nothing transferred.
#[test]
fn bus_errors_transfer_nothing() {
    let mut transport = I2cTransport::new(FakeBus::ina260());
    assert!(transport.initialize(0x41, 100_000));
    let mut buf = [0u8; 2];
    assert_eq!(transport.read(0xFF, &mut buf), 0);
    assert_eq!(transport.write(0x00, &[0x01, 0x27]), 0);
}

#[test]
fn driver_over_embedded_hal() -> Result<(), Error> {
    let transport = I2cTransport::new(FakeBus::ina260());
    let mut ina = Ina260::new(transport, &DeviceConfig::new());
    assert!(ina.initialize());
    assert!(ina.check_ready());
    assert_eq!(ina.state(), State::Ready);

    // 0x2580 = 9600 LSBs of 1.25 mV.
    assert_eq!(ina.voltage()?, 12_000.0);

    let config = Configuration::default().with_averaging(AveragingCount::N128);
    ina.write_configuration(config)?;
    assert_eq!(ina.read_configuration()?, config);
    Ok(())
}

#[test]
fn driver_reports_missing_register() {
    let mut ina = Ina260::new(I2cTransport::new(FakeBus::ina260()), &DeviceConfig::new());
    assert!(ina.initialize());
    assert!(matches!(ina.power(), Err(Error::ShortRead { register: 0x03, .. })));
}
