//! Fixed properties of the INA260: register addresses, bus parameters and
//! identity values.

use crate::bytes::BigEndian;

/// Byte order of 16-bit register values on the wire.
pub type DeviceOrder = BigEndian;

/// Factory-default 7-bit I2C address (A0 and A1 tied to GND).
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Default I2C bus frequency in Hz.
pub const DEFAULT_FREQUENCY: u32 = 100_000;

/// I2C bus frequencies supported by the chip, in Hz, ascending.
pub const BUS_FREQUENCIES: [u32; 4] = [
    100_000,   // standard mode
    400_000,   // fast mode
    1_000_000, // fast mode plus
    2_940_000, // high-speed mode
];

/// Width of every register value, in bytes.
pub const REGISTER_WIDTH: usize = 2;

/// Device identifier reported in the upper 12 bits of the DEVICE_ID register.
pub const DEVICE_ID: u16 = 0x227;

/// Die revision reported in the lower 4 bits of the DEVICE_ID register.
pub const DEVICE_REVISION: u8 = 0x0;

/// Contents of the MANUFACTURER_ID register: "TI" in ASCII.
pub const MANUFACTURER_ID: u16 = 0x5449;

/// Addressable registers of the INA260.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RegisterAddress {
    /// Configuration register (00h).
    Configuration = 0x00,
    /// Current measurement (01h).
    Current = 0x01,
    /// Bus voltage measurement (02h).
    Voltage = 0x02,
    /// Power measurement (03h).
    Power = 0x03,
    /// Mask/Enable register (06h).
    MaskEnable = 0x06,
    /// Alert limit register (07h).
    AlertLimit = 0x07,
    /// Manufacturer ID register (FEh).
    ManufacturerId = 0xFE,
    /// Die ID register (FFh).
    DeviceId = 0xFF,
}

impl RegisterAddress {
    /// Every register, in address order.
    pub const ALL: [RegisterAddress; 8] = [
        Self::Configuration,
        Self::Current,
        Self::Voltage,
        Self::Power,
        Self::MaskEnable,
        Self::AlertLimit,
        Self::ManufacturerId,
        Self::DeviceId,
    ];

    /// The register pointer byte sent on the bus.
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

impl From<RegisterAddress> for u8 {
    fn from(value: RegisterAddress) -> Self {
        value.addr()
    }
}

impl TryFrom<u8> for RegisterAddress {
    type Error = u8;

    /// Look up the register at `value`, returning the byte back if there is none.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|r| r.addr() == value)
            .ok_or(value)
    }
}

/// Mask the given device address to the 7-bit I2C address range.
pub const fn mask_device_address(address: u8) -> u8 {
    address & 0x7F
}

/// The smallest supported bus frequency that is at least `frequency` Hz.
///
/// Requests above the fastest supported mode return that mode, so the result is
/// always one of [`BUS_FREQUENCIES`].
pub const fn min_supported_frequency(frequency: u32) -> u32 {
    let mut i = 0;
    while i < BUS_FREQUENCIES.len() {
        if frequency <= BUS_FREQUENCIES[i] {
            return BUS_FREQUENCIES[i];
        }
        i += 1;
    }
    BUS_FREQUENCIES[BUS_FREQUENCIES.len() - 1]
}
