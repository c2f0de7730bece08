//! Typed INA260 register values.
//!
//! Every register is 16 bits wide. Each type here stores only the raw value and
//! exposes its bit fields through getters and `with_*` methods that return a
//! modified copy. Reserved bits are cleared whenever a value is constructed, so
//! two values are equal exactly when their raw contents are.

use crate::bytes::{Native, reorder};
use crate::constants::{DeviceOrder, REGISTER_WIDTH, RegisterAddress};

mod alert_limit;
mod configuration;
mod device_id;
mod mask_enable;

pub use alert_limit::AlertLimit;
pub use configuration::{AdcTime, AveragingCount, Configuration, OperatingMode, OperatingType};
pub use device_id::{DeviceId, ManufacturerId};
pub use mask_enable::MaskEnable;

/// Common behaviour of INA260 register values.
pub trait Register: Copy + Sized {
    /// Address of the register this value belongs to.
    const ADDRESS: RegisterAddress;
    /// Bits that carry no meaning and always read and write as zero.
    const RESERVED_MASK: u16;

    /// Create a value from its raw contents, clearing reserved bits.
    fn from_raw(raw: u16) -> Self;

    /// Raw contents, in host order.
    fn raw(&self) -> u16;

    /// Create a value from raw contents, keeping only the bits set in `mask`.
    ///
    /// Reserved bits are cleared regardless of `mask`.
    fn from_raw_masked(raw: u16, mask: u16) -> Self {
        Self::from_raw(raw & mask)
    }

    /// Raw contents arranged in the chip's byte order.
    ///
    /// The in-memory bytes of the returned integer are the bytes sent on the wire.
    fn device_order(&self) -> u16 {
        reorder::<DeviceOrder, Native, u16>(self.raw())
    }

    /// The bytes of this value as they appear on the wire.
    fn to_device_bytes(&self) -> [u8; REGISTER_WIDTH] {
        self.device_order().to_ne_bytes()
    }

    /// Decode a value from bytes received on the wire.
    fn from_device_bytes(bytes: [u8; REGISTER_WIDTH]) -> Self {
        Self::from_raw(reorder::<Native, DeviceOrder, u16>(u16::from_ne_bytes(bytes)))
    }
}

/// Registers the driver can write, and so keeps a copy of.
pub trait Writable: Register {
    /// The driver's copy of this register.
    fn cached(cache: &RegisterCache) -> Self;

    /// Replace the driver's copy of this register.
    fn store(self, cache: &mut RegisterCache);
}

/// Last successfully written values of the writable registers.
///
/// Until a register is written, its entry holds the value the driver was
/// configured with (the chip's power-on default unless overridden).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegisterCache {
    /// Configuration register (00h).
    pub configuration: Configuration,
    /// Mask/Enable register (06h).
    pub mask_enable: MaskEnable,
    /// Alert limit register (07h).
    pub alert_limit: AlertLimit,
}

impl Writable for Configuration {
    fn cached(cache: &RegisterCache) -> Self {
        cache.configuration
    }

    fn store(self, cache: &mut RegisterCache) {
        cache.configuration = self;
    }
}

impl Writable for MaskEnable {
    fn cached(cache: &RegisterCache) -> Self {
        cache.mask_enable
    }

    fn store(self, cache: &mut RegisterCache) {
        cache.mask_enable = self;
    }
}

impl Writable for AlertLimit {
    fn cached(cache: &RegisterCache) -> Self {
        cache.alert_limit
    }

    fn store(self, cache: &mut RegisterCache) {
        cache.alert_limit = self;
    }
}
