//! Identification registers (FEh, FFh).

use bit_field::BitField;

use super::Register;
use crate::constants::{DEVICE_ID, DEVICE_REVISION, MANUFACTURER_ID, REGISTER_WIDTH, RegisterAddress};

/// Contents of the DEVICE_ID register: a 12-bit device identifier in bits
/// 4..=15 and a 4-bit die revision in bits 0..=3.
///
/// The default value is the identity an INA260 is expected to report.
///
/// A `DeviceId` can be compared directly with the two bytes read from the bus.
/// That comparison is made in the chip's byte order without decoding the bytes,
/// so it does not depend on any host-side byte-order conversion:
///
/// ```
/// use ina260::registers::DeviceId;
///
/// assert!(DeviceId::default() == [0x22, 0x70]);
/// assert!(DeviceId::default() != [0x70, 0x22]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId {
    raw: u16,
}

impl DeviceId {
    /// Create an identity from its fields.
    ///
    /// # Panics
    ///
    /// `revision` must fit in 4 bits and `device_id` in 12 bits.
    pub fn new(revision: u8, device_id: u16) -> Self {
        let mut raw = 0u16;
        raw.set_bits(0..=3, revision.into());
        raw.set_bits(4..=15, device_id);
        Self { raw }
    }

    /// Die revision.
    pub fn revision(&self) -> u8 {
        // Four bits always fit.
        self.raw.get_bits(0..=3) as u8
    }

    /// Device identifier.
    pub fn device_id(&self) -> u16 {
        self.raw.get_bits(4..=15)
    }

    /// Copy with a different revision. Same precondition as [`DeviceId::new`].
    pub fn with_revision(mut self, revision: u8) -> Self {
        self.raw.set_bits(0..=3, revision.into());
        self
    }

    /// Copy with a different device identifier. Same precondition as [`DeviceId::new`].
    pub fn with_device_id(mut self, device_id: u16) -> Self {
        self.raw.set_bits(4..=15, device_id);
        self
    }

    /// Whether this is the identity of an INA260, ignoring the revision.
    pub fn is_ina260(&self) -> bool {
        self.device_id() == DEVICE_ID
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new(DEVICE_REVISION, DEVICE_ID)
    }
}

impl PartialEq<[u8; REGISTER_WIDTH]> for DeviceId {
    fn eq(&self, wire: &[u8; REGISTER_WIDTH]) -> bool {
        self.to_device_bytes()
            .iter()
            .zip(wire.iter())
            .all(|(expected, received)| expected == received)
    }
}

impl Register for DeviceId {
    const ADDRESS: RegisterAddress = RegisterAddress::DeviceId;
    const RESERVED_MASK: u16 = 0x0000;

    fn from_raw(raw: u16) -> Self {
        Self {
            raw: raw & !Self::RESERVED_MASK,
        }
    }

    fn raw(&self) -> u16 {
        self.raw
    }
}

/// Contents of the read-only MANUFACTURER_ID register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManufacturerId {
    raw: u16,
}

impl ManufacturerId {
    /// Whether the register reads "TI", as every INA260 does.
    pub fn is_texas_instruments(&self) -> bool {
        self.raw == MANUFACTURER_ID
    }

    /// The identifier as two ASCII characters, most significant first.
    pub fn chars(&self) -> [char; 2] {
        let [high, low] = self.raw.to_be_bytes();
        [high as char, low as char]
    }
}

impl Default for ManufacturerId {
    fn default() -> Self {
        Self { raw: MANUFACTURER_ID }
    }
}

impl std::fmt::Display for ManufacturerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [high, low] = self.chars();
        write!(f, "{high}{low}")
    }
}

impl Register for ManufacturerId {
    const ADDRESS: RegisterAddress = RegisterAddress::ManufacturerId;
    const RESERVED_MASK: u16 = 0x0000;

    fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    fn raw(&self) -> u16 {
        self.raw
    }
}
