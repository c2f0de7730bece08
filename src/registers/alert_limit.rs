//! Alert limit register (07h).

use super::Register;
use crate::constants::RegisterAddress;
use crate::measurement::Measurement;

/// Contents of the alert limit register.
///
/// The limit is compared against whichever measurement the enabled alert
/// function in [`MaskEnable`](super::MaskEnable) refers to, in that
/// measurement's raw LSB units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertLimit {
    raw: u16,
}

impl AlertLimit {
    /// Create a limit from a raw register value.
    pub fn new(limit: u16) -> Self {
        Self { raw: limit }
    }

    /// Create the limit closest to `value`, given in `measurement`'s milli-unit
    /// scale. Values outside the register range saturate.
    pub fn from_scaled(measurement: Measurement, value: f64) -> Self {
        // Float to int `as` casts saturate and map NaN to zero.
        Self::new((value / measurement.lsb()).round() as u16)
    }

    /// The raw limit.
    pub fn limit(&self) -> u16 {
        self.raw
    }

    /// The limit expressed in `measurement`'s milli-unit scale.
    pub fn scaled(&self, measurement: Measurement) -> f64 {
        measurement.scale(self.raw)
    }

    /// Copy with a different limit.
    pub fn with_limit(self, limit: u16) -> Self {
        Self::new(limit)
    }
}

impl Register for AlertLimit {
    const ADDRESS: RegisterAddress = RegisterAddress::AlertLimit;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_uses_every_bit() {
        assert_eq!(AlertLimit::from_raw(0xFFFF).limit(), 0xFFFF);
        assert_eq!(AlertLimit::new(0x8001).to_device_bytes(), [0x80, 0x01]);
    }

    #[test]
    fn scaled_limits() {
        let limit = AlertLimit::from_scaled(Measurement::Voltage, 12_000.0);
        assert_eq!(limit.limit(), 9_600);
        assert_eq!(limit.scaled(Measurement::Voltage), 12_000.0);
        assert_eq!(AlertLimit::from_scaled(Measurement::Power, 1e9).limit(), u16::MAX);
        assert_eq!(AlertLimit::from_scaled(Measurement::Current, -5.0).limit(), 0);
    }
}
