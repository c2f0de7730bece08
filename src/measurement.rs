//! Measurement registers and their scale factors.

use crate::constants::RegisterAddress;

/// Quantity measured by the INA260.
///
/// Each quantity is read from its own register as an unsigned 16-bit sample and
/// scaled by a fixed LSB size. Results are in the chip's milli-unit scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    /// Current through the integrated shunt, in milliamps.
    Current,
    /// Bus voltage, in millivolts.
    Voltage,
    /// Power, in milliwatts.
    Power,
}

impl Measurement {
    /// Every measurement, in register order.
    pub const ALL: [Measurement; 3] = [Self::Current, Self::Voltage, Self::Power];

    /// Register holding the most recent sample.
    pub const fn address(self) -> RegisterAddress {
        match self {
            Measurement::Current => RegisterAddress::Current,
            Measurement::Voltage => RegisterAddress::Voltage,
            Measurement::Power => RegisterAddress::Power,
        }
    }

    /// Value of one least-significant bit of the raw sample.
    pub const fn lsb(self) -> f64 {
        match self {
            Measurement::Current => 1.25,
            Measurement::Voltage => 1.25,
            Measurement::Power => 10.0,
        }
    }

    /// Unit label of [`Measurement::scale`] results.
    pub const fn unit(self) -> &'static str {
        match self {
            Measurement::Current => "mA",
            Measurement::Voltage => "mV",
            Measurement::Power => "mW",
        }
    }

    /// Convert a raw sample into the chip's milli-unit scale.
    pub fn scale(self, raw: u16) -> f64 {
        f64::from(raw) * self.lsb()
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Measurement::Current => "current",
            Measurement::Voltage => "voltage",
            Measurement::Power => "power",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_scale_by_lsb() {
        assert_eq!(Measurement::Voltage.scale(100), 125.0);
        assert_eq!(Measurement::Current.scale(8), 10.0);
        assert_eq!(Measurement::Power.scale(3), 30.0);
        assert_eq!(Measurement::Voltage.scale(u16::MAX), 81_918.75);
    }

    #[test]
    fn measurements_map_to_data_registers() {
        assert_eq!(Measurement::Current.address().addr(), 0x01);
        assert_eq!(Measurement::Voltage.address().addr(), 0x02);
        assert_eq!(Measurement::Power.address().addr(), 0x03);
    }
}
