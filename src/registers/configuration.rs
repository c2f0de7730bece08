//! Configuration register (00h).

use bit_field::BitField;

use super::Register;
use crate::constants::RegisterAddress;

/// Which quantities are converted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingType {
    /// Power-down; no conversions.
    Shutdown,
    /// Shunt current only.
    Current,
    /// Bus voltage only.
    Voltage,
    /// Current and bus voltage (factory default).
    #[default]
    Power,
}

#[doc(hidden)]
impl From<u16> for OperatingType {
    fn from(value: u16) -> Self {
        assert!(value <= 0b11, "Invalid bit pattern for operating type");
        match value {
            0b00 => Self::Shutdown,
            0b01 => Self::Current,
            0b10 => Self::Voltage,
            0b11 => Self::Power,
            _ => unreachable!("Precondition assert covers > 3."),
        }
    }
}

#[doc(hidden)]
impl From<OperatingType> for u16 {
    fn from(value: OperatingType) -> Self {
        match value {
            OperatingType::Shutdown => 0b00,
            OperatingType::Current => 0b01,
            OperatingType::Voltage => 0b10,
            OperatingType::Power => 0b11,
        }
    }
}

/// When conversions happen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingMode {
    /// One conversion per write to the configuration register.
    Triggered,
    /// Conversions repeat until the mode is changed (factory default).
    #[default]
    Continuous,
}

#[doc(hidden)]
impl From<bool> for OperatingMode {
    fn from(value: bool) -> Self {
        if value { Self::Continuous } else { Self::Triggered }
    }
}

#[doc(hidden)]
impl From<OperatingMode> for bool {
    fn from(value: OperatingMode) -> Self {
        match value {
            OperatingMode::Triggered => false,
            OperatingMode::Continuous => true,
        }
    }
}

/// ADC conversion time, shared by the current and voltage settings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdcTime {
    /// 140 µs.
    Us140,
    /// 204 µs.
    Us204,
    /// 332 µs.
    Us332,
    /// 588 µs.
    Us588,
    /// 1.1 ms (factory default).
    #[default]
    Ms1_1,
    /// 2.116 ms.
    Ms2_116,
    /// 4.156 ms.
    Ms4_156,
    /// 8.244 ms.
    Ms8_244,
}

impl AdcTime {
    /// Every conversion time, shortest first.
    pub const ALL: [AdcTime; 8] = [
        Self::Us140,
        Self::Us204,
        Self::Us332,
        Self::Us588,
        Self::Ms1_1,
        Self::Ms2_116,
        Self::Ms4_156,
        Self::Ms8_244,
    ];

    /// Conversion time in microseconds.
    pub const fn micros(self) -> u32 {
        match self {
            AdcTime::Us140 => 140,
            AdcTime::Us204 => 204,
            AdcTime::Us332 => 332,
            AdcTime::Us588 => 588,
            AdcTime::Ms1_1 => 1_100,
            AdcTime::Ms2_116 => 2_116,
            AdcTime::Ms4_156 => 4_156,
            AdcTime::Ms8_244 => 8_244,
        }
    }

    /// The conversion time lasting exactly `micros` microseconds, if there is one.
    pub fn from_micros(micros: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.micros() == micros)
    }
}

#[doc(hidden)]
impl From<u16> for AdcTime {
    fn from(value: u16) -> Self {
        assert!(value <= 0b111, "Invalid bit pattern for conversion time");
        Self::ALL[value as usize]
    }
}

#[doc(hidden)]
impl From<AdcTime> for u16 {
    fn from(value: AdcTime) -> Self {
        value as u16
    }
}

/// Number of samples averaged into each reported measurement.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AveragingCount {
    /// 1 sample (factory default).
    #[default]
    N1,
    /// 4 samples.
    N4,
    /// 16 samples.
    N16,
    /// 64 samples.
    N64,
    /// 128 samples.
    N128,
    /// 256 samples.
    N256,
    /// 512 samples.
    N512,
    /// 1024 samples.
    N1024,
}

impl AveragingCount {
    /// Every averaging count, smallest first.
    pub const ALL: [AveragingCount; 8] = [
        Self::N1,
        Self::N4,
        Self::N16,
        Self::N64,
        Self::N128,
        Self::N256,
        Self::N512,
        Self::N1024,
    ];

    /// Number of samples averaged.
    pub const fn count(self) -> u16 {
        match self {
            AveragingCount::N1 => 1,
            AveragingCount::N4 => 4,
            AveragingCount::N16 => 16,
            AveragingCount::N64 => 64,
            AveragingCount::N128 => 128,
            AveragingCount::N256 => 256,
            AveragingCount::N512 => 512,
            AveragingCount::N1024 => 1024,
        }
    }

    /// The setting averaging exactly `count` samples, if there is one.
    pub fn from_count(count: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.count() == count)
    }
}

#[doc(hidden)]
impl From<u16> for AveragingCount {
    fn from(value: u16) -> Self {
        assert!(value <= 0b111, "Invalid bit pattern for averaging count");
        Self::ALL[value as usize]
    }
}

#[doc(hidden)]
impl From<AveragingCount> for u16 {
    fn from(value: AveragingCount) -> Self {
        value as u16
    }
}

/// Contents of the configuration register.
///
/// | Bits   | Field                    |
/// |--------|--------------------------|
/// | 0..=1  | [`OperatingType`]        |
/// | 2      | [`OperatingMode`]        |
/// | 3..=5  | current conversion time  |
/// | 6..=8  | voltage conversion time  |
/// | 9..=11 | [`AveragingCount`]       |
/// | 12..=14| reserved                 |
/// | 15     | reset                    |
///
/// The chip reports `0x6127` at power-on; bits 13 and 14 are reserved and
/// dropped here, so the default value is `0x0127`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Configuration {
    raw: u16,
}

impl Configuration {
    /// Create a configuration from its fields. Reserved bits are zero.
    pub fn new(
        operating_type: OperatingType,
        operating_mode: OperatingMode,
        current_time: AdcTime,
        voltage_time: AdcTime,
        averaging: AveragingCount,
        reset: bool,
    ) -> Self {
        let mut raw = 0u16;
        raw.set_bits(0..=1, operating_type.into());
        raw.set_bit(2, operating_mode.into());
        raw.set_bits(3..=5, current_time.into());
        raw.set_bits(6..=8, voltage_time.into());
        raw.set_bits(9..=11, averaging.into());
        raw.set_bit(15, reset);
        Self { raw }
    }

    /// Which quantities are converted.
    pub fn operating_type(&self) -> OperatingType {
        self.raw.get_bits(0..=1).into()
    }

    /// Whether conversions are triggered or continuous.
    pub fn operating_mode(&self) -> OperatingMode {
        self.raw.get_bit(2).into()
    }

    /// Conversion time of the current measurement.
    pub fn current_conversion_time(&self) -> AdcTime {
        self.raw.get_bits(3..=5).into()
    }

    /// Conversion time of the bus voltage measurement.
    pub fn voltage_conversion_time(&self) -> AdcTime {
        self.raw.get_bits(6..=8).into()
    }

    /// Number of samples averaged per measurement.
    pub fn averaging(&self) -> AveragingCount {
        self.raw.get_bits(9..=11).into()
    }

    /// Whether the reset bit is set. Writing a set reset bit restores every
    /// register to its power-on value.
    pub fn reset(&self) -> bool {
        self.raw.get_bit(15)
    }

    /// Copy with a different operating type.
    pub fn with_operating_type(mut self, operating_type: OperatingType) -> Self {
        self.raw.set_bits(0..=1, operating_type.into());
        self
    }

    /// Copy with a different operating mode.
    pub fn with_operating_mode(mut self, operating_mode: OperatingMode) -> Self {
        self.raw.set_bit(2, operating_mode.into());
        self
    }

    /// Copy with a different current conversion time.
    pub fn with_current_conversion_time(mut self, time: AdcTime) -> Self {
        self.raw.set_bits(3..=5, time.into());
        self
    }

    /// Copy with a different voltage conversion time.
    pub fn with_voltage_conversion_time(mut self, time: AdcTime) -> Self {
        self.raw.set_bits(6..=8, time.into());
        self
    }

    /// Copy with a different averaging count.
    pub fn with_averaging(mut self, averaging: AveragingCount) -> Self {
        self.raw.set_bits(9..=11, averaging.into());
        self
    }

    /// Copy with the reset bit set or cleared.
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.raw.set_bit(15, reset);
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new(
            OperatingType::default(),
            OperatingMode::default(),
            AdcTime::default(),
            AdcTime::default(),
            AveragingCount::default(),
            false,
        )
    }
}

impl Register for Configuration {
    const ADDRESS: RegisterAddress = RegisterAddress::Configuration;
    const RESERVED_MASK: u16 = 0x7000;

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
    fn default_matches_power_on_value() {
        assert_eq!(Configuration::default().raw(), 0x0127);
        assert_eq!(Configuration::from_raw(0x6127), Configuration::default());
    }

    #[test]
    fn fields_survive_raw_round_trip() {
        for operating_type in [
            OperatingType::Shutdown,
            OperatingType::Current,
            OperatingType::Voltage,
            OperatingType::Power,
        ] {
            for mode in [OperatingMode::Triggered, OperatingMode::Continuous] {
                for (ctime, vtime) in AdcTime::ALL.into_iter().zip(AdcTime::ALL.into_iter().rev()) {
                    for averaging in AveragingCount::ALL {
                        for reset in [false, true] {
                            let config =
                                Configuration::new(operating_type, mode, ctime, vtime, averaging, reset);
                            assert_eq!(config.raw() & Configuration::RESERVED_MASK, 0);

                            let decoded = Configuration::from_raw(config.raw());
                            assert_eq!(decoded.operating_type(), operating_type);
                            assert_eq!(decoded.operating_mode(), mode);
                            assert_eq!(decoded.current_conversion_time(), ctime);
                            assert_eq!(decoded.voltage_conversion_time(), vtime);
                            assert_eq!(decoded.averaging(), averaging);
                            assert_eq!(decoded.reset(), reset);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn field_layout() {
        let config = Configuration::new(
            OperatingType::Voltage,
            OperatingMode::Triggered,
            AdcTime::Ms8_244,
            AdcTime::Us140,
            AveragingCount::N1024,
            true,
        );
        assert_eq!(config.raw(), 0b1000_1110_0011_1010);
    }

    #[test]
    fn with_methods_change_one_field() {
        let base = Configuration::default();
        let changed = base.with_averaging(AveragingCount::N64);
        assert_eq!(changed.averaging(), AveragingCount::N64);
        assert_eq!(changed.operating_type(), base.operating_type());
        assert_eq!(changed.current_conversion_time(), base.current_conversion_time());
        assert_eq!(changed.raw() & !(0b111 << 9), base.raw());
        assert_eq!(base.raw(), 0x0127, "original left untouched");
    }

    #[test]
    fn equality_is_raw_equality() {
        let a = Configuration::from_raw(0x4127);
        let b = Configuration::from_raw(0x2127);
        assert_eq!(a, b);
        assert_ne!(a, a.with_reset(true));
    }

    #[test]
    fn lookup_by_physical_value() {
        assert_eq!(AdcTime::from_micros(588), Some(AdcTime::Us588));
        assert_eq!(AdcTime::from_micros(600), None);
        assert_eq!(AveragingCount::from_count(256), Some(AveragingCount::N256));
        assert_eq!(AveragingCount::from_count(3), None);
    }
}
