//! Mask/Enable register (06h).

use bit_field::BitField;

use super::Register;
use crate::constants::RegisterAddress;

/// Contents of the Mask/Enable register: alert function selection, alert pin
/// behaviour and status flags.
///
/// Only one alert function should be enabled at a time; if several are set the
/// chip uses the most significant one. The math overflow, conversion ready and
/// alert function flags are reported by the chip and ignored on write.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskEnable {
    raw: u16,
}

impl MaskEnable {
    const ALERT_LATCH_ENABLE: usize = 0;
    const ALERT_POLARITY: usize = 1;
    const MATH_OVERFLOW: usize = 2;
    const CONVERSION_READY: usize = 3;
    const ALERT_FUNCTION_FLAG: usize = 4;
    const ALERT_CONVERSION_READY: usize = 10;
    const OVER_POWER: usize = 11;
    const UNDER_VOLTAGE: usize = 12;
    const OVER_VOLTAGE: usize = 13;
    const UNDER_CURRENT: usize = 14;
    const OVER_CURRENT: usize = 15;

    /// Create an empty value: no alert functions, transparent active-low alert pin.
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self, bit: usize) -> bool {
        self.raw.get_bit(bit)
    }

    fn with_flag(mut self, bit: usize, value: bool) -> Self {
        self.raw.set_bit(bit, value);
        self
    }

    /// Alert pin stays asserted until the register is read.
    pub fn alert_latch_enable(&self) -> bool {
        self.flag(Self::ALERT_LATCH_ENABLE)
    }

    /// Alert pin is active-high (inverted).
    pub fn alert_polarity(&self) -> bool {
        self.flag(Self::ALERT_POLARITY)
    }

    /// A power calculation overflowed.
    pub fn math_overflow(&self) -> bool {
        self.flag(Self::MATH_OVERFLOW)
    }

    /// A conversion has completed since the register was last read.
    pub fn conversion_ready(&self) -> bool {
        self.flag(Self::CONVERSION_READY)
    }

    /// The enabled alert function caused the alert.
    pub fn alert_function_flag(&self) -> bool {
        self.flag(Self::ALERT_FUNCTION_FLAG)
    }

    /// Alert when a conversion completes.
    pub fn alert_conversion_ready(&self) -> bool {
        self.flag(Self::ALERT_CONVERSION_READY)
    }

    /// Alert when power exceeds the limit.
    pub fn over_power(&self) -> bool {
        self.flag(Self::OVER_POWER)
    }

    /// Alert when bus voltage drops below the limit.
    pub fn under_voltage(&self) -> bool {
        self.flag(Self::UNDER_VOLTAGE)
    }

    /// Alert when bus voltage exceeds the limit.
    pub fn over_voltage(&self) -> bool {
        self.flag(Self::OVER_VOLTAGE)
    }

    /// Alert when current drops below the limit.
    pub fn under_current(&self) -> bool {
        self.flag(Self::UNDER_CURRENT)
    }

    /// Alert when current exceeds the limit.
    pub fn over_current(&self) -> bool {
        self.flag(Self::OVER_CURRENT)
    }

    /// Copy with latching enabled or disabled.
    pub fn with_alert_latch_enable(self, v: bool) -> Self {
        self.with_flag(Self::ALERT_LATCH_ENABLE, v)
    }

    /// Copy with the alert pin polarity changed.
    pub fn with_alert_polarity(self, v: bool) -> Self {
        self.with_flag(Self::ALERT_POLARITY, v)
    }

    /// Copy with the math overflow flag changed.
    pub fn with_math_overflow(self, v: bool) -> Self {
        self.with_flag(Self::MATH_OVERFLOW, v)
    }

    /// Copy with the conversion ready flag changed.
    pub fn with_conversion_ready(self, v: bool) -> Self {
        self.with_flag(Self::CONVERSION_READY, v)
    }

    /// Copy with the alert function flag changed.
    pub fn with_alert_function_flag(self, v: bool) -> Self {
        self.with_flag(Self::ALERT_FUNCTION_FLAG, v)
    }

    /// Copy with the conversion-ready alert enabled or disabled.
    pub fn with_alert_conversion_ready(self, v: bool) -> Self {
        self.with_flag(Self::ALERT_CONVERSION_READY, v)
    }

    /// Copy with the over-power alert enabled or disabled.
    pub fn with_over_power(self, v: bool) -> Self {
        self.with_flag(Self::OVER_POWER, v)
    }

    /// Copy with the under-voltage alert enabled or disabled.
    pub fn with_under_voltage(self, v: bool) -> Self {
        self.with_flag(Self::UNDER_VOLTAGE, v)
    }

    /// Copy with the over-voltage alert enabled or disabled.
    pub fn with_over_voltage(self, v: bool) -> Self {
        self.with_flag(Self::OVER_VOLTAGE, v)
    }

    /// Copy with the under-current alert enabled or disabled.
    pub fn with_under_current(self, v: bool) -> Self {
        self.with_flag(Self::UNDER_CURRENT, v)
    }

    /// Copy with the over-current alert enabled or disabled.
    pub fn with_over_current(self, v: bool) -> Self {
        self.with_flag(Self::OVER_CURRENT, v)
    }
}

impl Register for MaskEnable {
    const ADDRESS: RegisterAddress = RegisterAddress::MaskEnable;
    const RESERVED_MASK: u16 = 0x03E0;

    fn from_raw(raw: u16) -> Self {
        Self {
            raw: raw & !Self::RESERVED_MASK,
        }
    }

    fn raw(&self) -> u16 {
        self.raw
    }
}
