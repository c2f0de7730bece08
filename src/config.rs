//! Driver construction settings.

use crate::constants::{DEFAULT_ADDRESS, DEFAULT_FREQUENCY};
use crate::registers::{AlertLimit, Configuration, MaskEnable};

/// Settings used to construct an [`Ina260`](crate::Ina260) driver.
///
/// Every field has a documented default, so a configuration is built by
/// starting from [`DeviceConfig::new`] and changing only what differs:
///
/// ```
/// use ina260::DeviceConfig;
///
/// let config = *DeviceConfig::new().with_address(0x45).with_frequency(400_000);
/// assert_eq!(config.address, 0x45);
/// assert_eq!(config.frequency, 400_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// I2C device address. Default `0x40`.
    ///
    /// Masked to 7 bits by the driver.
    pub address: u8,
    /// Requested bus frequency in Hz. Default 100 kHz.
    ///
    /// Rounded up by the driver to the nearest supported bus speed.
    pub frequency: u32,
    /// Initial copy of the configuration register. Default is the power-on value.
    pub configuration: Configuration,
    /// Initial copy of the Mask/Enable register. Default is all clear.
    pub mask_enable: MaskEnable,
    /// Initial copy of the alert limit register. Default is zero.
    pub alert_limit: AlertLimit,
}

impl DeviceConfig {
    /// Create a configuration with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the device address.
    pub fn with_address(&mut self, address: u8) -> &mut Self {
        self.address = address;
        self
    }

    /// Change the requested bus frequency.
    pub fn with_frequency(&mut self, frequency: u32) -> &mut Self {
        self.frequency = frequency;
        self
    }

    /// Change the initial configuration register copy.
    pub fn with_configuration(&mut self, configuration: Configuration) -> &mut Self {
        self.configuration = configuration;
        self
    }

    /// Change the initial Mask/Enable register copy.
    pub fn with_mask_enable(&mut self, mask_enable: MaskEnable) -> &mut Self {
        self.mask_enable = mask_enable;
        self
    }

    /// Change the initial alert limit register copy.
    pub fn with_alert_limit(&mut self, alert_limit: AlertLimit) -> &mut Self {
        self.alert_limit = alert_limit;
        self
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            frequency: DEFAULT_FREQUENCY,
            configuration: Configuration::default(),
            mask_enable: MaskEnable::default(),
            alert_limit: AlertLimit::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{AveragingCount, Register};

    #[test]
    fn defaults() {
        let config = DeviceConfig::new();
        assert_eq!(config.address, 0x40);
        assert_eq!(config.frequency, 100_000);
        assert_eq!(config.configuration.raw(), 0x0127);
        assert_eq!(config.mask_enable.raw(), 0);
        assert_eq!(config.alert_limit.raw(), 0);
    }

    #[test]
    fn builder_changes_only_named_fields() {
        let configuration = Configuration::default().with_averaging(AveragingCount::N16);
        let config = *DeviceConfig::new()
            .with_configuration(configuration)
            .with_alert_limit(AlertLimit::new(42));
        assert_eq!(config.configuration, configuration);
        assert_eq!(config.alert_limit.limit(), 42);
        assert_eq!(config.address, DEFAULT_ADDRESS);
        assert_eq!(config.mask_enable, MaskEnable::default());
    }
}
