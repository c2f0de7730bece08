use anyhow::{Context, bail};
use ina260::registers::{AlertLimit, MaskEnable, Register};
use ina260::{Ina260, Measurement, Transport};

#[derive(Debug, clap::Parser)]
#[command(flatten_help = true)]
pub(crate) enum AlertCommand {
    /// Read the Mask/Enable and alert limit registers
    Read,
    /// Change the alert function, pin behaviour or limit
    Write(AlertChanges),
}

#[derive(Debug, clap::Args)]
pub(crate) struct AlertChanges {
    /// Condition that asserts the alert pin
    #[arg(long, value_enum)]
    function: Option<AlertFunction>,
    /// Limit as a raw register value
    #[arg(short, long, conflicts_with = "value")]
    limit: Option<u16>,
    /// Limit in mA, mV or mW, depending on the alert function
    #[arg(long)]
    value: Option<f64>,
    /// Keep the alert pin asserted until the Mask/Enable register is read
    #[arg(long)]
    latch: Option<bool>,
    /// Make the alert pin active-high
    #[arg(long)]
    active_high: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum AlertFunction {
    /// No alert
    None,
    /// Current above the limit
    OverCurrent,
    /// Current below the limit
    UnderCurrent,
    /// Bus voltage above the limit
    OverVoltage,
    /// Bus voltage below the limit
    UnderVoltage,
    /// Power above the limit
    OverPower,
    /// Conversion complete
    ConversionReady,
}

impl AlertFunction {
    /// The enabled function, taking the most significant if several are set,
    /// as the chip does.
    fn of(mask: MaskEnable) -> Self {
        if mask.over_current() {
            Self::OverCurrent
        } else if mask.under_current() {
            Self::UnderCurrent
        } else if mask.over_voltage() {
            Self::OverVoltage
        } else if mask.under_voltage() {
            Self::UnderVoltage
        } else if mask.over_power() {
            Self::OverPower
        } else if mask.alert_conversion_ready() {
            Self::ConversionReady
        } else {
            Self::None
        }
    }

    /// The measurement the limit is compared with.
    fn measurement(self) -> Option<Measurement> {
        match self {
            Self::OverCurrent | Self::UnderCurrent => Some(Measurement::Current),
            Self::OverVoltage | Self::UnderVoltage => Some(Measurement::Voltage),
            Self::OverPower => Some(Measurement::Power),
            Self::None | Self::ConversionReady => None,
        }
    }

    /// `mask` with only this function enabled.
    fn apply(self, mask: MaskEnable) -> MaskEnable {
        mask.with_over_current(self == Self::OverCurrent)
            .with_under_current(self == Self::UnderCurrent)
            .with_over_voltage(self == Self::OverVoltage)
            .with_under_voltage(self == Self::UnderVoltage)
            .with_over_power(self == Self::OverPower)
            .with_alert_conversion_ready(self == Self::ConversionReady)
    }
}

fn print_alert(mask: MaskEnable, limit: AlertLimit) {
    let function = AlertFunction::of(mask);
    println!("mask/enable:     {:#06X}", mask.raw());
    println!("  function:      {function:?}");
    println!("  latch:         {}", mask.alert_latch_enable());
    println!("  active high:   {}", mask.alert_polarity());
    println!("  alert flag:    {}", mask.alert_function_flag());
    println!("  ready flag:    {}", mask.conversion_ready());
    println!("  overflow:      {}", mask.math_overflow());
    match function.measurement() {
        Some(m) => println!("alert limit:     {} ({} {})", limit.limit(), limit.scaled(m), m.unit()),
        None => println!("alert limit:     {}", limit.limit()),
    }
}

pub(crate) fn action<T: Transport>(ina: &mut Ina260<T>, command: AlertCommand) -> anyhow::Result<()> {
    match command {
        AlertCommand::Read => {
            let mask = ina.read_mask_enable().context("reading Mask/Enable")?;
            let limit = ina.read_alert_limit().context("reading alert limit")?;
            print_alert(mask, limit);
        }
        AlertCommand::Write(changes) => {
            let mut mask = ina.read_mask_enable().context("reading Mask/Enable")?;
            if let Some(function) = changes.function {
                mask = function.apply(mask);
            }
            if let Some(latch) = changes.latch {
                mask = mask.with_alert_latch_enable(latch);
            }
            if let Some(active_high) = changes.active_high {
                mask = mask.with_alert_polarity(active_high);
            }

            let limit = match (changes.limit, changes.value) {
                (Some(raw), _) => Some(AlertLimit::new(raw)),
                (None, Some(value)) => {
                    let Some(measurement) = AlertFunction::of(mask).measurement() else {
                        bail!("--value needs an over/under alert function to give it a unit");
                    };
                    Some(AlertLimit::from_scaled(measurement, value))
                }
                (None, None) => None,
            };

            if let Some(limit) = limit {
                ina.write_alert_limit(limit).context("writing alert limit")?;
            }
            ina.write_mask_enable(mask).context("writing Mask/Enable")?;
            print_alert(ina.mask_enable(), ina.alert_limit());
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn one_function_at_a_time() {
        let mask = AlertFunction::OverPower.apply(MaskEnable::new().with_under_voltage(true));
        assert_eq!(AlertFunction::of(mask), AlertFunction::OverPower);
        assert!(!mask.under_voltage());
        assert_eq!(AlertFunction::None.apply(mask), MaskEnable::new());
    }

    #[test]
    fn most_significant_function_wins() {
        let mask = MaskEnable::new().with_over_power(true).with_under_current(true);
        assert_eq!(AlertFunction::of(mask), AlertFunction::UnderCurrent);
        assert_eq!(
            AlertFunction::of(mask).measurement(),
            Some(Measurement::Current)
        );
    }
}
