use anyhow::Context;
use ina260::registers::{
    AdcTime, AveragingCount, Configuration, OperatingMode, OperatingType, Register,
};
use ina260::{Ina260, Transport};

#[derive(Debug, clap::Parser)]
#[command(flatten_help = true)]
pub(crate) enum ConfigCommand {
    /// Read the configuration register
    Read,
    /// Change fields of the configuration register, keeping the rest
    Write(ConfigChanges),
}

#[derive(Debug, clap::Args)]
pub(crate) struct ConfigChanges {
    /// Quantities to convert
    #[arg(long = "type", value_enum)]
    operating_type: Option<TypeArg>,
    /// Conversion mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Current conversion time in microseconds (140, 204, 332, 588, 1100, 2116, 4156, 8244)
    #[arg(long, value_parser = parse_adc_time)]
    current_time: Option<AdcTime>,
    /// Voltage conversion time in microseconds
    #[arg(long, value_parser = parse_adc_time)]
    voltage_time: Option<AdcTime>,
    /// Samples averaged per reading (1, 4, 16, 64, 128, 256, 512, 1024)
    #[arg(long, value_parser = parse_averages)]
    averages: Option<AveragingCount>,
    /// Reset the chip to its power-on state
    #[arg(long)]
    reset: bool,
}

impl ConfigChanges {
    fn apply(&self, mut config: Configuration) -> Configuration {
        if let Some(operating_type) = self.operating_type {
            config = config.with_operating_type(operating_type.into());
        }
        if let Some(mode) = self.mode {
            config = config.with_operating_mode(mode.into());
        }
        if let Some(time) = self.current_time {
            config = config.with_current_conversion_time(time);
        }
        if let Some(time) = self.voltage_time {
            config = config.with_voltage_conversion_time(time);
        }
        if let Some(averages) = self.averages {
            config = config.with_averaging(averages);
        }
        config.with_reset(self.reset)
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub(crate) enum TypeArg {
    /// Power-down
    Shutdown,
    /// Current only
    Current,
    /// Voltage only
    Voltage,
    /// Current and voltage
    Power,
}

impl From<TypeArg> for OperatingType {
    fn from(value: TypeArg) -> OperatingType {
        match value {
            TypeArg::Shutdown => OperatingType::Shutdown,
            TypeArg::Current => OperatingType::Current,
            TypeArg::Voltage => OperatingType::Voltage,
            TypeArg::Power => OperatingType::Power,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub(crate) enum ModeArg {
    /// One conversion per configuration write
    Triggered,
    /// Convert continuously
    Continuous,
}

impl From<ModeArg> for OperatingMode {
    fn from(value: ModeArg) -> OperatingMode {
        match value {
            ModeArg::Triggered => OperatingMode::Triggered,
            ModeArg::Continuous => OperatingMode::Continuous,
        }
    }
}

fn parse_adc_time(value: &str) -> Result<AdcTime, String> {
    let micros: u32 = value.parse().map_err(|e| format!("{e}"))?;
    AdcTime::from_micros(micros).ok_or_else(|| {
        let valid: Vec<String> = AdcTime::ALL.iter().map(|t| t.micros().to_string()).collect();
        format!("no conversion time of {micros} µs, expected one of {}", valid.join(", "))
    })
}

fn parse_averages(value: &str) -> Result<AveragingCount, String> {
    let count: u16 = value.parse().map_err(|e| format!("{e}"))?;
    AveragingCount::from_count(count).ok_or_else(|| {
        let valid: Vec<String> = AveragingCount::ALL
            .iter()
            .map(|n| n.count().to_string())
            .collect();
        format!("cannot average {count} samples, expected one of {}", valid.join(", "))
    })
}

pub(crate) fn print_configuration(config: Configuration) {
    println!("configuration:   {:#06X}", config.raw());
    println!("  type:          {:?}", config.operating_type());
    println!("  mode:          {:?}", config.operating_mode());
    println!("  current time:  {} µs", config.current_conversion_time().micros());
    println!("  voltage time:  {} µs", config.voltage_conversion_time().micros());
    println!("  averages:      {}", config.averaging().count());
}

pub(crate) fn action<T: Transport>(
    ina: &mut Ina260<T>,
    command: ConfigCommand,
) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Read => {
            let config = ina.read_configuration().context("reading configuration")?;
            print_configuration(config);
        }
        ConfigCommand::Write(changes) => {
            let current = ina.read_configuration().context("reading configuration")?;
            let updated = changes.apply(current);
            ina.write_configuration(updated)
                .context("writing configuration")?;
            print_configuration(ina.configuration());
        }
    }
    Ok(())
}
