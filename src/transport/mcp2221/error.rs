use embedded_hal::i2c::{self, NoAcknowledgeSource};
use thiserror::Error;

/// Problems when talking to an I2C target through the MCP2221.
#[derive(Debug, Error)]
pub enum Error {
    /// A HID command did not complete successfully.
    ///
    /// The enclosed `u8` is the value the MCP2221 returned in place of the
    /// success code (0).
    #[error("MCP2221 command failed with status {0:#04X}")]
    CommandFailed(u8),
    /// The command code echoed by the MCP2221 was not the one written to it.
    #[error("MCP2221 echoed command {received:#04X}, expected {sent:#04X}")]
    MismatchedCommandCodeEcho {
        /// Command code sent to the MCP2221.
        sent: u8,
        /// Command code echoed from the MCP2221.
        received: u8,
    },
    /// A USB report was not written or read in full.
    #[error("USB report truncated to {0} bytes")]
    ShortReport(usize),
    /// The I2C engine was busy and did not accept the command.
    ///
    /// The transport retries this itself before reporting it.
    #[error("I2C engine busy")]
    I2cEngineBusy,
    /// The I2C engine had no data ready for a Get Data command.
    #[error("error reading from the I2C engine")]
    I2cEngineReadError,
    /// The target did not acknowledge its address.
    #[error("I2C target did not acknowledge its address")]
    I2cAddressNack,
    /// Zero-length transfers are refused, as they can lock up the bus.
    #[error("empty I2C transfer")]
    I2cTransferEmpty,
    /// The MCP2221 cannot transfer more than 65,535 bytes at once.
    #[error("I2C transfer longer than 65,535 bytes")]
    I2cTransferTooLong,
    /// A transfer in progress prevented the bus speed from being changed.
    #[error("I2C transfer in progress prevented the bus speed change")]
    I2cCouldNotChangeSpeed,
    /// The requested bus speed is outside what the MCP2221's clock divider
    /// can produce.
    #[error("bus speed {0} Hz not supported by the MCP2221")]
    I2cUnsupportedSpeed(u32),
    /// The operations passed to `I2c::transaction` include a read followed by
    /// a write, which the MCP2221 has no command for.
    #[error("unsupported I2C transaction shape")]
    I2cUnsupportedTransaction,
    /// The MCP2221 gave a response this driver does not understand.
    #[error("unexpected MCP2221 response byte {0:#04X}")]
    UnexpectedResponse(u8),
    /// The USB device could not be opened or communicated with.
    #[error(transparent)]
    HidApi(#[from] hidapi::HidError),
}

impl i2c::Error for Error {
    fn kind(&self) -> i2c::ErrorKind {
        // The MCP2221 does not report enough to distinguish the other kinds.
        match self {
            Error::I2cAddressNack => i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            _ => i2c::ErrorKind::Other,
        }
    }
}
