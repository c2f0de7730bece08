use super::Error;

/// HID commands of the MCP2221 that the I2C transport uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum McpCommand {
    /// Poll for the status of the device, cancel an I2C transfer,
    /// or set the I2C bus speed.
    ///
    /// See section 3.1.1 of the datasheet.
    StatusSetParameters,
    /// Request a read from an I2C target.
    ///
    /// The read data is not returned in response to this command, but to the
    /// Get Data command.
    I2cReadData,
    /// Request a read from an I2C target with a repeated START condition.
    I2cReadDataRepeatedStart,
    /// Read requested I2C data back from the MCP2221.
    ///
    /// See section 3.1.10 of the datasheet.
    I2cGetData,
    /// Write data to an I2C target.
    ///
    /// See section 3.1.5 of the datasheet.
    I2cWriteData,
    /// Write data to an I2C target without a STOP condition.
    ///
    /// See section 3.1.7 of the datasheet.
    I2cWriteDataNoStop,
}

impl McpCommand {
    /// Command code written to byte 0 of the outgoing report.
    pub(crate) fn code(&self) -> u8 {
        match self {
            McpCommand::StatusSetParameters => 0x10,
            McpCommand::I2cReadData => 0x91,
            McpCommand::I2cReadDataRepeatedStart => 0x93,
            McpCommand::I2cGetData => 0x40,
            McpCommand::I2cWriteData => 0x90,
            McpCommand::I2cWriteDataNoStop => 0x94,
        }
    }

    /// Check a failure code for command-specific errors.
    ///
    /// The engine busy and engine read codes signal that the command should be
    /// attempted again.
    fn check_error_code(&self, code: u8) -> Result<(), Error> {
        match (code, self) {
            (
                0x01,
                Self::I2cWriteData
                | Self::I2cWriteDataNoStop
                | Self::I2cReadData
                | Self::I2cReadDataRepeatedStart,
            ) => Err(Error::I2cEngineBusy),
            (0x41, Self::I2cGetData) => Err(Error::I2cEngineReadError),
            (_, _) => Ok(()),
        }
    }
}

/// Outgoing 64-byte HID report.
pub(crate) struct UsbReport {
    command: McpCommand,
    /// Report contents as laid out in the datasheet, command code first.
    ///
    /// The bytes written to the device are 65 long, as hidapi requires the
    /// report number to be prepended.
    pub(crate) write_buffer: [u8; 64],
}

impl UsbReport {
    pub(crate) fn new(command: McpCommand) -> Self {
        let mut write_buffer = [0u8; 64];
        write_buffer[0] = command.code();
        Self {
            command,
            write_buffer,
        }
    }

    pub(crate) fn command_code(&self) -> u8 {
        self.write_buffer[0]
    }

    pub(crate) fn report_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[1..65].copy_from_slice(&self.write_buffer);
        out
    }

    /// Check for a command-specific error.
    pub(crate) fn check_error_code(&self, code: u8) -> Result<(), Error> {
        self.command.check_error_code(code)
    }

    /// Write a single data byte in the outgoing report.
    ///
    /// `byte_index` must be in the range `1..=63`; the command code at index 0
    /// cannot be overwritten.
    pub(crate) fn set_data_byte(&mut self, byte_index: usize, value: u8) {
        assert!(byte_index < 64, "Byte index {byte_index} too large.");
        assert!(byte_index != 0, "Cannot write to command byte index.");
        self.write_buffer[byte_index] = value;
    }
}
