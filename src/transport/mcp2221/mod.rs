//! INA260 access through a Microchip MCP2221 USB-to-I2C bridge.
//!
//! The MCP2221 is a USB HID device. Every operation is a 64-byte report sent
//! to it, answered by a 64-byte report echoing the command code and a status
//! byte. I2C transfers are requested with one command and, for reads, collected
//! with further Get Data commands.
//!
//! [`Mcp2221`] implements both [`Transport`] and [`embedded_hal::i2c::I2c`], so
//! it can drive an [`Ina260`](crate::Ina260) directly or through
//! [`I2cTransport`](super::I2cTransport).
use std::time::Duration;

use hidapi::{HidApi, HidDevice};
use tracing::debug;

use super::Transport;
use commands::{McpCommand, UsbReport};

mod commands;
mod eh;
mod error;
mod status;

pub use error::Error;
pub use status::{Revision, Status};

/// Default USB vendor ID of the MCP2221 (Microchip).
pub const MICROCHIP_VID: u16 = 0x04D8;
/// Default USB product ID of the MCP2221 and MCP2221A.
pub const MCP2221_PID: u16 = 0x00DD;

const COMMAND_SUCCESS: u8 = 0x00;
/// Largest possible I2C transfer, plus one.
const MAX_I2C_TRANSFER_PLUS_1: usize = u16::MAX as usize + 1;
/// Data bytes carried by one I2C write report.
const WRITE_CHUNK: usize = 60;
/// Attempts made while the I2C engine reports itself busy.
const MAX_RETRIES: u8 = 20;
const RETRY_DELAY: Duration = Duration::from_millis(2);

/// Lowest bus speed the MCP2221 clock divider can produce, in Hz.
pub const MIN_BUS_SPEED: u32 = 47_000;
/// Highest bus speed the MCP2221 supports, in Hz.
pub const MAX_BUS_SPEED: u32 = 400_000;

/// Clock divider for the Status/Set Parameters command giving `frequency`.
///
/// # Errors
///
/// [`Error::I2cUnsupportedSpeed`] if `frequency` is outside
/// [`MIN_BUS_SPEED`]`..=`[`MAX_BUS_SPEED`].
pub fn clock_divider(frequency: u32) -> Result<u8, Error> {
    // 12 MHz internal clock.
    const MCP_CLOCK: u32 = 12_000_000;
    if !(MIN_BUS_SPEED..=MAX_BUS_SPEED).contains(&frequency) {
        return Err(Error::I2cUnsupportedSpeed(frequency));
    }
    // The `-2` is from Note 1 in table 3-1 of the datasheet.
    u8::try_from(MCP_CLOCK / frequency - 2).map_err(|_| Error::I2cUnsupportedSpeed(frequency))
}

/// Result of asking the MCP2221 to cancel an I2C transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelTransferResponse {
    /// The transfer was marked for cancellation.
    MarkedForCancellation,
    /// The engine was idle, so nothing was cancelled.
    NoTransfer,
    /// The transfer was cancelled.
    Done,
}

/// MCP2221 USB-to-I2C bridge with a single INA260 (or other target) behind it.
///
/// # Quick start
///
/// ```no_run
/// use ina260::transport::mcp2221::Mcp2221;
/// use ina260::{DeviceConfig, Ina260};
///
/// let bridge = Mcp2221::connect()?;
/// let mut ina = Ina260::new(bridge, &DeviceConfig::new());
/// if ina.initialize() && ina.check_ready() {
///     println!("{} mV", ina.voltage()?);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// Bus frequencies above 400 kHz cannot be produced by the MCP2221, so
/// [`Transport::initialize`] fails for them.
#[derive(Debug)]
pub struct Mcp2221 {
    /// Underlying [`hidapi`] device.
    ///
    /// The C hidapi library is not thread safe and the `hidapi` types are
    /// appropriately `!Sync`.
    inner: HidDevice,
    /// Address and bus frequency applied by the last successful `initialize`.
    target: Option<(u8, u32)>,
}

impl Mcp2221 {
    ////////////////////////////////////////////////////////////////////////////////
    // Constructors - USB methods
    ////////////////////////////////////////////////////////////////////////////////

    /// Connect to the first USB device found with the default vendor and product ID.
    ///
    /// # Errors
    ///
    /// An error will be returned if the USB device cannot be opened.
    pub fn connect() -> Result<Self, Error> {
        Mcp2221::connect_with_vid_and_pid(MICROCHIP_VID, MCP2221_PID)
    }

    /// Connect to the first USB device found with the given vendor and product ID.
    ///
    /// Use this constructor if you have changed the USB VID or PID of your MCP2221.
    ///
    /// # Errors
    ///
    /// An error will be returned if the USB device cannot be opened.
    pub fn connect_with_vid_and_pid(vendor_id: u16, product_id: u16) -> Result<Self, Error> {
        let hidapi = HidApi::new()?;
        let device = hidapi.open(vendor_id, product_id)?;
        debug!(vendor_id, product_id, "MCP2221 connected");
        Ok(Self {
            inner: device,
            target: None,
        })
    }

    ////////////////////////////////////////////////////////////////////////////////
    // USB report exchange with the MCP2221
    ////////////////////////////////////////////////////////////////////////////////

    /// Write the given command to the MCP2221 and read the 64-byte response.
    fn transfer(&self, command: &UsbReport) -> Result<[u8; 64], Error> {
        let sent = command.command_code();
        let written = self.inner.write(&command.report_bytes())?;
        if written != 65 {
            return Err(Error::ShortReport(written));
        }

        let mut read_buffer = [0u8; 64];
        let read = self.inner.read(&mut read_buffer)?;
        if read != 64 {
            return Err(Error::ShortReport(read));
        }

        let received = read_buffer[0];
        if received != sent {
            return Err(Error::MismatchedCommandCodeEcho { sent, received });
        }

        let status_code = read_buffer[1];
        if status_code == COMMAND_SUCCESS {
            Ok(read_buffer)
        } else {
            // Prefer a command-specific error, falling back to the general one.
            command
                .check_error_code(status_code)
                .and(Err(Error::CommandFailed(status_code)))
        }
    }

    /// Read the status of the MCP2221.
    ///
    /// # Datasheet
    ///
    /// See section 3.1.1 of the datasheet for the underlying Status/Set
    /// Parameters HID command.
    pub fn status(&self) -> Result<Status, Error> {
        let buf = self.transfer(&UsbReport::new(McpCommand::StatusSetParameters))?;
        Ok(Status::from_buffer(&buf))
    }

    ////////////////////////////////////////////////////////////////////////////////
    // I2C
    ////////////////////////////////////////////////////////////////////////////////

    /// Set the speed of the I2C bus, in Hz.
    ///
    /// Not every rate can be produced exactly; the divider is rounded down,
    /// giving the nearest achievable rate at or above `frequency`.
    ///
    /// # Errors
    ///
    /// [`Error::I2cUnsupportedSpeed`] for a speed outside the MCP2221's range,
    /// or [`Error::I2cCouldNotChangeSpeed`] if an ongoing transfer prevented
    /// the change.
    ///
    /// # Datasheet
    ///
    /// See section 3.1.1 of the datasheet for the underlying Status/Set
    /// Parameters HID command.
    pub fn i2c_set_bus_speed(&self, frequency: u32) -> Result<(), Error> {
        let divider = clock_divider(frequency)?;
        let mut command = UsbReport::new(McpCommand::StatusSetParameters);
        // Tells the device to read the next byte as the I2C clock divider.
        command.set_data_byte(3, 0x20);
        command.set_data_byte(4, divider);
        let read_buffer = self.transfer(&command)?;
        match read_buffer[3] {
            0x20 => {
                debug!(frequency, divider, "MCP2221 bus speed set");
                Ok(())
            }
            0x21 => Err(Error::I2cCouldNotChangeSpeed),
            code => Err(Error::UnexpectedResponse(code)),
        }
    }

    /// Cancel the current I2C transfer.
    ///
    /// <div class="warning">
    ///
    /// No cancellation is sent if the I2C engine appears idle, as doing so
    /// puts the engine into a busy state.
    ///
    /// </div>
    pub fn i2c_cancel_transfer(&self) -> Result<CancelTransferResponse, Error> {
        if self.status()?.is_idle() {
            return Ok(CancelTransferResponse::NoTransfer);
        }

        let mut command = UsbReport::new(McpCommand::StatusSetParameters);
        command.set_data_byte(2, 0x10);
        let read_buffer = self.transfer(&command)?;
        match read_buffer[2] {
            0x10 => Ok(CancelTransferResponse::MarkedForCancellation),
            0x11 => Ok(CancelTransferResponse::NoTransfer),
            0x00 => Ok(CancelTransferResponse::Done),
            code => Err(Error::UnexpectedResponse(code)),
        }
    }

    /// Cancel the I2C transfer if the target did not acknowledge its address.
    fn i2c_bail_for_nack(&self) -> Result<(), Error> {
        if self.status()?.ack_received {
            Ok(())
        } else {
            self.i2c_cancel_transfer()?;
            Err(Error::I2cAddressNack)
        }
    }

    /// Read data from an I2C target.
    ///
    /// The address must be the 7-bit address. Zero-length reads are refused,
    /// as they can lock up the bus if the target holds SDA low.
    ///
    /// # Datasheet
    ///
    /// See section 3.1.8 for the underlying I2C Read Data HID command.
    pub fn i2c_read(&self, seven_bit_address: u8, read_buffer: &mut [u8]) -> Result<(), Error> {
        self.read_with(McpCommand::I2cReadData, seven_bit_address, read_buffer)
    }

    /// Write data to an I2C target with a STOP condition at the end.
    ///
    /// # Datasheet
    ///
    /// See section 3.1.5 for the underlying I2C Write Data HID command.
    pub fn i2c_write(&self, seven_bit_address: u8, write_buffer: &[u8]) -> Result<(), Error> {
        self.write_with(McpCommand::I2cWriteData, seven_bit_address, write_buffer)
    }

    /// Write `write_buffer` without a STOP, then read `read_buffer.len()` bytes
    /// after a repeated START.
    ///
    /// This is how INA260 registers are read: the register pointer is written,
    /// then the register contents are read back.
    ///
    /// # Datasheet
    ///
    /// See sections 3.1.7 and 3.1.9 for the underlying HID commands.
    pub fn i2c_write_read(
        &self,
        seven_bit_address: u8,
        write_buffer: &[u8],
        read_buffer: &mut [u8],
    ) -> Result<(), Error> {
        self.write_with(McpCommand::I2cWriteDataNoStop, seven_bit_address, write_buffer)?;
        self.read_with(
            McpCommand::I2cReadDataRepeatedStart,
            seven_bit_address,
            read_buffer,
        )
    }

    /// Check if an I2C target acknowledges the given address.
    ///
    /// This is a write of no bytes, followed by cleanup of the incomplete
    /// transfer.
    pub fn i2c_check_address(&self, seven_bit_address: u8) -> Result<bool, Error> {
        let mut command = UsbReport::new(McpCommand::I2cWriteData);
        command.set_data_byte(3, seven_bit_address << 1);

        for _ in 0..MAX_RETRIES {
            match self.transfer(&command) {
                Ok(_) => {
                    // The write was submitted; the target may still be absent.
                    let ack = self.status()?.ack_received;
                    self.i2c_cancel_transfer()?;
                    return Ok(ack);
                }
                Err(Error::I2cEngineBusy) => std::thread::sleep(RETRY_DELAY),
                Err(e) => return Err(e),
            }
        }
        Err(Error::I2cEngineBusy)
    }

    fn read_with(
        &self,
        command: McpCommand,
        seven_bit_address: u8,
        read_buffer: &mut [u8],
    ) -> Result<(), Error> {
        let [len_low, len_high] = transfer_length(read_buffer.len())?;
        let mut report = UsbReport::new(command);
        report.set_data_byte(1, len_low);
        report.set_data_byte(2, len_high);
        report.set_data_byte(3, (seven_bit_address << 1) | 1);
        self.transfer_retrying_busy(&report)?;
        self.i2c_bail_for_nack()?;
        self.i2c_read_get_data(read_buffer)
    }

    /// Collect previously requested read data from the MCP2221.
    fn i2c_read_get_data(&self, read_buffer: &mut [u8]) -> Result<(), Error> {
        let get_command = UsbReport::new(McpCommand::I2cGetData);
        collect_read_data(read_buffer, RETRY_DELAY, || self.transfer(&get_command))
    }

    fn write_with(
        &self,
        command: McpCommand,
        seven_bit_address: u8,
        write_buffer: &[u8],
    ) -> Result<(), Error> {
        let [len_low, len_high] = transfer_length(write_buffer.len())?;
        let mut report = UsbReport::new(command);
        report.set_data_byte(1, len_low);
        report.set_data_byte(2, len_high);
        report.set_data_byte(3, seven_bit_address << 1);

        for (idx, chunk) in write_buffer.chunks(WRITE_CHUNK).enumerate() {
            report.write_buffer[4..4 + chunk.len()].copy_from_slice(chunk);
            self.transfer_retrying_busy(&report)?;
            // The MCP2221 accepts writes for a missing target, so check the
            // address was acknowledged after the first chunk.
            if idx == 0 {
                self.i2c_bail_for_nack()?;
            }
        }
        Ok(())
    }

    fn transfer_retrying_busy(&self, report: &UsbReport) -> Result<[u8; 64], Error> {
        let mut retries = MAX_RETRIES;
        loop {
            match self.transfer(report) {
                Err(Error::I2cEngineBusy) if retries > 0 => {
                    retries -= 1;
                    std::thread::sleep(RETRY_DELAY);
                }
                result => return result,
            }
        }
    }
}

/// Data carried by one Get Data response, or `None` when the engine had
/// nothing to hand over.
///
/// # Datasheet
///
/// Byte 3 is the number of data bytes that follow, from byte 4. A value of
/// 127 flags a read error even when the status byte reports success.
fn get_data_payload(buffer: &[u8; 64]) -> Option<&[u8]> {
    match usize::from(buffer[3]) {
        0 | 127 => None,
        len => Some(&buffer[4..4 + len.min(60)]),
    }
}

/// Fill `read_buffer` from repeated Get Data responses.
///
/// Empty responses and engine read errors each use up one of
/// [`MAX_RETRIES`] attempts, with `delay` between them. The budget is
/// refilled whenever data arrives.
///
/// # Errors
///
/// [`Error::I2cEngineReadError`] once the attempts run out, or any other
/// error from `get_data`.
fn collect_read_data<F>(
    read_buffer: &mut [u8],
    delay: Duration,
    mut get_data: F,
) -> Result<(), Error>
where
    F: FnMut() -> Result<[u8; 64], Error>,
{
    let mut read_so_far = 0;
    let mut retries = MAX_RETRIES;

    while read_so_far < read_buffer.len() {
        let payload = match get_data() {
            Ok(buffer) => get_data_payload(&buffer).map(|data| {
                let data_length = data.len().min(read_buffer.len() - read_so_far);
                read_buffer[read_so_far..read_so_far + data_length]
                    .copy_from_slice(&data[..data_length]);
                data_length
            }),
            // The host asked before the engine had data.
            Err(Error::I2cEngineReadError) => None,
            Err(e) => return Err(e),
        };
        match payload {
            Some(data_length) => {
                read_so_far += data_length;
                retries = MAX_RETRIES;
            }
            None if retries > 0 => {
                retries -= 1;
                std::thread::sleep(delay);
            }
            None => {
                debug!(read_so_far, requested = read_buffer.len(), "gave up waiting for read data");
                return Err(Error::I2cEngineReadError);
            }
        }
    }
    Ok(())
}

/// Little-endian transfer length for an I2C report, refusing empty and
/// oversized transfers.
fn transfer_length(len: usize) -> Result<[u8; 2], Error> {
    match len {
        0 => Err(Error::I2cTransferEmpty),
        MAX_I2C_TRANSFER_PLUS_1.. => Err(Error::I2cTransferTooLong),
        // Bounded above.
        len => Ok((len as u16).to_le_bytes()),
    }
}

impl Transport for Mcp2221 {
    fn initialize(&mut self, address: u8, frequency: u32) -> bool {
        if self.target == Some((address, frequency)) {
            return true;
        }
        self.target = None;
        let result = self
            .i2c_set_bus_speed(frequency)
            .and_then(|()| self.i2c_check_address(address));
        match result {
            Ok(true) => {
                self.target = Some((address, frequency));
                true
            }
            Ok(false) => {
                debug!(address, "no acknowledgement from target");
                false
            }
            Err(e) => {
                debug!(address, frequency, error = %e, "MCP2221 initialize failed");
                false
            }
        }
    }

    fn write(&mut self, register: u8, data: &[u8]) -> usize {
        let Some((address, _)) = self.target else {
            return 0;
        };
        let mut buffer = Vec::with_capacity(data.len() + 1);
        buffer.push(register);
        buffer.extend_from_slice(data);
        match self.i2c_write(address, &buffer) {
            Ok(()) => data.len(),
            Err(e) => {
                debug!(address, register, error = %e, "MCP2221 write failed");
                0
            }
        }
    }

    fn read(&mut self, register: u8, data: &mut [u8]) -> usize {
        let Some((address, _)) = self.target else {
            return 0;
        };
        match self.i2c_write_read(address, &[register], data) {
            Ok(()) => data.len(),
            Err(e) => {
                debug!(address, register, error = %e, "MCP2221 read failed");
                0
            }
        }
    }
}
