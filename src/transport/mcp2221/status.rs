//! Status read from the MCP2221.

use bit_field::BitField;

/// Current status of the MCP2221's I2C engine and its revision numbers.
///
/// Bytes in documentation are numbered from 0 through 63 and correspond
/// to table 3-2 in section 3.1.1 (Status/Set Parameters) of the datasheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Internal state of the I2C engine (byte 8). Zero when idle.
    pub communication_state: u8,
    /// Length of the I2C transfer requested.
    pub transfer_requested_length: u16,
    /// Number of bytes of the current transfer already completed.
    pub transfer_completed_length: u16,
    /// Clock divider currently setting the bus speed (byte 14).
    pub bus_speed_divider: u8,
    /// 8-bit address of the last target addressed.
    pub target_address: u16,
    /// Whether the target acknowledged its address.
    ///
    /// # Datasheet
    ///
    /// Bit 6 of byte 20, inverted: the chip reports 0 for ACK.
    pub ack_received: bool,
    /// SCL line is high.
    pub scl_line_high: bool,
    /// SDA line is high.
    pub sda_line_high: bool,
    /// MCP2221 hardware revision.
    pub hardware_revision: Revision,
    /// MCP2221 firmware revision.
    pub firmware_revision: Revision,
}

impl Status {
    pub(crate) fn from_buffer(buf: &[u8; 64]) -> Self {
        Self {
            communication_state: buf[8],
            transfer_requested_length: u16::from_le_bytes([buf[9], buf[10]]),
            transfer_completed_length: u16::from_le_bytes([buf[11], buf[12]]),
            bus_speed_divider: buf[14],
            target_address: u16::from_le_bytes([buf[16], buf[17]]),
            ack_received: !buf[20].get_bit(6),
            scl_line_high: buf[22] == 0x01,
            sda_line_high: buf[23] == 0x01,
            hardware_revision: Revision::new(buf[46] as char, buf[47] as char),
            firmware_revision: Revision::new(buf[48] as char, buf[49] as char),
        }
    }

    /// The I2C engine has no transfer in progress.
    pub fn is_idle(&self) -> bool {
        self.communication_state == 0
    }
}

/// Two-part revision number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision {
    /// Major component of the revision number. (x.0)
    pub major: char,
    /// Minor component of the revision number. (0.x)
    pub minor: char,
}

impl Revision {
    fn new(major: char, minor: char) -> Self {
        Self { major, minor }
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
