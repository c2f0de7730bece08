use thiserror::Error;

/// Result type of driver operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Problems reported by the INA260 driver.
///
/// A transport that moves fewer bytes than requested has failed the whole
/// operation. No partial value is returned and cached register copies are left
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Fewer bytes were read from a register than requested.
    #[error("read {transferred} of {requested} bytes from register {register:#04X}")]
    ShortRead {
        /// Register pointer byte.
        register: u8,
        /// Bytes requested.
        requested: usize,
        /// Bytes the transport reported as read.
        transferred: usize,
    },
    /// Fewer bytes were written to a register than requested.
    #[error("wrote {transferred} of {requested} bytes to register {register:#04X}")]
    ShortWrite {
        /// Register pointer byte.
        register: u8,
        /// Bytes requested.
        requested: usize,
        /// Bytes the transport reported as written.
        transferred: usize,
    },
}

impl Error {
    /// Register the failed transfer addressed.
    pub fn register(&self) -> u8 {
        match self {
            Error::ShortRead { register, .. } | Error::ShortWrite { register, .. } => *register,
        }
    }
}
