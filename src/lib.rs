#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod bytes;
mod config;
pub mod constants;
mod driver;
mod error;
mod measurement;
pub mod registers;
pub mod transport;

pub use config::DeviceConfig;
pub use driver::{Ina260, State};
pub use error::{Error, Result};
pub use measurement::Measurement;
pub use transport::Transport;
