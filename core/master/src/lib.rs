//! Modbus RTU master: holding register reads and writes over a shared
//! half-duplex line.
//!
//! ```no_run
//! use master::{DataType, ModbusMaster};
//! use std::str::FromStr;
//! use transport::{PortSettings, Settings};
//!
//! # async fn run() -> Result<(), master::Error> {
//! let port = PortSettings::from_str("/dev/ttyUSB0:9600-8-N-1").unwrap();
//! let master = ModbusMaster::open(&port, &Settings::default())?;
//!
//! let values = master.read_holding_registers(1, 0, 4, DataType::U32).await?;
//! master.write_single_register(1, 10, 0x1234, Some(3)).await?;
//! master.write_multiple_registers(1, 20, &[1, 2, 3]).await?;
//! # let _ = values;
//! # Ok(())
//! # }
//! ```

pub mod error;
mod master;
pub mod retry;

pub use error::{Error, WriteContext};
pub use frame::{DataType, Value};
pub use master::{ModbusMaster, ReadAs};
