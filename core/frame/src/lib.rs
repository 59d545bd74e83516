pub mod common;
pub mod crc;
pub mod data;
pub mod error;
pub mod exception;
pub mod function;
pub mod packet;
pub mod response;

pub use data::{DataType, Value};
pub use error::Error;
pub use function::FunctionCode;

pub const MAX_NREGS: usize = 125; // Max. number of registers in a read request
pub const MAX_WRITE_NREGS: usize = 123; // Max. number of registers in a write request
pub const MIN_FRAME_SIZE: usize = 4; // slave + function + crc
pub const CRC_SIZE: usize = 2;
