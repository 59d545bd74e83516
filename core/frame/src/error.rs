use crate::exception::Code;
use std::convert::TryFrom;
use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// Trailer does not match the CRC of the preceding bytes
    CrcMismatch,
    /// Frame or payload length does not fit the expected layout
    InvalidLength,
    /// Slave answered with an exception response
    Exception { function: u8, code: u8 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::CrcMismatch => write!(f, "crc mismatch"),
            Error::InvalidLength => write!(f, "invalid length"),
            Error::Exception { function, code } => match Code::try_from(*code) {
                Ok(known) => write!(f, "exception func:0x{:02X} code:{:?}", function, known),
                Err(_) => write!(f, "exception func:0x{:02X} code:0x{:02X}", function, code),
            },
        }
    }
}

impl std::error::Error for Error {}
