use std::fmt;
use thiserror::Error;
use transport::TransportError;

/// Identifies a single register write in logs and errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteContext {
    pub slave: u8,
    pub register: u16,
    pub value: u16,
    pub attempt: u32,
    pub attempts: u32,
}

impl fmt::Display for WriteContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Slave {}; Register: {}; Value: {}; Retry {} of {}",
            self.slave, self.register, self.value, self.attempt, self.attempts
        )
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("crc mismatch")]
    CrcMismatch,
    #[error("decode error: {0}")]
    Decode(frame::Error),
    #[error("slave exception: function 0x{function:02X} code 0x{code:02X}")]
    Exception { function: u8, code: u8 },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("retry limit exceeded: {0}")]
    RetryLimitExceeded(WriteContext),
}

impl From<frame::Error> for Error {
    fn from(error: frame::Error) -> Self {
        match error {
            frame::Error::CrcMismatch => Error::CrcMismatch,
            frame::Error::Exception { function, code } => Error::Exception { function, code },
            other => Error::Decode(other),
        }
    }
}
