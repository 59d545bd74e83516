use std::convert::From;
use std::fmt;
use std::io;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    InvalidData,
    BufferToSmall,
    Io(io::ErrorKind),
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::InvalidData => Error::InvalidData,
            io::ErrorKind::UnexpectedEof => Error::BufferToSmall,
            kind => Error::Io(kind),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidData => write!(f, "invalid data"),
            Error::BufferToSmall => write!(f, "buffer too small"),
            Error::Io(kind) => write!(f, "io error: {:?}", kind),
        }
    }
}

impl std::error::Error for Error {}
