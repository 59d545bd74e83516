use std::convert::{From, TryFrom};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Code {
    IllegalFunction = 0x01,
    IllegalDataAddress = 0x02,
    IllegalDataValue = 0x03,
    SlaveDeviceFailure = 0x04,
    Acknowledge = 0x05,
    SlaveDeviceBusy = 0x06,
    MemoryParityError = 0x08,
    GatewayPathUnavailable = 0x0A,
    GatewayTargetDeviceFailedToRespond = 0x0B,
}

impl From<Code> for u8 {
    fn from(value: Code) -> u8 {
        value as u8
    }
}

impl TryFrom<u8> for Code {
    type Error = u8;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Code::IllegalFunction),
            0x02 => Ok(Code::IllegalDataAddress),
            0x03 => Ok(Code::IllegalDataValue),
            0x04 => Ok(Code::SlaveDeviceFailure),
            0x05 => Ok(Code::Acknowledge),
            0x06 => Ok(Code::SlaveDeviceBusy),
            0x08 => Ok(Code::MemoryParityError),
            0x0A => Ok(Code::GatewayPathUnavailable),
            0x0B => Ok(Code::GatewayTargetDeviceFailedToRespond),
            other => Err(other),
        }
    }
}
