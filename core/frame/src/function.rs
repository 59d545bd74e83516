use std::convert::TryFrom;

pub const EXCEPTION_BIT: u8 = 0x80;

/// Function codes a master may see on the line.
///
/// Requests are only built for the register functions, the rest are known so
/// that responses can be delimited on the wire.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FunctionCode {
    ReadCoils = 0x01,
    ReadDiscreteInputs = 0x02,
    ReadHoldingRegisters = 0x03,
    ReadInputRegisters = 0x04,
    WriteSingleCoil = 0x05,
    WriteSingleRegister = 0x06,
    WriteMultipleCoils = 0x0F,
    WriteMultipleRegisters = 0x10,
}

impl FunctionCode {
    pub fn is_exception(value: u8) -> bool {
        value & EXCEPTION_BIT != 0
    }

    /// Response carries a byte count right after the function code
    pub fn has_byte_count(self) -> bool {
        matches!(
            self,
            FunctionCode::ReadCoils
                | FunctionCode::ReadDiscreteInputs
                | FunctionCode::ReadHoldingRegisters
                | FunctionCode::ReadInputRegisters
        )
    }
}

impl From<FunctionCode> for u8 {
    fn from(value: FunctionCode) -> u8 {
        value as u8
    }
}

impl TryFrom<u8> for FunctionCode {
    type Error = u8;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(FunctionCode::ReadCoils),
            0x02 => Ok(FunctionCode::ReadDiscreteInputs),
            0x03 => Ok(FunctionCode::ReadHoldingRegisters),
            0x04 => Ok(FunctionCode::ReadInputRegisters),
            0x05 => Ok(FunctionCode::WriteSingleCoil),
            0x06 => Ok(FunctionCode::WriteSingleRegister),
            0x0F => Ok(FunctionCode::WriteMultipleCoils),
            0x10 => Ok(FunctionCode::WriteMultipleRegisters),
            other => Err(other),
        }
    }
}
