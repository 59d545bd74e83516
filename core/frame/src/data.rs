use crate::error::Error;
use byteorder::{BigEndian, ByteOrder};
use std::fmt;
use std::str::FromStr;

/// How consecutive registers are turned into values.
///
/// 32-bit types take two registers, high word first.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DataType {
    U16,
    I16,
    U32,
    I32,
    F32,
    /// Whole payload as one value, untouched
    Bytes,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    F32(f32),
    Bytes(Vec<u8>),
}

impl DataType {
    /// Bytes consumed by one value
    pub fn width(self) -> usize {
        match self {
            DataType::U16 | DataType::I16 | DataType::Bytes => 2,
            DataType::U32 | DataType::I32 | DataType::F32 => 4,
        }
    }
}

impl Default for DataType {
    fn default() -> DataType {
        DataType::U16
    }
}

impl FromStr for DataType {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "u16" => Ok(DataType::U16),
            "i16" => Ok(DataType::I16),
            "u32" => Ok(DataType::U32),
            "i32" => Ok(DataType::I32),
            "f32" => Ok(DataType::F32),
            "bytes" => Ok(DataType::Bytes),
            _ => Err("unknown data type"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::U16(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::Bytes(v) => write!(f, "{:02X?}", v),
        }
    }
}

/// Reinterpret the data bytes of a 0x03 response
pub fn decode(payload: &[u8], data_type: DataType) -> Result<Vec<Value>, Error> {
    let width = data_type.width();
    if payload.len() % width != 0 {
        return Err(Error::InvalidLength);
    }

    if data_type == DataType::Bytes {
        return Ok(vec![Value::Bytes(payload.to_vec())]);
    }

    let values = payload
        .chunks_exact(width)
        .map(|chunk| match data_type {
            DataType::U16 => Value::U16(BigEndian::read_u16(chunk)),
            DataType::I16 => Value::I16(BigEndian::read_i16(chunk)),
            DataType::U32 => Value::U32(BigEndian::read_u32(chunk)),
            DataType::I32 => Value::I32(BigEndian::read_i32(chunk)),
            DataType::F32 => Value::F32(BigEndian::read_f32(chunk)),
            DataType::Bytes => Value::Bytes(chunk.to_vec()),
        })
        .collect();

    Ok(values)
}
