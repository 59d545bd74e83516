use crate::{common, FunctionCode};
use bytes::{BufMut, BytesMut};

/// slave + function + two 16-bit parameters
pub const FIXED_PACKET_SIZE: usize = 6;

/// slave + function + start + count + byte count
pub const VARIOUS_HEADER_SIZE: usize = 7;

/// Request with two fixed parameters: (start, length) for 0x03 or
/// (register, value) for 0x06.
pub fn fixed_packet(slave: u8, func: FunctionCode, param: u16, param2: u16) -> BytesMut {
    let mut buf = BytesMut::with_capacity(FIXED_PACKET_SIZE + crate::CRC_SIZE);
    buf.put_u8(slave);
    buf.put_u8(func.into());
    buf.put_u16(param);
    buf.put_u16(param2);
    buf
}

/// Request carrying a block of registers (0x10). Register count limits are
/// left to the caller.
pub fn various_packet(slave: u8, func: FunctionCode, start: u16, values: &[u16]) -> BytesMut {
    let nobjs = values.len() as u16;
    let nbytes = common::nregs_len(nobjs);
    let mut buf = BytesMut::with_capacity(VARIOUS_HEADER_SIZE + nbytes + crate::CRC_SIZE);
    buf.put_u8(slave);
    buf.put_u8(func.into());
    buf.put_u16(start);
    buf.put_u16(nobjs);
    buf.put_u8(nbytes as u8);
    for value in values {
        buf.put_u16(*value);
    }
    buf
}
