use crate::{error::Error, function::EXCEPTION_BIT, FunctionCode, CRC_SIZE};
use std::convert::TryFrom;

/// slave + function + byte count
pub const HEADER_SIZE: usize = 3;

/// slave + function + code + crc
pub const EXCEPTION_FRAME_SIZE: usize = 5;

/// slave + function + two 16-bit fields + crc
pub const ECHO_FRAME_SIZE: usize = 8;

#[derive(Debug, PartialEq, Eq)]
pub enum FrameLen {
    /// Not enough bytes to tell
    Incomplete,
    Known(usize),
    /// Function code without a known layout
    Unknown,
}

/// Full length of the response frame that starts at `head`
pub fn frame_len(head: &[u8]) -> FrameLen {
    if head.len() < 2 {
        return FrameLen::Incomplete;
    }

    let func = head[1];
    if FunctionCode::is_exception(func) {
        return FrameLen::Known(EXCEPTION_FRAME_SIZE);
    }

    match FunctionCode::try_from(func) {
        Ok(code) if code.has_byte_count() => match head.get(2) {
            Some(nbytes) => FrameLen::Known(HEADER_SIZE + *nbytes as usize + CRC_SIZE),
            None => FrameLen::Incomplete,
        },
        Ok(_) => FrameLen::Known(ECHO_FRAME_SIZE),
        Err(_) => FrameLen::Unknown,
    }
}

/// Exception carried by the frame, if any
pub fn exception(frame: &[u8]) -> Option<Error> {
    match frame {
        [_, function, code, ..] if FunctionCode::is_exception(*function) => {
            Some(Error::Exception {
                function: *function,
                code: *code,
            })
        }
        _ => None,
    }
}

/// Same slave and the same function, exception bit aside
pub fn is_reply_to(request: &[u8], frame: &[u8]) -> bool {
    match (request, frame) {
        ([slave, func, ..], [reply_slave, reply_func, ..]) => {
            slave == reply_slave && *func == reply_func & !EXCEPTION_BIT
        }
        _ => false,
    }
}

/// Data bytes of a read response whose trailer was already checked
pub fn data_payload(frame: &[u8]) -> Result<&[u8], Error> {
    if let Some(err) = exception(frame) {
        return Err(err);
    }

    if frame.len() < HEADER_SIZE + CRC_SIZE {
        return Err(Error::InvalidLength);
    }

    let nbytes = frame[2] as usize;
    let end = HEADER_SIZE + nbytes;
    if end + CRC_SIZE > frame.len() {
        return Err(Error::InvalidLength);
    }

    Ok(&frame[HEADER_SIZE..end])
}
