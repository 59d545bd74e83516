use crate::{error::Error, helpers};
use bytes::{Bytes, BytesMut};
use frame::response::{self, FrameLen};
use tokio_util::codec::{Decoder, Encoder};

/// Splits the master side of an RTU line into response frames.
///
/// Frames are delimited by their function code. The trailer is passed up
/// unchecked.
pub struct RtuMasterCodec {
    expected: Option<usize>,
    name: String,
}

impl Default for RtuMasterCodec {
    fn default() -> RtuMasterCodec {
        RtuMasterCodec::new("serial")
    }
}

impl RtuMasterCodec {
    pub fn new(name: &str) -> RtuMasterCodec {
        RtuMasterCodec {
            expected: None,
            name: name.to_owned(),
        }
    }

    pub fn reset(&mut self) {
        self.expected = None;
    }

    pub fn in_progress(&self) -> bool {
        self.expected.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Decoder for RtuMasterCodec {
    type Item = Bytes;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.expected.is_none() {
            self.expected = match response::frame_len(src) {
                FrameLen::Incomplete => return Ok(None),
                FrameLen::Known(len) => Some(len),
                // can't delimit it, the trailer check upstream rejects it
                FrameLen::Unknown => Some(src.len()),
            };
        }

        match self.expected {
            Some(len) if src.len() >= len => {
                self.reset();
                let frame = src.split_to(len).freeze();
                helpers::log_data(&self.name, "in", &frame);
                Ok(Some(frame))
            }
            _ => Ok(None),
        }
    }
}

impl Encoder<Bytes> for RtuMasterCodec {
    type Error = Error;
    fn encode(&mut self, msg: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if msg.is_empty() {
            return Err(Error::InvalidData);
        }
        self.reset();
        dst.extend_from_slice(&msg);
        helpers::log_data(&self.name, "out", &msg);
        Ok(())
    }
}
