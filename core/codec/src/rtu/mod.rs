mod codec;

pub use codec::RtuMasterCodec;
