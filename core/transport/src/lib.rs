pub mod rtu;
pub mod settings;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use rtu::{port::PortSettings, RtuTransport, SerialTransport};
pub use settings::Settings;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no free transaction slot within queue timeout")]
    QueueTimeout,
    #[error("no response within response timeout")]
    ResponseTimeout,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("codec error: {0}")]
    Codec(#[from] codec::error::Error),
    #[error("transport closed")]
    Closed,
}

/// Half-duplex request/response line shared by one master.
///
/// Implementations run at most one transaction at a time and hand out the
/// line in request order.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Write a complete frame and wait for exactly one response frame
    async fn submit(&self, frame: Bytes) -> Result<Bytes, TransportError>;
}
