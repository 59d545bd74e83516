use super::port::{self, PortSettings};
use crate::{settings::Settings, Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use codec::helpers;
use codec::rtu::RtuMasterCodec;
use frame::{crc, response};
use futures::{SinkExt, StreamExt};
use log::{debug, error, warn};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tokio::time::{timeout, timeout_at, Instant};
use tokio_serial::SerialStream;
use tokio_util::codec::Framed;
use uuid::Uuid;

struct Line<S> {
    io: Framed<S, RtuMasterCodec>,
    /// A transaction was abandoned, its answer may still be on the way
    dirty: bool,
}

impl<S> Line<S> {
    fn reset(&mut self) {
        self.io.codec_mut().reset();
        self.io.read_buffer_mut().clear();
    }

    fn abandon(&mut self) {
        self.reset();
        self.dirty = true;
    }
}

/// Master end of an RTU line.
///
/// The framed stream sits behind a fair mutex, so concurrent callers are
/// served one transaction at a time in arrival order. After an abandoned
/// transaction the next caller first waits for the line to fall silent,
/// and frames that do not answer the current request are dropped.
pub struct RtuTransport<S> {
    line: Mutex<Line<S>>,
    name: String,
    response_timeout: Duration,
    queue_timeout: Duration,
}

impl RtuTransport<SerialStream> {
    pub fn open(parameters: &PortSettings, settings: &Settings) -> Result<Self, TransportError> {
        let port = port::build(parameters)?;
        debug!("open serial port {}", parameters.name);
        Ok(RtuTransport::new(&parameters.name, port, settings))
    }
}

impl<S> RtuTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(name: &str, stream: S, settings: &Settings) -> RtuTransport<S> {
        RtuTransport {
            line: Mutex::new(Line {
                io: Framed::new(stream, RtuMasterCodec::new(name)),
                dirty: false,
            }),
            name: name.to_owned(),
            response_timeout: settings.response_timeout,
            queue_timeout: settings.queue_timeout,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Swallow late answers until the line stays quiet for a response
    /// timeout, giving up after the queue timeout.
    async fn drain(&self, line: &mut Line<S>, uuid: &Uuid) -> Result<(), TransportError> {
        let limit = Instant::now() + self.queue_timeout;

        loop {
            let quiet = Instant::now() + self.response_timeout;
            if quiet > limit {
                warn!("{} {} line does not settle, go on", self.name, uuid);
                break;
            }

            match timeout_at(quiet, line.io.next()).await {
                Err(_) => break,
                Ok(Some(Ok(frame))) => {
                    let txt = format!("drop late {}", uuid);
                    helpers::log_frame(&self.name, &txt, &frame.as_ref());
                }
                Ok(Some(Err(err))) => {
                    error!("{} {} serial error: {:?}", self.name, uuid, err);
                    line.reset();
                    return Err(TransportError::Codec(err));
                }
                Ok(None) => return Err(TransportError::Closed),
            }
        }

        line.reset();
        line.dirty = false;
        Ok(())
    }
}

#[async_trait]
impl<S> Transport for RtuTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn submit(&self, frame: Bytes) -> Result<Bytes, TransportError> {
        let uuid = Uuid::new_v4();
        let mut line = timeout(self.queue_timeout, self.line.lock())
            .await
            .map_err(|_| {
                warn!("{} {} wait for line: timeout", self.name, uuid);
                TransportError::QueueTimeout
            })?;

        if line.dirty {
            self.drain(&mut line, &uuid).await?;
        } else {
            line.reset();
        }

        helpers::log_frame(&self.name, &format!("request {}", uuid), &frame.as_ref());
        let deadline = Instant::now() + self.response_timeout;
        match timeout_at(deadline, line.io.send(frame.clone())).await {
            Err(_) => {
                warn!("{} {} send request: timeout", self.name, uuid);
                line.abandon();
                return Err(TransportError::ResponseTimeout);
            }
            Ok(Err(err)) => {
                error!("{} {} serial error: {:?}", self.name, uuid, err);
                line.abandon();
                return Err(TransportError::Codec(err));
            }
            Ok(Ok(())) => (),
        }

        loop {
            match timeout_at(deadline, line.io.next()).await {
                Err(_) => {
                    warn!("{} {} wait for response: timeout", self.name, uuid);
                    line.abandon();
                    return Err(TransportError::ResponseTimeout);
                }
                Ok(Some(Ok(reply))) => {
                    // corrupted frames go up as they are, the caller rejects them
                    let valid = crc::check_crc(&reply).is_ok();
                    if valid && !response::is_reply_to(&frame, &reply) {
                        let txt = format!("drop foreign {}", uuid);
                        helpers::log_frame(&self.name, &txt, &reply.as_ref());
                        continue;
                    }
                    let txt = format!("response {}", uuid);
                    helpers::log_frame(&self.name, &txt, &reply.as_ref());
                    return Ok(reply);
                }
                Ok(Some(Err(err))) => {
                    error!("{} {} serial error: {:?}", self.name, uuid, err);
                    line.abandon();
                    return Err(TransportError::Codec(err));
                }
                Ok(None) => return Err(TransportError::Closed),
            }
        }
    }
}
