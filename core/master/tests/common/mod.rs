#![allow(dead_code)]

use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use frame::crc;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use transport::{Transport, TransportError};

/// Answers submits from a prepared list and records every request
pub struct ScriptedTransport {
    answers: Mutex<VecDeque<Result<Bytes, TransportError>>>,
    requests: Mutex<Vec<Bytes>>,
}

impl ScriptedTransport {
    pub fn new(answers: Vec<Result<Bytes, TransportError>>) -> ScriptedTransport {
        ScriptedTransport {
            answers: Mutex::new(answers.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> ScriptedTransport {
        ScriptedTransport::new(Vec::new())
    }

    pub fn requests(&self) -> Vec<Bytes> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn submit(&self, frame: Bytes) -> Result<Bytes, TransportError> {
        self.requests.lock().unwrap().push(frame);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TransportError::ResponseTimeout))
    }
}

pub fn with_crc(bytes: &[u8]) -> Bytes {
    crc::add_crc(BytesMut::from(bytes))
}

/// Frame with a broken trailer
pub fn with_bad_crc(bytes: &[u8]) -> Bytes {
    let mut frame = with_crc(bytes).to_vec();
    let last = frame.len() - 1;
    frame[last] ^= 0xFF;
    Bytes::from(frame)
}

/// Minimal register slave on the other end of a duplex pipe
pub struct FakeSlave {
    pub address: u8,
    pub registers: HashMap<u16, u16>,
}

impl FakeSlave {
    pub fn new(address: u8) -> FakeSlave {
        FakeSlave {
            address,
            registers: HashMap::new(),
        }
    }

    fn answer(&mut self, request: &[u8]) -> Option<Bytes> {
        if request[0] != self.address {
            return None;
        }

        let func = request[1];
        let first = u16::from_be_bytes([request[2], request[3]]);
        let second = u16::from_be_bytes([request[4], request[5]]);
        let mut out = BytesMut::new();
        out.put_u8(self.address);

        match func {
            0x03 => {
                out.put_u8(func);
                out.put_u8((second * 2) as u8);
                for register in first..first + second {
                    out.put_u16(*self.registers.get(&register).unwrap_or(&0));
                }
            }
            0x06 => {
                self.registers.insert(first, second);
                out.put_slice(&request[1..6]);
            }
            0x10 => {
                for i in 0..second as usize {
                    let at = 7 + i * 2;
                    let value = u16::from_be_bytes([request[at], request[at + 1]]);
                    self.registers.insert(first + i as u16, value);
                }
                out.put_slice(&request[1..6]);
            }
            _ => {
                out.put_u8(func | 0x80);
                out.put_u8(0x01);
            }
        }

        Some(crc::add_crc(out))
    }

    async fn read_request(stream: &mut DuplexStream) -> Option<Vec<u8>> {
        let mut head = [0u8; 8];
        stream.read_exact(&mut head).await.ok()?;
        let mut request = head.to_vec();
        if head[1] == 0x10 {
            // byte count sits at offset 6, the first data byte is already read
            let rest = head[6] as usize;
            let mut tail = vec![0u8; rest + 1];
            stream.read_exact(&mut tail).await.ok()?;
            request.extend_from_slice(&tail);
        }
        Some(request)
    }

    /// Serve until the master side goes away
    pub async fn serve(mut self, mut stream: DuplexStream) -> FakeSlave {
        while let Some(request) = FakeSlave::read_request(&mut stream).await {
            assert_eq!(crc::check_crc(&request), Ok(()));
            if let Some(response) = self.answer(&request) {
                if stream.write_all(&response).await.is_err() {
                    break;
                }
            }
        }
        self
    }
}
