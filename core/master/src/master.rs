use crate::error::{Error, WriteContext};
use crate::retry::{RetryBudget, State};
use bytes::{Bytes, BytesMut};
use frame::{crc, data, packet, response, DataType, FunctionCode, Value};
use log::{debug, info};
use std::fmt;
use transport::{PortSettings, SerialTransport, Settings, Transport};

/// How the data of a read response is turned into values
pub enum ReadAs {
    Type(DataType),
    /// Receives the raw payload, no decoding is done
    Custom(Box<dyn FnOnce(&[u8]) -> Vec<Value> + Send>),
}

impl ReadAs {
    pub fn custom<F>(transform: F) -> ReadAs
    where
        F: FnOnce(&[u8]) -> Vec<Value> + Send + 'static,
    {
        ReadAs::Custom(Box::new(transform))
    }
}

impl Default for ReadAs {
    fn default() -> ReadAs {
        ReadAs::Type(DataType::default())
    }
}

impl From<DataType> for ReadAs {
    fn from(value: DataType) -> ReadAs {
        ReadAs::Type(value)
    }
}

impl fmt::Debug for ReadAs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReadAs::Type(data_type) => write!(f, "Type({:?})", data_type),
            ReadAs::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Holding register access to the slaves behind one transport
pub struct ModbusMaster<T> {
    transport: T,
    retry_count: u32,
}

impl ModbusMaster<SerialTransport> {
    pub fn open(port: &PortSettings, settings: &Settings) -> Result<Self, Error> {
        let transport = SerialTransport::open(port, settings)?;
        Ok(ModbusMaster::new(transport, settings))
    }
}

impl<T: Transport> ModbusMaster<T> {
    pub fn new(transport: T, settings: &Settings) -> ModbusMaster<T> {
        ModbusMaster {
            transport,
            retry_count: settings.retry_count,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// 0x03
    pub async fn read_holding_registers(
        &self,
        slave: u8,
        start: u16,
        length: u16,
        read_as: impl Into<ReadAs>,
    ) -> Result<Vec<Value>, Error> {
        match read_as.into() {
            ReadAs::Type(data_type) => Ok(self
                .read_holding_registers_with(slave, start, length, move |payload| {
                    data::decode(payload, data_type)
                })
                .await??),
            ReadAs::Custom(transform) => {
                self.read_holding_registers_with(slave, start, length, transform)
                    .await
            }
        }
    }

    /// 0x03, the data bytes of the response are handed to `transform` as is.
    pub async fn read_holding_registers_with<F, R>(
        &self,
        slave: u8,
        start: u16,
        length: u16,
        transform: F,
    ) -> Result<R, Error>
    where
        F: FnOnce(&[u8]) -> R,
    {
        let packet =
            packet::fixed_packet(slave, FunctionCode::ReadHoldingRegisters, start, length);
        let frame = self.request(packet).await?;
        let payload = response::data_payload(&frame)?;
        Ok(transform(payload))
    }

    /// 0x06. Retried up to `retry_count` attempts, the configured count when
    /// `None`. A count of zero fails without touching the line.
    ///
    /// Any reply with a valid CRC counts as success and is returned as is,
    /// an exception reply (function code with bit 0x80 set) included. Use
    /// `frame::response::exception` on the returned frame to tell them apart.
    pub async fn write_single_register(
        &self,
        slave: u8,
        register: u16,
        value: u16,
        retry_count: Option<u32>,
    ) -> Result<Bytes, Error> {
        let packet =
            packet::fixed_packet(slave, FunctionCode::WriteSingleRegister, register, value);
        let mut budget = RetryBudget::new(retry_count.unwrap_or(self.retry_count));
        let context = |budget: &RetryBudget| WriteContext {
            slave,
            register,
            value,
            attempt: budget.attempt(),
            attempts: budget.attempts(),
        };

        while let State::Attempting(_) = budget.state() {
            let current = context(&budget);
            info!("write_single_register: perform request. {}", current);

            match self.request(packet.clone()).await {
                Ok(frame) => {
                    budget.succeed();
                    return Ok(frame);
                }
                Err(err) => {
                    info!("write_single_register: {}. {}", err, current);
                    budget.fail();
                }
            }
        }

        Err(Error::RetryLimitExceeded(context(&budget)))
    }

    /// 0x10. Not retried. Like the single register write, an exception reply
    /// comes back as `Ok` with the raw frame.
    pub async fn write_multiple_registers(
        &self,
        slave: u8,
        start: u16,
        values: &[u16],
    ) -> Result<Bytes, Error> {
        let packet =
            packet::various_packet(slave, FunctionCode::WriteMultipleRegisters, start, values);
        self.request(packet).await
    }

    async fn request(&self, packet: BytesMut) -> Result<Bytes, Error> {
        let frame = self.transport.submit(crc::add_crc(packet)).await?;
        crc::check_crc(&frame).map_err(|err| {
            debug!("reject response {:02X?}: {}", frame.as_ref(), err);
            Error::CrcMismatch
        })?;
        Ok(frame)
    }
}
