mod master;
pub mod port;

pub use master::RtuTransport;

pub type SerialTransport = RtuTransport<tokio_serial::SerialStream>;
