use std::io::Error;
use std::str::FromStr;
use tokio_serial::{DataBits, Parity, SerialPort, SerialPortBuilderExt, SerialStream, StopBits};

/// Serial line parameters, `<device>:<speed>-<data bits>-<parity>-<stop bits>`
/// e.g. `/dev/ttyUSB0:9600-8-N-1`
#[derive(Debug)]
pub struct PortSettings {
    pub name: String,
    pub speed: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl FromStr for PortSettings {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name: String = s.chars().take_while(|c| *c != ':').collect();
        let params: String = s.chars().skip_while(|c| *c != ':').skip(1).collect();
        let info: Vec<&str> = params.split('-').collect();

        if name.len() < 4 {
            return Err("name is too short");
        }

        if info.len() < 4 {
            return Err("not enough port parameters");
        }

        let speed = u32::from_str(info[0]).map_err(|_| "invalid speed")?;
        let data_bits = match info[1] {
            "5" => Ok(DataBits::Five),
            "6" => Ok(DataBits::Six),
            "7" => Ok(DataBits::Seven),
            "8" => Ok(DataBits::Eight),
            _ => Err("invalid data bits"),
        }?;

        let parity = match info[2] {
            "N" => Ok(Parity::None),
            "E" => Ok(Parity::Even),
            "O" => Ok(Parity::Odd),
            _ => Err("invalid parity"),
        }?;

        let stop_bits = match info[3] {
            "1" => Ok(StopBits::One),
            "2" => Ok(StopBits::Two),
            _ => Err("invalid stop bits"),
        }?;

        Ok(PortSettings {
            name,
            speed,
            data_bits,
            parity,
            stop_bits,
        })
    }
}

pub fn build(parameters: &PortSettings) -> Result<SerialStream, Error> {
    let port = tokio_serial::new(parameters.name.as_str(), parameters.speed)
        .data_bits(parameters.data_bits)
        .parity(parameters.parity)
        .stop_bits(parameters.stop_bits)
        .open_native_async()?;

    port.clear(tokio_serial::ClearBuffer::All)?;
    Ok(port)
}
