extern crate master;
extern crate transport;

use env_logger::Builder;
use frame::{common, DataType};
use log::{error, info, LevelFilter};
use master::ModbusMaster;
use std::env;
use std::str::FromStr;
use transport::{PortSettings, Settings};

#[derive(Debug, PartialEq)]
enum Command {
    Read {
        slave: u8,
        start: u16,
        count: u16,
        data_type: DataType,
    },
    Write {
        slave: u8,
        register: u16,
        value: u16,
        retries: Option<u32>,
    },
    WriteMulti {
        slave: u8,
        start: u16,
        values: Vec<u16>,
    },
}

#[derive(Debug)]
struct Args {
    port: PortSettings,
    settings: Settings,
    command: Command,
}

fn usage() {
    println!(
        r#"master-rw port [settings] command [arguments]

Parameters:
    port - serial port and line parameters, <device>:<speed>-<data bits>-<parity>-<stop bits>
    settings - optional key=value list: response_timeout (ms), queue_timeout (ms), retry_count

Commands:
    read <slave> <start> <count> [u16|i16|u32|i32|f32|bytes] - read holding registers (0x03)
    write <slave> <register> <value> [retries] - write single register (0x06), retried
    write-multi <slave> <start> <v1,v2,...> - write multiple registers (0x10)

Numbers may be given in decimal or hex (0x..).

Env. variables:
    RUST_LOG - changes output verbosity. Values [error,warn,info,debug,trace]. info by default

Examples:
    master-rw /dev/ttyUSB0:9600-8-N-1 read 1 0 10

    RUST_LOG=trace master-rw /dev/ttyUSB0:9600-8-N-1 read 1 0x100 2 f32 - dump raw frames

    master-rw /dev/ttyUSB0:19200-8-E-1 response_timeout=200,retry_count=3 write 17 0xAC 291

    master-rw /dev/ttyUSB0:9600-8-N-1 write-multi 1 0 1,2,3
    "#
    );
}

fn parse_num<T>(s: &str) -> Result<T, &'static str>
where
    T: TryFrom<u64>,
{
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => u64::from_str(s),
    }
    .map_err(|_| "invalid number")?;
    T::try_from(value).map_err(|_| "number out of range")
}

fn parse_command(args: &[String]) -> Result<Command, &'static str> {
    let (name, rest) = args.split_first().ok_or("missing command")?;
    let arg = |idx: usize| rest.get(idx).map(String::as_str).ok_or("missing argument");

    match name.as_str() {
        "read" => {
            let count = parse_num(arg(2)?)?;
            if !common::nregs_check(count) {
                return Err("register count out of range");
            }
            let data_type = match rest.get(3) {
                Some(name) => DataType::from_str(name)?,
                None => DataType::default(),
            };
            Ok(Command::Read {
                slave: parse_num(arg(0)?)?,
                start: parse_num(arg(1)?)?,
                count,
                data_type,
            })
        }
        "write" => Ok(Command::Write {
            slave: parse_num(arg(0)?)?,
            register: parse_num(arg(1)?)?,
            value: parse_num(arg(2)?)?,
            retries: rest.get(3).map(|s| parse_num(s)).transpose()?,
        }),
        "write-multi" => {
            let values = arg(2)?
                .split(',')
                .map(parse_num)
                .collect::<Result<Vec<u16>, _>>()?;
            if !common::nregs_write_check(values.len()) {
                return Err("register count out of range");
            }
            Ok(Command::WriteMulti {
                slave: parse_num(arg(0)?)?,
                start: parse_num(arg(1)?)?,
                values,
            })
        }
        _ => Err("unknown command"),
    }
}

fn parse_args(args: &[String]) -> Result<Args, &'static str> {
    let (port, rest) = args.split_first().ok_or("missing port")?;
    let port = PortSettings::from_str(port)?;

    let (settings, rest) = match rest.split_first() {
        Some((settings, tail)) if settings.contains('=') => (Settings::from_str(settings)?, tail),
        _ => (Settings::default(), rest),
    };

    Ok(Args {
        port,
        settings,
        command: parse_command(rest)?,
    })
}

fn init_logger() {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info);
    builder.parse_default_env();
    builder.init();
}

async fn run(args: Args) -> Result<(), master::Error> {
    let master = ModbusMaster::open(&args.port, &args.settings)?;

    match args.command {
        Command::Read {
            slave,
            start,
            count,
            data_type,
        } => {
            let values = master
                .read_holding_registers(slave, start, count, data_type)
                .await?;
            for (idx, value) in values.iter().enumerate() {
                println!("{}: {}", idx, value);
            }
        }
        Command::Write {
            slave,
            register,
            value,
            retries,
        } => {
            let response = master
                .write_single_register(slave, register, value, retries)
                .await?;
            info!("write done: {:02X?}", response.as_ref());
        }
        Command::WriteMulti {
            slave,
            start,
            values,
        } => {
            let response = master
                .write_multiple_registers(slave, start, &values)
                .await?;
            info!("write done: {:02X?}", response.as_ref());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let args: Vec<String> = env::args().skip(1).collect();
    match parse_args(&args) {
        Ok(args) => {
            if let Err(err) = run(args).await {
                error!("{}", err);
                return Err(err.into());
            }
        }
        Err(err) => {
            error!("{}", err);
            usage();
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_num::<u16>("10"), Ok(10));
        assert_eq!(parse_num::<u16>("0xAC"), Ok(0xAC));
        assert_eq!(parse_num::<u8>("256"), Err("number out of range"));
        assert_eq!(parse_num::<u16>("ten"), Err("invalid number"));
    }

    #[test]
    fn read_command() {
        let command = parse_command(&strings(&["read", "1", "0x10", "4", "f32"])).unwrap();
        assert_eq!(
            command,
            Command::Read {
                slave: 1,
                start: 0x10,
                count: 4,
                data_type: DataType::F32
            }
        );

        let command = parse_command(&strings(&["read", "1", "0", "2"])).unwrap();
        assert!(matches!(
            command,
            Command::Read {
                data_type: DataType::U16,
                ..
            }
        ));

        assert!(parse_command(&strings(&["read", "1", "0", "0"])).is_err());
        assert!(parse_command(&strings(&["read", "1", "0", "126"])).is_err());
        assert!(parse_command(&strings(&["read", "1", "0"])).is_err());
    }

    #[test]
    fn write_commands() {
        let command = parse_command(&strings(&["write", "17", "0xAC", "291"])).unwrap();
        assert_eq!(
            command,
            Command::Write {
                slave: 17,
                register: 0xAC,
                value: 291,
                retries: None
            }
        );

        let command = parse_command(&strings(&["write", "1", "2", "3", "5"])).unwrap();
        assert!(matches!(
            command,
            Command::Write {
                retries: Some(5),
                ..
            }
        ));

        let command = parse_command(&strings(&["write-multi", "1", "0", "1,2,0xFFFF"])).unwrap();
        assert_eq!(
            command,
            Command::WriteMulti {
                slave: 1,
                start: 0,
                values: vec![1, 2, 0xFFFF]
            }
        );

        assert!(parse_command(&strings(&["write-multi", "1", "0", "1,x"])).is_err());
        assert!(parse_command(&strings(&["erase", "1"])).is_err());
        assert!(parse_command(&[]).is_err());
    }

    #[test]
    fn full_args() {
        let args = parse_args(&strings(&[
            "/dev/ttyUSB0:9600-8-N-1",
            "response_timeout=200,retry_count=3",
            "write",
            "1",
            "2",
            "3",
        ]))
        .unwrap();
        assert_eq!(args.port.name, "/dev/ttyUSB0");
        assert_eq!(args.settings.response_timeout, Duration::from_millis(200));
        assert_eq!(args.settings.retry_count, 3);

        let args = parse_args(&strings(&["/dev/ttyUSB0:9600-8-N-1", "read", "1", "0", "1"]))
            .unwrap();
        assert_eq!(args.settings, Settings::default());

        assert!(parse_args(&strings(&["/dev/ttyUSB0", "read", "1", "0", "1"])).is_err());
    }
}
