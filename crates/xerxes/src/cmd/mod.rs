use std::time::Duration;

use clap::{Args, Subcommand};
use xerxes_frame::Address;
use xerxes_node::Root;
use xerxes_transport::{ChannelRegistry, LinkConfig, DEFAULT_BAUD_RATE};

use crate::exit::{transport_error, CliError, CliResult};
use crate::output::OutputFormat;

pub mod fetch;
pub mod ping;
pub mod read;
pub mod registers;
pub mod reset;
pub mod sync;
pub mod version;
pub mod write;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ping a device and print its kind and protocol version.
    Ping(AddressArgs),
    /// Broadcast a bus-wide sync.
    Sync,
    /// Read a register by name.
    Read(ReadArgs),
    /// Write a register by name.
    Write(WriteArgs),
    /// Soft-reset a device.
    Reset(AddressArgs),
    /// Fetch raw measurement values from a device.
    Fetch(FetchArgs),
    /// List the register layout.
    Registers,
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Ping(args) => ping::run(args, link, format),
        Command::Sync => sync::run(link, format),
        Command::Read(args) => read::run(args, link, format),
        Command::Write(args) => write::run(args, link, format),
        Command::Reset(args) => reset::run(args, link, format),
        Command::Fetch(args) => fetch::run(args, link, format),
        Command::Registers => registers::run(format),
        Command::Version(args) => version::run(args),
    }
}

/// Serial link and root node settings shared by every bus command.
#[derive(Args, Debug, Clone)]
pub struct LinkArgs {
    /// Serial device (e.g. /dev/ttyUSB0).
    #[arg(long, short = 'p', env = "XERXES_PORT", global = true)]
    pub port: Option<String>,

    /// Line speed in baud.
    #[arg(long, env = "XERXES_BAUD", default_value_t = DEFAULT_BAUD_RATE, global = true)]
    pub baud: u32,

    /// Read timeout (e.g. 20ms, 1s).
    #[arg(long, env = "XERXES_TIMEOUT", default_value = "20ms", global = true)]
    pub timeout: String,

    /// Address of this host on the bus.
    #[arg(
        long = "address",
        env = "XERXES_ROOT_ADDR",
        default_value = "0x00",
        value_parser = parse_address,
        global = true
    )]
    pub root_address: Address,
}

impl LinkArgs {
    pub fn config(&self) -> CliResult<LinkConfig> {
        Ok(LinkConfig {
            baud_rate: self.baud,
            read_timeout: parse_duration(&self.timeout)?,
        })
    }
}

#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Device address (decimal or 0x-prefixed hex).
    #[arg(value_parser = parse_address)]
    pub address: Address,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Device address (decimal or 0x-prefixed hex).
    #[arg(value_parser = parse_address)]
    pub address: Address,
    /// Register name (see `xerxes registers`).
    pub register: String,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Device address (decimal or 0x-prefixed hex).
    #[arg(value_parser = parse_address)]
    pub address: Address,
    /// Register name (see `xerxes registers`).
    pub register: String,
    /// New value; integers may be 0x-prefixed hex.
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Device address (decimal or 0x-prefixed hex).
    #[arg(value_parser = parse_address)]
    pub address: Address,
    /// Number of samples to fetch and average.
    #[arg(long, short = 'n', default_value_t = 1)]
    pub count: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Open the configured port and build the root node.
pub fn open_root(link: &LinkArgs) -> CliResult<Root> {
    let port = link
        .port
        .as_deref()
        .ok_or_else(|| CliError::usage("no serial port given (use --port or XERXES_PORT)"))?;
    let config = link.config()?;

    #[cfg(unix)]
    {
        let mut registry = ChannelRegistry::new();
        let channel = registry
            .open_with(port, config, |port| xerxes_transport::TtyChannel::open(port))
            .map_err(|err| transport_error(&format!("failed to open {port}"), err))?;
        Ok(Root::new(link.root_address, channel))
    }

    #[cfg(not(unix))]
    {
        let _ = (config, ChannelRegistry::new());
        Err(transport_error(
            &format!("failed to open {port}"),
            xerxes_transport::TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "serial ports are only supported on Unix",
            )),
        ))
    }
}

pub fn parse_address(input: &str) -> Result<Address, String> {
    let value = parse_integer(input)?;
    Address::try_from(value).map_err(|err| err.to_string())
}

/// Decimal or `0x`-prefixed hexadecimal integer, optionally negative.
pub fn parse_integer(input: &str) -> Result<i64, String> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    }
    .map_err(|_| format!("invalid integer: {input}"))?;
    Ok(if negative { -magnitude } else { magnitude })
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::usage("duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "ms")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::usage(format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::usage("duration must be greater than zero"));
    }

    Ok(match unit {
        "s" => Duration::from_secs(value),
        _ => Duration::from_millis(value),
    })
}
