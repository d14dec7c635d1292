use xerxes_node::{PROTOCOL_VERSION_MAJOR, PROTOCOL_VERSION_MINOR};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("xerxes {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: xerxes");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("protocol: {PROTOCOL_VERSION_MAJOR}.{PROTOCOL_VERSION_MINOR}");
    println!(
        "target: {}",
        option_env!("XERXES_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("serial: {}", if cfg!(unix) { "tty" } else { "unsupported" });

    Ok(SUCCESS)
}
