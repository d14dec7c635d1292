use serde::Serialize;
use xerxes_frame::Address;
use xerxes_node::PingReply;

use crate::cmd::{open_root, AddressArgs, LinkArgs};
use crate::exit::{node_error, CliResult, SUCCESS};
use crate::output::{print_fields, OutputFormat};

#[derive(Serialize)]
struct PingOutput {
    address: Address,
    #[serde(flatten)]
    reply: PingReply,
    version: String,
    current: bool,
}

pub fn run(args: AddressArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let root = open_root(link)?;
    let reply = root
        .ping(args.address)
        .map_err(|err| node_error(&format!("ping {} failed", args.address), err))?;

    let out = PingOutput {
        address: args.address,
        reply,
        version: reply.version(),
        current: root.is_protocol_current(&reply),
    };
    print_fields(
        &out,
        &[
            ("address", out.address.to_string()),
            ("device", reply.device.to_string()),
            ("version", out.version.clone()),
            ("current", out.current.to_string()),
            ("latency", format!("{:.2} ms", reply.latency.as_secs_f64() * 1000.0)),
        ],
        format,
    );
    Ok(SUCCESS)
}
