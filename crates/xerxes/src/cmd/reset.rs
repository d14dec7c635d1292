use serde::Serialize;
use xerxes_frame::Address;
use xerxes_node::Leaf;

use crate::cmd::{open_root, AddressArgs, LinkArgs};
use crate::exit::{node_error, CliResult, SUCCESS};
use crate::output::{print_fields, OutputFormat};

#[derive(Serialize)]
struct ResetOutput {
    address: Address,
    reset: &'static str,
}

pub fn run(args: AddressArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let root = open_root(link)?;
    Leaf::new(args.address, &root)
        .reset_soft()
        .map_err(|err| node_error(&format!("reset {} failed", args.address), err))?;

    let out = ResetOutput {
        address: args.address,
        reset: "soft",
    };
    print_fields(
        &out,
        &[("address", out.address.to_string()), ("reset", out.reset.into())],
        format,
    );
    Ok(SUCCESS)
}
