use serde::Serialize;
use xerxes_frame::Address;
use xerxes_memory::{RegisterLayout, Value};
use xerxes_node::Leaf;

use crate::cmd::{open_root, LinkArgs, ReadArgs};
use crate::exit::{memory_error, CliError, CliResult, SUCCESS};
use crate::output::{print_fields, OutputFormat};

#[derive(Serialize)]
struct ReadOutput<'a> {
    address: Address,
    register: &'a str,
    value: Value,
}

pub fn run(args: ReadArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let layout = RegisterLayout::standard();
    if layout.get(&args.register).is_none() {
        return Err(CliError::usage(format!("unknown register '{}'", args.register)));
    }

    let root = open_root(link)?;
    let leaf = Leaf::with_layout(args.address, &root, layout);
    let value = leaf
        .read_param(&args.register)
        .map_err(|err| memory_error(&format!("read {} failed", args.register), err))?;

    let out = ReadOutput {
        address: args.address,
        register: &args.register,
        value,
    };
    print_fields(
        &out,
        &[
            ("address", out.address.to_string()),
            ("register", out.register.to_string()),
            ("value", out.value.to_string()),
        ],
        format,
    );
    Ok(SUCCESS)
}
