use serde::Serialize;
use xerxes_frame::Address;
use xerxes_memory::{LogicalKind, RegisterLayout, Value};
use xerxes_node::Leaf;

use crate::cmd::{open_root, parse_integer, LinkArgs, WriteArgs};
use crate::exit::{memory_error, CliError, CliResult, SUCCESS};
use crate::output::{print_fields, OutputFormat};

#[derive(Serialize)]
struct WriteOutput<'a> {
    address: Address,
    register: &'a str,
    value: Value,
    acknowledged: bool,
}

pub fn run(args: WriteArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let layout = RegisterLayout::standard();
    let kind = layout
        .get(&args.register)
        .map(|d| d.element.logical_kind())
        .ok_or_else(|| CliError::usage(format!("unknown register '{}'", args.register)))?;
    let value = parse_value(&args.value, kind)?;

    let root = open_root(link)?;
    let leaf = Leaf::with_layout(args.address, &root, layout);
    leaf.write_param(&args.register, value)
        .map_err(|err| memory_error(&format!("write {} failed", args.register), err))?;

    let out = WriteOutput {
        address: args.address,
        register: &args.register,
        value,
        acknowledged: true,
    };
    print_fields(
        &out,
        &[
            ("address", out.address.to_string()),
            ("register", out.register.to_string()),
            ("value", out.value.to_string()),
            ("acknowledged", "true".into()),
        ],
        format,
    );
    Ok(SUCCESS)
}

/// Parse a command-line value as the register's host kind.
fn parse_value(input: &str, kind: LogicalKind) -> CliResult<Value> {
    match kind {
        LogicalKind::Float => input
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| CliError::usage(format!("invalid float value: {input}"))),
        LogicalKind::Integer => {
            let value = parse_integer(input).map_err(CliError::usage)?;
            Ok(match u64::try_from(value) {
                Ok(unsigned) => Value::Unsigned(unsigned),
                Err(_) => Value::Signed(value),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_registers_parse_floats() {
        assert_eq!(parse_value("1.5", LogicalKind::Float).unwrap(), Value::Float(1.5));
        assert!(parse_value("x", LogicalKind::Float).is_err());
    }

    #[test]
    fn integer_registers_parse_hex_and_sign() {
        assert_eq!(parse_value("0x2a", LogicalKind::Integer).unwrap(), Value::Unsigned(42));
        assert_eq!(parse_value("-3", LogicalKind::Integer).unwrap(), Value::Signed(-3));
        assert!(parse_value("1.5", LogicalKind::Integer).is_err());
    }
}
