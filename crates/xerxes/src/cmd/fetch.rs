use serde::Serialize;
use xerxes_frame::Address;
use xerxes_node::{Leaf, Record};

use crate::cmd::{open_root, FetchArgs, LinkArgs};
use crate::exit::{node_error, CliError, CliResult, SUCCESS};
use crate::output::{print_fields, OutputFormat};

#[derive(Serialize)]
struct FetchOutput {
    address: Address,
    samples: usize,
    values: Record,
}

pub fn run(args: FetchArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    if args.count == 0 {
        return Err(CliError::usage("--count must be at least 1"));
    }
    let root = open_root(link)?;
    let leaf = Leaf::new(args.address, &root);

    let mut samples = Vec::with_capacity(args.count);
    for _ in 0..args.count {
        let raw = leaf
            .fetch_raw()
            .map_err(|err| node_error(&format!("fetch from {} failed", args.address), err))?;
        samples.push(raw_record(&raw));
    }

    let out = FetchOutput {
        address: args.address,
        samples: samples.len(),
        values: Leaf::average(&samples),
    };
    let rendered: Vec<(String, String)> = out
        .values
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    let mut fields = vec![
        ("address", out.address.to_string()),
        ("samples", out.samples.to_string()),
    ];
    fields.extend(rendered.iter().map(|(name, value)| (name.as_str(), value.clone())));
    print_fields(&out, &fields, format);
    Ok(SUCCESS)
}

/// Raw values keyed by position; device-specific names are up to decoders.
fn raw_record(values: &[f32]) -> Record {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (format!("value_{i}"), f64::from(*v)))
        .collect()
}
