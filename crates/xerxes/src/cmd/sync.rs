use serde::Serialize;

use crate::cmd::{open_root, LinkArgs};
use crate::exit::{node_error, CliResult, SUCCESS};
use crate::output::{print_fields, OutputFormat};

#[derive(Serialize)]
struct SyncOutput {
    synced: bool,
}

pub fn run(link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let root = open_root(link)?;
    root.sync().map_err(|err| node_error("sync failed", err))?;

    print_fields(&SyncOutput { synced: true }, &[("synced", "true".into())], format);
    Ok(SUCCESS)
}
