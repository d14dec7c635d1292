use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use xerxes_memory::RegisterDescriptor;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Print one result object.
///
/// `fields` is the human-readable rendering used by the table and pretty
/// formats; JSON serializes `out` as is.
pub fn print_fields<T: Serialize>(out: &T, fields: &[(&str, String)], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", to_json(out)),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (name, value) in fields {
                table.add_row(vec![name.to_string(), value.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", pretty_line(fields)),
    }
}

#[derive(Serialize)]
struct RegisterRow<'a> {
    name: &'a str,
    offset: u16,
    #[serde(rename = "type")]
    element: &'a str,
    region: xerxes_memory::Region,
    writable: bool,
}

pub fn print_registers<'a>(
    registers: impl IntoIterator<Item = &'a RegisterDescriptor>,
    format: OutputFormat,
) {
    let rows: Vec<RegisterRow<'_>> = registers
        .into_iter()
        .map(|d| RegisterRow {
            name: d.name,
            offset: d.offset,
            element: d.element.name,
            region: d.region,
            writable: d.writable,
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", to_json(&rows)),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NAME", "OFFSET", "TYPE", "REGION", "ACCESS"]);
            for row in &rows {
                table.add_row(vec![
                    row.name.to_string(),
                    row.offset.to_string(),
                    row.element.to_string(),
                    row.region.to_string(),
                    access(row.writable).to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                println!(
                    "{:<20} {:>4} {:<4} {:<13} {}",
                    row.name,
                    row.offset,
                    row.element,
                    row.region,
                    access(row.writable)
                );
            }
        }
    }
}

fn access(writable: bool) -> &'static str {
    if writable {
        "rw"
    } else {
        "ro"
    }
}

fn pretty_line(fields: &[(&str, String)]) -> String {
    fields
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn to_json<T: Serialize + ?Sized>(out: &T) -> String {
    serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_line_joins_fields() {
        let line = pretty_line(&[("address", "0x01".into()), ("version", "1.4".into())]);
        assert_eq!(line, "address=0x01 version=1.4");
    }

    #[test]
    fn register_rows_serialize_with_type_key() {
        let row = RegisterRow {
            name: "uid",
            offset: 528,
            element: "u64",
            region: xerxes_memory::Region::ReadOnly,
            writable: false,
        };
        assert_eq!(
            to_json(&row),
            r#"{"name":"uid","offset":528,"type":"u64","region":"read_only","writable":false}"#
        );
    }
}
