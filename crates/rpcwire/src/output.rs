use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

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

/// A command result printable in every output format.
pub trait Report: Serialize {
    /// Column names for table output.
    fn columns() -> &'static [&'static str];

    /// One table row; must match `columns`.
    fn row(&self) -> Vec<String>;

    /// Single-line human summary.
    fn pretty(&self) -> String;
}

/// Print reports: one JSON object per line, one table, or one line each.
pub fn print_reports<R: Report>(reports: &[R], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for report in reports {
                println!(
                    "{}",
                    serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(R::columns().to_vec());
            for report in reports {
                table.add_row(report.row());
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for report in reports {
                println!("{}", report.pretty());
            }
        }
    }
}

pub fn print_raw(data: &[u8]) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(data)?;
    out.flush()
}

/// Short text rendering of a body for tables and pretty output.
pub fn preview(value: &serde_json::Value) -> String {
    const MAX: usize = 60;
    let text = value.to_string();
    if text.chars().count() <= MAX {
        return text;
    }
    let cut: String = text.chars().take(MAX - 3).collect();
    format!("{cut}...")
}

/// Lowercase hex, truncated after `max` bytes.
pub fn hex_preview(data: &[u8], max: usize) -> String {
    let mut out: String = data.iter().take(max).map(|b| format!("{b:02x}")).collect();
    if data.len() > max {
        out.push_str("...");
    }
    out
}
