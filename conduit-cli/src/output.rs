//! Output formatting for CLI commands

use colored::Colorize;
use serde::Serialize;
use std::fmt::Display;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// Plain text (minimal formatting)
    Plain,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "plain" => Ok(OutputFormat::Plain),
            _ => Err(format!(
                "Unknown output format '{}'. Valid options: table, json, plain",
                s
            )),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Plain => write!(f, "plain"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Success,
    Error,
    Warning,
}

impl Status {
    fn name(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Error => "error",
            Status::Warning => "warning",
        }
    }

    fn marker(self) -> colored::ColoredString {
        match self {
            Status::Success => "✓".green(),
            Status::Error => "✗".red(),
            Status::Warning => "⚠".yellow(),
        }
    }
}

/// Output formatter for consistent CLI output
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn success(&self, message: &str) {
        self.status(Status::Success, message);
    }

    pub fn error(&self, message: &str) {
        self.status(Status::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.status(Status::Warning, message);
    }

    /// Status line; only successes go to stdout.
    fn status(&self, status: Status, message: &str) {
        let line = match self.format {
            OutputFormat::Json => {
                serde_json::json!({"status": status.name(), "message": message}).to_string()
            }
            OutputFormat::Table => format!("{} {}", status.marker(), message),
            OutputFormat::Plain => format!("{}: {}", status.name(), message),
        };
        match status {
            Status::Success => println!("{}", line),
            Status::Error | Status::Warning => eprintln!("{}", line),
        }
    }

    /// Print data as JSON
    pub fn json<T: Serialize>(&self, data: &T) {
        match serde_json::to_string_pretty(data) {
            Ok(json) => println!("{}", json),
            Err(e) => self.error(&format!("Failed to serialize to JSON: {}", e)),
        }
    }

    /// `key: value` line; callers emit JSON through [`Self::json`] instead.
    pub fn kv(&self, key: &str, value: &str) {
        match self.format {
            OutputFormat::Table => println!("{}: {}", key.cyan(), value),
            _ => println!("{}: {}", key, value),
        }
    }

    pub fn section(&self, title: &str) {
        match self.format {
            OutputFormat::Table => println!("\n{}", title.bold().underline()),
            OutputFormat::Plain => println!("\n{}", title),
            OutputFormat::Json => {}
        }
    }

    /// Rows under a header, padded to the widest cell of each column.
    /// Plain output drops the header and separates cells with tabs.
    pub fn table(&self, columns: &[&str], rows: &[Vec<String>]) {
        match self.format {
            OutputFormat::Table => {
                let widths = column_widths(columns, rows);
                let header: Vec<String> = columns
                    .iter()
                    .zip(&widths)
                    .map(|(c, w)| format!("{:<w$}", c, w = *w).bold().to_string())
                    .collect();
                println!("{}", header.join("  ").trim_end());
                for row in rows {
                    println!("{}", pad_row(row, &widths).trim_end());
                }
            }
            OutputFormat::Plain => {
                for row in rows {
                    println!("{}", row.join("\t"));
                }
            }
            OutputFormat::Json => {}
        }
    }
}

fn column_widths(columns: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|cell| cell.chars().count())
                .fold(c.chars().count(), usize::max)
        })
        .collect()
}

fn pad_row(row: &[String], widths: &[usize]) -> String {
    row.iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
        .collect::<Vec<_>>()
        .join("  ")
}
