//! Output formatting for eea (table, json)

use clap::ValueEnum;
use colored::Colorize;
use eea_core::Violation;
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print a section heading (table output only)
    pub fn heading(&self, title: &str) {
        if !self.quiet && !self.is_json() {
            println!("\n{}", title.bold());
        }
    }

    /// Print a warning message
    pub fn warn(&self, msg: &str) {
        eprintln!("{}", msg.yellow());
    }

    /// Print an error message
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    /// Print rows as a table
    ///
    /// JSON callers assemble one document and use [`print_json`](Self::print_json)
    /// instead, so this only renders tables.
    pub fn print<T: Tabled>(&self, data: &[T]) {
        if data.is_empty() {
            if !self.quiet {
                println!("None");
            }
        } else {
            println!("{}", Table::new(data));
        }
    }

    /// Print any serializable value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, data: &T) {
        println!(
            "{}",
            serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
        );
    }

    /// Print key-value pairs
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in pairs {
                    println!("{}: {}", key.bold(), value);
                }
            }
            OutputFormat::Json => {
                let map: std::collections::BTreeMap<&str, &str> =
                    pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
                self.print_json(&map);
            }
        }
    }
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// Component display for show command
#[derive(Debug, Tabled, Serialize)]
pub struct ComponentRow {
    #[tabled(rename = "Component")]
    pub name: String,
    #[tabled(rename = "Inputs")]
    pub inputs: String,
    #[tabled(rename = "Outputs")]
    pub outputs: String,
    #[tabled(rename = "Diagnostic")]
    pub diagnostic: String,
    #[tabled(rename = "ECU")]
    pub ecu: String,
}

/// ECU display for show command
#[derive(Debug, Tabled, Serialize)]
pub struct EcuRow {
    #[tabled(rename = "ECU")]
    pub name: String,
    #[tabled(rename = "Components")]
    pub components: String,
}

/// Task display for show command
#[derive(Debug, Tabled, Serialize)]
pub struct TaskRow {
    #[tabled(rename = "Task")]
    pub name: String,
    #[tabled(rename = "Priority")]
    pub priority: u32,
    #[tabled(rename = "Core")]
    pub core: u32,
    #[tabled(rename = "Component")]
    pub component: String,
}

/// Violation or warning display for validate and export commands
#[derive(Debug, Tabled, Serialize)]
pub struct ViolationRow {
    #[tabled(rename = "#")]
    pub invariant: u8,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Entities")]
    pub entities: String,
    #[tabled(rename = "Message")]
    pub message: String,
}

impl From<&Violation> for ViolationRow {
    fn from(v: &Violation) -> Self {
        Self {
            invariant: v.kind.invariant(),
            kind: v.kind.to_string(),
            entities: v.entities.join(", "),
            message: v.message.clone(),
        }
    }
}

/// Join names for a table cell, `-` when empty
pub fn join_or_dash<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let joined = names.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}
