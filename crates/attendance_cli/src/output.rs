//! Table and JSON rendering for command results.

use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Display;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Prints rows as a table or a JSON array.
pub fn print_output<T>(data: &[T], format: OutputFormat) -> anyhow::Result<()>
where
    T: Serialize + Tabled,
{
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("No rows found.");
            } else {
                println!("{}", Table::new(data));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
    }
    Ok(())
}

/// Prints one row as a single-row table or a JSON object.
pub fn print_single<T>(data: &T, format: OutputFormat) -> anyhow::Result<()>
where
    T: Serialize + Tabled,
{
    match format {
        OutputFormat::Table => println!("{}", Table::new([data])),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
    }
    Ok(())
}

/// Prints a confirmation unless quiet. Suppressed for JSON output so stdout
/// stays machine-readable.
pub fn print_success(message: &str, format: OutputFormat, quiet: bool) {
    if !quiet && format == OutputFormat::Table {
        println!("{message}");
    }
}

pub fn optional_cell(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

#[cfg(test)]
mod tests {
    use super::{optional_cell, OutputFormat};
    use clap::ValueEnum;

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!(
            OutputFormat::from_str("JSON", true).unwrap(),
            OutputFormat::Json
        );
        assert_eq!(
            OutputFormat::from_str("table", false).unwrap(),
            OutputFormat::Table
        );
        assert!(OutputFormat::from_str("yaml", true).is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn missing_values_render_as_dash() {
        assert_eq!(optional_cell(None), "-");
        assert_eq!(optional_cell(Some("7A")), "7A");
    }
}
