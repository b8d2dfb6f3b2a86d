use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::CollisionPolicy;

#[derive(Debug, Parser)]
#[command(author, version, about = "Clean raw sales CSV exports", long_about = None)]
pub struct Cli {
    /// Defaults to `clean` with the stock paths when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize headers, trim text, impute missing numbers, and drop invalid rows
    Clean(CleanArgs),
    /// Preview the first few rows of a CSV file in a formatted table
    Preview(PreviewArgs),
}

#[derive(Debug, Default, Args)]
pub struct CleanArgs {
    /// Raw input CSV (defaults to data/raw/sales_data_raw.csv)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Cleaned output CSV (defaults to data/processed/sales_data_clean.csv)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// YAML pipeline configuration; flags given here take precedence over it
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// CSV delimiter character for reading input (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter to use for output (defaults to comma, or tab for .tsv files)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// How to resolve two headers that normalize to the same label
    #[arg(long = "on-collision", value_enum)]
    pub on_collision: Option<CollisionPolicy>,
    /// Number of cleaned rows to print after the run
    #[arg(long = "preview-rows")]
    pub preview_rows: Option<usize>,
    /// Skip the console preview
    #[arg(long = "no-preview")]
    pub no_preview: bool,
    /// Print summary statistics for numeric columns of the cleaned table
    #[arg(long)]
    pub stats: bool,
    /// Write a JSON run report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// CSV file to display
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
