pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod io_utils;
pub mod pipeline;
pub mod preview;
pub mod render;
pub mod stats;
pub mod table;
pub mod transform;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{CleanArgs, Cli, Commands};

pub use crate::{
    config::PipelineConfig,
    error::PipelineError,
    pipeline::{CleanReport, clean_table},
    table::Table,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sales_cleaner", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        None => pipeline::execute(&CleanArgs::default()),
        Some(Commands::Clean(args)) => pipeline::execute(&args),
        Some(Commands::Preview(args)) => preview::execute(&args),
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
