use anyhow::Result;
use log::info;

use crate::{cli::PreviewArgs, config::PipelineConfig, io_utils, render};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let delimiter = io_utils::resolve_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let defaults = PipelineConfig::default();
    let table = io_utils::read_table(&args.input, delimiter, encoding, |cell| defaults.is_na(cell))?;

    render::print_table(&table, args.rows);
    info!(
        "Displayed {} of {} row(s) from {:?}",
        table.row_count().min(args.rows),
        table.row_count(),
        args.input
    );
    Ok(())
}
