use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use itertools::Itertools;
use log::{debug, info};
use serde::Serialize;

use crate::{
    cli::{CleanArgs, parse_delimiter},
    config::PipelineConfig,
    error::PipelineError,
    io_utils, render,
    render::Align,
    stats::{self, ColumnStats},
    table::Table,
    transform::{
        Imputation, LabelCollision, normalize_columns, remove_invalid_rows,
        resolve_missing_values, trim_text_fields,
    },
};

/// Outcome of one cleaning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub rows_read: usize,
    pub rows_missing_essential: usize,
    pub rows_invalid: usize,
    pub rows_written: usize,
    pub columns: Vec<String>,
    pub collisions: Vec<LabelCollision>,
    pub imputations: Vec<Imputation>,
}

/// Runs the four cleaning stages over an already-loaded table.
pub fn clean_table(
    table: Table,
    config: &PipelineConfig,
) -> Result<(Table, CleanReport), PipelineError> {
    let rows_read = table.row_count();

    let normalized = normalize_columns(table, config.collision_policy)?;
    let trimmed = trim_text_fields(normalized.table, &config.text_fields_to_trim);
    let resolved =
        resolve_missing_values(trimmed, &config.essential_fields, &config.numeric_fields);
    let before_filter = resolved.table.row_count();
    let cleaned = remove_invalid_rows(resolved.table, &config.numeric_fields);

    let report = CleanReport {
        input_path: config.input_path.clone(),
        output_path: config.output_path.clone(),
        rows_read,
        rows_missing_essential: resolved.dropped_rows,
        rows_invalid: before_filter - cleaned.row_count(),
        rows_written: cleaned.row_count(),
        columns: cleaned.headers(),
        collisions: normalized.collisions,
        imputations: resolved.imputations,
    };
    Ok((cleaned, report))
}

/// Loads `config.input_path`, cleans it, and writes `config.output_path`.
pub fn run(config: &PipelineConfig) -> Result<(Table, CleanReport)> {
    config.validate()?;
    let delimiter = resolve_delimiter(&config.input_path, config.delimiter.as_deref())?;
    let encoding = io_utils::resolve_encoding(config.input_encoding.as_deref())
        .with_context(|| format!("Reading {:?}", config.input_path))?;
    let output_delimiter =
        resolve_delimiter(&config.output_path, config.output_delimiter.as_deref())?;
    info!(
        "Cleaning '{}' -> '{}' (delimiter '{}', output '{}')",
        config.input_path.display(),
        config.output_path.display(),
        crate::printable_delimiter(delimiter),
        crate::printable_delimiter(output_delimiter)
    );

    let raw = io_utils::read_table(&config.input_path, delimiter, encoding, |cell| {
        config.is_na(cell)
    })
    .with_context(|| format!("Loading {:?}", config.input_path))?;
    debug!("Input columns: {}", raw.headers().iter().join(", "));

    let (cleaned, report) = clean_table(raw, config)?;
    io_utils::write_table(&cleaned, &config.output_path, output_delimiter)
        .with_context(|| format!("Writing {:?}", config.output_path))?;
    info!(
        "Wrote {} of {} row(s) to {:?} ({} missing an essential field, {} invalid)",
        report.rows_written,
        report.rows_read,
        config.output_path,
        report.rows_missing_essential,
        report.rows_invalid
    );
    Ok((cleaned, report))
}

pub fn execute(args: &CleanArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let (cleaned, report) = run(&config)?;

    if !args.no_preview {
        println!("Cleaning complete. First few rows:");
        render::print_table(&cleaned, config.preview_rows);
    }
    if args.stats {
        print_stats(&cleaned);
    }
    if let Some(path) = &args.report {
        write_report(&report, path)?;
        info!("Run report written to {path:?}");
    }
    Ok(())
}

/// Starts from the config file (or defaults) and applies command-line overrides.
pub fn resolve_config(args: &CleanArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(input) = &args.input {
        config.input_path = input.clone();
    }
    if let Some(output) = &args.output {
        config.output_path = output.clone();
    }
    if let Some(delimiter) = args.delimiter {
        config.delimiter = Some((delimiter as char).to_string());
    }
    if let Some(delimiter) = args.output_delimiter {
        config.output_delimiter = Some((delimiter as char).to_string());
    }
    if let Some(encoding) = &args.input_encoding {
        config.input_encoding = Some(encoding.clone());
    }
    if let Some(policy) = args.on_collision {
        config.collision_policy = policy;
    }
    if let Some(rows) = args.preview_rows {
        config.preview_rows = rows;
    }
    Ok(config)
}

fn resolve_delimiter(path: &Path, configured: Option<&str>) -> Result<u8> {
    let provided = configured
        .map(|value| parse_delimiter(value).map_err(|err| anyhow!("Invalid delimiter: {err}")))
        .transpose()?;
    Ok(io_utils::resolve_delimiter(path, provided))
}

fn print_stats(table: &Table) {
    let rows = stats::summarize(table)
        .iter()
        .map(ColumnStats::render_row)
        .collect::<Vec<_>>();
    if rows.is_empty() {
        info!("No numeric columns to summarize");
        return;
    }
    let headers = ColumnStats::headers();
    let mut align = vec![Align::Right; headers.len()];
    align[0] = Align::Left;
    println!();
    print!("{}", render::render_grid(&headers, &rows, &align));
}

fn write_report(report: &CleanReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating report directory {parent:?}"))?;
    }
    let file = File::create(path).with_context(|| format!("Creating report file {path:?}"))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report).context("Writing run report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollisionPolicy;

    #[test]
    fn flags_override_config_values() {
        let args = CleanArgs {
            input: Some(PathBuf::from("other.csv")),
            delimiter: Some(b';'),
            on_collision: Some(CollisionPolicy::Error),
            preview_rows: Some(2),
            ..CleanArgs::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.input_path, PathBuf::from("other.csv"));
        assert_eq!(
            config.output_path,
            PathBuf::from(crate::config::DEFAULT_OUTPUT_PATH)
        );
        assert_eq!(config.delimiter.as_deref(), Some(";"));
        assert_eq!(config.collision_policy, CollisionPolicy::Error);
        assert_eq!(config.preview_rows, 2);
    }

    #[test]
    fn tab_delimiter_survives_the_round_trip_through_config() {
        assert_eq!(
            resolve_delimiter(Path::new("x.csv"), Some("\t")).unwrap(),
            b'\t'
        );
        assert_eq!(resolve_delimiter(Path::new("x.tsv"), None).unwrap(), b'\t');
        assert!(resolve_delimiter(Path::new("x.csv"), Some("::")).is_err());
    }
}
