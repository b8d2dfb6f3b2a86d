//! Loading and persisting tables as delimited text.
//!
//! - **Delimiters**: `.tsv` paths default to tab, everything else to comma,
//!   unless one is supplied explicitly.
//! - **Encoding**: input bytes are decoded with `encoding_rs` (UTF-8 unless a
//!   label is given). Output is always UTF-8.
//! - **Missing cells**: fields matching a configured missing token load as
//!   missing; missing cells are written back as empty fields.
//! - **stdin**: an input path of `-` reads from standard input.

use std::{
    collections::HashSet,
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::table::Table;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(path: &Path, delimiter: u8) -> Result<csv::Reader<Box<dyn Read>>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    Ok(open_csv_reader(reader, delimiter))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Gives repeated header labels a `.N` suffix so every column stays addressable:
/// `a, a, a` loads as `a, a.1, a.2`.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let originals: HashSet<String> = headers.iter().cloned().collect();
    headers
        .into_iter()
        .map(|header| {
            if seen.insert(header.clone()) {
                return header;
            }
            let renamed = (1usize..)
                .map(|n| format!("{header}.{n}"))
                .find(|candidate| !seen.contains(candidate) && !originals.contains(candidate))
                .unwrap_or_else(|| header.clone());
            seen.insert(renamed.clone());
            renamed
        })
        .collect()
}

/// Loads a delimited file with a header row into an all-text [`Table`].
/// Rows shorter than the header are padded with missing cells; longer rows
/// are rejected.
pub fn read_table(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
    is_missing: impl Fn(&str) -> bool,
) -> Result<Table> {
    let mut reader = open_csv_reader_from_path(path, delimiter)?;
    let raw_headers = reader
        .byte_headers()
        .with_context(|| format!("Reading header row of {path:?}"))?
        .clone();
    if raw_headers.is_empty() {
        bail!("No header row found in {path:?}");
    }
    let headers = dedupe_headers(
        decode_record(&raw_headers, encoding)
            .with_context(|| format!("Decoding header row of {path:?}"))?,
    );

    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let line = idx + 2;
        let record = record.with_context(|| format!("Reading row {line} of {path:?}"))?;
        if record.len() > headers.len() {
            bail!(
                "Row {line} of {path:?} has {} field(s) but the header defines {}",
                record.len(),
                headers.len()
            );
        }
        let cells = decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {line} of {path:?}"))?
            .into_iter()
            .map(|cell| (!is_missing(&cell)).then_some(cell))
            .collect::<Vec<_>>();
        rows.push(cells);
    }
    debug!(
        "Loaded {} row(s) across {} column(s) from {path:?}",
        rows.len(),
        headers.len()
    );
    Ok(Table::from_text_rows(&headers, rows))
}

/// Writes `table` with a header row and no index column, creating parent
/// directories as needed.
pub fn write_table(table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating output directory {parent:?}"))?;
    }
    let file = File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
    let mut writer = open_csv_writer(BufWriter::new(file), delimiter);
    writer
        .write_record(table.headers())
        .context("Writing output headers")?;
    for row in 0..table.row_count() {
        let cells = table
            .row_display(row)
            .into_iter()
            .map(Option::unwrap_or_default);
        writer
            .write_record(cells)
            .with_context(|| format!("Writing output row {}", row + 2))?;
    }
    writer.flush().context("Flushing output writer")?;
    Ok(())
}

fn open_csv_writer<W: Write>(writer: W, delimiter: u8) -> csv::Writer<W> {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true);
    builder.from_writer(writer)
}
