use super::literal::{parse_string_list, ListLiteralError};
use flate2::read::MultiGzDecoder;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::warn;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Cell spellings treated as missing, following the pandas defaults.
const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// What to do with a names cell that is not a list of quoted strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedCellPolicy {
    #[default]
    Fail,
    Skip,
}

impl MalformedCellPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail" => Some(Self::Fail),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("column '{column}' not found in input header")]
    MissingColumn { column: String },
    #[error("row {row}: names cell is not a list of quoted strings ({source})")]
    MalformedCell {
        row: u64,
        #[source]
        source: ListLiteralError,
    },
}

/// Row and name counters gathered while reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadStats {
    pub rows_read: u64,
    pub null_rows: u64,
    pub bad_lines: u64,
    pub malformed_cells: u64,
    pub names_exploded: u64,
    pub distinct_names: u64,
}

/// Distinct raw names in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct RawNames {
    pub names: Vec<String>,
    pub stats: ReadStats,
}

/// Opens `path`, transparently decompressing gzip content.
pub fn open_input<P: AsRef<Path>>(path: P) -> std::io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    decompressing(file)
}

/// Wraps `reader` in a gzip decoder when it starts with the gzip magic bytes.
pub fn decompressing<R: Read + 'static>(reader: R) -> std::io::Result<Box<dyn Read>> {
    let mut buffered = BufReader::new(reader);
    let is_gzip = buffered.fill_buf()?.starts_with(&GZIP_MAGIC);
    if is_gzip {
        Ok(Box::new(MultiGzDecoder::new(buffered)))
    } else {
        Ok(Box::new(buffered))
    }
}

/// Selects `column`, drops null cells, parses each cell as a list of names,
/// explodes the lists and removes exact duplicates.
pub fn read_names<R: Read>(
    reader: R,
    column: &str,
    policy: MalformedCellPolicy,
) -> Result<RawNames, ReadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let header_len = headers.len();
    let index = headers
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| ReadError::MissingColumn {
            column: column.to_string(),
        })?;

    let mut stats = ReadStats::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        let row = row as u64 + 1;
        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(ReadError::Csv(err)),
            Err(err) => {
                let line = err.position().map(|position| position.line());
                warn!(?line, error = %err, "skipping unreadable line");
                stats.bad_lines += 1;
                continue;
            }
        };

        if record.len() > header_len {
            let line = record.position().map(|position| position.line());
            warn!(
                ?line,
                fields = record.len(),
                expected = header_len,
                "skipping line with too many fields"
            );
            stats.bad_lines += 1;
            continue;
        }

        stats.rows_read += 1;

        let cell = match record.get(index) {
            Some(cell) if !is_null(cell) => cell,
            _ => {
                stats.null_rows += 1;
                continue;
            }
        };

        let parsed = match parse_string_list(cell) {
            Ok(parsed) => parsed,
            Err(source) => match policy {
                MalformedCellPolicy::Fail => {
                    return Err(ReadError::MalformedCell { row, source });
                }
                MalformedCellPolicy::Skip => {
                    warn!(row, error = %source, "skipping malformed names cell");
                    stats.malformed_cells += 1;
                    continue;
                }
            },
        };

        for name in parsed {
            stats.names_exploded += 1;
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }
    }

    stats.distinct_names = names.len() as u64;
    Ok(RawNames { names, stats })
}

fn is_null(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || NULL_TOKENS.contains(&trimmed)
}
