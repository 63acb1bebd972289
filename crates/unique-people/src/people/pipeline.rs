use super::canonicalizer::{canonicalize, CanonicalEntry};
use super::clusterer::{cluster, PhoneticClusters};
use super::encoder::NameEncoder;
use super::normalizer::NormalizationMode;
use super::reader::{self, MalformedCellPolicy, ReadError, ReadStats};
use super::writer::{self, WriteError};
use crate::config::PipelineConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("could not open input {}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not create output {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Clusters built from one input plus the counters gathered while reading it.
#[derive(Debug)]
pub struct Deduplication {
    pub clusters: PhoneticClusters,
    pub stats: ReadStats,
}

impl Deduplication {
    /// One canonical entry per cluster, in first-seen key order.
    pub fn entries(&self) -> Vec<CanonicalEntry> {
        self.clusters
            .iter()
            .filter_map(|cluster| canonicalize(&cluster.names))
            .collect()
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input: String,
    pub output: String,
    pub normalization: &'static str,
    #[serde(flatten)]
    pub stats: ReadStats,
    pub clusters: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Reads names from `reader` and groups them into phonetic clusters.
pub fn deduplicate<R: Read>(
    reader: R,
    column: &str,
    normalization: NormalizationMode,
    on_malformed: MalformedCellPolicy,
) -> Result<Deduplication, ReadError> {
    let raw = reader::read_names(reader, column, on_malformed)?;
    let encoder = NameEncoder::new();
    let clusters = cluster(raw.names, normalization, &encoder);

    Ok(Deduplication {
        clusters,
        stats: raw.stats,
    })
}

/// Full pass over in-memory streams; returns the read counters and the number
/// of rows written.
pub fn process<R: Read, W: Write>(
    reader: R,
    writer: W,
    config: &PipelineConfig,
) -> Result<(ReadStats, u64), PipelineError> {
    let deduplication = deduplicate(
        reader,
        &config.names_column,
        config.normalization,
        config.on_malformed,
    )?;
    let entries = deduplication.entries();
    let written = writer::write_entries(writer, config.header.as_deref(), &entries)?;
    Ok((deduplication.stats, written))
}

/// Reads `config.input` and writes `config.output`.
pub fn run(config: &PipelineConfig) -> Result<RunSummary, PipelineError> {
    let started_at = Utc::now();
    info!(
        input = %config.input.display(),
        output = %config.output.display(),
        column = %config.names_column,
        normalization = config.normalization.label(),
        "deduplicating people"
    );

    let input = reader::open_input(&config.input).map_err(|source| PipelineError::OpenInput {
        path: config.input.clone(),
        source,
    })?;
    let deduplication = deduplicate(
        input,
        &config.names_column,
        config.normalization,
        config.on_malformed,
    )?;
    let entries = deduplication.entries();

    // Created only once the whole input has been read, so a failed read
    // leaves no output behind.
    let output = File::create(&config.output).map_err(|source| PipelineError::CreateOutput {
        path: config.output.clone(),
        source,
    })?;
    let clusters =
        writer::write_entries(BufWriter::new(output), config.header.as_deref(), &entries)?;
    let stats = deduplication.stats;

    let summary = RunSummary {
        input: config.input.display().to_string(),
        output: config.output.display().to_string(),
        normalization: config.normalization.label(),
        stats,
        clusters,
        started_at,
        finished_at: Utc::now(),
    };

    info!(
        rows = summary.stats.rows_read,
        bad_lines = summary.stats.bad_lines,
        distinct_names = summary.stats.distinct_names,
        clusters = summary.clusters,
        "people deduplicated"
    );

    Ok(summary)
}
