use crate::people::{MalformedCellPolicy, NormalizationMode};
use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "publications_min.csv.gz";
pub const DEFAULT_OUTPUT: &str = "unique_people.csv";
pub const DEFAULT_HEADER: &str = "firstname,lastname";
pub const DEFAULT_NAMES_COLUMN: &str = "authors";

/// Top-level configuration for a deduplication run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let input = env::var("PEOPLE_INPUT").unwrap_or_else(|_| DEFAULT_INPUT.to_string());
        let output = env::var("PEOPLE_OUTPUT").unwrap_or_else(|_| DEFAULT_OUTPUT.to_string());
        let header = env::var("PEOPLE_HEADER").unwrap_or_else(|_| DEFAULT_HEADER.to_string());
        let names_column =
            env::var("PEOPLE_NAMES_COLUMN").unwrap_or_else(|_| DEFAULT_NAMES_COLUMN.to_string());

        let normalization = match env::var("PEOPLE_NORMALIZATION") {
            Ok(raw) => NormalizationMode::parse(&raw)
                .ok_or(ConfigError::InvalidNormalization { value: raw })?,
            Err(_) => NormalizationMode::default(),
        };

        let on_malformed = match env::var("PEOPLE_ON_MALFORMED") {
            Ok(raw) => MalformedCellPolicy::parse(&raw)
                .ok_or(ConfigError::InvalidMalformedPolicy { value: raw })?,
            Err(_) => MalformedCellPolicy::default(),
        };

        let log_level = env::var("PEOPLE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_ansi = match env::var("PEOPLE_LOG_ANSI") {
            Ok(raw) => parse_switch(&raw).ok_or(ConfigError::InvalidSwitch {
                name: "PEOPLE_LOG_ANSI",
                value: raw,
            })?,
            Err(_) => false,
        };

        Ok(Self {
            pipeline: PipelineConfig {
                input: PathBuf::from(input),
                output: PathBuf::from(output),
                header: header_line(header),
                names_column,
                normalization,
                on_malformed,
            },
            telemetry: TelemetryConfig {
                log_level,
                ansi: log_ansi,
            },
        })
    }
}

/// Inputs, outputs and processing switches for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Literal first line of the output; `None` writes no header.
    pub header: Option<String>,
    pub names_column: String,
    pub normalization: NormalizationMode,
    pub on_malformed: MalformedCellPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            header: Some(DEFAULT_HEADER.to_string()),
            names_column: DEFAULT_NAMES_COLUMN.to_string(),
            normalization: NormalizationMode::default(),
            on_malformed: MalformedCellPolicy::default(),
        }
    }
}

/// Maps an empty header string to "no header".
pub fn header_line(raw: String) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw)
    }
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Tracing controls. Logs always go to stderr; stdout carries the summary.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Fallback filter when `RUST_LOG` is unset or unparsable.
    pub log_level: String,
    /// Colored output, off by default so redirected logs stay plain.
    pub ansi: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNormalization { value: String },
    InvalidMalformedPolicy { value: String },
    InvalidSwitch { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNormalization { value } => write!(
                f,
                "PEOPLE_NORMALIZATION must be 'clean' or 'legacy', got '{}'",
                value
            ),
            ConfigError::InvalidMalformedPolicy { value } => write!(
                f,
                "PEOPLE_ON_MALFORMED must be 'fail' or 'skip', got '{}'",
                value
            ),
            ConfigError::InvalidSwitch { name, value } => {
                write!(f, "{} must be a boolean switch, got '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
