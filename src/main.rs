use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use unique_people::config::{header_line, AppConfig, PipelineConfig};
use unique_people::error::AppError;
use unique_people::people::{self, MalformedCellPolicy, NameEncoder, NormalizationMode, RunSummary};
use unique_people::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "unique-people",
    about = "Collapse spelling variants of author names into one list of unique people",
    version,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the normalized tokens and phonetic key of each name
    Key(KeyArgs),
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Gzip-compressed (or plain) CSV file holding the names column
    #[arg(long)]
    input: Option<PathBuf>,
    /// File receiving one `firstname,lastname` line per person
    #[arg(long)]
    output: Option<PathBuf>,
    /// First output line; pass an empty string to omit it
    #[arg(long)]
    header: Option<String>,
    /// Column holding the list of author names
    #[arg(long)]
    column: Option<String>,
    /// Normalization rules: clean or legacy
    #[arg(long, value_parser = parse_normalization)]
    normalization: Option<NormalizationMode>,
    /// Skip rows whose names cell is not a list instead of aborting
    #[arg(long)]
    skip_malformed: bool,
    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct KeyArgs {
    /// Names to encode
    #[arg(required = true)]
    names: Vec<String>,
    /// Normalization rules: clean or legacy
    #[arg(long, value_parser = parse_normalization)]
    normalization: Option<NormalizationMode>,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Some(Command::Key(args)) => {
            let mode = args.normalization.unwrap_or(config.pipeline.normalization);
            print_keys(&args.names, mode);
            Ok(())
        }
        None => run_pipeline(config.pipeline, cli.run),
    }
}

fn parse_normalization(raw: &str) -> Result<NormalizationMode, String> {
    NormalizationMode::parse(raw)
        .ok_or_else(|| format!("unknown normalization '{raw}' (expected clean or legacy)"))
}

fn apply_overrides(config: &mut PipelineConfig, args: &mut RunArgs) {
    if let Some(input) = args.input.take() {
        config.input = input;
    }
    if let Some(output) = args.output.take() {
        config.output = output;
    }
    if let Some(header) = args.header.take() {
        config.header = header_line(header);
    }
    if let Some(column) = args.column.take() {
        config.names_column = column;
    }
    if let Some(mode) = args.normalization {
        config.normalization = mode;
    }
    if args.skip_malformed {
        config.on_malformed = MalformedCellPolicy::Skip;
    }
}

fn run_pipeline(mut config: PipelineConfig, mut args: RunArgs) -> Result<(), AppError> {
    apply_overrides(&mut config, &mut args);

    let summary = people::run(&config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render_summary(&summary);
    }

    info!(output = %summary.output, "run complete");
    Ok(())
}

fn render_summary(summary: &RunSummary) {
    let stats = &summary.stats;
    println!("Input: {}", summary.input);
    println!(
        "Rows read: {} ({} without names, {} bad lines skipped, {} malformed cells skipped)",
        stats.rows_read, stats.null_rows, stats.bad_lines, stats.malformed_cells
    );
    println!(
        "Names: {} listed, {} distinct",
        stats.names_exploded, stats.distinct_names
    );
    println!(
        "People: {} written to {}",
        summary.clusters, summary.output
    );
    println!("finished");
}

fn print_keys(names: &[String], mode: NormalizationMode) {
    let encoder = NameEncoder::new();
    for name in names {
        let normalized = people::normalize(name, mode);
        let key = encoder.encode(&normalized);
        println!("{name}\t{}\t{key}", normalized.joined());
    }
}
