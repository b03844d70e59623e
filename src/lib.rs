pub mod aggregate;
pub mod cli;
pub mod config;
pub mod data;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod io_utils;
pub mod loader;
pub mod profile;
pub mod recommend;
pub mod report;
pub mod sanitize;
pub mod summary;
pub mod table;

use std::{env, io::Write, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, OutputFormat},
    config::{LoadOptions, ProfileConfig},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("dataset_quality", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => handle_report(&args),
        Commands::Summary(args) => handle_summary(&args),
    }
}

fn build_config(args: &cli::ReportArgs) -> Result<ProfileConfig> {
    let mut config = match &args.config {
        Some(path) => ProfileConfig::load(path)
            .with_context(|| format!("Loading profiling config from {path:?}"))?,
        None => ProfileConfig::default(),
    };
    if let Some(bins) = args.bin_count {
        config.bin_count = bins;
    }
    if let Some(multiplier) = args.outlier_multiplier {
        config.outlier_multiplier = multiplier;
    }
    if let Some(top) = args.top {
        config.top_n_categories = top;
    }
    if let Some(min) = args.min_frequency {
        config.min_category_frequency = min;
    }
    if let Some(max) = args.max_columns {
        config.max_columns = max;
    }
    if let Some(policy) = args.invalid_values {
        config.invalid_values = policy.into();
    }
    for directive in &args.expect {
        config
            .add_expectation(directive)
            .with_context(|| format!("Parsing --expect '{directive}'"))?;
    }
    if args.delimiter.is_some() {
        config.load.delimiter = args.delimiter;
    }
    if args.input_encoding.is_some() {
        config.load.encoding = args.input_encoding.clone();
    }
    if args.keep_empty_strings {
        config.load.empty_as_null = false;
    }
    config.validate()?;
    debug!("Profiling config: {:?}", config);
    Ok(config)
}

fn handle_report(args: &cli::ReportArgs) -> Result<()> {
    let config = build_config(args)?;
    info!(
        "Profiling '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(io_utils::resolve_input_delimiter(
            &args.input,
            config.load.delimiter
        ))
    );
    let report = report::generate_report(&args.input, &config);
    let rendered = match args.format {
        OutputFormat::Json => {
            let mut json = report
                .to_json(args.pretty)
                .context("Serializing quality report")?;
            json.push('\n');
            json
        }
        OutputFormat::Table => report::render_text(&report),
    };
    let mut writer = io_utils::open_output(args.output.as_deref())
        .with_context(|| format!("Opening report output {:?}", args.output))?;
    writer
        .write_all(rendered.as_bytes())
        .context("Writing quality report")?;
    writer.flush().context("Flushing quality report")?;

    match report.error {
        Some(error) => Err(anyhow!("Quality report failed: {error}")),
        None => {
            info!(
                "Quality report for {} column(s) written, score {:.2}",
                report.column_quality.len(),
                report.quality_score
            );
            Ok(())
        }
    }
}

fn handle_summary(args: &cli::SummaryArgs) -> Result<()> {
    let options = LoadOptions {
        delimiter: args.delimiter,
        encoding: args.input_encoding.clone(),
        ..LoadOptions::default()
    };
    let table = loader::load_table(&args.input, &options)
        .with_context(|| format!("Loading dataset {:?}", args.input))?;
    let summary = summary::summarize(&table, args.preview_rows);
    let json = if args.pretty {
        serde_json::to_string_pretty(&summary)
    } else {
        serde_json::to_string(&summary)
    }
    .context("Serializing dataset summary")?;
    println!("{json}");
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
