//! `crossover`: load a daily OHLCV file, compute two SMAs and print the
//! crossover markers for the requested date range.

mod args;
mod render;

use anyhow::{Context, Result};
use args::{parse_user_date, resolve_range, Args, OutputFormat};
use clap::Parser;
use crossover_core::Config;
use crossover_ingestion::{load_series_with_stats, read_raw_records_from_path};
use crossover_signals::ChartSession;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    args.apply(&mut config);
    config.validate()?;

    // validate() guarantees an ASCII delimiter
    let delimiter = config.input.delimiter as u8;
    let raw = read_raw_records_from_path(&args.input, delimiter)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let (series, stats) = load_series_with_stats(raw)
        .with_context(|| format!("loading {}", args.input.display()))?;
    info!(
        kept = stats.kept(),
        zero_volume = stats.zero_volume_dropped,
        duplicates = stats.duplicate_dates,
        "Read price file"
    );

    let mut session = ChartSession::new();
    session.load_series(series);

    let date_format = &config.display.input_date_format;
    let start = args
        .start
        .as_deref()
        .map(|s| parse_user_date(s, date_format))
        .transpose()?;
    let end = args
        .end
        .as_deref()
        .map(|s| parse_user_date(s, date_format))
        .transpose()?;
    let range = resolve_range(start, end, session.full_range());

    let annotated = session.update(
        config.signal.window_a,
        config.signal.window_b,
        range.as_ref(),
    )?;

    let precision = config.display.precision;
    let output = match args.format {
        OutputFormat::Table => render::render_table(&annotated, precision),
        OutputFormat::Json => render::render_json(&annotated)?,
        OutputFormat::Edges => render::render_edges(&annotated, precision),
    };
    print!("{}", output);
    if args.format == OutputFormat::Json {
        println!();
    }

    Ok(())
}
