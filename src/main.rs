use clap::Parser;
use logvisor::config::Config;
use logvisor::display::{format_details, format_entry, format_level_counts, format_summary};
use logvisor::export;
use logvisor::filter::{EntryFilter, filter_entries, level_counts};
use logvisor::sample::sample_logs;
use logvisor::source::{FileSource, StdinSource};
use logvisor::timestamp::{Clock, SystemClock, parse_timestamp};
use logvisor::{LogEntry, LogLevel, Pipeline};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logvisor",
    version,
    about = "Turn mixed-format log text into structured entries"
)]
struct Cli {
    /// Log file to parse. Omit to read from stdin.
    file: Option<PathBuf>,

    /// Parse the built-in sample logs instead of a file or stdin.
    #[arg(long, conflicts_with = "file")]
    sample: bool,

    /// Only show entries whose message or raw text contains this (case-insensitive).
    #[arg(short, long)]
    search: Option<String>,

    /// Only show entries at this level. Repeat to allow several.
    #[arg(short, long = "level")]
    levels: Vec<LogLevel>,

    /// Only show entries at or after this time.
    #[arg(long)]
    from: Option<String>,

    /// Only show entries at or before this time.
    #[arg(long)]
    to: Option<String>,

    /// Write the shown entries to this JSON file. Pass a directory to use the
    /// default `logs-<time>.json` name inside it.
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Print the shown entries as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Print fields and extracted fragments under each entry.
    #[arg(short, long)]
    details: bool,

    /// Config file (default: ~/.config/logvisor/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log parser diagnostics to stderr (filter with RUST_LOG).
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    let config = Config::load(cli.config.as_deref())?;

    let raw = if cli.sample {
        sample_logs()
    } else {
        match &cli.file {
            Some(path) => {
                if !path.exists() {
                    eprintln!("Error: file not found: {}", path.display());
                    std::process::exit(1);
                }
                FileSource::open(path)?.into_text()
            }
            None => {
                if std::io::stdin().is_terminal() {
                    eprintln!("Usage: logvisor <file> or pipe input via stdin");
                    eprintln!("Example: cat app.log | logvisor");
                    std::process::exit(1);
                }
                StdinSource::read_all()?.into_text()
            }
        }
    };

    if raw.trim().is_empty() {
        eprintln!("Input is empty: paste some logs or use --sample.");
        std::process::exit(1);
    }

    let clock = SystemClock;
    let now = clock.now();
    let entries = Pipeline::with_clock(clock)
        .parse(&raw)
        .map_err(|e| anyhow::anyhow!("Parsing error: {e}"))?;

    if entries.is_empty() {
        eprintln!("Could not parse any structured log entries.");
        return Ok(());
    }

    let filter = EntryFilter {
        search: cli.search.clone().unwrap_or_default(),
        levels: cli.levels.clone(),
        from: parse_bound(cli.from.as_deref(), now)?,
        to: parse_bound(cli.to.as_deref(), now)?,
    };
    let shown: Vec<LogEntry> = filter_entries(&entries, &filter)
        .into_iter()
        .map(|i| entries[i].clone())
        .collect();

    if let Some(target) = &cli.export {
        let path = if target.is_dir() {
            target.join(export::default_file_name(now))
        } else {
            target.clone()
        };
        match export::write_json(&path, &shown, config.export.pretty) {
            Ok(()) => eprintln!("Exported {} entries to {}", shown.len(), path.display()),
            Err(export::ExportError::Empty) => eprintln!("No entries to export."),
            Err(e) => return Err(e.into()),
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    let show_details = cli.details || config.display.show_details;
    for entry in &shown {
        println!("{}", format_entry(entry, &config.display.timestamp_format));
        if show_details {
            for line in format_details(entry) {
                println!("{}", line);
            }
        }
    }
    println!();
    println!("{}", format_summary(shown.len(), entries.len()));
    println!("{}", format_level_counts(&level_counts(&entries)));

    Ok(())
}

fn parse_bound(
    raw: Option<&str>,
    now: chrono::DateTime<chrono::Utc>,
) -> anyhow::Result<Option<chrono::DateTime<chrono::Utc>>> {
    match raw {
        None => Ok(None),
        Some(s) => parse_timestamp(s, now.date_naive())
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("invalid time bound: {s}")),
    }
}
