//! tdlv - entry point.
//!
//! Thin caller surface over the pagination engine: binds a session to the
//! given file, pages through it, and writes matching records tab-separated
//! to stdout. Status and diagnostics go to stderr and the log file, so the
//! three outcomes stay distinct: "could not open" (fatal), "end of file"
//! (expected), and "no records matched" (neither).

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use tdlv::model::{AppError, FilterSettings, LogLevel, LogRecord};
use tdlv::parser::parse_timestamp;
use tdlv::session::PaginationSession;

/// Page through a tab-delimited log file with filtering.
#[derive(Parser, Debug)]
#[command(name = "tdlv")]
#[command(version)]
#[command(about = "Incremental paging and filtering for tab-delimited log files")]
struct Args {
    /// Path to the log file (fields: timestamp, level, source, message, detail)
    file: PathBuf,

    /// Raw lines per page
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Keep only records containing this text in any field
    #[arg(short, long)]
    filter: Option<String>,

    /// Match filter text case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Keep only records with exactly this level
    #[arg(short, long)]
    level: Option<LogLevelArg>,

    /// Keep only records at or after this timestamp (e.g. "2023-10-01 00:00:00")
    #[arg(long, value_parser = parse_timestamp_arg)]
    from: Option<chrono::NaiveDateTime>,

    /// Keep only records at or before this timestamp
    #[arg(long, value_parser = parse_timestamp_arg)]
    to: Option<chrono::NaiveDateTime>,

    /// Stop after this many pages (0 reads to end of file)
    #[arg(short, long, default_value = "0")]
    pages: usize,

    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Newtype so clap can parse levels through `FromStr`.
#[derive(Debug, Clone, Copy)]
struct LogLevelArg(LogLevel);

impl std::str::FromStr for LogLevelArg {
    type Err = tdlv::model::InvalidLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(LogLevelArg)
    }
}

fn parse_timestamp_arg(raw: &str) -> Result<chrono::NaiveDateTime, String> {
    parse_timestamp(raw).ok_or_else(|| format!("unrecognized timestamp: '{raw}'"))
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let config = {
        let config_file = tdlv::config::load_config_with_precedence(args.config.clone())?;
        let merged = tdlv::config::merge_config(config_file);
        let with_env = tdlv::config::apply_env_overrides(merged);
        tdlv::config::apply_cli_overrides(with_env, args.batch_size, args.case_sensitive)
    };

    tdlv::logging::init(&config.log_file_path)?;
    info!(config = ?config, "configuration resolved");

    let settings = FilterSettings {
        filter_text: args.filter.clone(),
        ignore_case: config.ignore_case,
        start_date_time: args.from,
        end_date_time: args.to,
        min_level: args.level.map(|l| l.0),
    };
    let has_filter = settings.filter_text.is_some()
        || settings.start_date_time.is_some()
        || settings.end_date_time.is_some()
        || settings.min_level.is_some();

    let mut session = PaginationSession::new(config.batch_size);
    session.bind(&args.file, &settings)?;

    let mut pages_loaded = 1usize;
    while !session.end_of_file() && (args.pages == 0 || pages_loaded < args.pages) {
        session.load_more(&settings)?;
        pages_loaded += 1;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in session.records() {
        write_record(&mut out, record)?;
    }

    if session.records().is_empty() && session.end_of_file() && has_filter {
        eprintln!("no records matched the filter ({} lines read)", session.cursor());
    } else if session.end_of_file() {
        eprintln!("end of file ({} lines read)", session.cursor());
    } else {
        eprintln!(
            "{} pages loaded, more data remains ({} lines read)",
            pages_loaded,
            session.cursor()
        );
    }

    Ok(())
}

fn write_record(out: &mut impl Write, record: &LogRecord) -> std::io::Result<()> {
    let timestamp = record.timestamp.map(|ts| ts.to_string()).unwrap_or_default();
    let level = record.level.map(|l| l.as_str()).unwrap_or_default();
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}",
        timestamp,
        level,
        record.source.as_deref().unwrap_or_default(),
        record.message.as_deref().unwrap_or_default(),
        record.detail_message.as_deref().unwrap_or_default(),
    )
}
