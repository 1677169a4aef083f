//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::Parser;
use colored::control;
use thiserror::Error;

use filename_guard::core::config::{Config, OutputFormat, parse_max_len};
use filename_guard::core::errors::GuardError;
use filename_guard::logger::{EventSink, EventType, JsonlSink, LogEntry, Severity, TextSink};
use filename_guard::scanner::walker::{NameScanner, ScanConfig, ScanReport};

/// Check that file names do not exceed a length limit.
#[derive(Debug, Parser)]
#[command(
    name = "fng",
    author,
    version,
    about = "Check that file names do not exceed a length limit.",
    long_about = None
)]
pub struct Cli {
    /// Directory to scan.
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,
    /// Maximum allowed file-name length (default: 64).
    #[arg(
        long,
        value_name = "N",
        allow_negative_numbers = true,
        value_parser = parse_max_len
    )]
    max_len: Option<i64>,
    /// Optional trace identifier for log correlation.
    #[arg(long, value_name = "ID")]
    trace_id: Option<String>,
    /// Output records as JSON lines.
    #[arg(long)]
    json: bool,
    /// Override config file path (default: ./.fng.toml when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

/// Result of a scan that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No file name exceeded the bound.
    Clean,
    /// This many files exceeded the bound.
    Violations(usize),
}

impl ScanOutcome {
    /// Process exit code contract for a completed scan.
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::Violations(_) => 2,
        }
    }
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Config file or environment could not be loaded.
    #[error("{0}")]
    Config(GuardError),
    /// Scan aborted before producing a result.
    #[error("{0}")]
    Scan(GuardError),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Scan(_) => 1,
        }
    }
}

/// Everything one run needs, after flags, env and config file are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    scan: ScanConfig,
    format: OutputFormat,
    color: bool,
}

/// Run one audit and report through a sink on stdout.
pub fn run(cli: &Cli) -> Result<ScanOutcome, CliError> {
    let loaded = Config::load(cli.config.as_deref());
    let invocation = resolve_invocation(
        cli,
        loaded.as_ref().unwrap_or(&Config::default()),
        io::stdout().is_terminal(),
    );

    if invocation.color {
        control::set_override(true);
    }
    let mut sink = build_sink(invocation.format, invocation.color);

    let trace_id = invocation.scan.trace_id.as_deref();
    if let Err(err) = loaded {
        emit_scan_error(sink.as_mut(), &err, trace_id);
        return Err(CliError::Config(err));
    }

    match NameScanner::new(invocation.scan.clone()).scan(sink.as_mut()) {
        Ok(report) => Ok(report_violations(sink.as_mut(), &report, &invocation.scan)),
        Err(err) => {
            emit_scan_error(sink.as_mut(), &err, trace_id);
            Err(CliError::Scan(err))
        }
    }
}

fn resolve_invocation(cli: &Cli, config: &Config, stdout_is_tty: bool) -> Invocation {
    let max_len = cli.max_len.unwrap_or(config.scan.max_len);
    let trace_id = cli.trace_id.clone().or_else(|| config.scan.trace_id.clone());
    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output.format
    };
    let color = format == OutputFormat::Human
        && config.output.color
        && !cli.no_color
        && stdout_is_tty;

    Invocation {
        scan: ScanConfig::new(&cli.directory)
            .with_max_len(max_len)
            .with_trace_id(trace_id),
        format,
        color,
    }
}

fn build_sink(format: OutputFormat, color: bool) -> Box<dyn EventSink> {
    match format {
        OutputFormat::Json => Box::new(JsonlSink::new(io::stdout())),
        OutputFormat::Human => Box::new(TextSink::new(io::stdout(), color)),
    }
}

/// Emit one `filename_too_long` record per violation, or `no_violations`.
fn report_violations(
    sink: &mut dyn EventSink,
    report: &ScanReport,
    scan: &ScanConfig,
) -> ScanOutcome {
    let trace_id = scan.trace_id.as_deref();

    if report.is_clean() {
        sink.emit(LogEntry::new(EventType::NoViolations, Severity::Info, trace_id));
        return ScanOutcome::Clean;
    }

    for v in &report.violations {
        sink.emit(
            LogEntry::new(EventType::FilenameTooLong, Severity::Warning, trace_id)
                .with_path(v.path.display().to_string())
                .with_length(v.name_length)
                .with_redacted_path(v.redacted_path.clone())
                .with_max_len(scan.max_len),
        );
    }
    ScanOutcome::Violations(report.violations.len())
}

fn emit_scan_error(sink: &mut dyn EventSink, err: &GuardError, trace_id: Option<&str>) {
    sink.emit(
        LogEntry::new(EventType::ScanError, Severity::Error, trace_id)
            .with_error(err.code(), err.to_string()),
    );
}
