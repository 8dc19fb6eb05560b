//! worklog CLI - Weekly report generator
//!
//! Reads one person's daily work-log entries for a week and writes them,
//! grouped by project, into a copy of a report template.

mod settings;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use worklog_core::{LogEntry, ReportConfig, Renderer, WeeklyReport};
use worklog_extract::extract_file;
use worklog_render::{ExcelRenderer, TextRenderer};

use crate::settings::Overrides;

#[derive(Parser)]
#[command(name = "worklog")]
#[command(author, version, about = "Weekly report generator for daily work logs", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML config file
    #[arg(short, long, value_name = "FILE", env = "WORKLOG_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Generate the weekly report workbook (default)
    Generate,

    /// Print the extracted daily entries
    Extract {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Print the grouped report without writing a workbook
    Preview,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    /// Report written or printed
    Success = 0,
    /// Any error; the run was aborted
    Failure = 1,
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

fn main() -> process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::Success.into(),
        Err(err) => {
            error!("{err:#}");
            ExitCode::Failure.into()
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = settings::load(cli.config.as_deref(), cli.overrides)
        .context("invalid configuration")?;
    info!(
        input = %config.input.display(),
        sheet = %config.sheet,
        name = %config.week.name,
        start = %config.week.start,
        end = %config.week.end,
        "reading daily report"
    );

    let command = cli.command.unwrap_or(Commands::Generate);
    if matches!(command, Commands::Generate) {
        config.validate_template().context("invalid configuration")?;
    }

    let entries = extract_file(&config.input, &config.sheet, &config.week)
        .with_context(|| format!("failed to read entries from {}", config.input.display()))?;
    info!(count = entries.len(), "extracted entries");

    match command {
        Commands::Generate => {
            let output = generate(&config, &entries)?;
            println!("{}", output.display());
        }
        Commands::Extract { format } => print_entries(&entries, format)?,
        Commands::Preview => {
            let report = WeeklyReport::build(&entries);
            print!("{}", TextRenderer::new().render(&report)?);
        }
    }

    Ok(())
}

/// Group the entries and write the report workbook; returns its path
fn generate(config: &ReportConfig, entries: &[LogEntry]) -> Result<PathBuf> {
    let report = WeeklyReport::build(entries);
    info!(
        projects = report.project_count(),
        rows = report.row_count(),
        "grouped tasks"
    );

    let output = config.output_path(Local::now().naive_local());
    ExcelRenderer::new(&config.template)
        .render_to_file(&report, &output)
        .with_context(|| {
            format!(
                "failed to render {} from template {}",
                output.display(),
                config.template.display()
            )
        })?;
    info!(output = %output.display(), "report written");
    Ok(output)
}

fn print_entries(entries: &[LogEntry], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(entries)?),
        Format::Text => {
            for entry in entries {
                println!("{}  {}", entry.date, entry.name);
                for line in entry.task.lines().map(str::trim).filter(|l| !l.is_empty()) {
                    println!("    {line}");
                }
            }
        }
    }
    Ok(())
}
