//! Command-line and config-file settings
//!
//! Precedence, lowest first: TOML config file, `WORKLOG_*` environment
//! variables, command-line flags. Clap folds the environment into the flag
//! values, so only two layers are merged here.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use tracing::debug;
use worklog_core::{ConfigLayer, ReportConfig, WeekLayer};

/// Per-run overrides of the config file
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Daily report workbook
    #[arg(long, value_name = "FILE", env = "WORKLOG_INPUT", global = true)]
    pub input: Option<PathBuf>,

    /// Template workbook containing a "Form" sheet
    #[arg(long, value_name = "FILE", env = "WORKLOG_TEMPLATE", global = true)]
    pub template: Option<PathBuf>,

    /// Directory receiving the generated report
    #[arg(long, value_name = "DIR", env = "WORKLOG_OUTPUT_DIR", global = true)]
    pub output_dir: Option<PathBuf>,

    /// File name prefix of the generated report
    #[arg(long, env = "WORKLOG_PREFIX", global = true)]
    pub prefix: Option<String>,

    /// Monthly sheet to read (MMYYYY)
    #[arg(long, env = "WORKLOG_SHEET", global = true)]
    pub sheet: Option<String>,

    /// Person whose entries are reported
    #[arg(long, env = "WORKLOG_NAME", global = true)]
    pub name: Option<String>,

    /// First day of the week (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", env = "WORKLOG_START", global = true)]
    pub start: Option<NaiveDate>,

    /// Last day of the week (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", env = "WORKLOG_END", global = true)]
    pub end: Option<NaiveDate>,

    /// Month of the sheet, used when --sheet is absent
    #[arg(long, env = "WORKLOG_MONTH", global = true)]
    pub month: Option<u32>,

    /// Year of the sheet, used when --sheet is absent
    #[arg(long, env = "WORKLOG_YEAR", global = true)]
    pub year: Option<i32>,
}

impl From<Overrides> for ConfigLayer {
    fn from(o: Overrides) -> Self {
        ConfigLayer {
            input: o.input,
            template: o.template,
            output_dir: o.output_dir,
            output_prefix: o.prefix,
            sheet: o.sheet,
            week: WeekLayer {
                name: o.name,
                start: o.start,
                end: o.end,
                month: o.month,
                year: o.year,
            },
        }
    }
}

/// Read the optional config file, apply overrides and validate the result
pub fn load(config_file: Option<&Path>, overrides: Overrides) -> Result<ReportConfig> {
    let base = match config_file {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("cannot read config file {}", path.display()))?;
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            debug!(path = %path.display(), "loaded config file");
            ConfigLayer::from_toml_str(&source)
                .with_context(|| format!("in config file {}", path.display()))?
                .relative_to(dir)
        }
        None => ConfigLayer::default(),
    };

    let config = base.merge(overrides.into()).finish()?;
    config.validate()?;
    Ok(config)
}
