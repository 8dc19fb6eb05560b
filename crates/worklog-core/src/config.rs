//! Run configuration.
//!
//! Settings arrive in layers (config file, environment, command line), each
//! a [`ConfigLayer`] of optional fields. Layers are merged with later ones
//! winning and then finished into a [`ReportConfig`], which is validated
//! before any workbook is opened.
//!
//! ```toml
//! input = "daily-report.xlsx"
//! template = "template.xlsx"
//! output_dir = "output"
//! output_prefix = "WeeklyReport"
//! sheet = "122024"
//!
//! [week]
//! name = "Alice"
//! start = "2024-12-09"
//! end = "2024-12-15"
//! month = 12
//! year = 2024
//! ```

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

use crate::SheetPeriod;

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_OUTPUT_PREFIX: &str = "WeeklyReport";

/// Configuration error
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingField(&'static str),

    #[error("{role} file not found: {}", path.display())]
    FileNotFound { role: &'static str, path: PathBuf },

    #[error("Week start {start} is after week end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Person name is empty")]
    EmptyName,

    #[error("Invalid sheet name '{0}': expected MMYYYY")]
    InvalidSheetName(String),

    #[error("Sheet '{sheet}' does not match month {month} / year {year}")]
    PeriodMismatch { sheet: String, month: u32, year: i32 },

    #[error("Invalid config file: {0}")]
    Parse(String),
}

/// Filter settings for one person's week
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeekLayer {
    pub name: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// One source of settings; every field optional
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub input: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub output_prefix: Option<String>,
    pub sheet: Option<String>,
    #[serde(default)]
    pub week: WeekLayer,
}

impl ConfigLayer {
    /// Parse a TOML config file body
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolve relative paths against `base` (the config file's directory)
    ///
    /// An absent `output_dir` becomes the default directory under `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        let resolve = |path: Option<PathBuf>| {
            path.map(|p| if p.is_relative() { base.join(p) } else { p })
        };
        self.input = resolve(self.input);
        self.template = resolve(self.template);
        self.output_dir = resolve(self.output_dir.or_else(|| Some(DEFAULT_OUTPUT_DIR.into())));
        self
    }

    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn merge(self, other: ConfigLayer) -> Self {
        Self {
            input: other.input.or(self.input),
            template: other.template.or(self.template),
            output_dir: other.output_dir.or(self.output_dir),
            output_prefix: other.output_prefix.or(self.output_prefix),
            sheet: other.sheet.or(self.sheet),
            week: WeekLayer {
                name: other.week.name.or(self.week.name),
                start: other.week.start.or(self.week.start),
                end: other.week.end.or(self.week.end),
                month: other.week.month.or(self.week.month),
                year: other.week.year.or(self.week.year),
            },
        }
    }

    /// Fill defaults, resolve the sheet name and require every mandatory field
    pub fn finish(self) -> Result<ReportConfig, ConfigError> {
        let week = self.week;
        let sheet = resolve_sheet(self.sheet, week.month, week.year)?;

        Ok(ReportConfig {
            input: self.input.ok_or(ConfigError::MissingField("input"))?,
            template: self.template.ok_or(ConfigError::MissingField("template"))?,
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            output_prefix: self
                .output_prefix
                .unwrap_or_else(|| DEFAULT_OUTPUT_PREFIX.to_string()),
            sheet,
            week: WeekInfo {
                name: week.name.ok_or(ConfigError::MissingField("week.name"))?,
                start: week.start.ok_or(ConfigError::MissingField("week.start"))?,
                end: week.end.ok_or(ConfigError::MissingField("week.end"))?,
            },
        })
    }
}

fn resolve_sheet(
    sheet: Option<String>,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<String, ConfigError> {
    match (sheet, month, year) {
        (Some(sheet), month, year) => {
            let period = SheetPeriod::parse(&sheet)
                .ok_or_else(|| ConfigError::InvalidSheetName(sheet.clone()))?;
            let month_ok = month.map_or(true, |m| m == period.month);
            let year_ok = year.map_or(true, |y| y == period.year);
            if month_ok && year_ok {
                Ok(sheet)
            } else {
                Err(ConfigError::PeriodMismatch {
                    month: month.unwrap_or(period.month),
                    year: year.unwrap_or(period.year),
                    sheet,
                })
            }
        }
        (None, Some(month), Some(year)) => {
            let name = SheetPeriod::new(month, year).to_string();
            // A three-digit month would still parse, as month 12 of a longer year
            if !(1..=12).contains(&month) || SheetPeriod::parse(&name).is_none() {
                return Err(ConfigError::InvalidSheetName(name));
            }
            Ok(name)
        }
        (None, _, _) => Err(ConfigError::MissingField("sheet")),
    }
}

/// Person and date range to report on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeekInfo {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekInfo {
    /// Inclusive range check
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Complete settings of one report run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    pub input: PathBuf,
    pub template: PathBuf,
    pub output_dir: PathBuf,
    pub output_prefix: String,
    /// Monthly sheet name, always a valid `MMYYYY` code
    pub sheet: String,
    pub week: WeekInfo,
}

impl ReportConfig {
    /// Check the settings against the filesystem and each other
    ///
    /// Only the input workbook is required here; commands that render call
    /// [`ReportConfig::validate_template`] as well.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.week.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.week.start > self.week.end {
            return Err(ConfigError::InvalidDateRange {
                start: self.week.start,
                end: self.week.end,
            });
        }
        require_file("Input", &self.input)
    }

    /// Check that the template workbook exists
    pub fn validate_template(&self) -> Result<(), ConfigError> {
        require_file("Template", &self.template)
    }

    /// Output file path stamped with `now`: `<dir>/<prefix>_<YYYYMMDD_HHMMSS>.xlsx`
    pub fn output_path(&self, now: NaiveDateTime) -> PathBuf {
        let file_name = format!("{}_{}.xlsx", self.output_prefix, now.format("%Y%m%d_%H%M%S"));
        self.output_dir.join(file_name)
    }
}

fn require_file(role: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConfigError::FileNotFound {
            role,
            path: path.to_path_buf(),
        })
    }
}
