//! # worklog-core
//!
//! Core domain model for the worklog weekly report generator.
//!
//! This crate provides:
//! - Domain types: `LogEntry`, `TaskEntry`, `SheetPeriod`, `WeeklyReport`
//! - The pure expand/derive/group transform from daily entries to a report
//! - `ReportConfig`, the validated configuration of a run
//! - The `Renderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use worklog_core::{LogEntry, WeeklyReport};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 12, 10).unwrap();
//! let entries = vec![LogEntry::new(
//!     date,
//!     "Alice",
//!     "Fix bug: ProjectX\nWrite docs: ProjectX",
//! )];
//!
//! let report = WeeklyReport::build(&entries);
//! assert_eq!(report.project_count(), 1);
//! assert_eq!(report.blocks[0].rows[0].content, "Fix bug");
//! ```

pub mod config;
pub mod report;

pub use config::{ConfigError, ConfigLayer, ReportConfig, WeekInfo, WeekLayer};
pub use report::{
    derive_project, expand, task_content, ProjectBlock, ProjectSet, ReportRow, WeeklyReport,
};

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Domain Types
// ============================================================================

/// One qualifying row of the daily log sheet
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub date: NaiveDate,
    pub name: String,
    /// Raw task cell, possibly spanning several lines
    pub task: String,
}

impl LogEntry {
    pub fn new(date: NaiveDate, name: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            task: task.into(),
        }
    }
}

/// A single task line split out of a [`LogEntry`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskEntry {
    pub date: NaiveDate,
    pub name: String,
    /// Trimmed, non-empty, single line
    pub task: String,
}

impl TaskEntry {
    /// Project named by the trailing `: <project>` annotation, if any
    pub fn project(&self) -> Option<&str> {
        derive_project(&self.task)
    }

    /// Task text before the first colon
    pub fn content(&self) -> &str {
        task_content(&self.task)
    }
}

/// Month and year encoded in a monthly sheet name such as `122024`.
///
/// The first two characters are the month, the remaining ones the year.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetPeriod {
    pub month: u32,
    pub year: i32,
}

impl SheetPeriod {
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }

    /// Decode a sheet name. Returns `None` unless both parts are plain
    /// digits and the month lies in `1..=12`.
    pub fn parse(sheet: &str) -> Option<Self> {
        let month_part = sheet.get(..2)?;
        let year_part = sheet.get(2..)?;
        if year_part.is_empty() || !is_digits(month_part) || !is_digits(year_part) {
            return None;
        }
        let month: u32 = month_part.parse().ok()?;
        let year: i32 = year_part.parse().ok()?;
        (1..=12).contains(&month).then_some(Self { month, year })
    }

    /// Calendar date for a day of this month
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for SheetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:04}", self.month, self.year)
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering of a grouped report
pub trait Renderer {
    type Output;

    /// Render the report to the output format
    fn render(&self, report: &WeeklyReport) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template sheet not found: {0}")]
    TemplateSheetNotFound(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Format error: {0}")]
    Format(String),
}

// ============================================================================
// Tests
// ============================================================================
