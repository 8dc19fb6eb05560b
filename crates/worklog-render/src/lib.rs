//! # worklog-render
//!
//! Rendering backends for weekly reports.
//!
//! This crate provides:
//! - Excel output filled into a copy of a template workbook
//! - A plain-text preview of the same layout
//!
//! ## Example
//!
//! ```rust,ignore
//! use worklog_core::{Renderer, WeeklyReport};
//! use worklog_render::{ExcelRenderer, TextRenderer};
//!
//! let report = WeeklyReport::build(&entries);
//!
//! // Weekly report workbook
//! ExcelRenderer::new("template.xlsx").render_to_file(&report, &output_path)?;
//!
//! // Terminal preview
//! println!("{}", TextRenderer::new().render(&report)?);
//! ```

pub mod excel;

pub use excel::ExcelRenderer;

use std::fmt::Write;

use worklog_core::{RenderError, Renderer, WeeklyReport};

/// Plain-text report renderer
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Indentation of task lines under their project
    pub indent: usize,
    /// chrono format for task dates
    pub date_format: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            indent: 4,
            date_format: "%Y-%m-%d".into(),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set task line indentation
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, report: &WeeklyReport) -> Result<String, RenderError> {
        let width = report
            .blocks
            .iter()
            .flat_map(|block| &block.rows)
            .map(|row| row.content.chars().count())
            .max()
            .unwrap_or(0);

        let mut output = String::new();
        let fmt_err = |e: std::fmt::Error| RenderError::Format(e.to_string());

        writeln!(output, "Projects: {}", report.project_count()).map_err(fmt_err)?;
        for block in &report.blocks {
            writeln!(output, "{}", block.project).map_err(fmt_err)?;
            for row in &block.rows {
                writeln!(
                    output,
                    "{:indent$}{:<width$}  {}",
                    "",
                    row.content,
                    row.date.format(&self.date_format),
                    indent = self.indent,
                    width = width,
                )
                .map_err(fmt_err)?;
            }
        }

        let unreported = report.task_count.saturating_sub(report.row_count());
        if unreported > 0 {
            writeln!(output, "({unreported} task line(s) without a project annotation)")
                .map_err(fmt_err)?;
        }

        Ok(output)
    }
}
