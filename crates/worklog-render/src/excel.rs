//! Excel weekly report renderer
//!
//! Fills a template workbook with a [`WeeklyReport`]. The template is loaded
//! whole, so every sheet keeps its values, formulas, styles, merged ranges and
//! column widths; the report itself goes into the `Form` sheet at fixed
//! coordinates:
//!
//! ```text
//! Sheet: Form
//! |    | C                  | D            | E          |
//! |----|--------------------|--------------|------------|
//! |  8 | 2                  |              |            |   <- project count
//! |  9 | ProjectX           |              |            |
//! | 10 |                    | Fix bug      | 2024-12-10 |
//! | 11 |                    | Write docs   | 2024-12-10 |
//! | 12 | ProjectY           |              |            |
//! | 13 |                    | Deploy       | 2024-12-12 |
//! ```
//!
//! The template file is only read. Nothing is written to disk until the whole
//! workbook has been assembled in memory.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use tracing::debug;
use umya_spreadsheet::{reader, writer, Worksheet};
use worklog_core::{RenderError, Renderer, WeeklyReport};

/// Name of the template sheet receiving the report
pub const FORM_SHEET: &str = "Form";

// Cell positions are 1-based (column, row)

/// C8: number of distinct projects
pub const COUNT_CELL: (u32, u32) = (3, 8);
/// Row 9: first project heading
pub const FIRST_ROW: u32 = 9;
/// Column C: project names
pub const PROJECT_COLUMN: u32 = 3;
/// Column D: task content
pub const TASK_COLUMN: u32 = 4;
/// Column E: task date
pub const DATE_COLUMN: u32 = 5;

/// Template-based xlsx renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Template workbook path
    pub template: PathBuf,
    /// Sheet receiving the report
    pub sheet: String,
    /// chrono format for the date column
    pub date_format: String,
}

impl ExcelRenderer {
    pub fn new(template: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            sheet: FORM_SHEET.into(),
            date_format: "%Y-%m-%d".into(),
        }
    }

    /// Write the report into another template sheet
    pub fn sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = sheet.into();
        self
    }

    /// Set the chrono format used for dates in column E
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Generate the filled workbook bytes
    pub fn render_to_bytes(&self, report: &WeeklyReport) -> Result<Vec<u8>, RenderError> {
        let mut book = reader::xlsx::read(&self.template).map_err(|e| {
            RenderError::Template(format!("{}: {e}", self.template.display()))
        })?;

        let form = book
            .get_sheet_by_name_mut(&self.sheet)
            .ok_or_else(|| RenderError::TemplateSheetNotFound(self.sheet.clone()))?;
        self.fill_form(form, report);

        let mut buffer = Cursor::new(Vec::new());
        writer::xlsx::write_writer(&book, &mut buffer)
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;
        Ok(buffer.into_inner())
    }

    /// Render and write the workbook to `output`, creating its directory
    pub fn render_to_file(&self, report: &WeeklyReport, output: &Path) -> Result<(), RenderError> {
        let bytes = self.render_to_bytes(report)?;
        if let Some(dir) = output.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(output, bytes)?;
        Ok(())
    }

    fn fill_form(&self, sheet: &mut Worksheet, report: &WeeklyReport) {
        sheet
            .get_cell_mut(COUNT_CELL)
            .set_value_number(report.project_count() as f64);

        let mut row = FIRST_ROW;
        for block in &report.blocks {
            sheet
                .get_cell_mut((PROJECT_COLUMN, row))
                .set_value_string(block.project.as_str());
            row += 1;

            for task in &block.rows {
                let date = task.date.format(&self.date_format).to_string();
                sheet
                    .get_cell_mut((TASK_COLUMN, row))
                    .set_value_string(task.content.as_str());
                sheet.get_cell_mut((DATE_COLUMN, row)).set_value_string(date);
                row += 1;
            }
        }

        debug!(
            sheet = %self.sheet,
            projects = report.project_count(),
            last_row = row - 1,
            "filled report sheet"
        );
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, report: &WeeklyReport) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(report)
    }
}
