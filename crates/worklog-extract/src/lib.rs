//! # worklog-extract
//!
//! Reads daily work-log entries from a monthly sheet and keeps one person's
//! entries for a date range.
//!
//! The sheet name carries the period (`122024` is December 2024); rows are
//! read positionally below a single header row:
//!
//! ```text
//! |   A (day) | B (name) | C (task, may span lines)  |
//! |-----------|----------|---------------------------|
//! |        10 | Alice    | Fix bug: ProjectX         |
//! |           |          | Write docs: ProjectX      |
//! |        11 | Bob      | Meeting: Internal         |
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use worklog_extract::extract_file;
//!
//! let entries = extract_file("daily-report.xlsx".as_ref(), "122024", &config.week)?;
//! ```

use std::fmt::Display;
use std::io::{Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use thiserror::Error;
use tracing::debug;
use worklog_core::{LogEntry, SheetPeriod, WeekInfo};

/// Column of the day-of-month value
pub const DAY_COLUMN: u32 = 0;
/// Column of the person name
pub const NAME_COLUMN: u32 = 1;
/// Column of the task text
pub const TASK_COLUMN: u32 = 2;

/// Extraction error
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Invalid sheet name '{0}': expected MMYYYY")]
    InvalidSheetName(String),

    #[error("Row {row}: cannot build a date from day '{value}' in sheet {period}")]
    DateParse {
        row: u32,
        value: String,
        period: SheetPeriod,
    },
}

/// Open a workbook file (xlsx, xlsm, xls or ods) and extract entries
pub fn extract_file(
    path: &Path,
    sheet: &str,
    week: &WeekInfo,
) -> Result<Vec<LogEntry>, ExtractError> {
    debug!(path = %path.display(), sheet, "opening input workbook");
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ExtractError::Workbook(format!("{}: {e}", path.display())))?;
    extract(&mut workbook, sheet, week)
}

/// Extract entries from the named sheet of an open workbook
pub fn extract<RS, R>(
    workbook: &mut R,
    sheet: &str,
    week: &WeekInfo,
) -> Result<Vec<LogEntry>, ExtractError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(ExtractError::SheetNotFound(sheet.to_string()));
    }
    let period = SheetPeriod::parse(sheet)
        .ok_or_else(|| ExtractError::InvalidSheetName(sheet.to_string()))?;
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| ExtractError::Workbook(format!("sheet {sheet}: {e}")))?;
    extract_range(&range, period, week)
}

/// Filter the rows of a loaded sheet.
///
/// Row 1 of the sheet is the header. Rows with empty A, B and C cells are
/// skipped; any other row must carry a day that forms a valid date in
/// `period`, whether or not it belongs to the requested person.
pub fn extract_range(
    range: &Range<Data>,
    period: SheetPeriod,
    week: &WeekInfo,
) -> Result<Vec<LogEntry>, ExtractError> {
    let (Some((first_row, _)), Some((last_row, _))) = (range.start(), range.end()) else {
        return Ok(Vec::new());
    };

    let mut entries = Vec::new();
    for row in first_row.max(1)..=last_row {
        let day = cell(range, row, DAY_COLUMN);
        let name = cell(range, row, NAME_COLUMN);
        let task = cell(range, row, TASK_COLUMN);
        if is_blank(day) && is_blank(name) && is_blank(task) {
            continue;
        }

        let date = parse_day(day)
            .and_then(|d| period.date(d))
            .ok_or_else(|| ExtractError::DateParse {
                row: row + 1,
                value: day.to_string(),
                period,
            })?;

        if !week.contains(date) || !matches!(name, Data::String(s) if *s == week.name) {
            continue;
        }

        debug!(row = row + 1, %date, "keeping entry");
        entries.push(LogEntry::new(date, week.name.clone(), task.to_string()));
    }

    debug!(count = entries.len(), name = %week.name, "extracted entries");
    Ok(entries)
}

static EMPTY: Data = Data::Empty;

fn cell(range: &Range<Data>, row: u32, col: u32) -> &Data {
    range.get_value((row, col)).unwrap_or(&EMPTY)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Day-of-month from a numeric or text cell; fractions are truncated
fn parse_day(cell: &Data) -> Option<u32> {
    match cell {
        Data::Int(i) => u32::try_from(*i).ok(),
        Data::Float(f) if f.is_finite() && *f >= 0.0 && *f < f64::from(u32::MAX) => {
            Some(f.trunc() as u32)
        }
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, day).unwrap()
    }

    fn week() -> WeekInfo {
        WeekInfo {
            name: "Alice".into(),
            start: date(9),
            end: date(15),
        }
    }

    fn sheet(rows: &[(Data, &str, &str)]) -> Range<Data> {
        let mut range = Range::new((0, 0), (rows.len() as u32, 2));
        range.set_value((0, 0), Data::String("Day".into()));
        range.set_value((0, 1), Data::String("Name".into()));
        range.set_value((0, 2), Data::String("Task".into()));
        for (i, (day, name, task)) in rows.iter().enumerate() {
            let row = i as u32 + 1;
            range.set_value((row, 0), day.clone());
            if !name.is_empty() {
                range.set_value((row, 1), Data::String((*name).into()));
            }
            if !task.is_empty() {
                range.set_value((row, 2), Data::String((*task).into()));
            }
        }
        range
    }

    #[test]
    fn keeps_matching_rows_in_range() {
        let range = sheet(&[
            (Data::Float(8.0), "Alice", "before: P"),
            (Data::Float(9.0), "Alice", "first: P"),
            (Data::Int(10), "Bob", "other person: P"),
            (Data::Float(15.0), "Alice", "last: P"),
            (Data::Float(16.0), "Alice", "after: P"),
        ]);

        let entries = extract_range(&range, SheetPeriod::new(12, 2024), &week()).unwrap();
        assert_eq!(
            entries,
            vec![
                LogEntry::new(date(9), "Alice", "first: P"),
                LogEntry::new(date(15), "Alice", "last: P"),
            ]
        );
    }

    #[test]
    fn name_must_match_exactly() {
        let range = sheet(&[
            (Data::Float(10.0), "alice", "a: P"),
            (Data::Float(10.0), "Alice ", "b: P"),
            (Data::Float(10.0), "Alice", "c: P"),
        ]);
        let entries = extract_range(&range, SheetPeriod::new(12, 2024), &week()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].task, "c: P");
    }

    #[test]
    fn header_row_is_skipped() {
        let mut range = sheet(&[(Data::Float(10.0), "Alice", "a: P")]);
        range.set_value((0, 0), Data::Float(10.0));
        range.set_value((0, 1), Data::String("Alice".into()));
        let entries = extract_range(&range, SheetPeriod::new(12, 2024), &week()).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn blank_rows_are_skipped() {
        let range = sheet(&[
            (Data::Empty, "", ""),
            (Data::Float(10.0), "Alice", "a: P"),
            (Data::String("  ".into()), "", ""),
        ]);
        let entries = extract_range(&range, SheetPeriod::new(12, 2024), &week()).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn day_accepts_text_and_fractions() {
        let range = sheet(&[
            (Data::String(" 10 ".into()), "Alice", "a: P"),
            (Data::Float(11.7), "Alice", "b: P"),
        ]);
        let entries = extract_range(&range, SheetPeriod::new(12, 2024), &week()).unwrap();
        let dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(10), date(11)]);
    }

    #[test]
    fn non_numeric_day_aborts() {
        let range = sheet(&[
            (Data::Float(10.0), "Alice", "a: P"),
            (Data::String("ten".into()), "Bob", "b: P"),
        ]);
        let err = extract_range(&range, SheetPeriod::new(12, 2024), &week()).unwrap_err();
        match err {
            ExtractError::DateParse { row, value, .. } => {
                assert_eq!(row, 3);
                assert_eq!(value, "ten");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn impossible_date_aborts() {
        let range = sheet(&[(Data::Float(31.0), "Alice", "a: P")]);
        let err = extract_range(&range, SheetPeriod::new(11, 2024), &week()).unwrap_err();
        assert!(matches!(err, ExtractError::DateParse { row: 2, .. }));
    }

    #[test]
    fn empty_sheet_yields_nothing() {
        let range: Range<Data> = Range::empty();
        let entries = extract_range(&range, SheetPeriod::new(12, 2024), &week()).unwrap();
        assert!(entries.is_empty());
    }
}
