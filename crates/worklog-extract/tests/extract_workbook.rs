//! Integration tests reading real xlsx files

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use worklog_core::{LogEntry, WeekInfo};
use worklog_extract::{extract_file, ExtractError};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, day).unwrap()
}

fn week(name: &str) -> WeekInfo {
    WeekInfo {
        name: name.into(),
        start: date(9),
        end: date(15),
    }
}

/// Row of the fixture sheet: day cell as number or text, name, task
enum Day {
    Number(f64),
    Text(&'static str),
}

/// Write a daily-report workbook with a decoy first sheet
fn write_daily_report(dir: &Path, sheet_name: &str, rows: &[(Day, &str, &str)]) -> PathBuf {
    let path = dir.join("daily-report.xlsx");
    let mut workbook = Workbook::new();

    let decoy = workbook.add_worksheet();
    decoy.set_name("112024").unwrap();
    decoy.write_string(0, 0, "Day").unwrap();
    decoy.write_number(1, 0, 10).unwrap();
    decoy.write_string(1, 1, "Alice").unwrap();
    decoy.write_string(1, 2, "November work: Old").unwrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).unwrap();
    sheet.write_string(0, 0, "Day").unwrap();
    sheet.write_string(0, 1, "Name").unwrap();
    sheet.write_string(0, 2, "Tasks").unwrap();
    for (i, (day, name, task)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        match day {
            Day::Number(n) => sheet.write_number(row, 0, *n).unwrap(),
            Day::Text(t) => sheet.write_string(row, 0, *t).unwrap(),
        };
        sheet.write_string(row, 1, *name).unwrap();
        sheet.write_string(row, 2, *task).unwrap();
    }

    workbook.save(&path).unwrap();
    path
}

#[test]
fn extracts_one_person_for_the_week() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_daily_report(
        dir.path(),
        "122024",
        &[
            (Day::Number(6.0), "Alice", "Too early: ProjectX"),
            (Day::Number(10.0), "Alice", "Fix bug: ProjectX\nWrite docs: ProjectX"),
            (Day::Number(10.0), "Bob", "Review: ProjectY"),
            (Day::Number(12.0), "Alice", "Deploy: ProjectY"),
            (Day::Number(20.0), "Alice", "Too late: ProjectX"),
        ],
    );

    let entries = extract_file(&path, "122024", &week("Alice")).unwrap();
    assert_eq!(
        entries,
        vec![
            LogEntry::new(date(10), "Alice", "Fix bug: ProjectX\nWrite docs: ProjectX"),
            LogEntry::new(date(12), "Alice", "Deploy: ProjectY"),
        ]
    );
}

#[test]
fn each_matching_row_appears_once() {
    let dir = tempfile::tempdir().unwrap();
    let rows: Vec<(Day, &str, &str)> = (1..=31)
        .map(|d| (Day::Number(f64::from(d)), "Alice", "Daily: P"))
        .collect();
    let path = write_daily_report(dir.path(), "122024", &rows);

    let entries = extract_file(&path, "122024", &week("Alice")).unwrap();
    let days: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    assert_eq!(days, (9..=15).map(date).collect::<Vec<_>>());
}

#[test]
fn missing_sheet_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_daily_report(dir.path(), "122024", &[]);

    let err = extract_file(&path, "012025", &week("Alice")).unwrap_err();
    assert!(matches!(err, ExtractError::SheetNotFound(ref s) if s == "012025"));
}

#[test]
fn non_numeric_day_aborts_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_daily_report(
        dir.path(),
        "122024",
        &[
            (Day::Number(10.0), "Alice", "Fix bug: ProjectX"),
            (Day::Text("Tuesday"), "Alice", "Meeting: ProjectX"),
        ],
    );

    let err = extract_file(&path, "122024", &week("Alice")).unwrap_err();
    assert!(matches!(err, ExtractError::DateParse { row: 3, .. }));
    assert!(err.to_string().contains("Tuesday"));
}

#[test]
fn unreadable_file_is_a_workbook_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"not a zip archive").unwrap();

    let err = extract_file(&path, "122024", &week("Alice")).unwrap_err();
    assert!(matches!(err, ExtractError::Workbook(_)));
}
