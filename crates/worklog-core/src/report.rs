//! Regrouping of daily entries into a per-project weekly report.
//!
//! The transform runs in three steps:
//! - **Expand**: every multi-line task cell becomes one [`TaskEntry`] per
//!   non-empty trimmed line.
//! - **Derive**: each line's project is the text after its *last* `": "`.
//! - **Group**: projects keep first-seen order; each project lists its tasks
//!   in expansion order, with the content taken before the *first* colon.
//!
//! ## Colon Rules
//!
//! Project and content are derived by two independent rules, so a line with
//! several colons can yield mismatching halves:
//!
//! ```text
//! "A: B: C"  -> project "C", content "A"   ("B" is dropped)
//! "Fix bug"  -> no project, line not reported
//! ```

use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::{LogEntry, TaskEntry};

fn project_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r".*: (.+)$").expect("project pattern is valid"))
}

/// Project name from the trailing `: <project>` annotation of a task line.
///
/// The greedy prefix makes the last `": "` win; the project itself may
/// contain bare colons, as in `"Docs: http://example.com"`.
pub fn derive_project(task: &str) -> Option<&str> {
    project_pattern()
        .captures(task)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|project| !project.is_empty())
}

/// Task content: the text before the first colon, trimmed.
pub fn task_content(task: &str) -> &str {
    task.split_once(':').map_or(task, |(head, _)| head).trim()
}

/// Split each entry's task cell into single-line task entries.
///
/// Entries with an empty task cell produce nothing.
pub fn expand(entries: &[LogEntry]) -> Vec<TaskEntry> {
    entries
        .iter()
        .filter(|entry| !entry.task.is_empty())
        .flat_map(|entry| {
            entry
                .task
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(move |line| TaskEntry {
                    date: entry.date,
                    name: entry.name.clone(),
                    task: line.to_string(),
                })
        })
        .collect()
}

/// Insertion-ordered set of project names
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ProjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the projects of `tasks` in first-seen order
    pub fn from_tasks(tasks: &[TaskEntry]) -> Self {
        let mut set = Self::new();
        for project in tasks.iter().filter_map(TaskEntry::project) {
            set.insert(project);
        }
        set
    }

    /// Add a project; returns `false` if it was already present
    pub fn insert(&mut self, project: &str) -> bool {
        if self.seen.contains(project) {
            return false;
        }
        self.seen.insert(project.to_string());
        self.order.push(project.to_string());
        true
    }

    pub fn contains(&self, project: &str) -> bool {
        self.seen.contains(project)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// One written task line of a project block
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub content: String,
    pub date: NaiveDate,
}

/// A project heading followed by its task lines
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectBlock {
    pub project: String,
    pub rows: Vec<ReportRow>,
}

/// Grouped weekly report, fully built before any output is written
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WeeklyReport {
    pub blocks: Vec<ProjectBlock>,
    /// Number of task lines produced by expansion, reported or not
    pub task_count: usize,
}

impl WeeklyReport {
    /// Expand, derive and group the given entries
    pub fn build(entries: &[LogEntry]) -> Self {
        let tasks = expand(entries);
        let projects = ProjectSet::from_tasks(&tasks);
        debug!(
            entries = entries.len(),
            tasks = tasks.len(),
            projects = projects.len(),
            "grouping tasks by project"
        );

        let blocks = projects
            .iter()
            .map(|project| ProjectBlock {
                project: project.to_string(),
                // Re-scan the full expanded list for every project
                rows: tasks
                    .iter()
                    .filter(|task| task.project() == Some(project))
                    .map(|task| ReportRow {
                        content: task.content().to_string(),
                        date: task.date,
                    })
                    .collect(),
            })
            .collect();

        Self {
            blocks,
            task_count: tasks.len(),
        }
    }

    /// Number of distinct projects
    pub fn project_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of task lines that made it into a project block
    pub fn row_count(&self) -> usize {
        self.blocks.iter().map(|block| block.rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
