use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::db::adapter::{Record, RowId};
use crate::db::store::Cells;
use crate::utils::dates::{format_date, parse_date};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(anyhow::anyhow!("Unknown task status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoTask {
    pub date: NaiveDate,
    pub task: String,
    pub status: TaskStatus,
}

impl TodoTask {
    pub fn pending(date: NaiveDate, task: impl Into<String>) -> Self {
        Self {
            date,
            task: task.into(),
            status: TaskStatus::Pending,
        }
    }

    pub fn to_cells(&self) -> Cells {
        vec![
            format_date(self.date),
            self.task.clone(),
            self.status.as_str().to_string(),
        ]
    }
}

/// A task row as loaded. Date and status stay optional because the sheet
/// can hold anything a person typed into it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: RowId,
    pub date: Option<NaiveDate>,
    pub task: String,
    pub status: Option<TaskStatus>,
}

impl TaskRow {
    pub fn from_record(record: &Record) -> Self {
        let cell = |i: usize| record.cells.get(i).map(String::as_str).unwrap_or("");
        Self {
            id: record.id,
            date: parse_date(cell(0)),
            task: cell(1).to_string(),
            status: TaskStatus::from_str(cell(2)).ok(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == Some(TaskStatus::Completed)
    }
}

/// One task per non-blank line, trimmed.
pub fn split_task_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
