//! Shared fixtures for integration tests: on-disk workbooks in temp dirs and
//! ready-made entries.

#![allow(dead_code)]

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use dailytrack::db::{SqliteBackend, StoreConnection};
use dailytrack::models::{Mood, ProgressEntry, YesNo};

pub const COLLECTION: &str = "ProgressTracker";

/// Creates an empty temp dir and returns it with the workbook path inside.
/// Keep the `TempDir` alive for the duration of the test.
pub fn temp_store() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("dailytrack.db");
    (dir, path)
}

/// Opens a fresh connection on `path`, as a new CLI invocation would.
pub fn connect(path: &Path) -> StoreConnection {
    let backend = SqliteBackend::open(path).expect("open workbook");
    StoreConnection::new(backend, COLLECTION, vec![])
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn make_entry(day: NaiveDate, goals: &str) -> ProgressEntry {
    ProgressEntry {
        date: day,
        daily_goals: goals.to_string(),
        mood: Mood::Great,
        sleep_hours: 8.0,
        gym_visited: YesNo::Yes,
        gate_classes_attended: YesNo::Yes,
        projects_worked_on: "tracker rewrite".to_string(),
        tasks_completed: "emails".to_string(),
        notes: "good day".to_string(),
        gym_time: "1:30".to_string(),
        study_hours: "3:00".to_string(),
    }
}
