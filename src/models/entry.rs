use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::db::adapter::{Record, RowId};
use crate::db::store::Cells;
use crate::error::{Field, Problem, ValidationError};
use crate::utils::dates::{format_date, parse_date};
use crate::utils::duration::{parse_duration, validate_duration};
use crate::utils::format::format_hours;

pub const MAX_SLEEP_HOURS: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mood {
    VeryLow,
    Low,
    Neutral,
    Good,
    Great,
}

impl Mood {
    pub fn all() -> Vec<Mood> {
        vec![Mood::Great, Mood::Good, Mood::Neutral, Mood::Low, Mood::VeryLow]
    }

    /// Text stored in the sheet.
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Great => "😊 Great",
            Mood::Good => "🙂 Good",
            Mood::Neutral => "😐 Neutral",
            Mood::Low => "😔 Low",
            Mood::VeryLow => "😞 Very Low",
        }
    }

    /// 1 (very low) to 5 (great).
    pub fn value(&self) -> u8 {
        match self {
            Mood::VeryLow => 1,
            Mood::Low => 2,
            Mood::Neutral => 3,
            Mood::Good => 4,
            Mood::Great => 5,
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = anyhow::Error;

    /// Accepts the stored label, the bare word, or the 1-5 value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(m) = Mood::all().into_iter().find(|m| m.label() == s) {
            return Ok(m);
        }
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "great" | "5" => Ok(Mood::Great),
            "good" | "4" => Ok(Mood::Good),
            "neutral" | "3" => Ok(Mood::Neutral),
            "low" | "2" => Ok(Mood::Low),
            "very low" | "verylow" | "1" => Ok(Mood::VeryLow),
            _ => Err(anyhow::anyhow!("Unknown mood: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

impl FromStr for YesNo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(YesNo::Yes),
            "no" | "n" | "false" => Ok(YesNo::No),
            _ => Err(anyhow::anyhow!("Expected yes or no, got: {}", s)),
        }
    }
}

/// One day's log, as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub date: NaiveDate,
    pub daily_goals: String,
    pub mood: Mood,
    pub sleep_hours: f64,
    pub gym_visited: YesNo,
    pub gate_classes_attended: YesNo,
    pub projects_worked_on: String,
    pub tasks_completed: String,
    pub notes: String,
    pub gym_time: String,
    pub study_hours: String,
}

impl ProgressEntry {
    /// Checks required fields, then study hours, then gym time.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            (Field::DailyGoals, &self.daily_goals),
            (Field::ProjectsWorkedOn, &self.projects_worked_on),
            (Field::TasksCompleted, &self.tasks_completed),
            (Field::StudyHours, &self.study_hours),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::missing(field));
            }
        }

        if !validate_duration(&self.study_hours) {
            return Err(ValidationError::bad_duration(Field::StudyHours, &self.study_hours));
        }
        if !validate_duration(&self.gym_time) {
            return Err(ValidationError::bad_duration(Field::GymTime, &self.gym_time));
        }

        if !self.sleep_hours.is_finite() || !(0.0..=MAX_SLEEP_HOURS).contains(&self.sleep_hours) {
            return Err(ValidationError {
                field: Field::SleepHours,
                problem: Problem::OutOfRange(self.sleep_hours.to_string()),
            });
        }
        Ok(())
    }

    /// Cells in progress-table column order.
    pub fn to_cells(&self) -> Cells {
        vec![
            format_date(self.date),
            self.daily_goals.clone(),
            self.mood.label().to_string(),
            format_hours(self.sleep_hours),
            self.gym_visited.as_str().to_string(),
            self.gate_classes_attended.as_str().to_string(),
            self.projects_worked_on.clone(),
            self.tasks_completed.clone(),
            self.notes.clone(),
            self.gym_time.clone(),
            self.study_hours.clone(),
        ]
    }
}

/// A progress row as loaded, read leniently: cells that do not parse come
/// back as `None` instead of failing the whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRow {
    pub id: RowId,
    pub date: Option<NaiveDate>,
    pub mood: Option<Mood>,
    pub sleep_hours: Option<f64>,
    pub gym_visited: Option<YesNo>,
    pub gate_classes_attended: Option<YesNo>,
    pub gym_minutes: Option<u64>,
    pub study_minutes: Option<u64>,
    pub cells: Cells,
}

impl EntryRow {
    pub fn from_record(record: &Record) -> Self {
        let cell = |i: usize| record.cells.get(i).map(String::as_str).unwrap_or("");
        Self {
            id: record.id,
            date: parse_date(cell(0)),
            mood: cell(2).parse().ok(),
            sleep_hours: cell(3).trim().parse().ok().filter(|h: &f64| h.is_finite()),
            gym_visited: cell(4).parse().ok(),
            gate_classes_attended: cell(5).parse().ok(),
            gym_minutes: parse_duration(cell(9)).map(|d| d.total_minutes()),
            study_minutes: parse_duration(cell(10)).map(|d| d.total_minutes()),
            cells: record.cells.clone(),
        }
    }
}

/// Builds the "Tasks Completed" text from the to-do items checked off and
/// any extra free text.
pub fn compose_tasks_completed(checked: &[String], additional: &str) -> String {
    let joined = checked.join(", ");
    let additional = additional.trim();
    match (joined.is_empty(), additional.is_empty()) {
        (_, true) => joined,
        (true, false) => additional.to_string(),
        (false, false) => format!("{}, {}", joined, additional),
    }
}
