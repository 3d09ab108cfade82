use thiserror::Error;

use crate::db::adapter::RowId;

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Which input field a validation problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    DailyGoals,
    Mood,
    SleepHours,
    GymVisited,
    GateClassesAttended,
    ProjectsWorkedOn,
    TasksCompleted,
    GymTime,
    StudyHours,
    Task,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Date => "Date",
            Field::DailyGoals => "Daily Goals",
            Field::Mood => "Mood",
            Field::SleepHours => "Sleep Hours",
            Field::GymVisited => "Gym Visited",
            Field::GateClassesAttended => "GATE Classes Attended",
            Field::ProjectsWorkedOn => "Projects Worked On",
            Field::TasksCompleted => "Tasks Completed",
            Field::GymTime => "Gym Time",
            Field::StudyHours => "Study Hours",
            Field::Task => "Task",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Problem {
    #[error("is required")]
    Missing,
    #[error("'{0}' is not in H:MM format (hours >= 0, minutes 00-59)")]
    BadDuration(String),
    #[error("'{0}' is out of range")]
    OutOfRange(String),
    #[error("'{0}' could not be parsed")]
    Unparsable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {problem}")]
pub struct ValidationError {
    pub field: Field,
    pub problem: Problem,
}

impl ValidationError {
    pub fn missing(field: Field) -> Self {
        Self {
            field,
            problem: Problem::Missing,
        }
    }

    pub fn bad_duration(field: Field, value: &str) -> Self {
        Self {
            field,
            problem: Problem::BadDuration(value.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("no row with id {0} in this table")]
    RowNotFound(RowId),

    #[error("table has no column named '{0}'")]
    UnknownColumn(String),

    #[error("collection '{0}' does not exist")]
    CollectionNotFound(String),

    #[error("table '{table}' does not exist in collection '{collection}'")]
    TableNotFound { collection: String, table: String },

    #[error("store backend error: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error("row encoding error: {0}")]
    Codec(#[from] serde_json::Error),
}
