use log::{debug, warn};

use crate::db::adapter::{RawTable, Table, DATE_COLUMN};
use crate::db::store::Cells;
use crate::utils::dates::{format_date, parse_date};

pub const PROGRESS_COLUMNS: &[&str] = &[
    "Date",
    "Daily Goals",
    "Mood",
    "Sleep Hours",
    "Gym Visited",
    "GATE Classes Attended",
    "Projects Worked On",
    "Tasks Completed",
    "Notes",
    "Gym Time",
    "Study Hours",
];

pub const TODO_COLUMNS: &[&str] = &["Date", "Task", "Status"];

/// One step of header migration. Renames run before backfills.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub renames: &'static [(&'static str, &'static str)],
    pub backfill: &'static [&'static str],
}

#[derive(Debug)]
pub struct Schema {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub migrations: &'static [Migration],
}

pub const PROGRESS_MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        renames: &[
            ("Goals", "Daily Goals"),
            ("Sleep_Hours", "Sleep Hours"),
            ("Gym", "Gym Visited"),
            ("Completing_GATE_Classes", "GATE Classes Attended"),
            ("Any_Project_Made", "Projects Worked On"),
            ("Tasks_Completed", "Tasks Completed"),
            ("Amount of Time Spent in Gym", "Gym Time"),
        ],
        backfill: &[],
    },
    Migration {
        version: 2,
        renames: &[],
        backfill: &["Gym Time", "Study Hours"],
    },
];

pub const PROGRESS_SCHEMA: Schema = Schema {
    table: "ProgressTracker",
    columns: PROGRESS_COLUMNS,
    migrations: PROGRESS_MIGRATIONS,
};

pub const TODO_SCHEMA: Schema = Schema {
    table: "ToDoList",
    columns: TODO_COLUMNS,
    migrations: &[],
};

/// Where each header column's values come from after migrations: an index
/// into the raw row, or nothing for a backfilled column.
type Source = Option<usize>;

/// Runs the schema's migrations over a header, returning each resulting
/// column name with its source in the raw rows.
pub fn migrate_header(schema: &Schema, header: &[String]) -> Vec<(String, Source)> {
    let mut columns: Vec<(String, Source)> = header
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), Some(i)))
        .collect();

    for migration in schema.migrations {
        let mut touched = false;
        for (from, to) in migration.renames {
            for col in columns.iter_mut().filter(|(name, _)| name == from) {
                col.0 = to.to_string();
                touched = true;
            }
        }
        for name in migration.backfill {
            if !columns.iter().any(|(c, _)| c == name) {
                columns.push((name.to_string(), None));
                touched = true;
            }
        }
        if touched {
            debug!("Applied {} schema migration v{}", schema.table, migration.version);
        }
    }
    columns
}

/// Brings a raw table into the schema's canonical column set and order.
///
/// Columns the schema does not know are dropped, missing ones are filled
/// with empty strings, and the date column becomes `YYYY-MM-DD` or blank
/// when unparsable. Entirely blank rows are skipped.
pub fn normalize(schema: &Schema, raw: RawTable) -> Table {
    let migrated = migrate_header(schema, &raw.header);

    for (name, _) in &migrated {
        if !name.is_empty() && !schema.columns.contains(&name.as_str()) {
            warn!("Dropping unknown column '{}' from {}", name, schema.table);
        }
    }

    let sources: Vec<Source> = schema
        .columns
        .iter()
        .map(|col| {
            migrated
                .iter()
                .find(|(name, _)| name == col)
                .and_then(|(_, src)| *src)
        })
        .collect();
    let date_idx = schema.columns.iter().position(|c| *c == DATE_COLUMN);

    let rows: Vec<Cells> = raw
        .rows
        .into_iter()
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .map(|row| {
            let mut cells: Cells = sources
                .iter()
                .map(|src| src.and_then(|i| row.get(i)).cloned().unwrap_or_default())
                .collect();
            if let Some(i) = date_idx {
                cells[i] = parse_date(&cells[i]).map(format_date).unwrap_or_default();
            }
            cells
        })
        .collect();

    Table::new(schema.columns, rows)
}
