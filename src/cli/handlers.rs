use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use crate::cli::args::{LogArgs, TodoCommands};
use crate::config::AppConfig;
use crate::db::{ProgressRepo, RowId, StoreConnection, TaskRepo};
use crate::error::{Field, Problem, ValidationError};
use crate::models::entry::compose_tasks_completed;
use crate::models::stats::{
    activity_counts, average_sleep, mood_sleep_trend, time_totals, YesNoCount,
};
use crate::models::{EntryRow, Mood, ProgressEntry, TaskRow, TaskStatus, YesNo};
use crate::utils::dates::{format_date, parse_date};
use crate::utils::duration::DURATION_PRESETS;
use crate::utils::format::{format_hours, progress_bar, truncate};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const BLUE: &str = "\x1b[38;2;2;136;209m";

/// Print a validation problem the way the form used to show it.
pub fn print_validation_warning(err: &ValidationError) {
    println_colored!(AMBER, "  ⚠ {}", err);
    if let Some(hint) = validation_hint(err) {
        println_colored!(DIM, "    {}", hint);
    }
}

fn validation_hint(err: &ValidationError) -> Option<String> {
    match err.problem {
        Problem::BadDuration(_) => Some(format!("Try one of: {}", DURATION_PRESETS.join(", "))),
        _ => None,
    }
}

/// Parses one form field, reporting failure against that field.
fn parse_field<T: FromStr>(field: Field, raw: &str) -> Result<T, ValidationError> {
    raw.parse().map_err(|_| ValidationError {
        field,
        problem: Problem::Unparsable(raw.to_string()),
    })
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_date_arg(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        None => Ok(today()),
        Some(s) => parse_date(s).ok_or_else(|| {
            ValidationError {
                field: Field::Date,
                problem: Problem::Unparsable(s.to_string()),
            }
            .into()
        }),
    }
}

// ─── Log entry ───────────────────────────────────────────────────────────────

pub fn handle_log(conn: &StoreConnection, args: &LogArgs) -> Result<()> {
    let date = parse_date_arg(args.date.as_deref())?;
    let mood: Mood = parse_field(Field::Mood, &args.mood)?;
    let gym_visited: YesNo = parse_field(Field::GymVisited, &args.gym)?;
    let gate_classes_attended: YesNo =
        parse_field(Field::GateClassesAttended, &args.gate_classes)?;

    let mut tasks = TaskRepo::open(conn).context("Loading to-do list")?;
    let mut checked = Vec::with_capacity(args.checked.len());
    for id in &args.checked {
        let task = tasks
            .get(*id)
            .ok_or_else(|| anyhow!("No task with id {}", id))?;
        if task.date != Some(date) {
            return Err(anyhow!(
                "Task #{} is not planned for {}",
                id,
                format_date(date)
            ));
        }
        checked.push(task.task);
    }

    let entry = ProgressEntry {
        date,
        daily_goals: args.goals.clone(),
        mood,
        sleep_hours: args.sleep,
        gym_visited,
        gate_classes_attended,
        projects_worked_on: args.projects.clone(),
        tasks_completed: compose_tasks_completed(&checked, &args.tasks),
        notes: args.notes.clone(),
        gym_time: args.gym_time.clone(),
        study_hours: args.study_hours.clone(),
    };

    let mut progress = ProgressRepo::open(conn).context("Loading progress entries")?;
    let id = progress.append(&entry)?;
    tasks.complete_many(&args.checked)?;

    println_colored!(GREEN, "  ✓ Entry #{} saved for {}", id, format_date(date));
    if !checked.is_empty() {
        println_colored!(DIM, "  Marked {} task(s) completed", checked.len());
    }
    Ok(())
}

// ─── Entries ─────────────────────────────────────────────────────────────────

pub fn handle_entries(
    conn: &StoreConnection,
    config: &AppConfig,
    recent: Option<usize>,
    all: bool,
) -> Result<()> {
    let progress = ProgressRepo::open(conn)?;
    let rows = if all {
        progress.entries()
    } else {
        progress.recent(recent.unwrap_or(config.display.recent_entries))
    };

    println!();
    if rows.is_empty() {
        println_colored!(DIM, "  No entries available.");
        println!();
        return Ok(());
    }

    let total = progress.list_all().len();
    println_colored!(BLUE, "  Recent Progress ({} of {})", rows.len(), total);
    println!();
    let columns = progress.list_all().columns();
    for row in &rows {
        print_entry(columns, row);
    }
    Ok(())
}

fn print_entry(columns: &[&str], row: &EntryRow) {
    println_colored!(BOLD, "  #{}", row.id);
    for (name, value) in columns.iter().zip(&row.cells) {
        let shown = if value.is_empty() { "—" } else { value.as_str() };
        println!("    {:<22} {}", name, shown);
    }
    println!();
}

pub fn handle_delete_entry(conn: &StoreConnection, id: RowId) -> Result<()> {
    let mut progress = ProgressRepo::open(conn)?;
    progress.delete(id)?;
    println_colored!(GREEN, "  ✓ Entry #{} deleted", id);
    Ok(())
}

// ─── To-do ───────────────────────────────────────────────────────────────────

pub fn handle_todo(conn: &StoreConnection, action: &TodoCommands) -> Result<()> {
    let mut tasks = TaskRepo::open(conn)?;

    match action {
        TodoCommands::Add { text, date } => {
            let date = parse_date_arg(date.as_deref())?;
            let text = if text == "-" {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf).context("Reading tasks from stdin")?;
                buf
            } else {
                // Allow literal "\n" separators on the command line.
                text.replace("\\n", "\n")
            };
            let ids = tasks.add_bulk(date, &text)?;
            println_colored!(GREEN, "  ✓ {} task(s) added for {}", ids.len(), format_date(date));
        }
        TodoCommands::List { date, all } => {
            println!();
            if *all {
                let rows = tasks.list_all();
                println_colored!(BLUE, "  All tasks ({})", rows.len());
                print_tasks(&rows, true);
            } else {
                let date = parse_date_arg(date.as_deref())?;
                let rows = tasks.list_for_date(date);
                println_colored!(BLUE, "  Tasks for {}", format_date(date));
                print_tasks(&rows, false);
            }
            println!();
        }
        TodoCommands::Done { id } => {
            tasks.set_status(*id, TaskStatus::Completed)?;
            println_colored!(GREEN, "  ✓ Task #{} completed", id);
        }
        TodoCommands::Delete { id } => {
            tasks.delete(*id)?;
            println_colored!(GREEN, "  ✓ Task #{} deleted", id);
        }
    }
    Ok(())
}

fn print_tasks(rows: &[TaskRow], with_date: bool) {
    if rows.is_empty() {
        println_colored!(DIM, "  Nothing planned.");
        return;
    }
    for t in rows {
        let id = format!("#{}", t.id);
        let mark = if t.is_completed() { "✓" } else { "○" };
        let task = truncate(&t.task, 60);
        let status = t.status.map(|s| s.as_str()).unwrap_or("?");
        if with_date {
            let date = t.date.map(format_date).unwrap_or_else(|| "(no date)".to_string());
            println!("  {:>4}  {}  {}  {} ({})", id, date, mark, task, status);
        } else {
            println!("  {:>4}  {}  {} ({})", id, mark, task, status);
        }
    }
}

// ─── Insights ────────────────────────────────────────────────────────────────

pub fn handle_insights(conn: &StoreConnection) -> Result<()> {
    let progress = ProgressRepo::open(conn)?;
    let rows = progress.entries();

    println!();
    if rows.is_empty() {
        println_colored!(DIM, "  No data available. Add entries to see trends!");
        println!();
        return Ok(());
    }

    let trend = mood_sleep_trend(&rows);
    println_colored!(BLUE, "  Mood and Sleep Trends Over Time");
    println!();
    for p in &trend {
        let mood = match p.mood {
            Some(m) => format!("{} {}", progress_bar(m as u32, 5, 5), m),
            None => format!("{} -", progress_bar(0, 5, 5)),
        };
        let sleep = match p.sleep_hours {
            Some(h) => format!("{} {}h", progress_bar(h.round() as u32, 12, 12), format_hours(h)),
            None => "-".to_string(),
        };
        println!("  {}  mood {}   sleep {}", format_date(p.date), mood, sleep);
    }
    if let Some(avg) = average_sleep(&trend) {
        println!();
        println_colored!(DIM, "  Average sleep: {:.1}h", avg);
    }

    let counts = activity_counts(&rows);
    println!();
    println_colored!(BLUE, "  Gym Visits and GATE Classes Attended");
    println!();
    print_counts("Gym Visited", counts.gym_visited);
    print_counts("GATE Classes Attended", counts.gate_classes_attended);

    let totals = time_totals(&rows);
    println!();
    println_colored!(
        DIM,
        "  Logged time: gym {}  study {}",
        format_minutes(totals.gym_minutes),
        format_minutes(totals.study_minutes)
    );
    println!();
    Ok(())
}

fn format_minutes(total: u64) -> String {
    format!("{}:{:02}", total / 60, total % 60)
}

fn print_counts(label: &str, c: YesNoCount) {
    println!(
        "  {:<22} Yes {} {:>3}   No {} {:>3}",
        label,
        progress_bar(c.yes, c.total(), 10),
        c.yes,
        progress_bar(c.no, c.total(), 10),
        c.no
    );
}

// ─── Info ────────────────────────────────────────────────────────────────────

pub fn handle_info(conn: &StoreConnection, store_path: &Path) -> Result<()> {
    let progress = ProgressRepo::open(conn)?;
    let tasks = TaskRepo::open(conn)?;
    let grants = conn.backend().grants(conn.collection())?;
    let latest = progress.recent(1).first().and_then(|r| r.date).map(format_date);

    println!();
    println!("  Store:       {}", store_path.display());
    println!("  Collection:  {}", conn.collection());
    println!("  Entries:     {}", progress.list_all().len());
    println!("  Tasks:       {}", tasks.list_all().len());
    if let Some(date) = latest {
        println!("  Latest:      {}", date);
    }
    if grants.is_empty() {
        println_colored!(DIM, "  Shared with: nobody");
    } else {
        for g in &grants {
            println!("  Shared with: {} ({})", g.identity, g.role.as_str());
        }
    }
    println!();
    Ok(())
}
