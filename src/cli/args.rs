use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::db::RowId;

#[derive(Parser, Debug)]
#[command(
    name = "dailytrack",
    version,
    author,
    about = "Log daily progress and keep a to-do list in a spreadsheet-style store"
)]
pub struct Cli {
    /// Use this workbook file instead of the configured one
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save today's (or another day's) progress entry
    Log(LogArgs),
    /// Show recent progress entries
    Entries {
        /// How many of the latest entries to show
        #[arg(long)]
        recent: Option<usize>,
        /// Show every entry
        #[arg(long, conflicts_with = "recent")]
        all: bool,
    },
    /// Delete a progress entry by the id shown in `entries`
    DeleteEntry {
        id: RowId,
    },
    /// To-do list planner
    Todo {
        #[command(subcommand)]
        action: TodoCommands,
    },
    /// Mood/sleep trend and gym/class attendance counts
    Insights,
    /// Show where data is stored and who it is shared with
    Info,
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Entry date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// What you set out to do today
    #[arg(long)]
    pub goals: String,
    /// great, good, neutral, low, very-low (or 1-5)
    #[arg(long, default_value = "good")]
    pub mood: String,
    /// Hours slept
    #[arg(long, default_value_t = 8.0)]
    pub sleep: f64,
    /// Went to the gym (yes/no)
    #[arg(long, default_value = "no")]
    pub gym: String,
    /// Attended GATE classes (yes/no)
    #[arg(long, default_value = "no")]
    pub gate_classes: String,
    /// Projects worked on
    #[arg(long)]
    pub projects: String,
    /// Id of a to-do for this date that you finished; repeatable
    #[arg(long = "check", value_name = "ID")]
    pub checked: Vec<RowId>,
    /// Other completed tasks, free text
    #[arg(long, default_value = "")]
    pub tasks: String,
    /// Time at the gym (H:MM)
    #[arg(long, default_value = "0:00")]
    pub gym_time: String,
    /// Time spent studying (H:MM)
    #[arg(long)]
    pub study_hours: String,
    /// Notes and reflections
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Subcommand, Debug)]
pub enum TodoCommands {
    /// Add tasks, one per line. Pass `-` to read them from stdin
    Add {
        text: String,
        /// Date the tasks are planned for; defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// List tasks for a date
    List {
        /// Date to list; defaults to today
        #[arg(long)]
        date: Option<String>,
        /// List tasks for every date
        #[arg(long, conflicts_with = "date")]
        all: bool,
    },
    /// Mark a task completed
    Done {
        id: RowId,
    },
    /// Delete a task
    Delete {
        id: RowId,
    },
}
