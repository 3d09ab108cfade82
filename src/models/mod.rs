pub mod entry;
pub mod stats;
pub mod task;

pub use entry::{EntryRow, Mood, ProgressEntry, YesNo};
pub use stats::{ActivityCounts, TimeTotals, TrendPoint, YesNoCount};
pub use task::{TaskRow, TaskStatus, TodoTask};
