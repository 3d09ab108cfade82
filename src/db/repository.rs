use chrono::NaiveDate;
use log::{debug, info};

use crate::db::adapter::{open_or_create_table, replace_all, RowId, Table};
use crate::db::schema::{normalize, Schema, PROGRESS_SCHEMA, TODO_SCHEMA};
use crate::db::store::StoreConnection;
use crate::error::{Field, TrackerResult, ValidationError};
use crate::models::entry::{EntryRow, ProgressEntry};
use crate::models::task::{split_task_lines, TaskRow, TaskStatus, TodoTask};
use crate::utils::dates::format_date;

fn load(conn: &StoreConnection, schema: &Schema) -> TrackerResult<Table> {
    let raw = open_or_create_table(conn, schema.table, schema.columns)?;
    Ok(normalize(schema, raw))
}

/// Writes `next` over the stored table. The caller only swaps `next` in as
/// its snapshot once this returns Ok.
fn save(conn: &StoreConnection, schema: &Schema, next: &Table) -> TrackerResult<()> {
    replace_all(conn, schema.table, schema.columns, &next.to_cells())
}

// ─── Progress repo ───────────────────────────────────────────────────────────

/// Owns the daily-entries table.
pub struct ProgressRepo<'a> {
    conn: &'a StoreConnection,
    table: Table,
}

impl<'a> ProgressRepo<'a> {
    pub fn open(conn: &'a StoreConnection) -> TrackerResult<Self> {
        let table = load(conn, &PROGRESS_SCHEMA)?;
        debug!("Progress table loaded with {} entries", table.len());
        Ok(Self { conn, table })
    }

    pub fn list_all(&self) -> &Table {
        &self.table
    }

    pub fn entries(&self) -> Vec<EntryRow> {
        self.table.rows().iter().map(EntryRow::from_record).collect()
    }

    /// The last `n` entries in table order.
    pub fn recent(&self, n: usize) -> Vec<EntryRow> {
        let rows = self.table.rows();
        rows[rows.len().saturating_sub(n)..]
            .iter()
            .map(EntryRow::from_record)
            .collect()
    }

    /// Validates and appends one entry. Nothing is written when validation
    /// fails.
    pub fn append(&mut self, entry: &ProgressEntry) -> TrackerResult<RowId> {
        entry.validate()?;

        let mut next = self.table.clone();
        let id = next.push(entry.to_cells());
        save(self.conn, &PROGRESS_SCHEMA, &next)?;
        self.table = next;
        info!("Saved progress entry for {}", format_date(entry.date));
        Ok(id)
    }

    pub fn delete(&mut self, id: RowId) -> TrackerResult<()> {
        let mut next = self.table.clone();
        next.remove(id)?;
        save(self.conn, &PROGRESS_SCHEMA, &next)?;
        self.table = next;
        info!("Deleted progress entry {}", id);
        Ok(())
    }
}

// ─── Task repo ───────────────────────────────────────────────────────────────

/// Owns the to-do table.
pub struct TaskRepo<'a> {
    conn: &'a StoreConnection,
    table: Table,
}

impl<'a> TaskRepo<'a> {
    pub fn open(conn: &'a StoreConnection) -> TrackerResult<Self> {
        let table = load(conn, &TODO_SCHEMA)?;
        debug!("To-do table loaded with {} tasks", table.len());
        Ok(Self { conn, table })
    }

    pub fn list_all(&self) -> Vec<TaskRow> {
        self.table.rows().iter().map(TaskRow::from_record).collect()
    }

    /// Tasks whose stored date string equals `date` formatted as
    /// `YYYY-MM-DD`. Blank dates never match.
    pub fn list_for_date(&self, date: NaiveDate) -> Vec<TaskRow> {
        let wanted = format_date(date);
        self.table
            .rows()
            .iter()
            .filter(|r| r.cells.first().is_some_and(|d| *d == wanted))
            .map(TaskRow::from_record)
            .collect()
    }

    pub fn get(&self, id: RowId) -> Option<TaskRow> {
        self.table.get(id).map(TaskRow::from_record)
    }

    /// Adds one Pending task per non-blank line of `text`, in one rewrite.
    pub fn add_bulk(&mut self, date: NaiveDate, text: &str) -> TrackerResult<Vec<RowId>> {
        let lines = split_task_lines(text);
        if lines.is_empty() {
            return Err(ValidationError::missing(Field::Task).into());
        }

        let mut next = self.table.clone();
        let ids: Vec<RowId> = lines
            .into_iter()
            .map(|line| next.push(TodoTask::pending(date, line).to_cells()))
            .collect();
        save(self.conn, &TODO_SCHEMA, &next)?;
        self.table = next;
        info!("Added {} tasks for {}", ids.len(), format_date(date));
        Ok(ids)
    }

    pub fn set_status(&mut self, id: RowId, status: TaskStatus) -> TrackerResult<()> {
        self.complete_or_set(&[id], status)
    }

    /// Marks every listed task Completed with a single rewrite.
    pub fn complete_many(&mut self, ids: &[RowId]) -> TrackerResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        self.complete_or_set(ids, TaskStatus::Completed)
    }

    fn complete_or_set(&mut self, ids: &[RowId], status: TaskStatus) -> TrackerResult<()> {
        let mut next = self.table.clone();
        for id in ids {
            next.set(*id, "Status", status.as_str())?;
        }
        save(self.conn, &TODO_SCHEMA, &next)?;
        self.table = next;
        debug!("Set {} task(s) to {}", ids.len(), status);
        Ok(())
    }

    pub fn delete(&mut self, id: RowId) -> TrackerResult<()> {
        let mut next = self.table.clone();
        next.remove(id)?;
        save(self.conn, &TODO_SCHEMA, &next)?;
        self.table = next;
        info!("Deleted task {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::adapter::append_rows;
    use crate::db::store::SqliteBackend;
    use crate::error::TrackerError;
    use crate::models::entry::{Mood, YesNo};

    fn memory_conn() -> StoreConnection {
        StoreConnection::new(
            SqliteBackend::open_in_memory().unwrap(),
            "ProgressTracker",
            vec![],
        )
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn entry(d: u32, goals: &str) -> ProgressEntry {
        ProgressEntry {
            date: day(d),
            daily_goals: goals.to_string(),
            mood: Mood::Neutral,
            sleep_hours: 7.5,
            gym_visited: YesNo::No,
            gate_classes_attended: YesNo::Yes,
            projects_worked_on: "site".to_string(),
            tasks_completed: "dishes".to_string(),
            notes: "ok".to_string(),
            gym_time: "0:00".to_string(),
            study_hours: "1:30".to_string(),
        }
    }

    fn stored(conn: &StoreConnection, table: &str) -> Vec<Vec<String>> {
        conn.backend().read_rows(conn.collection(), table).unwrap()
    }

    #[test]
    fn append_round_trips_with_iso_date() {
        let conn = memory_conn();
        let mut repo = ProgressRepo::open(&conn).unwrap();
        let id = repo.append(&entry(5, "plan")).unwrap();

        let reopened = ProgressRepo::open(&conn).unwrap();
        let table = reopened.list_all();
        assert_eq!(table.len(), 1);
        let rid = table.rows()[0].id;
        assert_eq!(rid, id);
        assert_eq!(table.value(rid, "Date"), Some("2024-03-05"));
        assert_eq!(table.value(rid, "Sleep Hours"), Some("7.5"));
        assert_eq!(table.rows()[0].cells, entry(5, "plan").to_cells());
    }

    #[test]
    fn rejected_append_changes_nothing() {
        let conn = memory_conn();
        let mut repo = ProgressRepo::open(&conn).unwrap();
        repo.append(&entry(1, "a")).unwrap();
        let before_store = stored(&conn, "ProgressTracker");
        let before_table = repo.list_all().clone();

        let mut bad = entry(2, "b");
        bad.study_hours = String::new();
        assert!(matches!(repo.append(&bad), Err(TrackerError::Validation(_))));

        let mut bad = entry(2, "b");
        bad.gym_time = "9:99".to_string();
        let err = repo.append(&bad).unwrap_err();
        match err {
            TrackerError::Validation(v) => assert_eq!(v.field, Field::GymTime),
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(stored(&conn, "ProgressTracker"), before_store);
        assert_eq!(repo.list_all(), &before_table);
    }

    #[test]
    fn delete_removes_one_row_and_keeps_order() {
        let conn = memory_conn();
        let mut repo = ProgressRepo::open(&conn).unwrap();
        let ids: Vec<RowId> = ["a", "b", "c", "d"]
            .iter()
            .enumerate()
            .map(|(i, g)| repo.append(&entry(i as u32 + 1, g)).unwrap())
            .collect();

        repo.delete(ids[1]).unwrap();
        // Ids held from before the delete still point at the same rows.
        repo.delete(ids[2]).unwrap();

        let goals: Vec<String> = ProgressRepo::open(&conn)
            .unwrap()
            .list_all()
            .rows()
            .iter()
            .map(|r| r.cells[1].clone())
            .collect();
        assert_eq!(goals, vec!["a", "d"]);
    }

    #[test]
    fn deleting_unknown_id_is_an_error_and_writes_nothing() {
        let conn = memory_conn();
        let mut repo = ProgressRepo::open(&conn).unwrap();
        repo.append(&entry(1, "a")).unwrap();
        let before = stored(&conn, "ProgressTracker");
        assert!(matches!(repo.delete(RowId(42)), Err(TrackerError::RowNotFound(RowId(42)))));
        assert_eq!(stored(&conn, "ProgressTracker"), before);
    }

    #[test]
    fn recent_returns_the_tail() {
        let conn = memory_conn();
        let mut repo = ProgressRepo::open(&conn).unwrap();
        for (i, g) in ["a", "b", "c", "d"].iter().enumerate() {
            repo.append(&entry(i as u32 + 1, g)).unwrap();
        }
        let recent: Vec<String> = repo.recent(3).into_iter().map(|r| r.cells[1].clone()).collect();
        assert_eq!(recent, vec!["b", "c", "d"]);
        assert_eq!(repo.recent(10).len(), 4);
    }

    #[test]
    fn legacy_sheet_is_migrated_on_save() {
        let conn = memory_conn();
        let backend = conn.backend();
        backend.create_collection("ProgressTracker").unwrap();
        backend.create_table("ProgressTracker", "ProgressTracker").unwrap();
        let legacy = |cells: &[&str]| cells.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        append_rows(
            &conn,
            "ProgressTracker",
            &[
                legacy(&["Date", "Goals", "Mood", "Sleep_Hours", "Gym"]),
                legacy(&["01/02/2024", "old goal", "🙂 Good", "6", "Yes"]),
            ],
        )
        .unwrap();

        let mut repo = ProgressRepo::open(&conn).unwrap();
        repo.append(&entry(5, "new")).unwrap();

        let rows = stored(&conn, "ProgressTracker");
        assert_eq!(rows[0][1], "Daily Goals");
        assert_eq!(rows[0].len(), 11);
        assert_eq!(rows[1][0], "2024-01-02");
        assert_eq!(rows[1][1], "old goal");
        assert_eq!(rows[1][4], "Yes");
        assert_eq!(rows[1][10], "");
        assert_eq!(rows[2][1], "new");
    }

    #[test]
    fn add_bulk_ignores_blank_lines() {
        let conn = memory_conn();
        let mut tasks = TaskRepo::open(&conn).unwrap();
        let ids = tasks.add_bulk(day(5), "a\nb\n\nc").unwrap();
        assert_eq!(ids.len(), 3);

        let listed = TaskRepo::open(&conn).unwrap().list_for_date(day(5));
        let names: Vec<&str> = listed.iter().map(|t| t.task.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(listed.iter().all(|t| t.status == Some(TaskStatus::Pending)));
    }

    #[test]
    fn add_bulk_with_only_blank_lines_is_rejected() {
        let conn = memory_conn();
        let mut tasks = TaskRepo::open(&conn).unwrap();
        assert!(matches!(tasks.add_bulk(day(5), "\n  \n"), Err(TrackerError::Validation(_))));
        assert!(tasks.list_all().is_empty());
    }

    #[test]
    fn list_for_date_is_exact_and_skips_blank_dates() {
        let conn = memory_conn();
        let mut tasks = TaskRepo::open(&conn).unwrap();
        tasks.add_bulk(day(5), "mine").unwrap();
        tasks.add_bulk(day(6), "tomorrow").unwrap();
        append_rows(
            &conn,
            "ToDoList",
            &[vec!["whenever".to_string(), "floating".to_string(), "Pending".to_string()]],
        )
        .unwrap();

        let tasks = TaskRepo::open(&conn).unwrap();
        assert_eq!(tasks.list_all().len(), 3);
        let day5: Vec<String> = tasks.list_for_date(day(5)).into_iter().map(|t| t.task).collect();
        assert_eq!(day5, vec!["mine"]);
        assert!(tasks.list_all().iter().any(|t| t.task == "floating" && t.date.is_none()));
    }

    #[test]
    fn status_updates_and_deletes_are_persisted() {
        let conn = memory_conn();
        let mut tasks = TaskRepo::open(&conn).unwrap();
        let ids = tasks.add_bulk(day(5), "a\nb\nc").unwrap();

        tasks.set_status(ids[0], TaskStatus::Completed).unwrap();
        tasks.complete_many(&[ids[2]]).unwrap();
        tasks.delete(ids[1]).unwrap();
        assert!(matches!(
            tasks.set_status(ids[1], TaskStatus::Completed),
            Err(TrackerError::RowNotFound(_))
        ));

        assert_eq!(
            stored(&conn, "ToDoList"),
            vec![
                vec!["Date", "Task", "Status"],
                vec!["2024-03-05", "a", "Completed"],
                vec!["2024-03-05", "c", "Completed"],
            ]
        );
    }

    #[test]
    fn complete_many_is_all_or_nothing() {
        let conn = memory_conn();
        let mut tasks = TaskRepo::open(&conn).unwrap();
        let ids = tasks.add_bulk(day(5), "a").unwrap();
        assert!(tasks.complete_many(&[ids[0], RowId(99)]).is_err());
        assert_eq!(tasks.get(ids[0]).unwrap().status, Some(TaskStatus::Pending));
    }
}
