//! To-do list and the log-an-entry workflow that checks tasks off.

mod common;

use dailytrack::db::{ProgressRepo, TaskRepo};
use dailytrack::models::entry::compose_tasks_completed;
use dailytrack::models::TaskStatus;
use dailytrack::TrackerError;

use common::*;

#[test]
fn test_bulk_add_and_list_by_date() -> anyhow::Result<()> {
    let (_dir, path) = temp_store();
    let conn = connect(&path);
    let mut tasks = TaskRepo::open(&conn)?;
    tasks.add_bulk(date(2024, 5, 1), "a\nb\n\nc")?;
    tasks.add_bulk(date(2024, 5, 2), "other day")?;

    let conn = connect(&path);
    let tasks = TaskRepo::open(&conn)?;
    let day: Vec<String> = tasks
        .list_for_date(date(2024, 5, 1))
        .into_iter()
        .map(|t| t.task)
        .collect();
    assert_eq!(day, vec!["a", "b", "c"]);
    assert!(tasks.list_for_date(date(2024, 5, 3)).is_empty());
    assert_eq!(tasks.list_all().len(), 4);
    Ok(())
}

#[test]
fn test_logging_entry_checks_off_tasks() -> anyhow::Result<()> {
    let (_dir, path) = temp_store();
    let today = date(2024, 5, 1);
    let conn = connect(&path);

    let mut tasks = TaskRepo::open(&conn)?;
    let ids = tasks.add_bulk(today, "finish math homework\nattend class\ncall home")?;

    let checked: Vec<String> = [ids[0], ids[2]]
        .iter()
        .filter_map(|id| tasks.get(*id))
        .map(|t| t.task)
        .collect();
    let mut entry = make_entry(today, "stay on track");
    entry.tasks_completed = compose_tasks_completed(&checked, "laundry");

    let mut progress = ProgressRepo::open(&conn)?;
    progress.append(&entry)?;
    tasks.complete_many(&[ids[0], ids[2]])?;

    let conn = connect(&path);
    let progress = ProgressRepo::open(&conn)?;
    let id = progress.list_all().rows()[0].id;
    assert_eq!(
        progress.list_all().value(id, "Tasks Completed"),
        Some("finish math homework, call home, laundry")
    );

    let statuses: Vec<Option<TaskStatus>> = TaskRepo::open(&conn)?
        .list_for_date(today)
        .into_iter()
        .map(|t| t.status)
        .collect();
    assert_eq!(
        statuses,
        vec![
            Some(TaskStatus::Completed),
            Some(TaskStatus::Pending),
            Some(TaskStatus::Completed)
        ]
    );
    Ok(())
}

#[test]
fn test_delete_task_keeps_others() -> anyhow::Result<()> {
    let (_dir, path) = temp_store();
    let conn = connect(&path);
    let mut tasks = TaskRepo::open(&conn)?;
    let ids = tasks.add_bulk(date(2024, 5, 1), "x\ny\nz")?;
    tasks.delete(ids[0])?;
    assert!(matches!(tasks.delete(ids[0]), Err(TrackerError::RowNotFound(_))));

    let conn = connect(&path);
    let names: Vec<String> = TaskRepo::open(&conn)?
        .list_all()
        .into_iter()
        .map(|t| t.task)
        .collect();
    assert_eq!(names, vec!["y", "z"]);
    Ok(())
}
