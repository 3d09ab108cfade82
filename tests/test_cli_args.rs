//! Argument parsing for the command-line front end.

use clap::Parser;
use dailytrack::cli::args::{Cli, Commands, TodoCommands};
use dailytrack::db::RowId;

#[test]
fn test_log_defaults() {
    let cli = Cli::try_parse_from([
        "dailytrack",
        "log",
        "--goals",
        "read",
        "--projects",
        "site",
        "--study-hours",
        "2:00",
    ])
    .unwrap();
    match cli.command {
        Commands::Log(args) => {
            assert_eq!(args.mood, "good");
            assert_eq!(args.gym_time, "0:00");
            assert_eq!(args.sleep, 8.0);
            assert!(args.checked.is_empty());
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_log_requires_study_hours() {
    assert!(Cli::try_parse_from(["dailytrack", "log", "--goals", "g", "--projects", "p"]).is_err());
}

#[test]
fn test_repeated_checks_and_store_override() {
    let cli = Cli::try_parse_from([
        "dailytrack",
        "log",
        "--goals",
        "g",
        "--projects",
        "p",
        "--study-hours",
        "1:00",
        "--check",
        "2",
        "--check",
        "#5",
        "--store",
        "/tmp/x.db",
    ])
    .unwrap();
    assert_eq!(cli.store.as_deref(), Some(std::path::Path::new("/tmp/x.db")));
    match cli.command {
        Commands::Log(args) => assert_eq!(args.checked, vec![RowId(2), RowId(5)]),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_todo_subcommands() {
    let cli = Cli::try_parse_from(["dailytrack", "todo", "done", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Todo { action: TodoCommands::Done { id: RowId(3) } }
    ));

    let both = ["dailytrack", "todo", "list", "--all", "--date", "2024-01-01"];
    assert!(Cli::try_parse_from(both).is_err());
    assert!(Cli::try_parse_from(["dailytrack", "delete-entry", "abc"]).is_err());
}
