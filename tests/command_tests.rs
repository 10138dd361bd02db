use std::fs;
use std::path::PathBuf;

use tempfile::{tempdir, TempDir};

use task_tracker::commands::{apply, Command, Outcome, Session};
use task_tracker::error::Error;
use task_tracker::models::{Status, TaskList};
use task_tracker::operations::Filter;
use task_tracker::storage::Store;

fn with_test_db<F>(f: F)
where
    F: FnOnce(&TempDir, PathBuf),
{
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    f(&dir, path);
}

fn add(description: &str) -> Command {
    Command::Add {
        description: description.into(),
    }
}

#[test]
fn test_batch_persists_once_at_the_end() {
    with_test_db(|_dir, path| {
        let mut session = Session::open(Store::new(&path)).unwrap();
        assert_eq!(session.execute(add("Buy groceries")).unwrap(), Outcome::Added(1));
        assert_eq!(session.execute(add("Complete project")).unwrap(), Outcome::Added(2));
        session
            .execute(Command::Mark { id: 2, status: Status::InProgress })
            .unwrap();
        session.execute(Command::Delete { id: 1 }).unwrap();

        // Nothing is written until the session finishes.
        assert!(!path.exists());
        assert!(session.is_dirty());
        assert!(session.finish().unwrap());

        let tasks = Store::new(&path).load().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks.next_id, 3);
        assert_eq!(tasks.get(2).unwrap().status, Status::InProgress);
    });
}

#[test]
fn test_listing_never_writes() {
    with_test_db(|_dir, path| {
        let mut session = Session::open(Store::new(&path)).unwrap();
        session.execute(add("Only task")).unwrap();
        session.finish().unwrap();
        let before = fs::read(&path).unwrap();
        let modified = fs::metadata(&path).unwrap().modified().unwrap();

        let mut session = Session::open(Store::new(&path)).unwrap();
        for filter in [Filter::All, Filter::Only(Status::Todo), Filter::Only(Status::Done)] {
            session.execute(Command::List { filter }).unwrap();
        }
        assert!(!session.is_dirty());
        assert!(!session.finish().unwrap());

        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified);
    });
}

#[test]
fn test_read_only_session_on_missing_file_creates_nothing() {
    with_test_db(|_dir, path| {
        let mut session = Session::open(Store::new(&path)).unwrap();
        let outcome = session
            .execute(Command::List { filter: Filter::All })
            .unwrap();
        assert_eq!(outcome.to_string(), "No tasks found.");
        assert!(!session.finish().unwrap());
        assert!(!path.exists());
    });
}

#[test]
fn test_failed_command_does_not_mark_dirty() {
    with_test_db(|_dir, path| {
        let mut session = Session::open(Store::new(&path)).unwrap();
        let err = session.execute(Command::Delete { id: 9 }).unwrap_err();
        assert!(matches!(err, Error::NotFound(9)));
        assert_eq!(err.to_string(), "Task with ID 9 not found");
        assert!(!session.is_dirty());
        assert!(!session.finish().unwrap());
        assert!(!path.exists());
    });
}

#[test]
fn test_apply_reports_whether_list_changed() {
    let mut tasks = TaskList::new();
    let (outcome, dirty) = apply(&mut tasks, add("Write report")).unwrap();
    assert_eq!(outcome, Outcome::Added(1));
    assert!(dirty);

    let (outcome, dirty) = apply(
        &mut tasks,
        Command::List {
            filter: Filter::Only(Status::Todo),
        },
    )
    .unwrap();
    assert!(!dirty);
    match outcome {
        Outcome::Listed { tasks: listed, .. } => assert_eq!(listed, tasks.tasks),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_outcome_messages() {
    assert_eq!(Outcome::Added(4).to_string(), "Task added successfully (ID: 4)");
    assert_eq!(Outcome::Updated(4).to_string(), "Task 4 updated successfully");
    assert_eq!(Outcome::Deleted(4).to_string(), "Task 4 deleted successfully");
    assert_eq!(
        Outcome::Marked(4, Status::InProgress).to_string(),
        "Task 4 marked as in-progress"
    );
    assert_eq!(
        Outcome::Listed {
            filter: Filter::Only(Status::Done),
            tasks: Vec::new(),
        }
        .to_string(),
        "No tasks found with status: done"
    );
}

#[test]
fn test_corrupt_file_fails_to_open() {
    with_test_db(|_dir, path| {
        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = Session::open(Store::new(&path)).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(err.exit_code(), 4);
        // The corrupt file is left for the user to inspect.
        assert_eq!(fs::read_to_string(&path).unwrap(), "[1, 2, 3]");
    });
}

#[test]
fn test_failed_command_mid_batch_keeps_earlier_changes() {
    with_test_db(|_dir, path| {
        let mut session = Session::open(Store::new(&path)).unwrap();
        session.execute(add("Buy groceries")).unwrap();
        let before = serde_json::to_string_pretty(session.tasks()).unwrap();

        let err = session
            .execute(Command::Update {
                id: 2,
                description: "Never written".into(),
            })
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(2)));
        assert_eq!(serde_json::to_string_pretty(session.tasks()).unwrap(), before);
        assert!(session.is_dirty());
        assert!(session.finish().unwrap());

        let tasks = Store::new(&path).load().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks.get(1).unwrap().description, "Buy groceries");
        assert_eq!(tasks.next_id, 2);
    });
}
