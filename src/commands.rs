use std::fmt;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{Status, Task, TaskList};
use crate::operations::{self, Filter};
use crate::storage::Store;

/// One operation on the task list, with its arguments already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { description: String },
    Update { id: u64, description: String },
    Delete { id: u64 },
    Mark { id: u64, status: Status },
    List { filter: Filter },
}

impl Command {
    /// Whether a successful run of this command changes the task list.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Command::List { .. })
    }
}

/// Result of a successful command, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(u64),
    Updated(u64),
    Deleted(u64),
    Marked(u64, Status),
    Listed { filter: Filter, tasks: Vec<Task> },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Added(id) => write!(f, "Task added successfully (ID: {})", id),
            Outcome::Updated(id) => write!(f, "Task {} updated successfully", id),
            Outcome::Deleted(id) => write!(f, "Task {} deleted successfully", id),
            Outcome::Marked(id, status) => write!(f, "Task {} marked as {}", id, status),
            Outcome::Listed { filter, tasks } if tasks.is_empty() => match filter {
                Filter::All => f.write_str("No tasks found."),
                Filter::Only(status) => write!(f, "No tasks found with status: {}", status),
            },
            Outcome::Listed { tasks, .. } => write!(f, "{}", task_table(tasks)),
        }
    }
}

/// Runs `command` against `tasks`.
///
/// Returns the outcome together with whether the list was modified.
pub fn apply(tasks: &mut TaskList, command: Command) -> Result<(Outcome, bool)> {
    let dirty = command.is_mutating();
    let outcome = match command {
        Command::Add { description } => Outcome::Added(operations::add(tasks, description)?),
        Command::Update { id, description } => {
            operations::update(tasks, id, description)?;
            Outcome::Updated(id)
        }
        Command::Delete { id } => {
            operations::delete(tasks, id)?;
            Outcome::Deleted(id)
        }
        Command::Mark { id, status } => {
            operations::mark_status(tasks, id, status)?;
            Outcome::Marked(id, status)
        }
        Command::List { filter } => Outcome::Listed {
            filter,
            tasks: operations::list(tasks, filter).into_iter().cloned().collect(),
        },
    };
    Ok((outcome, dirty))
}

/// A task list loaded once, changed by any number of commands, and saved at
/// most once.
#[derive(Debug)]
pub struct Session {
    store: Store,
    tasks: TaskList,
    dirty: bool,
}

impl Session {
    /// Loads the task list from `store`.
    pub fn open(store: Store) -> Result<Self> {
        let tasks = store.load()?;
        Ok(Self {
            store,
            tasks,
            dirty: false,
        })
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// True once a mutating command has succeeded.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        match apply(&mut self.tasks, command) {
            Ok((outcome, changed)) => {
                self.dirty |= changed;
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "command failed");
                Err(e)
            }
        }
    }

    /// Saves the task list if it changed. Returns whether a write happened.
    pub fn finish(self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.store.save(&self.tasks)?;
        info!(
            path = %self.store.path().display(),
            count = self.tasks.len(),
            "persisted task list"
        );
        Ok(true)
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Todo => Color::Yellow,
        Status::InProgress => Color::Cyan,
        Status::Done => Color::Green,
    }
}

/// Formats tasks as a table in the given order.
pub fn task_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
            Cell::new("Created").add_attribute(Attribute::Bold),
            Cell::new("Updated").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(t.status).fg(status_color(t.status)),
            Cell::new(&t.description),
            Cell::new(t.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(t.updated_at.format("%Y-%m-%d %H:%M")),
        ]);
    }
    table
}
