//! Operations on an in-memory [`TaskList`].
//!
//! Every mutating operation checks its preconditions before touching the list,
//! so a returned error always means the list is exactly as it was.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::{now, Status, Task, TaskList};

/// Status selection for [`list`]; `All` matches every task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(Status),
}

impl Filter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(status) => task.status == *status,
        }
    }
}

impl FromStr for Filter {
    type Err = Error;

    /// An empty string selects all tasks.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Filter::All);
        }
        s.parse::<Status>()
            .map(Filter::Only)
            .map_err(Error::InvalidFilter)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("all"),
            Filter::Only(status) => write!(f, "{}", status),
        }
    }
}

/// Appends a new `todo` task and returns its ID.
///
/// The ID is `next_id`, or one past the highest stored ID if a hand-edited
/// file left `next_id` behind. `next_id` then moves past the new ID.
pub fn add(tasks: &mut TaskList, description: String) -> Result<u64> {
    let id = match tasks.tasks.iter().map(|t| t.id).max() {
        Some(max_id) => max_id
            .checked_add(1)
            .ok_or(Error::IdsExhausted(max_id))?
            .max(tasks.next_id),
        None => tasks.next_id,
    };
    let next_id = id.checked_add(1).ok_or(Error::IdsExhausted(id))?;
    tasks.tasks.push(Task::new(id, description, now()));
    tasks.next_id = next_id;
    Ok(id)
}

/// Replaces the description of task `id`.
pub fn update(tasks: &mut TaskList, id: u64, description: String) -> Result<()> {
    let task = tasks.get_mut(id).ok_or(Error::NotFound(id))?;
    task.description = description;
    task.updated_at = now().max(task.created_at);
    Ok(())
}

/// Removes task `id`. Its ID is retired; `next_id` is left alone.
pub fn delete(tasks: &mut TaskList, id: u64) -> Result<Task> {
    let index = tasks
        .tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or(Error::NotFound(id))?;
    Ok(tasks.tasks.remove(index))
}

/// Sets the status of task `id`. Any status may follow any other.
pub fn mark_status(tasks: &mut TaskList, id: u64, status: Status) -> Result<()> {
    let task = tasks.get_mut(id).ok_or(Error::NotFound(id))?;
    task.status = status;
    task.updated_at = now().max(task.created_at);
    Ok(())
}

/// Tasks matching `filter`, in insertion order.
pub fn list(tasks: &TaskList, filter: Filter) -> Vec<&Task> {
    tasks.tasks.iter().filter(|t| filter.matches(t)).collect()
}
