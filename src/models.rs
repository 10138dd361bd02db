use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};

/// Timestamp type stored in the data file (RFC 3339 with offset).
pub type Timestamp = DateTime<FixedOffset>;

/// Current local time with its UTC offset.
pub fn now() -> Timestamp {
    Local::now().fixed_offset()
}

/// Progress state of a task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Represents a single task record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, never reused after deletion.
    pub id: u64,
    /// Free-form description of the task.
    pub description: String,
    pub status: Status,
    /// Fixed when the task is created.
    pub created_at: Timestamp,
    /// Reset on every description or status change.
    pub updated_at: Timestamp,
}

impl Task {
    /// Creates a fresh `todo` task whose timestamps are both `created`.
    pub fn new(id: u64, description: String, created: Timestamp) -> Self {
        Self {
            id,
            description,
            status: Status::Todo,
            created_at: created,
            updated_at: created,
        }
    }
}

/// The whole persisted collection: tasks in insertion order plus the ID counter.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub tasks: Vec<Task>,
    /// Greater than every ID ever issued, including deleted ones.
    pub next_id: u64,
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskList {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Finds a task by its ID.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}
