use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{de, Deserialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StorageError;
use crate::models::{Task, TaskList};

/// Default name of the data file, resolved against the working directory.
pub const DEFAULT_FILE: &str = "tasks.json";

/// On-disk shape of the data file.
///
/// Both keys are optional so hand-written files stay loadable; a missing
/// `nextId` is derived from the highest stored ID. A stored `nextId` is kept
/// as is, even when it lags behind the stored IDs; `operations::add` skips
/// past them.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTaskList {
    #[serde(default)]
    tasks: Vec<Task>,
    next_id: Option<u64>,
}

impl TryFrom<StoredTaskList> for TaskList {
    type Error = serde_json::Error;

    fn try_from(stored: StoredTaskList) -> Result<Self, Self::Error> {
        let next_id = match stored.next_id {
            Some(next_id) => next_id,
            None => stored
                .tasks
                .iter()
                .map(|t| t.id)
                .max()
                .unwrap_or(0)
                .checked_add(1)
                .ok_or_else(|| {
                    <serde_json::Error as de::Error>::custom(
                        "task IDs exhausted, cannot derive nextId",
                    )
                })?,
        };
        Ok(TaskList {
            tasks: stored.tasks,
            next_id,
        })
    }
}

/// The record store: one JSON file holding the whole [`TaskList`].
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(DEFAULT_FILE)
    }
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the task list from the data file.
    ///
    /// A missing or empty file yields an empty list with `next_id = 1`.
    /// Content is returned as stored, without repair or deduplication.
    pub fn load(&self) -> Result<TaskList, StorageError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "data file missing, starting empty");
                return Ok(TaskList::new());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if data.is_empty() {
            debug!(path = %self.path.display(), "data file empty, starting empty");
            return Ok(TaskList::new());
        }

        let tasks = serde_json::from_slice::<StoredTaskList>(&data)
            .and_then(TaskList::try_from)
            .map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            path = %self.path.display(),
            count = tasks.len(),
            next_id = tasks.next_id,
            "loaded tasks"
        );
        Ok(tasks)
    }

    /// Writes the whole task list, replacing the previous file content.
    ///
    /// The JSON is written to a temporary file next to the target and then
    /// renamed over it, so readers see either the old or the new file.
    pub fn save(&self, tasks: &TaskList) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(tasks).map_err(StorageError::Serialize)?;
        self.write_atomic(json.as_bytes())
            .map_err(|source| StorageError::Write {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            path = %self.path.display(),
            count = tasks.len(),
            bytes = json.len(),
            "saved tasks"
        );
        Ok(())
    }

    fn write_atomic(&self, data: &[u8]) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(data)?;
        file.as_file().sync_all()?;
        match fs::metadata(&self.path) {
            Ok(meta) => fs::set_permissions(file.path(), meta.permissions())?,
            Err(_) => set_new_file_mode(file.path())?,
        }
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// New data files are world-readable like any file written with `0644`.
#[cfg(unix)]
fn set_new_file_mode(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_new_file_mode(_path: &Path) -> io::Result<()> {
    Ok(())
}
