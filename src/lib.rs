//! # Task Tracker
//!
//! A small task list manager that keeps its records in a single JSON file.
//!
//! Each invocation loads the file once, runs one or more [`commands::Command`]s
//! against the in-memory [`models::TaskList`], and writes the file back only if
//! something changed.

pub mod commands;
pub mod error;
pub mod models;
pub mod operations;
pub mod storage;
