//! Persistence and live-query layer for a sectioned to-do list.
//!
//! Sections group tasks; tasks carry a description, a display-format due
//! date, creation/edit timestamps, and a done flag. The [`Database`] handle
//! owns the SQLite store and exposes asynchronous CRUD operations plus
//! watch-channel live queries for the two list views; [`TodoService`] is the
//! thin validation layer UI collaborators talk to. Deleting a section
//! cascades to its tasks, so no orphaned task can exist.

pub mod date;
pub mod db;
pub mod error;
pub mod sections;
pub mod service;
pub mod tasks;

pub use crate::date::is_valid_date;
pub use crate::db::Database;
pub use crate::error::{Error, Result};
pub use crate::sections::data::{Section, SectionId};
pub use crate::service::TodoService;
pub use crate::tasks::data::{Task, TaskId};
