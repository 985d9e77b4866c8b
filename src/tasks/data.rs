use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sections::data::SectionId;

pub type TaskId = i64;

/// A single to-do item belonging to exactly one section.
///
/// `due_date` is kept as the user-entered display string (`ddMMyyyy` or
/// `dd/MM/yyyy`), not a timestamp; it is validated at the service boundary.
/// `edited_at` moves on every mutation of description, due date, or done.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub section_id: SectionId,
    pub description: String,
    pub due_date: String,
    pub created_at: DateTime<Utc>,
    pub edited_at: DateTime<Utc>,
    pub done: bool,
}
