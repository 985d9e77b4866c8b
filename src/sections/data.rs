use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type SectionId = i64;

/// A named grouping of tasks. `id` is assigned by the store on insert and
/// never changes; `created_at` is the default ordering key (newest first).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}
