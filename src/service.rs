use chrono::Utc;
use tokio::sync::watch;

use crate::date::is_valid_date;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::sections::data::{Section, SectionId};
use crate::tasks::data::{Task, TaskId};

/// Application service consumed by UI collaborators. Input validation lives
/// here; everything below it trusts its arguments. Each method is a single
/// request/response unit of work against the storage engine.
#[derive(Clone)]
pub struct TodoService {
    db: Database,
}

impl TodoService {
    pub fn new(db: Database) -> TodoService {
        TodoService { db }
    }

    /// Creates a section. Blank titles are rejected before the store is
    /// touched.
    pub async fn add_section(&self, title: &str) -> Result<Section> {
        if title.trim().is_empty() {
            return Err(Error::InvalidInput(
                "section title must not be blank".to_owned(),
            ));
        }

        self.db.create_section(title).await
    }

    /// Creates a task under a section. The due date must pass
    /// [`is_valid_date`]; UI collaborators are expected to gate submission on
    /// the same check and this is the backstop.
    pub async fn add_task(
        &self,
        section_id: SectionId,
        description: &str,
        due_date: &str,
    ) -> Result<Task> {
        if !is_valid_date(due_date) {
            return Err(Error::InvalidInput(format!(
                "invalid due date: {:?}",
                due_date
            )));
        }

        self.db.create_task(section_id, description, due_date).await
    }

    /// Rewrites a task's description and due date, stamping `edited_at`.
    /// Returns rows changed; 0 means the task disappeared underneath us and
    /// the caller should refresh its view.
    pub async fn edit_task(
        &self,
        task_id: TaskId,
        description: &str,
        due_date: &str,
    ) -> Result<usize> {
        if !is_valid_date(due_date) {
            return Err(Error::InvalidInput(format!(
                "invalid due date: {:?}",
                due_date
            )));
        }

        self.db
            .update_task_fields(task_id, description, due_date, Utc::now())
            .await
    }

    /// Sets the done flag and stamps `edited_at`, persisting the full task.
    /// Returns the value as persisted, or `None` if the task no longer
    /// exists (deleted from another path) and the caller should refresh.
    pub async fn toggle_task_done(&self, task: &Task, done: bool) -> Result<Option<Task>> {
        let mut task = task.clone();
        task.done = done;
        task.edited_at = Utc::now();

        if self.db.update_task(&task).await? == 0 {
            return Ok(None);
        }

        Ok(Some(task))
    }

    pub async fn rename_section(&self, section_id: SectionId, title: &str) -> Result<usize> {
        self.db.rename_section(section_id, title).await
    }

    pub async fn delete_section(&self, section_id: SectionId) -> Result<usize> {
        self.db.delete_section(section_id).await
    }

    pub async fn delete_task(&self, task_id: TaskId) -> Result<usize> {
        self.db.delete_task(task_id).await
    }

    pub async fn section_by_id(&self, section_id: SectionId) -> Result<Option<Section>> {
        self.db.section_by_id(section_id).await
    }

    pub async fn watch_sections(&self) -> Result<watch::Receiver<Vec<Section>>> {
        self.db.watch_sections().await
    }

    pub async fn watch_tasks(&self, section_id: SectionId) -> Result<watch::Receiver<Vec<Task>>> {
        self.db.watch_tasks(section_id).await
    }
}
