use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tokio::sync::watch;
use tracing::debug;

use crate::error::{Error, Result};
use crate::sections::data::{Section, SectionId};
use crate::sections::helpers;
use crate::tasks::data::{Task, TaskId};
use crate::tasks::helpers as task_helpers;

/// Publish side of the live queries: one channel for the all-sections list
/// and one per watched section for its task list. Senders stay registered for
/// the lifetime of the handle so late subscribers share the same channel.
#[derive(Default)]
struct Watchers {
    sections: Option<watch::Sender<Vec<Section>>>,
    tasks: HashMap<SectionId, watch::Sender<Vec<Task>>>,
}

/// Handle to the to-do store.
///
/// Opened explicitly by whoever composes the application and closed at
/// shutdown; cheap to clone, and all clones share one connection and one
/// watcher registry. Every operation is an asynchronous request/response that
/// runs its blocking SQLite work on tokio's blocking pool; the caller decides
/// where to await it. Concurrent writers are serialized by the connection
/// mutex and SQLite's own locking.
#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
    watchers: Arc<Mutex<Watchers>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Database> {
        Database::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Database> {
        Database::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> Result<Database> {
        connection.execute_batch("PRAGMA foreign_keys = ON")?;
        connection.execute(
            "CREATE TABLE IF NOT EXISTS sections (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                createdAt TEXT NOT NULL,
                sectionTitle TEXT NOT NULL
            )",
            params![],
        )?;
        connection.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sectionId INTEGER NOT NULL REFERENCES sections(id) ON DELETE CASCADE,
                taskDescription TEXT NOT NULL,
                taskDueDate TEXT NOT NULL,
                createdAt TEXT NOT NULL,
                editedAt TEXT NOT NULL,
                taskDone INTEGER NOT NULL DEFAULT 0
            )",
            params![],
        )?;

        Ok(Database {
            connection: Arc::new(Mutex::new(connection)),
            watchers: Arc::new(Mutex::new(Watchers::default())),
        })
    }

    /// Closes the underlying connection if this is the last handle; earlier
    /// clones just drop their reference.
    pub fn close(self) -> Result<()> {
        let Database {
            connection,
            watchers,
        } = self;
        drop(watchers);

        if let Ok(mutex) = Arc::try_unwrap(connection) {
            let connection = mutex.into_inner()?;
            connection.close().map_err(|(_, e)| Error::Storage(e))?;
        }

        Ok(())
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || op(&db)).await?
    }

    pub async fn create_section(&self, title: &str) -> Result<Section> {
        let title = title.to_owned();
        self.run(move |db| {
            let connection = db.connection.lock()?;
            let section = helpers::create_section(&connection, &title, Utc::now())?;
            debug!(section_id = section.id, "created section");
            db.publish_sections(&connection)?;
            Ok(section)
        })
        .await
    }

    /// Returns the number of rows renamed; 0 signals the section is gone.
    pub async fn rename_section(&self, section_id: SectionId, title: &str) -> Result<usize> {
        let title = title.to_owned();
        self.run(move |db| {
            let connection = db.connection.lock()?;
            let changed = helpers::rename_section(&connection, section_id, &title)?;
            if changed > 0 {
                db.publish_sections(&connection)?;
            }
            Ok(changed)
        })
        .await
    }

    /// Deletes the section and, through the cascade, every task in it.
    /// Returns the number of section rows removed; 0 signals not-found.
    pub async fn delete_section(&self, section_id: SectionId) -> Result<usize> {
        self.run(move |db| {
            let connection = db.connection.lock()?;
            let removed = helpers::delete_section(&connection, section_id)?;
            if removed > 0 {
                debug!(section_id, "deleted section and its tasks");
                db.publish_sections(&connection)?;
                db.publish_tasks(&connection, section_id)?;
            }
            Ok(removed)
        })
        .await
    }

    pub async fn section_by_id(&self, section_id: SectionId) -> Result<Option<Section>> {
        self.run(move |db| {
            let connection = db.connection.lock()?;
            helpers::get_section_by_id(&connection, section_id)
        })
        .await
    }

    /// Live query over all sections, ordered newest first. The receiver holds
    /// the current snapshot immediately and is notified after every write
    /// that touches the section list.
    pub async fn watch_sections(&self) -> Result<watch::Receiver<Vec<Section>>> {
        self.run(move |db| {
            let connection = db.connection.lock()?;
            let mut watchers = db.watchers.lock()?;

            if let Some(sender) = &watchers.sections {
                return Ok(sender.subscribe());
            }

            let (sender, receiver) = watch::channel(helpers::get_sections(&connection)?);
            watchers.sections = Some(sender);
            Ok(receiver)
        })
        .await
    }

    pub async fn create_task(
        &self,
        section_id: SectionId,
        description: &str,
        due_date: &str,
    ) -> Result<Task> {
        let description = description.to_owned();
        let due_date = due_date.to_owned();
        self.run(move |db| {
            let connection = db.connection.lock()?;
            let task =
                task_helpers::create_task(&connection, section_id, &description, &due_date, Utc::now())?;
            debug!(task_id = task.id, section_id, "created task");
            db.publish_tasks(&connection, section_id)?;
            Ok(task)
        })
        .await
    }

    /// Partial update of description, due date, and edit timestamp; the done
    /// flag is untouched. Returns rows changed (0 if the task is gone).
    pub async fn update_task_fields(
        &self,
        task_id: TaskId,
        description: &str,
        due_date: &str,
        edited_at: DateTime<Utc>,
    ) -> Result<usize> {
        let description = description.to_owned();
        let due_date = due_date.to_owned();
        self.run(move |db| {
            let connection = db.connection.lock()?;
            let section_id = task_helpers::get_section_of_task(&connection, task_id)?;
            let changed =
                task_helpers::update_task_fields(&connection, task_id, &description, &due_date, edited_at)?;
            if changed > 0 {
                if let Some(section_id) = section_id {
                    db.publish_tasks(&connection, section_id)?;
                }
            }
            Ok(changed)
        })
        .await
    }

    /// Replaces all mutable fields of the task by primary key.
    pub async fn update_task(&self, task: &Task) -> Result<usize> {
        let task = task.clone();
        self.run(move |db| {
            let connection = db.connection.lock()?;
            let changed = task_helpers::update_task(&connection, &task)?;
            if changed > 0 {
                db.publish_tasks(&connection, task.section_id)?;
            }
            Ok(changed)
        })
        .await
    }

    /// Returns the number of task rows removed; 0 signals not-found.
    pub async fn delete_task(&self, task_id: TaskId) -> Result<usize> {
        self.run(move |db| {
            let connection = db.connection.lock()?;
            let section_id = task_helpers::get_section_of_task(&connection, task_id)?;
            let removed = task_helpers::delete_task(&connection, task_id)?;
            if removed > 0 {
                debug!(task_id, "deleted task");
                if let Some(section_id) = section_id {
                    db.publish_tasks(&connection, section_id)?;
                }
            }
            Ok(removed)
        })
        .await
    }

    /// Live query over one section's tasks, ordered newest first. Watching a
    /// section that does not exist yields an empty snapshot, same as a
    /// section whose tasks were all removed.
    pub async fn watch_tasks(&self, section_id: SectionId) -> Result<watch::Receiver<Vec<Task>>> {
        self.run(move |db| {
            let connection = db.connection.lock()?;
            let mut watchers = db.watchers.lock()?;

            if let Some(sender) = watchers.tasks.get(&section_id) {
                return Ok(sender.subscribe());
            }

            let snapshot = task_helpers::get_tasks_for_section(&connection, section_id)?;
            let (sender, receiver) = watch::channel(snapshot);
            watchers.tasks.insert(section_id, sender);
            Ok(receiver)
        })
        .await
    }

    fn publish_sections(&self, connection: &Connection) -> Result<()> {
        let watchers = self.watchers.lock()?;
        if let Some(sender) = &watchers.sections {
            sender.send_replace(helpers::get_sections(connection)?);
        }
        Ok(())
    }

    fn publish_tasks(&self, connection: &Connection, section_id: SectionId) -> Result<()> {
        let mut watchers = self.watchers.lock()?;

        // Channels that lost their last subscriber are dead weight; dropping
        // them here keeps the map bounded, and a later watch re-creates the
        // channel from a fresh snapshot.
        watchers
            .tasks
            .retain(|_, sender| sender.receiver_count() > 0);

        if let Some(sender) = watchers.tasks.get(&section_id) {
            sender.send_replace(task_helpers::get_tasks_for_section(connection, section_id)?);
        }
        Ok(())
    }
}
