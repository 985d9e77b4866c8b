use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Error, Result};
use crate::sections::data::SectionId;
use crate::sections::helpers::get_section_by_id;

use super::data::{Task, TaskId};

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        section_id: row.get(1)?,
        description: row.get(2)?,
        due_date: row.get(3)?,
        created_at: row.get(4)?,
        edited_at: row.get(5)?,
        done: row.get(6)?,
    })
}

/// Inserts a task under an existing section. The foreign key would reject an
/// absent parent anyway, but checking first lets the error carry the id.
pub fn create_task(
    db_connection: &Connection,
    section_id: SectionId,
    description: &str,
    due_date: &str,
    created_at: DateTime<Utc>,
) -> Result<Task> {
    if get_section_by_id(db_connection, section_id)?.is_none() {
        return Err(Error::NoSuchSection(section_id));
    }

    db_connection.execute(
        "INSERT INTO tasks (sectionId, taskDescription, taskDueDate, createdAt, editedAt, taskDone)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![section_id, description, due_date, created_at, created_at, false],
    )?;

    Ok(Task {
        id: db_connection.last_insert_rowid(),
        section_id,
        description: description.to_owned(),
        due_date: due_date.to_owned(),
        created_at,
        edited_at: created_at,
        done: false,
    })
}

/// Partial update: description, due date, and edit timestamp. Leaves the
/// done flag untouched.
pub fn update_task_fields(
    db_connection: &Connection,
    task_id: TaskId,
    description: &str,
    due_date: &str,
    edited_at: DateTime<Utc>,
) -> Result<usize> {
    Ok(db_connection.execute(
        "UPDATE tasks SET taskDescription = ?1, taskDueDate = ?2, editedAt = ?3 WHERE id = ?4",
        params![description, due_date, edited_at, task_id],
    )?)
}

/// Full update of the mutable fields by primary key.
pub fn update_task(db_connection: &Connection, task: &Task) -> Result<usize> {
    Ok(db_connection.execute(
        "UPDATE tasks SET taskDescription = ?1, taskDueDate = ?2, editedAt = ?3, taskDone = ?4
         WHERE id = ?5",
        params![
            task.description,
            task.due_date,
            task.edited_at,
            task.done,
            task.id
        ],
    )?)
}

pub fn delete_task(db_connection: &Connection, task_id: TaskId) -> Result<usize> {
    Ok(db_connection.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?)
}

pub fn get_tasks_for_section(
    db_connection: &Connection,
    section_id: SectionId,
) -> Result<Vec<Task>> {
    let mut statement = db_connection.prepare(
        "SELECT id, sectionId, taskDescription, taskDueDate, createdAt, editedAt, taskDone
         FROM tasks WHERE sectionId = ?1 ORDER BY createdAt DESC, id ASC",
    )?;

    let rows = statement.query_map(params![section_id], |row| task_from_row(row))?;

    let mut tasks = vec![];
    for row_result in rows {
        tasks.push(row_result?);
    }

    Ok(tasks)
}

/// Section a task currently belongs to, if the task exists.
pub fn get_section_of_task(
    db_connection: &Connection,
    task_id: TaskId,
) -> Result<Option<SectionId>> {
    let section_id = db_connection
        .query_row(
            "SELECT sectionId FROM tasks WHERE id = ?1",
            params![task_id],
            |row| row.get(0),
        )
        .optional()?;

    Ok(section_id)
}

/// In-memory search over a loaded task list: case-insensitive substring match
/// on the description. An empty query keeps everything.
pub fn filter_tasks(tasks: &[Task], query: &str) -> Vec<Task> {
    if query.is_empty() {
        return tasks.to_vec();
    }

    let query = query.to_lowercase();

    tasks
        .iter()
        .filter(|task| task.description.to_lowercase().contains(&query))
        .cloned()
        .collect()
}
