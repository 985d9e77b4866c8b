use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;

use super::data::{Section, SectionId};

fn section_from_row(row: &Row) -> rusqlite::Result<Section> {
    Ok(Section {
        id: row.get(0)?,
        created_at: row.get(1)?,
        title: row.get(2)?,
    })
}

pub fn create_section(
    db_connection: &Connection,
    title: &str,
    created_at: DateTime<Utc>,
) -> Result<Section> {
    db_connection.execute(
        "INSERT INTO sections (createdAt, sectionTitle) VALUES (?1, ?2)",
        params![created_at, title],
    )?;

    Ok(Section {
        id: db_connection.last_insert_rowid(),
        title: title.to_owned(),
        created_at,
    })
}

pub fn rename_section(
    db_connection: &Connection,
    section_id: SectionId,
    title: &str,
) -> Result<usize> {
    Ok(db_connection.execute(
        "UPDATE sections SET sectionTitle = ?1 WHERE id = ?2",
        params![title, section_id],
    )?)
}

/// Removes the section row; the tasks cascade is handled by the store's
/// foreign key. Returns the number of section rows removed (0 if absent).
pub fn delete_section(db_connection: &Connection, section_id: SectionId) -> Result<usize> {
    Ok(db_connection.execute(
        "DELETE FROM sections WHERE id = ?1",
        params![section_id],
    )?)
}

pub fn get_sections(db_connection: &Connection) -> Result<Vec<Section>> {
    let mut statement = db_connection.prepare(
        "SELECT id, createdAt, sectionTitle FROM sections ORDER BY createdAt DESC, id ASC",
    )?;

    let rows = statement.query_map(params![], |row| section_from_row(row))?;

    let mut sections = vec![];
    for row_result in rows {
        sections.push(row_result?);
    }

    Ok(sections)
}

pub fn get_section_by_id(
    db_connection: &Connection,
    section_id: SectionId,
) -> Result<Option<Section>> {
    let section = db_connection
        .query_row(
            "SELECT id, createdAt, sectionTitle FROM sections WHERE id = ?1",
            params![section_id],
            |row| section_from_row(row),
        )
        .optional()?;

    Ok(section)
}
