//! Database operations for the notes table
//!
//! Writes run inside a transaction. A `rusqlite::Transaction` that is dropped
//! without `commit()` rolls back, so an early `?` return leaves the table as it
//! was before the request.

use notes_types::Note;
use rusqlite::{OptionalExtension, params};

use crate::db::Database;
use crate::error::{NoteError, NoteOp, NoteResult};

fn row_to_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        note_name: row.get(1)?,
        note_description: row.get(2)?,
    })
}

impl Database {
    /// Insert a note and return the id assigned by the store.
    ///
    /// `None` is stored as NULL; a NULL name fails the NOT NULL constraint.
    pub fn insert_note(
        &self,
        note_name: Option<&str>,
        note_description: Option<&str>,
    ) -> NoteResult<i64> {
        let mut conn = self.conn()?;
        let storage = NoteError::storage;

        let tx = conn.transaction().map_err(storage(NoteOp::Insert))?;
        let id: i64 = tx
            .query_row(
                "INSERT INTO notes (note_name, note_description) VALUES (?1, ?2) RETURNING id",
                params![note_name, note_description],
                |row| row.get(0),
            )
            .map_err(storage(NoteOp::Insert))?;
        tx.commit().map_err(storage(NoteOp::Insert))?;

        Ok(id)
    }

    /// Overwrite both mutable fields of an existing note.
    ///
    /// `None` is stored as NULL, so a missing description clears it.
    pub fn update_note(
        &self,
        id: i64,
        note_name: Option<&str>,
        note_description: Option<&str>,
    ) -> NoteResult<()> {
        let mut conn = self.conn()?;
        let storage = NoteError::storage;

        let tx = conn.transaction().map_err(storage(NoteOp::Update))?;
        let exists = tx
            .query_row("SELECT id FROM notes WHERE id = ?1", params![id], |row| {
                row.get::<_, i64>(0)
            })
            .optional()
            .map_err(storage(NoteOp::Update))?
            .is_some();

        if !exists {
            return Err(NoteError::NotFound(id));
        }

        tx.execute(
            "UPDATE notes SET note_name = ?1, note_description = ?2 WHERE id = ?3",
            params![note_name, note_description, id],
        )
        .map_err(storage(NoteOp::Update))?;
        tx.commit().map_err(storage(NoteOp::Update))?;

        Ok(())
    }

    /// All notes, oldest first
    pub fn list_notes(&self) -> NoteResult<Vec<Note>> {
        let conn = self.conn()?;
        let storage = NoteError::storage;

        let mut stmt = conn
            .prepare("SELECT id, note_name, note_description FROM notes ORDER BY id")
            .map_err(storage(NoteOp::List))?;
        let rows = stmt
            .query_map([], row_to_note)
            .map_err(storage(NoteOp::List))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(storage(NoteOp::List))
    }

    #[cfg(test)]
    pub fn get_note(&self, id: i64) -> NoteResult<Option<Note>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, note_name, note_description FROM notes WHERE id = ?1",
            params![id],
            row_to_note,
        )
        .optional()
        .map_err(NoteError::storage(NoteOp::List))
    }

    /// Delete a note. Zero affected rows is reported as `NotFound`.
    pub fn delete_note(&self, id: i64) -> NoteResult<()> {
        let mut conn = self.conn()?;
        let storage = NoteError::storage;

        let tx = conn.transaction().map_err(storage(NoteOp::Delete))?;
        let count = tx
            .execute("DELETE FROM notes WHERE id = ?1", params![id])
            .map_err(storage(NoteOp::Delete))?;

        if count == 0 {
            return Err(NoteError::NotFound(id));
        }

        tx.commit().map_err(storage(NoteOp::Delete))?;
        Ok(())
    }

    pub fn count_notes(&self) -> NoteResult<i64> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
            .map_err(NoteError::storage(NoteOp::List))
    }
}
