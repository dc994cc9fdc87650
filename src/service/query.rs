//! The notes ⟕ folders ⟕ notes_tags ⟕ tags join that feeds [`crate::flatten`].

use rusqlite::{Connection, ToSql};

use super::NoteFilter;
use crate::error::Result;
use crate::models::{NoteId, NoteRow};

const SELECT_NOTE_ROWS: &str = "SELECT notes.id, notes.title, notes.content,
        folders.id, folders.name,
        tags.id, tags.name
 FROM notes
 LEFT JOIN folders ON notes.folder_id = folders.id
 LEFT JOIN notes_tags ON notes.id = notes_tags.note_id
 LEFT JOIN tags ON notes_tags.tag_id = tags.id";

/// Rows are ordered by note id, then tag id, which is the order the
/// flattener preserves.
const ORDER_NOTE_ROWS: &str = " ORDER BY notes.id, tags.id";

/// Selects join rows for every note matching `filter`.
///
/// The tag filter selects notes carrying the tag through a subquery, so the
/// other tags of a matching note are still part of the result.
pub(super) fn select_note_rows(conn: &Connection, filter: &NoteFilter) -> Result<Vec<NoteRow>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(term) = filter.search_term.as_deref().map(str::trim)
        && !term.is_empty()
    {
        clauses.push("notes.title LIKE ? ESCAPE '\\'");
        params.push(Box::new(format!("%{}%", escape_like(term))));
    }
    if let Some(folder_id) = filter.folder_id {
        clauses.push("notes.folder_id = ?");
        params.push(Box::new(folder_id));
    }
    if let Some(tag_id) = filter.tag_id {
        clauses.push("notes.id IN (SELECT note_id FROM notes_tags WHERE tag_id = ?)");
        params.push(Box::new(tag_id));
    }

    let mut sql = String::from(SELECT_NOTE_ROWS);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(ORDER_NOTE_ROWS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
        NoteRow::from_row,
    )?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    Ok(result)
}

/// Escapes `LIKE` wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Selects join rows for a single note; empty when the note does not exist.
pub(super) fn select_note_rows_by_id(conn: &Connection, id: NoteId) -> Result<Vec<NoteRow>> {
    let sql = format!("{SELECT_NOTE_ROWS} WHERE notes.id = ?1{ORDER_NOTE_ROWS}");
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([id], NoteRow::from_row)?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    Ok(result)
}
