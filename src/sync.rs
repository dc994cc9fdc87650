//! Replace-all synchronization of a note's tag associations.
//!
//! The target state is a set: after a successful call `notes_tags` holds
//! exactly one `(note_id, tag_id)` row per distinct supplied tag id, whatever
//! it held before. Old rows are deleted before new ones are inserted, and
//! both phases run in one write transaction, so a failed insert leaves the
//! previous association set in place instead of an empty one.

use std::collections::BTreeSet;

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::db::Database;
use crate::error::{Error, Result, is_foreign_key_violation};
use crate::models::{NoteId, TagId};

/// Replaces the tags of `note_id` with `tag_ids` as one atomic step.
///
/// Duplicate ids are coalesced. An empty slice removes every association.
/// The note is not checked up front: with an empty slice a missing note is
/// a no-op, otherwise the first insert fails with [`Error::UnknownNote`].
/// An id with no row in `tags` fails with [`Error::UnknownTag`]. In both
/// cases the transaction is rolled back.
///
/// # Examples
///
/// ```
/// use noteful::{Database, NewNote, NoteService, sync};
///
/// # fn main() -> noteful::Result<()> {
/// let service = NoteService::new(Database::in_memory()?);
/// let red = service.create_tag("red")?;
/// let note = service.create_note(NewNote::titled("Groceries"))?;
///
/// sync::set_tags(service.database(), note.id, &[red.id, red.id])?;
/// assert_eq!(service.get_note(note.id)?.unwrap().tag_ids(), vec![red.id]);
///
/// sync::set_tags(service.database(), note.id, &[])?;
/// assert!(service.get_note(note.id)?.unwrap().tags.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn set_tags(db: &Database, note_id: NoteId, tag_ids: &[TagId]) -> Result<()> {
    db.write_transaction(|conn| replace_tags(conn, note_id, tag_ids))?;
    Ok(())
}

/// Delete-then-insert on an open connection, returning the number of
/// associations written.
///
/// Performs no transaction control; callers that combine this with other
/// writes run it inside [`Database::write_transaction`].
pub(crate) fn replace_tags(conn: &Connection, note_id: NoteId, tag_ids: &[TagId]) -> Result<usize> {
    let target: BTreeSet<TagId> = tag_ids.iter().copied().collect();

    let removed = conn.execute("DELETE FROM notes_tags WHERE note_id = ?1", [note_id])?;

    let mut insert =
        conn.prepare_cached("INSERT INTO notes_tags (note_id, tag_id) VALUES (?1, ?2)")?;
    for &tag_id in &target {
        if let Err(e) = insert.execute((note_id, tag_id)) {
            return Err(classify_insert_failure(conn, e, note_id, tag_id));
        }
    }

    debug!(%note_id, removed, inserted = target.len(), "synchronized note tags");
    Ok(target.len())
}

/// Maps a failed link insert to the missing side of the foreign key.
///
/// The insert error is kept as [`Error::Store`] when it is not a foreign key
/// violation or when the note lookup fails as well.
fn classify_insert_failure(
    conn: &Connection,
    err: rusqlite::Error,
    note_id: NoteId,
    tag_id: TagId,
) -> Error {
    if !is_foreign_key_violation(&err) {
        return Error::Store(err);
    }

    match note_exists(conn, note_id) {
        Ok(true) => Error::UnknownTag(tag_id),
        Ok(false) => Error::UnknownNote(note_id),
        Err(_) => Error::Store(err),
    }
}

fn note_exists(conn: &Connection, note_id: NoteId) -> rusqlite::Result<bool> {
    conn.query_row("SELECT 1 FROM notes WHERE id = ?1", [note_id], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
}
