mod catalog;
mod query;

use rusqlite::ToSql;
use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;
use tracing::info;

use crate::error::{Error, Result, is_foreign_key_violation};
use crate::hydrate::flatten;
use crate::models::{FolderId, Note, NoteId, TagId};
use crate::{Database, sync};

/// Service layer providing note, folder and tag operations.
///
/// Note reads run the folder/tag join and hydrate the rows with
/// [`flatten`]. Note writes persist the note row, replace its tag set and
/// then re-read the hydrated note, with the two writes sharing one
/// transaction.
///
/// # Examples
///
/// ```
/// use noteful::{Database, NewNote, NoteService};
///
/// # fn main() -> noteful::Result<()> {
/// let service = NoteService::new(Database::in_memory()?);
/// let work = service.create_tag("work")?;
///
/// let note = service.create_note(NewNote {
///     tags: vec![work.id],
///     ..NewNote::titled("Standup")
/// })?;
///
/// assert_eq!(note.title, "Standup");
/// assert_eq!(note.tags, vec![work]);
/// # Ok(())
/// # }
/// ```
pub struct NoteService {
    db: Database,
}

/// Fields of a note to create.
///
/// Deserializes from a request body such as
/// `{"title": "..", "content": "..", "folderId": 1, "tags": [1, 2]}`.
/// An absent `tags` array means no tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewNote {
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<FolderId>,
    pub tags: Vec<TagId>,
}

impl NewNote {
    /// A note with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Changes to an existing note.
///
/// `title` is required and always written. The other fields are only
/// written when present: `None` keeps the stored value, `Some(None)` clears
/// it. In a request body an absent key keeps and an explicit `null` clears,
/// so `{"title": "t"}` renames the note and nothing else. `Some(vec![])` for
/// `tags` removes every tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoteUpdate {
    pub title: String,
    #[serde(deserialize_with = "present")]
    pub content: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub folder_id: Option<Option<FolderId>>,
    pub tags: Option<Vec<TagId>>,
}

/// Wraps a key that is present in the body, `null` included, in `Some`.
/// Absent keys fall back to the field default of `None`.
fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Filters for [`NoteService::list_notes`]. All fields are optional and
/// combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoteFilter {
    /// Substring the note title must contain.
    pub search_term: Option<String>,
    /// Folder the note must be filed under.
    pub folder_id: Option<FolderId>,
    /// Tag the note must carry.
    pub tag_id: Option<TagId>,
}

impl NoteService {
    /// Creates a new NoteService with the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Lists hydrated notes matching `filter`, ordered by note id.
    pub fn list_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        let rows = query::select_note_rows(self.db.connection(), filter)?;
        Ok(flatten(rows))
    }

    /// Retrieves a hydrated note by id.
    ///
    /// Returns `None` if no note exists with the given id.
    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>> {
        let rows = query::select_note_rows_by_id(self.db.connection(), id)?;
        Ok(flatten(rows).into_iter().next())
    }

    /// Creates a note and its tag associations, returning the hydrated note.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingField`] if the title is blank.
    /// - [`Error::UnknownFolder`] if `folder_id` does not exist.
    /// - [`Error::UnknownTag`] if any tag id does not exist; nothing is written.
    pub fn create_note(&self, new: NewNote) -> Result<Note> {
        let title = required("title", &new.title)?;
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let id = self.db.write_transaction(|conn| {
            conn.execute(
                "INSERT INTO notes (title, content, folder_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                (title, &new.content, new.folder_id, now),
            )
            .map_err(|e| folder_or_store(e, new.folder_id))?;

            let id = NoteId::new(conn.last_insert_rowid());
            sync::replace_tags(conn, id, &new.tags)?;
            Ok(id)
        })?;

        info!(note_id = %id, tags = new.tags.len(), "created note");
        self.hydrated(id)
    }

    /// Updates the fields present in `update` and optionally replaces the
    /// note's tags.
    ///
    /// Returns `None` if no note exists with the given id.
    ///
    /// # Errors
    ///
    /// Same as [`NoteService::create_note`]; on error the note is unchanged.
    pub fn update_note(&self, id: NoteId, update: NoteUpdate) -> Result<Option<Note>> {
        let title = required("title", &update.title)?;
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let mut assignments = vec!["title = ?", "updated_at = ?"];
        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(title.to_string()), Box::new(now)];
        if let Some(content) = &update.content {
            assignments.push("content = ?");
            params.push(Box::new(content.clone()));
        }
        if let Some(folder_id) = update.folder_id {
            assignments.push("folder_id = ?");
            params.push(Box::new(folder_id));
        }
        params.push(Box::new(id));
        let sql = format!("UPDATE notes SET {} WHERE id = ?", assignments.join(", "));

        let found = self.db.write_transaction(|conn| {
            let changed = conn
                .execute(
                    &sql,
                    rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
                )
                .map_err(|e| folder_or_store(e, update.folder_id.flatten()))?;

            if changed == 0 {
                return Ok(false);
            }
            if let Some(tags) = &update.tags {
                sync::replace_tags(conn, id, tags)?;
            }
            Ok(true)
        })?;

        if !found {
            return Ok(None);
        }
        info!(note_id = %id, "updated note");
        self.hydrated(id).map(Some)
    }

    /// Replaces the tag set of an existing note.
    ///
    /// See [`sync::set_tags`] for the exact semantics.
    pub fn set_tags(&self, id: NoteId, tags: &[TagId]) -> Result<()> {
        sync::set_tags(&self.db, id, tags)
    }

    /// Deletes a note by id. Its tag associations are removed by cascade.
    ///
    /// Returns whether a note was deleted.
    pub fn delete_note(&self, id: NoteId) -> Result<bool> {
        let removed = self
            .db
            .connection()
            .execute("DELETE FROM notes WHERE id = ?1", [id])?;
        if removed > 0 {
            info!(note_id = %id, "deleted note");
        }
        Ok(removed > 0)
    }

    /// Re-reads a note that was just written.
    fn hydrated(&self, id: NoteId) -> Result<Note> {
        self.get_note(id)?
            .ok_or(Error::Store(rusqlite::Error::QueryReturnedNoRows))
    }
}

/// Returns the trimmed value, or [`Error::MissingField`] when it is blank.
pub(crate) fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::MissingField(field));
    }
    Ok(trimmed)
}

/// The only foreign key on `notes` is `folder_id`.
fn folder_or_store(err: rusqlite::Error, folder_id: Option<FolderId>) -> Error {
    match folder_id {
        Some(folder_id) if is_foreign_key_violation(&err) => Error::UnknownFolder(folder_id),
        _ => Error::Store(err),
    }
}
