use super::{FolderId, NoteId, TagId};

/// One flat row of the notes ⟕ folders ⟕ notes_tags ⟕ tags join.
///
/// A note with `n` tags produces `n` rows; a note without tags produces a
/// single row whose tag columns are `NULL`. Folder columns are `NULL` when
/// the note is not filed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    pub note_id: NoteId,
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<FolderId>,
    pub folder_name: Option<String>,
    pub tag_id: Option<TagId>,
    pub tag_name: Option<String>,
}

impl NoteRow {
    /// Builds a row for a note that is neither filed nor tagged.
    pub fn bare(note_id: NoteId, title: impl Into<String>) -> Self {
        Self {
            note_id,
            title: title.into(),
            content: None,
            folder_id: None,
            folder_name: None,
            tag_id: None,
            tag_name: None,
        }
    }

    /// Sets the folder columns.
    pub fn in_folder(mut self, folder_id: FolderId, name: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id);
        self.folder_name = Some(name.into());
        self
    }

    /// Sets the tag columns.
    pub fn with_tag(mut self, tag_id: TagId, name: impl Into<String>) -> Self {
        self.tag_id = Some(tag_id);
        self.tag_name = Some(name.into());
        self
    }

    /// Sets the note content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Maps a result row selected in the column order
    /// `note id, title, content, folder id, folder name, tag id, tag name`.
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            note_id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            folder_id: row.get(3)?,
            folder_name: row.get(4)?,
            tag_id: row.get(5)?,
            tag_name: row.get(6)?,
        })
    }
}
