//! Error type shared by the store, the synchronizer and the note service.

use rusqlite::ffi;
use thiserror::Error;

use crate::models::{FolderId, NoteId, TagId};

/// Result alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to callers of the note service.
///
/// Store failures are never swallowed: anything that is not a recognised
/// constraint violation is passed through unchanged as [`Error::Store`].
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was absent or blank.
    #[error("Missing `{0}` in request body")]
    MissingField(&'static str),

    /// Tags were synchronized for a note that does not exist.
    #[error("Note {0} does not exist")]
    UnknownNote(NoteId),

    /// A tag id supplied for synchronization does not exist.
    #[error("Tag {0} does not exist")]
    UnknownTag(TagId),

    /// A note was filed under a folder that does not exist.
    #[error("Folder {0} does not exist")]
    UnknownFolder(FolderId),

    /// A unique name is already taken.
    #[error("{0} already exists")]
    Conflict(String),

    /// The store round-trip itself failed.
    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl Error {
    /// Returns true for errors caused by the request rather than the store.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Error::Store(_))
    }
}

/// Returns true if the error is a `FOREIGN KEY constraint failed` violation.
pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

/// Returns true if the error is a `UNIQUE constraint failed` violation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
