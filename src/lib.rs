//! Notes, folders and tags over SQLite.
//!
//! Note reads select the `notes ⟕ folders ⟕ notes_tags ⟕ tags` join and
//! hydrate it with [`flatten`]; note writes replace the tag set through
//! [`sync::set_tags`].

pub mod config;
pub mod db;
pub mod error;
pub mod hydrate;
pub mod models;
pub mod service;
pub mod sync;

pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use hydrate::flatten;
pub use models::{Folder, FolderId, Note, NoteId, NoteRow, Tag, TagId};
pub use service::{NewNote, NoteFilter, NoteService, NoteUpdate};
