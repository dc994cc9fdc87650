mod folder;
mod ids;
mod note;
mod note_row;
mod tag;

pub use folder::Folder;
pub use ids::{FolderId, NoteId, TagId};
pub use note::Note;
pub use note_row::NoteRow;
pub use tag::Tag;
