use serde::{Deserialize, Serialize};

use super::TagId;

/// A tag as stored in `tags` and as embedded in a hydrated note.
///
/// Serializes to `{ "id": .., "name": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

impl Tag {
    /// Creates a tag summary.
    ///
    /// # Examples
    ///
    /// ```
    /// use noteful::{Tag, TagId};
    ///
    /// let tag = Tag::new(TagId::new(1), "red");
    /// assert_eq!(tag.id, TagId::new(1));
    /// assert_eq!(tag.name, "red");
    /// ```
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
