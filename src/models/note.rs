use serde::{Deserialize, Serialize};

use super::{FolderId, NoteId, Tag, TagId};

/// A note hydrated with its folder summary and tag list.
///
/// This is the response shape of every note read:
/// `{ id, title, content, folderId, folderName, tags: [{id, name}, ..] }`.
/// `tags` is empty, never a `null` placeholder, when the note has no tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<FolderId>,
    pub folder_name: Option<String>,
    pub tags: Vec<Tag>,
}

impl Note {
    /// Returns the ids of the note's tags in list order.
    pub fn tag_ids(&self) -> Vec<TagId> {
        self.tags.iter().map(|tag| tag.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn note_serializes_with_camel_case_folder_fields() {
        let note = Note {
            id: NoteId::new(7),
            title: "Groceries".to_string(),
            content: Some("milk".to_string()),
            folder_id: Some(FolderId::new(3)),
            folder_name: Some("Home".to_string()),
            tags: vec![Tag::new(TagId::new(1), "red")],
        };

        assert_eq!(
            serde_json::to_value(&note).unwrap(),
            json!({
                "id": 7,
                "title": "Groceries",
                "content": "milk",
                "folderId": 3,
                "folderName": "Home",
                "tags": [{ "id": 1, "name": "red" }]
            })
        );
    }

    #[test]
    fn unfiled_untagged_note_serializes_nulls_and_empty_tags() {
        let note = Note {
            id: NoteId::new(8),
            title: "Loose".to_string(),
            content: None,
            folder_id: None,
            folder_name: None,
            tags: Vec::new(),
        };

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["folderId"], serde_json::Value::Null);
        assert_eq!(json["folderName"], serde_json::Value::Null);
        assert_eq!(json["tags"], json!([]));
    }
}
