//! Hydration of fan-out join rows into nested notes.
//!
//! Reading a note together with its folder and tags joins
//! `notes ⟕ folders ⟕ notes_tags ⟕ tags`, which yields one row per
//! (note, tag) pair, or one row with `NULL` tag columns for an untagged
//! note. [`flatten`] collapses those rows back into one [`Note`] per note id.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::models::{Note, NoteId, NoteRow, Tag, TagId};

/// Collapses join rows into one hydrated [`Note`] per distinct note id.
///
/// Output order is the order in which each note id first appears in `rows`.
/// Nothing is re-sorted: callers that want notes ordered by id must select
/// the rows with `ORDER BY notes.id`. Rows of one note need not be adjacent,
/// later rows are merged into the note created by the first one.
///
/// Per note, a tag id is listed once; when it repeats, the name from its
/// first row wins. A row whose tag id and tag name are not both present
/// contributes no tag but still registers its note, so an untagged note
/// ends up with an empty `tags` list.
///
/// This never fails and has no side effects.
///
/// # Examples
///
/// ```
/// use noteful::{flatten, NoteId, NoteRow, TagId};
///
/// let rows = vec![
///     NoteRow::bare(NoteId::new(7), "a").with_tag(TagId::new(1), "red"),
///     NoteRow::bare(NoteId::new(7), "a").with_tag(TagId::new(2), "blue"),
///     NoteRow::bare(NoteId::new(8), "b"),
/// ];
///
/// let notes = flatten(rows);
/// assert_eq!(notes.len(), 2);
/// assert_eq!(notes[0].tag_ids(), vec![TagId::new(1), TagId::new(2)]);
/// assert!(notes[1].tags.is_empty());
/// ```
pub fn flatten<I>(rows: I) -> Vec<Note>
where
    I: IntoIterator<Item = NoteRow>,
{
    let mut notes: Vec<Note> = Vec::new();
    let mut positions: HashMap<NoteId, usize> = HashMap::new();
    let mut seen_tags: HashSet<(NoteId, TagId)> = HashSet::new();

    for row in rows {
        let note_id = row.note_id;

        let index = match positions.get(&note_id) {
            Some(&index) => index,
            None => {
                notes.push(Note {
                    id: note_id,
                    title: row.title,
                    content: row.content,
                    folder_id: row.folder_id,
                    folder_name: row.folder_name,
                    tags: Vec::new(),
                });
                positions.insert(note_id, notes.len() - 1);
                notes.len() - 1
            }
        };

        match (row.tag_id, row.tag_name) {
            (Some(tag_id), Some(name)) => {
                if seen_tags.insert((note_id, tag_id)) {
                    notes[index].tags.push(Tag::new(tag_id, name));
                }
            }
            (None, None) => {}
            (tag_id, tag_name) => {
                trace!(%note_id, ?tag_id, ?tag_name, "skipping malformed tag columns");
            }
        }
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FolderId;

    fn row(note: i64) -> NoteRow {
        NoteRow::bare(NoteId::new(note), format!("note {note}"))
    }

    fn tagged(note: i64, tag: i64, name: &str) -> NoteRow {
        row(note).with_tag(TagId::new(tag), name)
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(flatten(Vec::new()).is_empty());
    }

    #[test]
    fn duplicate_tagless_rows_yield_one_untagged_note() {
        let notes = flatten(vec![row(5), row(5)]);

        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, NoteId::new(5));
        assert!(notes[0].tags.is_empty());
    }

    #[test]
    fn tags_are_nested_under_their_note() {
        let notes = flatten(vec![tagged(7, 1, "red"), tagged(7, 2, "blue"), row(8)]);

        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, NoteId::new(7));
        assert_eq!(
            notes[0].tags,
            vec![Tag::new(TagId::new(1), "red"), Tag::new(TagId::new(2), "blue")]
        );
        assert_eq!(notes[1].id, NoteId::new(8));
        assert!(notes[1].tags.is_empty());
    }

    #[test]
    fn repeated_tag_is_listed_once_and_first_name_wins() {
        let notes = flatten(vec![
            tagged(1, 3, "first"),
            tagged(1, 4, "other"),
            tagged(1, 3, "second"),
        ]);

        assert_eq!(
            notes[0].tags,
            vec![Tag::new(TagId::new(3), "first"), Tag::new(TagId::new(4), "other")]
        );
    }

    #[test]
    fn same_tag_on_different_notes_is_kept_for_each() {
        let notes = flatten(vec![tagged(1, 9, "shared"), tagged(2, 9, "shared")]);

        assert_eq!(notes[0].tag_ids(), vec![TagId::new(9)]);
        assert_eq!(notes[1].tag_ids(), vec![TagId::new(9)]);
    }

    #[test]
    fn output_follows_first_appearance_not_id_order() {
        let notes = flatten(vec![row(30), tagged(10, 1, "a"), row(20)]);

        let ids: Vec<i64> = notes.iter().map(|n| n.id.get()).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn non_adjacent_rows_merge_into_first_occurrence() {
        let notes = flatten(vec![tagged(1, 1, "a"), row(2), tagged(1, 2, "b")]);

        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].tag_ids(), vec![TagId::new(1), TagId::new(2)]);
    }

    #[test]
    fn malformed_tag_columns_are_ignored_but_note_is_kept() {
        let mut id_only = row(1);
        id_only.tag_id = Some(TagId::new(4));
        let mut name_only = row(2);
        name_only.tag_name = Some("orphan".to_string());

        let notes = flatten(vec![id_only, name_only, tagged(2, 5, "ok")]);

        assert_eq!(notes.len(), 2);
        assert!(notes[0].tags.is_empty());
        assert_eq!(notes[1].tags, vec![Tag::new(TagId::new(5), "ok")]);
    }

    #[test]
    fn tagless_row_after_tagged_rows_adds_nothing() {
        let notes = flatten(vec![tagged(1, 1, "a"), row(1)]);
        assert_eq!(notes[0].tag_ids(), vec![TagId::new(1)]);
    }

    #[test]
    fn folder_and_content_come_from_first_row() {
        let notes = flatten(vec![
            row(1)
                .with_content("body")
                .in_folder(FolderId::new(2), "Work")
                .with_tag(TagId::new(1), "a"),
            row(1)
                .with_content("body")
                .in_folder(FolderId::new(2), "Work")
                .with_tag(TagId::new(2), "b"),
        ]);

        assert_eq!(notes[0].content.as_deref(), Some("body"));
        assert_eq!(notes[0].folder_id, Some(FolderId::new(2)));
        assert_eq!(notes[0].folder_name.as_deref(), Some("Work"));
    }

    #[test]
    fn unfiled_note_keeps_null_folder() {
        let notes = flatten(vec![row(1)]);
        assert_eq!(notes[0].folder_id, None);
        assert_eq!(notes[0].folder_name, None);
    }
}
