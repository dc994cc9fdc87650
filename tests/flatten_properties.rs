//! Properties of join-row hydration over arbitrary row sequences.

use std::collections::{HashMap, HashSet};

use noteful::{NoteId, NoteRow, TagId, flatten};
use proptest::prelude::*;

/// (note id, optional (tag id, name)) pairs over small id ranges so that
/// notes and tags repeat often.
fn arb_rows() -> impl Strategy<Value = Vec<NoteRow>> {
    let row = (1i64..8, prop::option::of((1i64..6, "[a-z]{1,4}")));
    prop::collection::vec(row, 0..40).prop_map(|rows| {
        rows.into_iter()
            .map(|(note, tag)| {
                let base = NoteRow::bare(NoteId::new(note), format!("note {note}"));
                match tag {
                    Some((tag, name)) => base.with_tag(TagId::new(tag), name),
                    None => base,
                }
            })
            .collect()
    })
}

fn first_appearance(rows: &[NoteRow]) -> Vec<NoteId> {
    let mut seen = HashSet::new();
    rows.iter()
        .map(|r| r.note_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

proptest! {
    #[test]
    fn prop_one_note_per_distinct_id(rows in arb_rows()) {
        let distinct: HashSet<NoteId> = rows.iter().map(|r| r.note_id).collect();
        let notes = flatten(rows);

        prop_assert_eq!(notes.len(), distinct.len());
    }

    #[test]
    fn prop_output_follows_first_appearance(rows in arb_rows()) {
        let expected = first_appearance(&rows);
        let notes = flatten(rows);

        let actual: Vec<NoteId> = notes.iter().map(|n| n.id).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_tags_are_unique_per_note(rows in arb_rows()) {
        for note in flatten(rows) {
            let ids = note.tag_ids();
            let unique: HashSet<TagId> = ids.iter().copied().collect();
            prop_assert_eq!(ids.len(), unique.len());
        }
    }

    #[test]
    fn prop_tags_match_input_and_first_name_wins(rows in arb_rows()) {
        let mut expected: HashMap<NoteId, Vec<(TagId, String)>> = HashMap::new();
        for row in &rows {
            let tags = expected.entry(row.note_id).or_default();
            if let (Some(id), Some(name)) = (row.tag_id, &row.tag_name)
                && !tags.iter().any(|(seen, _)| *seen == id)
            {
                tags.push((id, name.clone()));
            }
        }

        for note in flatten(rows) {
            let actual: Vec<(TagId, String)> =
                note.tags.iter().map(|t| (t.id, t.name.clone())).collect();
            prop_assert_eq!(&actual, &expected[&note.id]);
        }
    }

    #[test]
    fn prop_tag_row_order_does_not_change_note_order(rows in arb_rows()) {
        // Strip tags: note order must be the same with or without them.
        let untagged: Vec<NoteRow> = rows
            .iter()
            .map(|r| NoteRow::bare(r.note_id, r.title.clone()))
            .collect();

        let with_tags: Vec<NoteId> = flatten(rows).iter().map(|n| n.id).collect();
        let without_tags = flatten(untagged);

        prop_assert!(without_tags.iter().all(|n| n.tags.is_empty()));
        let without_tags: Vec<NoteId> = without_tags.iter().map(|n| n.id).collect();
        prop_assert_eq!(with_tags, without_tags);
    }
}

#[test]
fn duplicate_tagless_rows_collapse_to_one_note() {
    let rows = vec![
        NoteRow::bare(NoteId::new(5), "five"),
        NoteRow::bare(NoteId::new(5), "five"),
    ];

    let notes = flatten(rows);

    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, NoteId::new(5));
    assert!(notes[0].tags.is_empty());
}

#[test]
fn fan_out_rows_nest_tags_in_order() {
    let rows = vec![
        NoteRow::bare(NoteId::new(7), "seven").with_tag(TagId::new(1), "red"),
        NoteRow::bare(NoteId::new(7), "seven").with_tag(TagId::new(2), "blue"),
        NoteRow::bare(NoteId::new(8), "eight"),
    ];

    let json = serde_json::to_value(flatten(rows)).unwrap();

    assert_eq!(
        json,
        serde_json::json!([
            {
                "id": 7, "title": "seven", "content": null,
                "folderId": null, "folderName": null,
                "tags": [{ "id": 1, "name": "red" }, { "id": 2, "name": "blue" }]
            },
            {
                "id": 8, "title": "eight", "content": null,
                "folderId": null, "folderName": null,
                "tags": []
            }
        ])
    );
}
