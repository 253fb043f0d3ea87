use notetag_core::{
    KeyValueStore, MemoryStore, NoteData, NotebookError, NotebookService, StoreError,
    StoreResult, Tag, NOTES_KEY, TAGS_KEY,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

fn note_data(title: &str, body: &str, tags: Vec<Tag>) -> NoteData {
    NoteData {
        title: title.to_string(),
        body: body.to_string(),
        tags,
    }
}

fn resolved_tag_ids(service: &NotebookService<MemoryStore>, index: usize) -> Vec<String> {
    service.resolved_notes()[index]
        .tags
        .iter()
        .map(|tag| tag.id.clone())
        .collect()
}

/// Store whose writes always fail, reads succeed.
struct ReadOnlyStore(MemoryStore);

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.0.get(key)
    }

    fn set(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }
}

/// Store handle shared with the test body to simulate external writers.
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.0.borrow_mut().set(key, value)
    }
}

/// Shared store that rejects writes to the notes key only.
#[derive(Clone, Default)]
struct NotesWriteFailStore(SharedStore);

impl KeyValueStore for NotesWriteFailStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.0.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if key == NOTES_KEY {
            return Err(StoreError::Unavailable("notes quota exceeded".to_string()));
        }
        self.0.set(key, value)
    }
}

/// Store whose reads always fail.
struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
        Ok(())
    }
}

#[test]
fn empty_store_add_tag_then_create_note_scenario() {
    let mut service = NotebookService::load(MemoryStore::new());
    assert!(service.notes().is_empty());
    assert!(service.tags().is_empty());

    let work = Tag::with_id("t1", "work");
    service.add_tag(work.clone()).expect("add tag");
    assert_eq!(service.tags(), &[work.clone()]);

    service
        .create_note(note_data("A", "hello", vec![work.clone()]))
        .expect("create note");
    assert_eq!(service.notes().len(), 1);
    assert_eq!(service.notes()[0].tag_ids, vec!["t1".to_string()]);

    let resolved = service.resolved_notes();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].tags, vec![work]);
}

#[test]
fn note_referencing_unknown_tag_resolves_to_no_tags() {
    let mut service = NotebookService::load(MemoryStore::new());
    service
        .create_note(note_data("A", "hello", vec![Tag::with_id("ghost", "boo")]))
        .expect("create note");

    assert_eq!(service.notes()[0].tag_ids, vec!["ghost".to_string()]);
    assert!(service.resolved_notes()[0].tags.is_empty());
}

#[test]
fn resolved_tags_are_intersection_in_collection_order() {
    let mut service = NotebookService::load(MemoryStore::new());
    let tags = vec![
        Tag::with_id("t1", "work"),
        Tag::with_id("t2", "home"),
        Tag::with_id("t3", "ideas"),
    ];
    for tag in &tags {
        service.add_tag(tag.clone()).expect("add tag");
    }

    service
        .create_note(note_data(
            "mixed",
            "",
            vec![
                tags[2].clone(),
                Tag::with_id("ghost", "missing"),
                tags[0].clone(),
            ],
        ))
        .expect("create note");

    assert_eq!(resolved_tag_ids(&service, 0), vec!["t1", "t3"]);
    let stored: HashSet<&str> = service.notes()[0]
        .tag_ids
        .iter()
        .map(String::as_str)
        .collect();
    let known: HashSet<&str> = service.tags().iter().map(|tag| tag.id.as_str()).collect();
    let expected: HashSet<&str> = stored.intersection(&known).copied().collect();
    let resolved: HashSet<String> = resolved_tag_ids(&service, 0).into_iter().collect();
    assert_eq!(
        resolved,
        expected.into_iter().map(str::to_string).collect::<HashSet<_>>()
    );
}

#[test]
fn create_then_resolve_returns_submitted_fields() {
    let mut service = NotebookService::load(MemoryStore::new());
    let work = service.create_tag("work").expect("create tag");
    let home = service.create_tag("home").expect("create tag");

    let created = service
        .create_note(note_data("Plan", "ship it", vec![work.clone(), home.clone()]))
        .expect("create note");

    let resolved = &service.resolved_notes()[0];
    assert_eq!(resolved.id(), created.id);
    assert_eq!(resolved.title(), "Plan");
    assert_eq!(resolved.body(), "ship it");
    assert_eq!(resolved.tags, vec![work, home]);
}

#[test]
fn create_note_accepts_empty_strings_and_generates_unique_ids() {
    let mut service = NotebookService::load(MemoryStore::new());
    let first = service.create_note(NoteData::default()).expect("create note");
    let second = service.create_note(NoteData::default()).expect("create note");

    assert_ne!(first.id, second.id);
    assert!(uuid::Uuid::parse_str(&first.id).is_ok());
    assert_eq!(service.notes()[0].title, "");
    assert_eq!(service.notes()[1].id, second.id);
}

#[test]
fn resolved_notes_are_stable_between_reads() {
    let mut service = NotebookService::load(MemoryStore::new());
    let tag = service.create_tag("work").expect("create tag");
    service
        .create_note(note_data("A", "a", vec![tag]))
        .expect("create note");

    let first = service.resolved_notes().to_vec();
    let second = service.resolved_notes().to_vec();
    assert_eq!(first, second);
}

#[test]
fn mutations_bump_revision_and_refresh_resolved_notes() {
    let mut service = NotebookService::load(MemoryStore::new());
    service
        .create_note(note_data("A", "", vec![Tag::with_id("t1", "work")]))
        .expect("create note");
    assert!(service.resolved_notes()[0].tags.is_empty());
    let before = service.revision();

    service.add_tag(Tag::with_id("t1", "work")).expect("add tag");
    assert!(service.revision() > before);
    assert_eq!(service.resolved_notes()[0].tags.len(), 1);
}

#[test]
fn mutations_write_through_to_store() {
    let mut service = NotebookService::load(MemoryStore::new());
    service.add_tag(Tag::with_id("t1", "work")).expect("add tag");
    let note = service
        .create_note(note_data("A", "hello", vec![Tag::with_id("t1", "work")]))
        .expect("create note");

    let store = service.into_store();
    let tags: serde_json::Value =
        serde_json::from_str(&store.get(TAGS_KEY).expect("read key").expect("key present"))
            .expect("decode json");
    assert_eq!(tags, serde_json::json!([{ "id": "t1", "label": "work" }]));

    let notes: serde_json::Value =
        serde_json::from_str(&store.get(NOTES_KEY).expect("read key").expect("key present"))
            .expect("decode json");
    assert_eq!(
        notes,
        serde_json::json!([{
            "id": note.id,
            "title": "A",
            "textarea": "hello",
            "tagIds": ["t1"]
        }])
    );

    let reloaded = NotebookService::load(store);
    assert_eq!(reloaded.notes(), &[note]);
    assert_eq!(reloaded.tags().len(), 1);
}

#[test]
fn add_tag_rejects_duplicate_id() {
    let mut service = NotebookService::load(MemoryStore::new());
    service.add_tag(Tag::with_id("t1", "work")).expect("add tag");

    let err = service
        .add_tag(Tag::with_id("t1", "job"))
        .expect_err("duplicate id must be rejected");
    assert!(matches!(err, NotebookError::DuplicateTagId(ref id) if id == "t1"));
    assert_eq!(service.tags().len(), 1);
}

#[test]
fn failed_write_propagates_and_keeps_state() {
    let mut service = NotebookService::load(ReadOnlyStore(MemoryStore::new()));
    let revision = service.revision();

    let err = service
        .add_tag(Tag::with_id("t1", "work"))
        .expect_err("write must fail");
    assert!(matches!(err, NotebookError::Store(StoreError::Unavailable(_))));
    let err = service
        .create_note(NoteData::default())
        .expect_err("write must fail");
    assert!(err.to_string().contains("quota exceeded"));

    assert!(service.tags().is_empty());
    assert!(service.notes().is_empty());
    assert_eq!(service.revision(), revision);
}

#[test]
fn unreadable_or_malformed_store_loads_empty_collections() {
    let service = NotebookService::load(UnreadableStore);
    assert!(service.notes().is_empty());
    assert!(service.tags().is_empty());

    let store = MemoryStore::with_entries([(NOTES_KEY, "not json"), (TAGS_KEY, "[{\"id\":1}]")]);
    let service = NotebookService::load(store);
    assert!(service.notes().is_empty());
    assert!(service.tags().is_empty());
}

#[test]
fn stored_duplicate_tag_ids_resolve_to_every_copy() {
    let store = MemoryStore::with_entries([
        (
            TAGS_KEY,
            r#"[{"id":"t1","label":"work"},{"id":"t1","label":"job"}]"#,
        ),
        (
            NOTES_KEY,
            r#"[{"id":"n1","title":"A","textarea":"","tagIds":["t1"]}]"#,
        ),
    ]);
    let service = NotebookService::load(store);

    let labels: Vec<&str> = service.resolved_notes()[0]
        .tags
        .iter()
        .map(|tag| tag.label.as_str())
        .collect();
    assert_eq!(labels, vec!["work", "job"]);
}

#[test]
fn reload_picks_up_external_store_changes() {
    let shared = SharedStore::default();
    let mut service = NotebookService::load(shared.clone());
    assert!(service.tags().is_empty());

    shared
        .0
        .borrow_mut()
        .set(TAGS_KEY, r#"[{"id":"t9","label":"later"}]"#)
        .expect("raw write");
    assert!(service.tags().is_empty());

    let revision = service.revision();
    service.reload();
    assert_eq!(service.tags(), &[Tag::with_id("t9", "later")]);
    assert!(service.revision() > revision);
}

#[test]
fn find_tag_by_label_is_case_insensitive() {
    let mut service = NotebookService::load(MemoryStore::new());
    let work = service.create_tag("Work").expect("create tag");

    assert_eq!(service.find_tag_by_label(" work "), Some(&work));
    assert_eq!(service.find_tag(&work.id), Some(&work));
    assert_eq!(service.find_tag_by_label("home"), None);
}

#[test]
fn create_note_with_new_tags_persists_tags_and_note_together() {
    let mut service = NotebookService::load(MemoryStore::new());
    let work = service.create_tag("work").expect("create tag");
    let home = Tag::with_id("t-home", "home");
    let revision = service.revision();

    let note = service
        .create_note_with_new_tags(
            note_data("A", "hello", vec![work.clone(), home.clone()]),
            vec![home.clone()],
        )
        .expect("create note with new tag");

    assert_eq!(service.tags(), &[work.clone(), home.clone()]);
    assert_eq!(service.revision(), revision + 1);
    assert_eq!(service.resolved_notes()[0].tags, vec![work, home]);

    let reloaded = NotebookService::load(service.into_store());
    assert_eq!(reloaded.notes(), &[note]);
    assert_eq!(reloaded.tags().len(), 2);
}

#[test]
fn failed_note_write_rolls_back_new_tags() {
    let mut store = NotesWriteFailStore::default();
    store
        .set(TAGS_KEY, r#"[{"id":"t1","label":"work"}]"#)
        .expect("seed tags");
    let mut service = NotebookService::load(store.clone());
    let revision = service.revision();

    let err = service
        .create_note_with_new_tags(
            note_data("A", "", vec![Tag::with_id("t2", "home")]),
            vec![Tag::with_id("t2", "home")],
        )
        .expect_err("notes write must fail");
    assert!(matches!(err, NotebookError::Store(StoreError::Unavailable(_))));

    assert_eq!(service.tags(), &[Tag::with_id("t1", "work")]);
    assert!(service.notes().is_empty());
    assert_eq!(service.revision(), revision);

    let persisted = NotebookService::load(store);
    assert_eq!(persisted.tags(), &[Tag::with_id("t1", "work")]);
    assert!(persisted.notes().is_empty());
}

#[test]
fn create_note_with_new_tags_rejects_existing_id_without_writing() {
    let shared = SharedStore::default();
    let mut service = NotebookService::load(shared.clone());
    service.add_tag(Tag::with_id("t1", "work")).expect("add tag");

    let err = service
        .create_note_with_new_tags(
            note_data("A", "", vec![Tag::with_id("t1", "job")]),
            vec![Tag::with_id("t1", "job")],
        )
        .expect_err("duplicate id must be rejected");
    assert!(matches!(err, NotebookError::DuplicateTagId(ref id) if id == "t1"));

    assert_eq!(service.tags().len(), 1);
    assert!(service.notes().is_empty());
    assert_eq!(shared.get(NOTES_KEY).expect("read key"), None);
}
