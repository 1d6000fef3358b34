use notemap_core::{EditCache, MapCatalog, Navigator, Note, NoteMapError};

#[test]
fn create_map_starts_with_empty_root() {
    let mut catalog = MapCatalog::new();
    let map = catalog.create_map("Trip", "Planning").unwrap();

    assert_eq!(map.name(), "Trip");
    assert_eq!(map.description(), "Planning");
    assert_eq!(map.updated_at(), map.created_at());
    assert!(map.root().relations.is_empty());
    assert!(map.root().content.is_empty());
    assert!(map.root().subject.is_empty());
    assert_eq!(map.note_count(), 1);

    let listed = catalog.list_maps().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].0, 0);
    assert_eq!(listed[0].1.name(), "Trip");
}

#[test]
fn blank_map_name_is_rejected_and_catalog_unchanged() {
    let mut catalog = MapCatalog::new();

    let err = catalog.create_map("  ", "no name").unwrap_err();
    assert!(matches!(err, NoteMapError::Validation(_)));
    assert!(catalog.is_empty());
}

#[test]
fn empty_catalog_listing_is_not_found() {
    let catalog = MapCatalog::new();

    let err = catalog.list_maps().unwrap_err();
    assert!(matches!(err, NoteMapError::NotFound(_)));
}

#[test]
fn select_map_rejects_invalid_positions() {
    let mut catalog = MapCatalog::new();
    catalog.create_map("One", "").unwrap();
    catalog.create_map("Two", "").unwrap();

    assert_eq!(catalog.select_map(1).unwrap().name(), "Two");
    let err = catalog.select_map(2).unwrap_err();
    assert!(matches!(err, NoteMapError::OutOfRange { index: 2, len: 2 }));
}

#[test]
fn relations_keep_order_and_accept_duplicates_and_self_loops() {
    let mut catalog = MapCatalog::new();
    catalog.create_map("Graph", "").unwrap();
    let map = catalog.select_map_mut(0).unwrap();
    let root = map.root_id();

    let child = map.create_note();
    map.add_relation(root, child).unwrap();
    map.add_relation(root, child).unwrap();
    map.add_relation(root, root).unwrap();
    map.add_relation(child, root).unwrap();

    assert_eq!(map.root().relations, vec![child, child, root]);
    assert_eq!(map.note(child).unwrap().relations, vec![root]);
}

#[test]
fn duplicate_subjects_stay_distinct_by_identity() {
    let mut catalog = MapCatalog::new();
    catalog.create_map("Dupes", "").unwrap();
    let map = catalog.select_map_mut(0).unwrap();
    let root = map.root_id();

    let first = map.create_linked_note(root, "Same").unwrap();
    let second = map.create_linked_note(root, "Same").unwrap();

    assert_ne!(first, second);
    assert_eq!(catalog.find_note_owner(second), Some(0));
}

#[test]
fn note_level_add_relation_is_a_plain_append() {
    let mut note = Note::with_subject("loop");
    let target = uuid::Uuid::new_v4();
    note.add_relation(target);
    note.add_relation(target);

    assert_eq!(note.relations, vec![target, target]);
}

#[test]
fn root_view_lists_new_relations_in_order() {
    let mut catalog = MapCatalog::new();
    catalog.create_map("Trip", "Planning").unwrap();
    let map = catalog.select_map_mut(0).unwrap();
    let root = map.root_id();
    map.create_linked_note(root, "Flights").unwrap();
    map.create_linked_note(root, "Hotels").unwrap();

    let map = catalog.select_map(0).unwrap();
    let view = Navigator::open(map)
        .view(map, &EditCache::new(), 32)
        .unwrap();

    let labels: Vec<(usize, &str)> = view
        .relations
        .iter()
        .map(|entry| (entry.index, entry.subject.as_str()))
        .collect();
    assert_eq!(labels, vec![(0, "Flights"), (1, "Hotels")]);
    assert!(view.lines.is_empty());
}
