use notemap_core::db::migrations::{current_user_version, latest_version};
use notemap_core::db::{open_db, open_db_in_memory, DbError};
use notemap_core::{
    AppContext, CatalogStore, Config, MapCatalog, NoteEdit, Navigator, Settings,
    SettingsResolver, SqliteCatalogStore, StoreError,
};
use rusqlite::Connection;

fn table_exists(conn: &Connection, table: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [table],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}

fn settings() -> SettingsResolver {
    SettingsResolver::new(Config {
        version: "1.0".to_string(),
        user_settings: Settings::default(),
        default_settings: Settings {
            skips: "0".to_string(),
            save_dir: ".".to_string(),
            save_file: "notemaps.sqlite3".to_string(),
        },
    })
}

/// Two maps; the first holds a cycle and a duplicate relation.
fn sample_catalog() -> MapCatalog {
    let mut catalog = MapCatalog::new();
    catalog.create_map("Trip", "Planning").unwrap();
    catalog.create_map("Work", "Q3 goals").unwrap();

    let trip = catalog.select_map_mut(0).unwrap();
    let root = trip.root_id();
    let flights = trip.create_linked_note(root, "Flights").unwrap();
    let hotels = trip.create_linked_note(root, "Hotels").unwrap();
    trip.add_relation(hotels, root).unwrap();
    trip.add_relation(hotels, flights).unwrap();
    trip.add_relation(hotels, flights).unwrap();
    trip.add_relation(flights, flights).unwrap();
    catalog
}

#[test]
fn migrations_create_catalog_tables() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    for table in ["note_maps", "notes", "note_relations"] {
        assert!(table_exists(&conn, table), "missing table {table}");
    }
}

#[test]
fn open_db_creates_parent_dirs_and_rejects_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("maps.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 99;").unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion {
            db_version: 99,
            latest_supported
        } if latest_supported == latest_version()
    ));
}

#[test]
fn store_rejects_unmigrated_connection() {
    let mut conn = Connection::open_in_memory().unwrap();

    let err = SqliteCatalogStore::try_new(&mut conn).err().unwrap();
    assert!(matches!(
        err,
        StoreError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

#[test]
fn fresh_store_loads_empty_catalog() {
    let mut conn = open_db_in_memory().unwrap();
    let store = SqliteCatalogStore::try_new(&mut conn).unwrap();

    assert!(store.load_catalog().unwrap().is_empty());
}

#[test]
fn save_then_load_preserves_maps_cycles_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("maps.sqlite3");
    let catalog = sample_catalog();

    {
        let mut conn = open_db(&path).unwrap();
        let mut store = SqliteCatalogStore::try_new(&mut conn).unwrap();
        assert_eq!(store.save_catalog(&catalog).unwrap(), 2);
    }

    let mut conn = open_db(&path).unwrap();
    let store = SqliteCatalogStore::try_new(&mut conn).unwrap();
    let loaded = MapCatalog::from_maps(store.load_catalog().unwrap());

    assert_eq!(loaded, catalog);
    let trip = loaded.select_map(0).unwrap();
    assert_eq!(trip.name(), "Trip");
    assert_eq!(trip.description(), "Planning");
    assert_eq!(loaded.select_map(1).unwrap().name(), "Work");

    let mut nav = Navigator::open(trip);
    nav.enter(trip, 1).unwrap();
    nav.enter(trip, 0).unwrap();
    assert_eq!(nav.current(), trip.root_id());
}

#[test]
fn saving_replaces_previous_snapshot() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCatalogStore::try_new(&mut conn).unwrap();
    store.save_catalog(&sample_catalog()).unwrap();

    let mut smaller = MapCatalog::new();
    smaller.create_map("Only", "one left").unwrap();
    assert_eq!(store.save_catalog(&smaller).unwrap(), 1);

    let loaded = store.load_catalog().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name(), "Only");
    assert_eq!(loaded[0].note_count(), 1);
}

#[test]
fn app_save_commits_staged_edits_before_writing() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteCatalogStore::try_new(&mut conn).unwrap();
    let mut ctx = AppContext::new(settings(), sample_catalog());

    let hotels = {
        let map = ctx.catalog.select_map(0).unwrap();
        let mut nav = Navigator::open(map);
        let hotels = nav.enter(map, 1).unwrap();
        nav.stage_edit(
            map,
            &mut ctx.edits,
            NoteEdit {
                subject: None,
                content: Some("Booked".to_string()),
            },
        )
        .unwrap();
        hotels
    };

    let report = ctx.save(&mut store).unwrap();
    assert_eq!(report.committed, 1);
    assert_eq!(report.maps_saved, 2);
    assert!(ctx.edits.is_empty());

    let reloaded = AppContext::load(settings(), &store).unwrap();
    let trip = reloaded.catalog.select_map(0).unwrap();
    assert_eq!(trip.note(hotels).unwrap().content, "Booked");
    assert_eq!(reloaded.catalog, ctx.catalog);
}
