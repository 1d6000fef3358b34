//! SQLite-backed catalog store.
//!
//! Maps, notes and relations live in three tables; relation order is kept
//! by an explicit `position` column so duplicates and cycles round-trip.

use super::{CatalogStore, StoreError, StoreResult};
use crate::catalog::MapCatalog;
use crate::db::migrations::{current_user_version, latest_version};
use crate::model::note::{Note, NoteId};
use crate::model::note_map::{MapId, NoteMap};
use log::{error, info};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

/// Catalog store over a migrated SQLite connection.
pub struct SqliteCatalogStore<'conn> {
    conn: &'conn mut Connection,
    durable: bool,
}

impl<'conn> SqliteCatalogStore<'conn> {
    /// Creates a store from a connection returned by `open_db*`.
    pub fn try_new(conn: &'conn mut Connection) -> StoreResult<Self> {
        ensure_catalog_connection_ready(conn)?;
        Ok(Self {
            conn,
            durable: true,
        })
    }

    /// Marks the store as process-local, e.g. over `open_db_in_memory`.
    pub fn memory_only(mut self) -> Self {
        self.durable = false;
        self
    }
}

struct MapRow {
    id: MapId,
    name: String,
    description: String,
    root: NoteId,
    created_at: i64,
    updated_at: i64,
}

impl CatalogStore for SqliteCatalogStore<'_> {
    fn load_catalog(&self) -> StoreResult<Vec<NoteMap>> {
        let started_at = Instant::now();
        let mut stmt = self.conn.prepare(
            "SELECT
                map_uuid,
                name,
                description,
                root_uuid,
                created_at,
                updated_at
             FROM note_maps
             ORDER BY position ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut map_rows = Vec::new();
        while let Some(row) = rows.next()? {
            let map_text: String = row.get("map_uuid")?;
            let root_text: String = row.get("root_uuid")?;
            map_rows.push(MapRow {
                id: parse_uuid(&map_text, "note_maps.map_uuid")?,
                name: row.get("name")?,
                description: row.get("description")?,
                root: parse_uuid(&root_text, "note_maps.root_uuid")?,
                created_at: row.get("created_at")?,
                updated_at: row.get("updated_at")?,
            });
        }

        let mut maps = Vec::with_capacity(map_rows.len());
        for map_row in map_rows {
            let notes = load_notes(self.conn, map_row.id)?;
            let map = NoteMap::restore(
                map_row.id,
                map_row.name,
                map_row.description,
                map_row.created_at,
                map_row.updated_at,
                map_row.root,
                notes,
            )
            .map_err(|err| StoreError::InvalidData(err.to_string()))?;
            maps.push(map);
        }

        info!(
            "event=catalog_load module=store status=ok maps={} duration_ms={}",
            maps.len(),
            started_at.elapsed().as_millis()
        );
        Ok(maps)
    }

    fn save_catalog(&mut self, catalog: &MapCatalog) -> StoreResult<usize> {
        let started_at = Instant::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        match write_snapshot(&tx, catalog) {
            Ok(saved) => {
                tx.commit()?;
                info!(
                    "event=catalog_save module=store status=ok maps={saved} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(saved)
            }
            Err(err) => {
                error!(
                    "event=catalog_save module=store status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn is_durable(&self) -> bool {
        self.durable
    }
}

fn write_snapshot(tx: &Transaction<'_>, catalog: &MapCatalog) -> StoreResult<usize> {
    // Notes and relations cascade from their map rows.
    tx.execute("DELETE FROM note_maps;", [])?;

    let mut insert_map = tx.prepare(
        "INSERT INTO note_maps (
            map_uuid,
            position,
            name,
            description,
            root_uuid,
            created_at,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
    )?;
    let mut insert_note = tx.prepare(
        "INSERT INTO notes (note_uuid, map_uuid, subject, content)
         VALUES (?1, ?2, ?3, ?4);",
    )?;
    let mut insert_relation = tx.prepare(
        "INSERT INTO note_relations (from_uuid, position, to_uuid)
         VALUES (?1, ?2, ?3);",
    )?;

    for (position, map) in catalog.maps().iter().enumerate() {
        let map_uuid = map.id().to_string();
        insert_map.execute(params![
            map_uuid,
            to_db_position(position)?,
            map.name(),
            map.description(),
            map.root_id().to_string(),
            map.created_at(),
            map.updated_at(),
        ])?;

        for (note_id, note) in map.notes() {
            insert_note.execute(params![
                note_id.to_string(),
                map_uuid,
                note.subject,
                note.content,
            ])?;
        }

        // Every target row must exist before relations reference it.
        for (note_id, note) in map.notes() {
            let from_uuid = note_id.to_string();
            for (relation_position, to) in note.relations.iter().enumerate() {
                insert_relation.execute(params![
                    from_uuid,
                    to_db_position(relation_position)?,
                    to.to_string(),
                ])?;
            }
        }
    }

    Ok(catalog.len())
}

fn load_notes(conn: &Connection, map_id: MapId) -> StoreResult<HashMap<NoteId, Note>> {
    let map_uuid = map_id.to_string();
    let mut notes = HashMap::new();

    let mut note_stmt = conn.prepare(
        "SELECT note_uuid, subject, content
         FROM notes
         WHERE map_uuid = ?1;",
    )?;
    let mut rows = note_stmt.query([map_uuid.as_str()])?;
    while let Some(row) = rows.next()? {
        let note_text: String = row.get("note_uuid")?;
        let note = Note {
            subject: row.get("subject")?,
            content: row.get("content")?,
            relations: Vec::new(),
        };
        notes.insert(parse_uuid(&note_text, "notes.note_uuid")?, note);
    }

    let mut relation_stmt = conn.prepare(
        "SELECT r.from_uuid AS from_uuid, r.to_uuid AS to_uuid
         FROM note_relations r
         JOIN notes n ON n.note_uuid = r.from_uuid
         WHERE n.map_uuid = ?1
         ORDER BY r.from_uuid ASC, r.position ASC;",
    )?;
    let mut rows = relation_stmt.query([map_uuid.as_str()])?;
    while let Some(row) = rows.next()? {
        let from_text: String = row.get("from_uuid")?;
        let to_text: String = row.get("to_uuid")?;
        let from = parse_uuid(&from_text, "note_relations.from_uuid")?;
        let to = parse_uuid(&to_text, "note_relations.to_uuid")?;
        let note = notes.get_mut(&from).ok_or_else(|| {
            StoreError::InvalidData(format!("relation source {from} missing from map {map_id}"))
        })?;
        note.relations.push(to);
    }

    Ok(notes)
}

fn ensure_catalog_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["note_maps", "notes", "note_relations"] {
        if !table_exists(conn, table)? {
            return Err(StoreError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_uuid(value: &str, column: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn to_db_position(position: usize) -> StoreResult<i64> {
    i64::try_from(position)
        .map_err(|_| StoreError::InvalidData(format!("position {position} exceeds i64")))
}
