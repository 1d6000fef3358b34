//! Persistence gateway for the map catalog.
//!
//! # Responsibility
//! - Define the load/save contract the application context depends on.
//! - Keep SQL details inside the SQLite implementation.
//!
//! # Invariants
//! - A saved catalog reloads with the same map order, identities, metadata,
//!   notes and ordered relations (cycles included).
//! - A save replaces the stored snapshot as a whole.

mod sqlite;

pub use sqlite::SqliteCatalogStore;

use crate::catalog::MapCatalog;
use crate::db::DbError;
use crate::model::note_map::NoteMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by catalog store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from catalog store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted rows cannot be rebuilt into a valid map.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog store requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid catalog data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage for the map catalog.
pub trait CatalogStore {
    /// Loads every stored map in catalog order.
    fn load_catalog(&self) -> StoreResult<Vec<NoteMap>>;
    /// Replaces the stored catalog and returns the number of maps written.
    fn save_catalog(&mut self, catalog: &MapCatalog) -> StoreResult<usize>;
    /// Whether saved data outlives the process.
    fn is_durable(&self) -> bool;
}
