//! Application context.
//!
//! # Responsibility
//! - Own the resolved settings, the map catalog and the edit cache for one
//!   process run.
//! - Flush staged edits and the catalog through a `CatalogStore` on save.
//!
//! # Invariants
//! - Staged edits are committed before the catalog snapshot is written.
//! - A failed save keeps the in-memory catalog intact and reports the error.

use crate::catalog::MapCatalog;
use crate::edit_cache::EditCache;
use crate::error::NoteMapResult;
use crate::settings::SettingsResolver;
use crate::store::CatalogStore;
use log::{error, info};

/// Counts reported after a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    /// Staged notes applied to the catalog.
    pub committed: usize,
    /// Maps written to storage.
    pub maps_saved: usize,
    /// `false` when the store lives only as long as the process.
    pub durable: bool,
}

/// Explicit replacement for process-wide catalog/settings state.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub settings: SettingsResolver,
    pub catalog: MapCatalog,
    pub edits: EditCache,
}

impl AppContext {
    pub fn new(settings: SettingsResolver, catalog: MapCatalog) -> Self {
        Self {
            settings,
            catalog,
            edits: EditCache::new(),
        }
    }

    /// Builds a context with the catalog loaded from `store`.
    pub fn load<S: CatalogStore>(settings: SettingsResolver, store: &S) -> NoteMapResult<Self> {
        let maps = store.load_catalog()?;
        Ok(Self::new(settings, MapCatalog::from_maps(maps)))
    }

    /// Commits pending edits, then writes the catalog to `store`.
    pub fn save<S: CatalogStore>(&mut self, store: &mut S) -> NoteMapResult<SaveReport> {
        let committed = self.edits.commit(&mut self.catalog);
        match store.save_catalog(&self.catalog) {
            Ok(maps_saved) => {
                let durable = store.is_durable();
                info!(
                    "event=save module=app status=ok committed={committed} maps={maps_saved} \
                     durable={durable}"
                );
                Ok(SaveReport {
                    committed,
                    maps_saved,
                    durable,
                })
            }
            Err(err) => {
                error!("event=save module=app status=error committed={committed} error={err}");
                Err(err.into())
            }
        }
    }
}
