//! Map catalog.
//!
//! # Responsibility
//! - Own every known `NoteMap` for the session, in display order.
//! - Provide index-based selection for the menu.
//!
//! # Invariants
//! - Order is load order followed by creation order; it never changes within
//!   a session.
//! - Map names are non-blank (enforced by `NoteMap::try_new`).

use crate::error::{NoteMapError, NoteMapResult};
use crate::model::note::NoteId;
use crate::model::note_map::NoteMap;
use log::info;

/// Ordered collection of note maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapCatalog {
    maps: Vec<NoteMap>,
}

impl MapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from maps loaded from storage, keeping their order.
    pub fn from_maps(maps: Vec<NoteMap>) -> Self {
        Self { maps }
    }

    /// Creates a map and appends it to the catalog.
    ///
    /// # Errors
    /// - `Validation` when `name` is blank.
    pub fn create_map(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> NoteMapResult<&NoteMap> {
        let map = NoteMap::try_new(name, description)?;
        info!(
            "event=map_create module=catalog status=ok map_id={} index={}",
            map.id(),
            self.maps.len()
        );
        self.maps.push(map);
        Ok(&self.maps[self.maps.len() - 1])
    }

    /// Lists maps with their selection index.
    ///
    /// # Errors
    /// - `NotFound` when the catalog is empty. Callers display this as
    ///   "no maps yet" rather than failing.
    pub fn list_maps(&self) -> NoteMapResult<Vec<(usize, &NoteMap)>> {
        if self.maps.is_empty() {
            return Err(NoteMapError::NotFound("no saved note maps yet".to_string()));
        }
        Ok(self.maps.iter().enumerate().collect())
    }

    /// Selects a map by catalog position.
    pub fn select_map(&self, index: usize) -> NoteMapResult<&NoteMap> {
        self.maps.get(index).ok_or(NoteMapError::OutOfRange {
            index,
            len: self.maps.len(),
        })
    }

    /// Selects a map by catalog position for mutation.
    pub fn select_map_mut(&mut self, index: usize) -> NoteMapResult<&mut NoteMap> {
        let len = self.maps.len();
        self.maps
            .get_mut(index)
            .ok_or(NoteMapError::OutOfRange { index, len })
    }

    /// Returns the position of the map owning `note_id`, if any.
    pub fn find_note_owner(&self, note_id: NoteId) -> Option<usize> {
        self.maps.iter().position(|map| map.contains(note_id))
    }

    pub fn maps(&self) -> &[NoteMap] {
        &self.maps
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
