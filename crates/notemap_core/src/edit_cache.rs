//! Staged note edits.
//!
//! # Responsibility
//! - Hold staged copies of notes modified during a session.
//! - Apply their subject and content to the catalog in place on commit.
//!
//! # Invariants
//! - Staging never touches the note graph or any map's `updated_at`.
//! - Commit preserves note identity and the live `relations`; structural
//!   changes made after staging are never rolled back.
//! - A committed or discarded entry is removed from the cache.

use crate::catalog::MapCatalog;
use crate::model::note::{Note, NoteId};
use crate::model::now_epoch_ms;
use log::{info, warn};
use std::collections::HashMap;

/// Pending note modifications keyed by note identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditCache {
    pending: HashMap<NoteId, Note>,
}

impl EditCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the pending edit for `note_id`.
    pub fn stage(&mut self, note_id: NoteId, updated: Note) {
        self.pending.insert(note_id, updated);
    }

    /// Drops a pending edit without applying it.
    pub fn discard(&mut self, note_id: NoteId) -> Option<Note> {
        self.pending.remove(&note_id)
    }

    pub fn pending(&self, note_id: NoteId) -> Option<&Note> {
        self.pending.get(&note_id)
    }

    pub fn contains(&self, note_id: NoteId) -> bool {
        self.pending.contains_key(&note_id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Applies every staged edit to its owning map and clears the cache.
    ///
    /// Returns the number of notes applied. Entries whose note is no longer
    /// owned by any map are dropped and not counted.
    pub fn commit(&mut self, catalog: &mut MapCatalog) -> usize {
        if self.pending.is_empty() {
            return 0;
        }

        let committed_at = now_epoch_ms();
        let mut applied = 0usize;
        for (note_id, note) in self.pending.drain() {
            let Some(owner) = catalog.find_note_owner(note_id) else {
                warn!(
                    "event=edit_commit module=edit_cache status=skipped \
                     note_id={note_id} reason=orphaned"
                );
                continue;
            };
            let Ok(map) = catalog.select_map_mut(owner) else {
                continue;
            };
            if map.apply_note_fields(note_id, note) {
                map.touch(committed_at);
                applied += 1;
            }
        }

        info!("event=edit_commit module=edit_cache status=ok applied={applied}");
        applied
    }
}
