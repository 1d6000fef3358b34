//! Navigation engine for one open note map.
//!
//! # Responsibility
//! - Track the current note and the explicit back-traversal stack.
//! - Build render-ready views of the current note.
//! - Stage edits of the current note into the edit cache.
//!
//! # Invariants
//! - `history` is never empty and `history[0]` is the map root.
//! - The current note is always `history.last()`.
//! - Revisits through cycles push duplicates; history is never deduplicated.
//! - Views read the committed graph; pending edits are flagged, not overlaid.

use crate::edit_cache::EditCache;
use crate::error::{NoteMapError, NoteMapResult};
use crate::model::note::{Note, NoteId};
use crate::model::note_map::{MapId, NoteMap};
use log::debug;

/// Number of relation labels shown per visual row.
pub const RELATIONS_PER_ROW: usize = 3;

/// Outcome of a back transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// History was popped; the payload is the new current note.
    Moved(NoteId),
    /// Already at the root; nothing changed.
    AtRoot,
}

/// Field changes requested for the current note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteEdit {
    pub subject: Option<String>,
    pub content: Option<String>,
}

impl NoteEdit {
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.content.is_none()
    }

    fn apply_to(self, note: &mut Note) {
        if let Some(subject) = self.subject {
            note.subject = subject;
        }
        if let Some(content) = self.content {
            note.content = content;
        }
    }
}

/// One selectable relation of the current note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEntry {
    /// Positional index, valid only for the view it came from.
    pub index: usize,
    pub note_id: NoteId,
    pub subject: String,
}

/// Render-ready snapshot of the current note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    pub note_id: NoteId,
    pub subject: String,
    pub lines: Vec<String>,
    pub relations: Vec<RelationEntry>,
    /// Subjects along the history stack, root first.
    pub breadcrumb: Vec<String>,
    pub has_pending_edit: bool,
}

impl NoteView {
    /// Groups relations into display rows of `RELATIONS_PER_ROW`.
    pub fn relation_rows(&self) -> Vec<&[RelationEntry]> {
        self.relations.chunks(RELATIONS_PER_ROW).collect()
    }
}

/// Session-scoped navigation state over one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    map_id: MapId,
    root: NoteId,
    history: Vec<NoteId>,
}

impl Navigator {
    /// Opens a session positioned at the map root.
    pub fn open(map: &NoteMap) -> Self {
        let root = map.root_id();
        Self {
            map_id: map.id(),
            root,
            history: vec![root],
        }
    }

    pub fn map_id(&self) -> MapId {
        self.map_id
    }

    pub fn current(&self) -> NoteId {
        self.history.last().copied().unwrap_or(self.root)
    }

    pub fn history(&self) -> &[NoteId] {
        &self.history
    }

    pub fn is_at_root(&self) -> bool {
        self.history.len() == 1
    }

    /// Moves into relation `index` of the current note.
    ///
    /// # Errors
    /// - `OutOfRange` when `index` is not a valid relation position.
    /// - `NotFound` when `map` is not the map this session was opened on.
    pub fn enter(&mut self, map: &NoteMap, index: usize) -> NoteMapResult<NoteId> {
        let current = self.current_note(map)?;
        let target = current
            .relations
            .get(index)
            .copied()
            .ok_or(NoteMapError::OutOfRange {
                index,
                len: current.relations.len(),
            })?;
        self.history.push(target);
        debug!(
            "event=nav_enter module=navigation status=ok index={index} depth={}",
            self.history.len()
        );
        Ok(target)
    }

    /// Pops one level of history unless already at the root.
    pub fn back(&mut self) -> BackOutcome {
        if self.is_at_root() {
            return BackOutcome::AtRoot;
        }
        self.history.pop();
        BackOutcome::Moved(self.current())
    }

    /// Relates the current note to the note at history position `depth`.
    ///
    /// This is how a user links back to an ancestor, forming a cycle.
    pub fn link_to_history(&self, map: &mut NoteMap, depth: usize) -> NoteMapResult<NoteId> {
        self.ensure_same_map(map)?;
        let target = self
            .history
            .get(depth)
            .copied()
            .ok_or(NoteMapError::OutOfRange {
                index: depth,
                len: self.history.len(),
            })?;
        map.add_relation(self.current(), target)?;
        Ok(target)
    }

    /// Stages `edit` for the current note without touching the graph.
    ///
    /// Successive edits build on an already pending copy.
    pub fn stage_edit(
        &self,
        map: &NoteMap,
        edits: &mut EditCache,
        edit: NoteEdit,
    ) -> NoteMapResult<()> {
        let current_id = self.current();
        let mut updated = match edits.pending(current_id) {
            Some(pending) => pending.clone(),
            None => self.current_note(map)?.clone(),
        };
        edit.apply_to(&mut updated);
        edits.stage(current_id, updated);
        Ok(())
    }

    /// Builds a view of the current note with freshly computed indexes.
    pub fn view(
        &self,
        map: &NoteMap,
        edits: &EditCache,
        width: usize,
    ) -> NoteMapResult<NoteView> {
        let current_id = self.current();
        let note = self.current_note(map)?;

        let relations = note
            .relations
            .iter()
            .enumerate()
            .map(|(index, note_id)| RelationEntry {
                index,
                note_id: *note_id,
                subject: map
                    .note(*note_id)
                    .map(|target| target.subject.clone())
                    .unwrap_or_default(),
            })
            .collect();

        let breadcrumb = self
            .history
            .iter()
            .map(|id| {
                map.note(*id)
                    .map(|visited| visited.subject.clone())
                    .unwrap_or_default()
            })
            .collect();

        Ok(NoteView {
            note_id: current_id,
            subject: note.subject.clone(),
            lines: note.render(width),
            relations,
            breadcrumb,
            has_pending_edit: edits.contains(current_id),
        })
    }

    fn current_note<'map>(&self, map: &'map NoteMap) -> NoteMapResult<&'map Note> {
        self.ensure_same_map(map)?;
        let current = self.current();
        map.note(current)
            .ok_or_else(|| NoteMapError::NotFound(format!("current note {current}")))
    }

    fn ensure_same_map(&self, map: &NoteMap) -> NoteMapResult<()> {
        if map.id() != self.map_id {
            return Err(NoteMapError::NotFound(format!(
                "session map {} (got {})",
                self.map_id,
                map.id()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteEdit, Navigator, RELATIONS_PER_ROW};
    use crate::edit_cache::EditCache;
    use crate::model::note_map::NoteMap;

    #[test]
    fn relation_rows_break_after_every_third_entry() {
        let mut map = NoteMap::try_new("Rows", "").unwrap();
        for subject in ["a", "b", "c", "d", "e", "f", "g"] {
            map.create_linked_note(map.root_id(), subject).unwrap();
        }
        let nav = Navigator::open(&map);
        let view = nav.view(&map, &EditCache::new(), 40).unwrap();

        let rows = view.relation_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), RELATIONS_PER_ROW);
        assert_eq!(rows[1][0].index, 3);
        assert_eq!(rows[2][0].index, 6);
        assert_eq!(rows[2][0].subject, "g");
    }

    #[test]
    fn successive_edits_accumulate_on_pending_copy() {
        let map = NoteMap::try_new("Edits", "").unwrap();
        let nav = Navigator::open(&map);
        let mut edits = EditCache::new();

        nav.stage_edit(
            &map,
            &mut edits,
            NoteEdit {
                subject: Some("Start".to_string()),
                content: None,
            },
        )
        .unwrap();
        nav.stage_edit(
            &map,
            &mut edits,
            NoteEdit {
                subject: None,
                content: Some("body".to_string()),
            },
        )
        .unwrap();

        let pending = edits.pending(map.root_id()).unwrap();
        assert_eq!(pending.subject, "Start");
        assert_eq!(pending.content, "body");
        assert_eq!(map.root().subject, "");
    }

    #[test]
    fn session_rejects_a_different_map() {
        let first = NoteMap::try_new("First", "").unwrap();
        let second = NoteMap::try_new("Second", "").unwrap();
        let nav = Navigator::open(&first);

        assert!(nav.view(&second, &EditCache::new(), 10).is_err());
    }
}
