//! Note map aggregate.
//!
//! # Responsibility
//! - Own the arena of notes for one map and its display metadata.
//! - Provide identity-based lookup and linking for navigation and commits.
//!
//! # Invariants
//! - `root` is always present in `notes`.
//! - Relation targets created through this type are owned by the same map.
//! - `updated_at` only moves when a staged edit is committed.

use crate::error::{NoteMapError, NoteMapResult};
use crate::model::note::{Note, NoteId};
use crate::model::now_epoch_ms;
use std::collections::HashMap;
use uuid::Uuid;

/// Stable identifier for a note map.
pub type MapId = Uuid;

/// An owned graph of notes rooted at one entry note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteMap {
    id: MapId,
    name: String,
    description: String,
    created_at: i64,
    updated_at: i64,
    root: NoteId,
    notes: HashMap<NoteId, Note>,
}

impl NoteMap {
    /// Creates a map with a fresh empty root note.
    ///
    /// # Errors
    /// - `Validation` when `name` is blank after trim.
    pub fn try_new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> NoteMapResult<Self> {
        let name = normalize_map_name(name.into())?;
        let root = Uuid::new_v4();
        let created_at = now_epoch_ms();

        let mut notes = HashMap::new();
        notes.insert(root, Note::new());

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description: description.into().trim().to_string(),
            created_at,
            updated_at: created_at,
            root,
            notes,
        })
    }

    /// Rebuilds a map from persisted parts.
    ///
    /// Used by storage load paths where identities already exist.
    ///
    /// # Errors
    /// - `Validation` when the name is blank.
    /// - `NotFound` when `root` or any relation target is missing from `notes`.
    pub fn restore(
        id: MapId,
        name: String,
        description: String,
        created_at: i64,
        updated_at: i64,
        root: NoteId,
        notes: HashMap<NoteId, Note>,
    ) -> NoteMapResult<Self> {
        let name = normalize_map_name(name)?;
        if !notes.contains_key(&root) {
            return Err(NoteMapError::NotFound(format!("root note {root} of map {id}")));
        }
        for (note_id, note) in &notes {
            if let Some(missing) = note.relations.iter().find(|to| !notes.contains_key(to)) {
                return Err(NoteMapError::NotFound(format!(
                    "relation target {missing} of note {note_id} in map {id}"
                )));
            }
        }

        Ok(Self {
            id,
            name,
            description,
            created_at,
            updated_at,
            root,
            notes,
        })
    }

    pub fn id(&self) -> MapId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Creation time in epoch milliseconds.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Last commit time in epoch milliseconds.
    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    pub fn root_id(&self) -> NoteId {
        self.root
    }

    pub fn root(&self) -> &Note {
        &self.notes[&self.root]
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.notes.contains_key(&id)
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Iterates all owned notes in arbitrary order.
    pub fn notes(&self) -> impl Iterator<Item = (NoteId, &Note)> {
        self.notes.iter().map(|(id, note)| (*id, note))
    }

    /// Inserts a new empty note and returns its identity.
    ///
    /// The note is unreachable until some existing note relates to it.
    pub fn create_note(&mut self) -> NoteId {
        let id = Uuid::new_v4();
        self.notes.insert(id, Note::new());
        id
    }

    /// Creates a note with `subject` and relates `parent` to it.
    ///
    /// # Errors
    /// - `NotFound` when `parent` is not owned by this map.
    pub fn create_linked_note(
        &mut self,
        parent: NoteId,
        subject: impl Into<String>,
    ) -> NoteMapResult<NoteId> {
        if !self.contains(parent) {
            return Err(self.missing_note(parent));
        }
        let id = Uuid::new_v4();
        self.notes.insert(id, Note::with_subject(subject));
        self.add_relation(parent, id)?;
        Ok(id)
    }

    /// Appends `to` to `from.relations`.
    ///
    /// Duplicates and self-loops are accepted.
    ///
    /// # Errors
    /// - `NotFound` when either identity is not owned by this map.
    pub fn add_relation(&mut self, from: NoteId, to: NoteId) -> NoteMapResult<()> {
        if !self.contains(to) {
            return Err(self.missing_note(to));
        }
        match self.notes.get_mut(&from) {
            Some(note) => {
                note.add_relation(to);
                Ok(())
            }
            None => Err(self.missing_note(from)),
        }
    }

    /// Copies `subject` and `content` of `value` onto an owned note.
    ///
    /// Identity and the live `relations` are kept, so links added after the
    /// value was staged survive. Returns `false` when the note is not owned
    /// by this map.
    pub(crate) fn apply_note_fields(&mut self, id: NoteId, value: Note) -> bool {
        match self.notes.get_mut(&id) {
            Some(note) => {
                note.subject = value.subject;
                note.content = value.content;
                true
            }
            None => false,
        }
    }

    pub(crate) fn touch(&mut self, at_epoch_ms: i64) {
        self.updated_at = at_epoch_ms;
    }

    fn missing_note(&self, id: NoteId) -> NoteMapError {
        NoteMapError::NotFound(format!("note {id} in map `{}`", self.name))
    }
}

fn normalize_map_name(value: String) -> NoteMapResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NoteMapError::Validation("map name must not be blank".to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::NoteMap;
    use crate::error::NoteMapError;

    #[test]
    fn blank_name_is_rejected() {
        let err = NoteMap::try_new("   ", "anything").unwrap_err();
        assert!(matches!(err, NoteMapError::Validation(_)));
    }

    #[test]
    fn add_relation_rejects_foreign_notes() {
        let mut first = NoteMap::try_new("First", "").unwrap();
        let mut second = NoteMap::try_new("Second", "").unwrap();
        let foreign = second.create_note();

        let err = first.add_relation(first.root_id(), foreign).unwrap_err();
        assert!(matches!(err, NoteMapError::NotFound(_)));
        assert!(first.root().relations.is_empty());
    }

    #[test]
    fn restore_rejects_dangling_relations() {
        let mut map = NoteMap::try_new("Dangling", "").unwrap();
        let child = map.create_linked_note(map.root_id(), "child").unwrap();
        let mut notes: std::collections::HashMap<_, _> =
            map.notes().map(|(id, note)| (id, note.clone())).collect();
        notes.remove(&child);

        let err = NoteMap::restore(
            map.id(),
            map.name().to_string(),
            String::new(),
            map.created_at(),
            map.updated_at(),
            map.root_id(),
            notes,
        )
        .unwrap_err();
        assert!(matches!(err, NoteMapError::NotFound(_)));
    }
}
