//! Note graph domain model.
//!
//! # Responsibility
//! - Define `Note` and `NoteMap`, the canonical structures navigated and
//!   edited by the rest of core.
//! - Own every note inside its map's arena; relations are identity references.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`, independent of its text.
//! - A map always owns exactly one root note.
//! - The graph may contain cycles; nothing in this module walks it recursively.

pub mod note;
pub mod note_map;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as Unix epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
