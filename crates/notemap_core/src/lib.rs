//! Core of NoteMap, a terminal note organizer built around a cyclic note
//! graph, an explicit navigation history and staged edits.

pub mod app;
pub mod catalog;
pub mod db;
pub mod edit_cache;
pub mod error;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod settings;
pub mod shell;
pub mod store;
pub mod term;

pub use app::{AppContext, SaveReport};
pub use catalog::MapCatalog;
pub use edit_cache::EditCache;
pub use error::{NoteMapError, NoteMapResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId, CONTENT_WRAP_WIDTH};
pub use model::note_map::{MapId, NoteMap};
pub use navigation::{BackOutcome, Navigator, NoteEdit, NoteView, RelationEntry};
pub use settings::{load_config, Config, Settings, SettingsField, SettingsResolver};
pub use shell::{Shell, ShellExit};
pub use store::{CatalogStore, SqliteCatalogStore, StoreError, StoreResult};
pub use term::{BufLineReader, Display, LineReader, WriterDisplay};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
