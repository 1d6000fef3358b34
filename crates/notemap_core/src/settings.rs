//! Settings source and field-by-field resolution.
//!
//! # Responsibility
//! - Parse the JSON settings source into `Config`.
//! - Resolve each field by preferring the user value over the default.
//!
//! # Invariants
//! - A blank user value always falls back to the default value.
//! - Line-skip fallback never fails its caller; unusable values print nothing.

use crate::error::{NoteMapError, NoteMapResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One layer of settings. Every field is kept as raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(alias = "Skips")]
    pub skips: String,
    #[serde(rename = "saveDir", alias = "SaveDir")]
    pub save_dir: String,
    #[serde(rename = "saveFile", alias = "SaveFile")]
    pub save_file: String,
}

/// Parsed settings source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(alias = "Version")]
    pub version: String,
    #[serde(rename = "userSettings", alias = "UserSettings")]
    pub user_settings: Settings,
    #[serde(rename = "defaultSettings", alias = "DefaultSettings")]
    pub default_settings: Settings,
}

/// Settings fields addressable through `SettingsResolver::resolve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Skips,
    SaveDir,
    SaveFile,
}

impl SettingsField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skips => "skips",
            Self::SaveDir => "saveDir",
            Self::SaveFile => "saveFile",
        }
    }

    fn read(self, settings: &Settings) -> &str {
        match self {
            Self::Skips => settings.skips.as_str(),
            Self::SaveDir => settings.save_dir.as_str(),
            Self::SaveFile => settings.save_file.as_str(),
        }
    }
}

/// Reads and parses the settings source at `path`.
///
/// # Errors
/// - `Config` when the file cannot be read or is not valid settings JSON.
pub fn load_config(path: impl AsRef<Path>) -> NoteMapResult<Config> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|err| {
        NoteMapError::Config(format!(
            "failed to read settings file `{}`: {err}",
            path.display()
        ))
    })?;
    let config: Config = serde_json::from_str(&raw).map_err(|err| {
        NoteMapError::Config(format!(
            "failed to parse settings file `{}`: {err}",
            path.display()
        ))
    })?;
    info!(
        "event=settings_load module=settings status=ok version={}",
        config.version
    );
    Ok(config)
}

/// Merges user settings over defaults, field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsResolver {
    config: Config,
}

impl SettingsResolver {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the user value when non-blank, otherwise the default.
    ///
    /// # Errors
    /// - `Config` when both values are blank.
    pub fn resolve(&self, field: SettingsField) -> NoteMapResult<String> {
        [&self.config.user_settings, &self.config.default_settings]
            .into_iter()
            .map(|layer| field.read(layer).trim())
            .find(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                NoteMapError::Config(format!(
                    "settings field `{}` is blank in both user and default settings",
                    field.as_str()
                ))
            })
    }

    /// Resolves the line-skip count.
    ///
    /// The user value wins if it parses as a non-negative integer; a value
    /// that does not parse falls through to the default.
    pub fn skips(&self) -> NoteMapResult<usize> {
        [&self.config.user_settings, &self.config.default_settings]
            .into_iter()
            .find_map(|layer| layer.skips.trim().parse::<usize>().ok())
            .ok_or_else(|| {
                NoteMapError::Config(
                    "settings field `skips` is not an integer in user or default settings"
                        .to_string(),
                )
            })
    }

    /// Blank lines printed when the screen cannot be cleared. Zero if unusable.
    pub fn line_skip_count(&self) -> usize {
        match self.skips() {
            Ok(count) => count,
            Err(err) => {
                warn!("event=line_skip module=settings status=degraded error={err}");
                0
            }
        }
    }

    /// Storage file location: resolved save directory joined with save file.
    pub fn save_path(&self) -> NoteMapResult<PathBuf> {
        let dir = self.resolve(SettingsField::SaveDir)?;
        let file = self.resolve(SettingsField::SaveFile)?;
        Ok(PathBuf::from(dir).join(file))
    }
}
