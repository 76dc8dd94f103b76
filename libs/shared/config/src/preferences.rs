use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ms,
    Zh,
    Ta,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub language: Language,
}

#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("Failed to write preferences: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode preferences: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Theme and language are the only settings that outlive a session.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> UserPreferences {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No preferences at {}, using defaults", self.path.display());
                return UserPreferences::default();
            }
            Err(e) => {
                warn!("Could not read preferences at {}: {}", self.path.display(), e);
                return UserPreferences::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Corrupt preferences at {}: {}", self.path.display(), e);
            UserPreferences::default()
        })
    }

    pub fn save(&self, preferences: &UserPreferences) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let body = serde_json::to_string_pretty(preferences)?;
        fs::write(&self.path, body)?;
        debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}
