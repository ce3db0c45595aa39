//! File-backed PIN persistence
//!
//! Stores the PIN as JSON under the user's config directory with restrictive
//! permissions. The PIN is kept in plain form; hashing is explicitly outside
//! the widget's scope, hosts that need it should inject their own store.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use pinlock_core::{PinStore, StoreError};

/// Storage file name
const PIN_FILE_NAME: &str = "pin.json";

/// Storage directory under ~/.config
const CONFIG_DIR_NAME: &str = "pinlock";

/// On-disk format
#[derive(Serialize, Deserialize)]
struct PinFile {
    pin: String,
}

/// A [`PinStore`] persisting to a single JSON file.
pub struct FilePinStore {
    path: PathBuf,
}

impl FilePinStore {
    /// Open the store at the default location
    /// (`$XDG_CONFIG_HOME/pinlock/pin.json` or the platform equivalent).
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = Self::config_dir()
            .ok_or_else(|| StoreError::Unavailable("no config directory".to_string()))?;
        fs::create_dir_all(&dir).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(Self {
            path: dir.join(PIN_FILE_NAME),
        })
    }

    /// Open the store at an explicit path. The parent directory must exist.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the backing file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Whether a full-length PIN is currently stored
    pub fn has_pin(&self, pin_length: usize) -> Result<bool, StoreError> {
        pinlock_core::has_pin(self, pin_length)
    }

    fn config_dir() -> Option<PathBuf> {
        // XDG_CONFIG_HOME wins over the platform default
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join(CONFIG_DIR_NAME));
        }
        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }
}

impl PinStore for FilePinStore {
    fn get(&self) -> Result<Option<Zeroizing<String>>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| StoreError::Io(e.to_string()))?;
        let file: PinFile =
            serde_json::from_str(&contents).map_err(|e| StoreError::Serialize(e.to_string()))?;
        Ok(Some(Zeroizing::new(file.pin)))
    }

    fn set(&mut self, pin: &str) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(&PinFile {
            pin: pin.to_string(),
        })
        .map_err(|e| StoreError::Serialize(e.to_string()))?;

        fs::write(&self.path, contents).map_err(|e| StoreError::Io(e.to_string()))?;

        // Keep the file private to the owner (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }

        tracing::debug!(path = %self.path.display(), "pin persisted");
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| StoreError::Io(e.to_string()))?;
            tracing::debug!(path = %self.path.display(), "pin file removed");
        }
        Ok(())
    }
}

/// Erase any stored PIN at the default location.
pub fn clear_pin() -> Result<(), StoreError> {
    FilePinStore::open_default()?.remove()
}
