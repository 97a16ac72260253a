//! Persisted user preferences.
//!
//! Emulators read a handful of string preferences at startup (hardware
//! variant, render mode, ...). The store is always injected so that tests can
//! substitute [`MemoryPrefs`] for the on-disk [`FilePrefs`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name used inside the platform configuration directory.
pub const PREFS_FILE_NAME: &str = "prefs.toml";

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("failed to access preference file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Key/value preference service.
///
/// Values are plain strings; callers decide how to interpret them.
pub trait PreferenceStore {
    /// Returns the stored value for `key`, if any.
    fn read_pref(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str);

    /// Returns the stored value for `key`, or `default` when it is absent.
    fn get(&self, key: &str, default: &str) -> String {
        self.read_pref(key).unwrap_or_else(|| default.to_string())
    }
}

/// In-memory preference store. Nothing outlives the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPrefs {
    values: BTreeMap<String, String>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with `pairs`.
    pub fn with_values<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { values }
    }
}

impl PreferenceStore for MemoryPrefs {
    fn read_pref(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// On-disk layout of the preference file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default)]
    prefs: BTreeMap<String, String>,
}

/// TOML-backed preference store.
///
/// Every `set` is written through to disk immediately so that a downgrade
/// recorded during startup survives a crash later in the run.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePrefs {
    /// Opens the store at `path`.
    ///
    /// A missing file yields an empty store. An unreadable or malformed file
    /// is logged and also treated as empty; it is overwritten on the next
    /// `set`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<PrefsFile>(&content) {
                Ok(file) => file.prefs,
                Err(err) => {
                    log::warn!("Ignoring malformed preferences at {}: {}", path.display(), err);
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                log::warn!("Could not read preferences at {}: {}", path.display(), err);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    /// Opens the store in the platform configuration directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn open_default() -> Option<Self> {
        default_path().map(Self::open)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current values to disk, creating parent directories.
    pub fn save(&self) -> Result<(), PrefsError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let file = PrefsFile {
            prefs: self.values.clone(),
        };
        let content = toml::to_string_pretty(&file)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl PreferenceStore for FilePrefs {
    fn read_pref(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        if let Err(err) = self.save() {
            log::warn!("Failed to persist preference '{}': {}", key, err);
        }
    }
}

/// Returns the platform-specific preference file location.
///
/// On Linux: `~/.config/retroboy/prefs.toml`
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com.github", "Latias94", "RetroBoy")
        .map(|dirs| dirs.config_dir().join(PREFS_FILE_NAME))
}
