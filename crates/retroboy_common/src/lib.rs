pub mod prefs;

pub use prefs::{FilePrefs, MemoryPrefs, PreferenceStore, PrefsError};
