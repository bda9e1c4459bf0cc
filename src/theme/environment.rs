//! Capabilities the theme store talks to: a key/value storage, a system
//! dark-mode signal and a presentation root carrying a class list.
//!
//! Contexts that have none of these use [`ThemeEnvironment::detached`].

use std::{
    collections::{BTreeMap, BTreeSet},
    env, fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    /// Best effort. Implementations log failures instead of returning them.
    fn set(&self, key: &str, value: &str);
}

pub trait ColorSchemeSignal: Send + Sync {
    fn prefers_dark(&self) -> bool;
}

pub trait PresentationRoot: Send + Sync {
    fn toggle_class(&self, class: &str, enabled: bool);
}

#[derive(Clone)]
pub struct ThemeEnvironment {
    pub storage: Arc<dyn KeyValueStorage>,
    pub color_scheme: Arc<dyn ColorSchemeSignal>,
    pub root: Arc<dyn PresentationRoot>,
}

impl ThemeEnvironment {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        color_scheme: Arc<dyn ColorSchemeSignal>,
        root: Arc<dyn PresentationRoot>,
    ) -> Self {
        Self {
            storage,
            color_scheme,
            root,
        }
    }

    /// Environment with no storage, no system signal and no presentation root.
    pub fn detached() -> Self {
        let detached = Arc::new(Detached);
        Self {
            storage: detached.clone(),
            color_scheme: detached.clone(),
            root: detached,
        }
    }
}

/// Null capability: reads nothing, writes nothing, never prefers dark.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl KeyValueStorage for Detached {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) {}
}

impl ColorSchemeSignal for Detached {
    fn prefers_dark(&self) -> bool {
        false
    }
}

impl PresentationRoot for Detached {
    fn toggle_class(&self, _class: &str, _enabled: bool) {}
}

/////////////////////////////////////////////////////////////////////

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

/////////////////////////////////////////////////////////////////////

/// Key/value pairs kept in a YAML mapping on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> BTreeMap<String, String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read preferences from {}: {e}", self.path.display());
                return BTreeMap::new();
            }
        };

        if contents.trim().is_empty() {
            return BTreeMap::new();
        }

        serde_yaml::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(
                "Ignoring unreadable preferences file {}: {e}",
                self.path.display()
            );
            BTreeMap::new()
        })
    }

    fn write_entries(
        &self,
        entries: &BTreeMap<String, String>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_yaml::to_string(entries)?)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.read_entries().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.read_entries();
        entries.insert(key.to_string(), value.to_string());

        if let Err(e) = self.write_entries(&entries) {
            tracing::warn!(
                "Failed to persist preference '{}' to {}: {e}",
                key,
                self.path.display()
            );
        }
    }
}

/////////////////////////////////////////////////////////////////////

/// Dark-mode signal derived from the `COLORFGBG` terminal convention
/// (`"<fg>;<bg>"`, background colours 0-6 and 8 are dark).
#[derive(Debug, Clone, Default)]
pub struct TerminalColorScheme {
    colorfgbg: Option<String>,
}

impl TerminalColorScheme {
    pub const fn new(colorfgbg: Option<String>) -> Self {
        Self { colorfgbg }
    }

    pub fn from_env() -> Self {
        Self::new(env::var("COLORFGBG").ok())
    }
}

impl ColorSchemeSignal for TerminalColorScheme {
    fn prefers_dark(&self) -> bool {
        self.colorfgbg
            .as_deref()
            .and_then(|value| value.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok())
            .is_some_and(|bg| matches!(bg, 0..=6 | 8))
    }
}

/////////////////////////////////////////////////////////////////////

/// Class list of a presentation root node.
#[derive(Debug, Default)]
pub struct ClassList {
    classes: Mutex<BTreeSet<String>>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(class)
    }
}

impl PresentationRoot for ClassList {
    fn toggle_class(&self, class: &str, enabled: bool) {
        let mut classes = self.classes.lock().unwrap_or_else(PoisonError::into_inner);
        if enabled {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }
}
