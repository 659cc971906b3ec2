//! Session persistence collaborator.
//!
//! The engine only depends on the [`SessionStore`] trait; the on-disk format
//! belongs to the implementation. [`FileSessionStore`] is the stock one:
//! pretty-printed JSON, one file per session under the platform config
//! directory. [`MemorySessionStore`] backs tests and hosts that persist
//! elsewhere.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::UiError;
use crate::ui::tabs::Tab;

/// A deep copy of everything a window needs to restore its content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub name: String,
    pub created_at: String,
    pub tabs: Vec<Tab>,
    pub dark_mode: bool,
    pub scale: f32,
}

impl SessionSnapshot {
    pub fn new(name: impl Into<String>, tabs: Vec<Tab>, dark_mode: bool, scale: f32) -> Self {
        Self {
            name: name.into(),
            created_at: chrono::Local::now().to_rfc3339(),
            tabs,
            dark_mode,
            scale,
        }
    }
}

/// Persistence collaborator. All calls are synchronous; failures are
/// reported to the UI layer as a notice and never touch in-memory state.
pub trait SessionStore: Send + Sync {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), UiError>;
    fn load(&self, name: &str) -> Result<Option<SessionSnapshot>, UiError>;
    fn list(&self) -> Result<Vec<String>, UiError>;
    fn rename(&self, old: &str, new: &str) -> Result<(), UiError>;
    fn delete(&self, name: &str) -> Result<(), UiError>;
}

/// Replace anything outside `[A-Za-z0-9.-]` so a display name is a safe
/// file stem.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// JSON files under `<config_dir>/bubble-wm/sessions`.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Store rooted at the platform config directory.
    pub fn new() -> Result<Self, UiError> {
        let base = dirs::config_dir().ok_or(UiError::NoConfigDir)?;
        Self::at(base.join("bubble-wm").join("sessions"))
    }

    /// Store rooted at an explicit directory (tests, portable installs).
    pub fn at(dir: PathBuf) -> Result<Self, UiError> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, UiError> {
        let stem = sanitize_name(name);
        if stem.is_empty() {
            return Err(UiError::InvalidSessionName(name.to_owned()));
        }
        Ok(self.dir.join(format!("{stem}.json")))
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), UiError> {
        let path = self.path_for(&snapshot.name)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)?;
        tracing::debug!(session = %snapshot.name, tabs = snapshot.tabs.len(), "session saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Option<SessionSnapshot>, UiError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn list(&self) -> Result<Vec<String>, UiError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
            {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn rename(&self, old: &str, new: &str) -> Result<(), UiError> {
        let Some(mut snapshot) = self.load(old)? else {
            return Err(UiError::UnknownSession(old.to_owned()));
        };
        snapshot.name = new.to_owned();
        self.save(&snapshot)?;
        let old_path = self.path_for(old)?;
        if self.path_for(new)? != old_path {
            fs::remove_file(old_path)?;
        }
        tracing::debug!(from = %old, to = %new, "session renamed");
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<(), UiError> {
        let path = self.path_for(name)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        tracing::debug!(session = %name, "session deleted");
        Ok(())
    }
}

/// In-memory store keyed by sanitized name, mirroring the file store's
/// collision behavior.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<BTreeMap<String, SessionSnapshot>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), UiError> {
        let key = sanitize_name(&snapshot.name);
        if key.is_empty() {
            return Err(UiError::InvalidSessionName(snapshot.name.clone()));
        }
        self.inner.lock().unwrap().insert(key, snapshot.clone());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Option<SessionSnapshot>, UiError> {
        Ok(self.inner.lock().unwrap().get(&sanitize_name(name)).cloned())
    }

    fn list(&self) -> Result<Vec<String>, UiError> {
        Ok(self.inner.lock().unwrap().keys().cloned().collect())
    }

    fn rename(&self, old: &str, new: &str) -> Result<(), UiError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(mut snapshot) = inner.remove(&sanitize_name(old)) else {
            return Err(UiError::UnknownSession(old.to_owned()));
        };
        snapshot.name = new.to_owned();
        inner.insert(sanitize_name(new), snapshot);
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<(), UiError> {
        self.inner.lock().unwrap().remove(&sanitize_name(name));
        Ok(())
    }
}
