//! Device-local preferences: theme choice and checklist progress.
//!
//! Two independent JSON values under a directory, one file per key. Nothing
//! here is ever sent to the content store. Unreadable values load as
//! defaults.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pilgrim_common::ThemePreference;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::content::ChecklistPage;
use crate::error::PrefsError;

pub const THEME_KEY: &str = "theme-preference";
pub const CHECKLIST_KEY: &str = "checklist-progress";

/// `{ itemId: done }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistProgress(BTreeMap<String, bool>);

impl ChecklistProgress {
    pub fn is_done(&self, item_id: &str) -> bool {
        self.0.get(item_id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, item_id: impl Into<String>, done: bool) {
        self.0.insert(item_id.into(), done);
    }

    /// Flip an item and return its new state.
    pub fn toggle(&mut self, item_id: &str) -> bool {
        let done = !self.is_done(item_id);
        self.set(item_id, done);
        done
    }

    /// `(done, total)` over the items the checklist page currently lists.
    /// Progress for items no longer listed is ignored.
    pub fn completion(&self, checklist: &ChecklistPage) -> (usize, usize) {
        let total = checklist.items.len();
        let done = checklist
            .items
            .iter()
            .filter(|item| self.is_done(&item.id))
            .count();
        (done, total)
    }

    pub fn ratio(&self, checklist: &ChecklistPage) -> f64 {
        match self.completion(checklist) {
            (_, 0) => 0.0,
            (done, total) => done as f64 / total as f64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    dir: PathBuf,
}

impl PreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn theme(&self) -> ThemePreference {
        let pref: ThemePreference = self.read(THEME_KEY);
        if pref.is_valid() {
            pref
        } else {
            warn!(color = %pref.primary_color, "stored primary colour is invalid; using site colour");
            ThemePreference {
                primary_color: String::new(),
                ..pref
            }
        }
    }

    pub fn save_theme(&self, pref: &ThemePreference) -> Result<(), PrefsError> {
        if !pref.is_valid() {
            return Err(PrefsError::InvalidColor(pref.primary_color.clone()));
        }
        self.write(THEME_KEY, pref)
    }

    pub fn checklist(&self) -> ChecklistProgress {
        self.read(CHECKLIST_KEY)
    }

    pub fn save_checklist(&self, progress: &ChecklistProgress) -> Result<(), PrefsError> {
        self.write(CHECKLIST_KEY, progress)
    }

    /// Toggle one checklist item and persist the result.
    pub fn toggle_checklist_item(&self, item_id: &str) -> Result<bool, PrefsError> {
        let mut progress = self.checklist();
        let done = progress.toggle(item_id);
        self.save_checklist(&progress)?;
        Ok(done)
    }

    fn read<T: DeserializeOwned + Default>(&self, key: &'static str) -> T {
        let path = self.path(key);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, "preference not set; using default");
                return T::default();
            }
            Err(e) => {
                warn!(key, error = %e, "preference unreadable; using default");
                return T::default();
            }
        };
        serde_json::from_slice(&data).unwrap_or_else(|e| {
            warn!(key, error = %e, "preference is not valid JSON; using default");
            T::default()
        })
    }

    fn write<T: Serialize>(&self, key: &'static str, value: &T) -> Result<(), PrefsError> {
        fs::create_dir_all(&self.dir).map_err(|source| PrefsError::Io { key, source })?;
        let data =
            serde_json::to_vec(value).map_err(|source| PrefsError::Encode { key, source })?;
        fs::write(self.path(key), data).map_err(|source| PrefsError::Io { key, source })
    }
}
