//! Persisted bot state: the id of the spreadsheet currently targeted.

use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk shape of the state file.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct BotState {
    #[serde(default)]
    pub sheet_id: String,
}

/// Storage for the active spreadsheet id.
///
/// `load` returns `None` when no sheet has been linked yet.
pub trait SheetIdStore {
    fn load(&self) -> AppResult<Option<String>>;
    fn save(&mut self, sheet_id: &str) -> AppResult<()>;
}

/// JSON file backed store (`{"sheet_id": "..."}`).
pub struct JsonStateFile {
    path: PathBuf,
}

impl JsonStateFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn write_empty(&self) -> AppResult<()> {
        self.write(&BotState::default())
    }

    fn read(&self) -> AppResult<BotState> {
        if !self.path.exists() {
            return Ok(BotState::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BotState::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, state: &BotState) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(state)?)?;
        Ok(())
    }
}

impl SheetIdStore for JsonStateFile {
    fn load(&self) -> AppResult<Option<String>> {
        let state = self.read()?;
        Ok(Some(state.sheet_id).filter(|id| !id.is_empty()))
    }

    fn save(&mut self, sheet_id: &str) -> AppResult<()> {
        let mut state = self.read()?;
        state.sheet_id = sheet_id.to_string();
        self.write(&state)
    }
}

/// Process-local store, handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sheet_id: Option<String>,
}

impl MemoryStore {
    pub fn with_sheet(id: &str) -> Self {
        Self {
            sheet_id: Some(id.to_string()),
        }
    }
}

impl SheetIdStore for MemoryStore {
    fn load(&self) -> AppResult<Option<String>> {
        Ok(self.sheet_id.clone())
    }

    fn save(&mut self, sheet_id: &str) -> AppResult<()> {
        self.sheet_id = Some(sheet_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateFile::new(dir.path().join("state.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn empty_sheet_id_means_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateFile::new(dir.path().join("state.json"));
        store.write_empty().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn saved_id_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = JsonStateFile::new(&path);
        store.save("ABC123").unwrap();

        let reopened = JsonStateFile::new(&path);
        assert_eq!(reopened.load().unwrap().as_deref(), Some("ABC123"));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"sheet_id\":\"ABC123\""));
    }
}
