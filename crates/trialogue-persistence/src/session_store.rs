//! Session storage backed by a single JSON file.

use std::path::{Path, PathBuf};

use trialogue_models::SessionSnapshot;

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::Result;

/// File name used when the store is rooted in a directory.
pub const SESSION_FILE: &str = "session.json";

/// Loads and saves session snapshots at a fixed path.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store over an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store over `dir/session.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SESSION_FILE))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted snapshot, or `None` on first run.
    pub fn load(&self) -> Result<Option<SessionSnapshot>> {
        read_json_optional(&self.path)
    }

    /// Saves a snapshot atomically.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        atomic_write_json(&self.path, snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use trialogue_models::{AutoRunFlags, ConversationState, Speaker};

    #[test]
    fn test_load_missing_returns_none() {
        let dir = tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());

        let mut conversation = ConversationState::new();
        conversation.append_message(Speaker::AgentA, "opening remark", None);
        conversation.turn_count = 1;
        let flags = AutoRunFlags {
            enabled: true,
            delay_seconds: 2.0,
            scheduled_at: None,
        };

        store
            .save(&SessionSnapshot::new(conversation.clone(), flags))
            .unwrap();

        let loaded = store.load().unwrap().expect("snapshot present");
        assert_eq!(loaded.conversation.len(), conversation.len());
        assert_eq!(loaded.conversation.turn_count, 1);
        assert!(loaded.auto_run.enabled);
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = tempdir().unwrap();
        let store = SessionStore::in_dir(dir.path());

        let mut conversation = ConversationState::new();
        store
            .save(&SessionSnapshot::new(
                conversation.clone(),
                AutoRunFlags::default(),
            ))
            .unwrap();

        conversation.append_message(Speaker::AgentA, "later", None);
        store
            .save(&SessionSnapshot::new(conversation, AutoRunFlags::default()))
            .unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.conversation.len(), 2);
    }
}
