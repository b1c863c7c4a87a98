//! Session storage on disk: one JSON file per key in a per-session directory.
//!
//! Lets separate processes (one per screen load) share a session for as
//! long as they agree on the session id.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::SessionBackend;
use crate::error::SessionError;

#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (creating if needed) `<root>/<session_id>/`
    pub fn open(root: impl AsRef<Path>, session_id: &str) -> Result<Self, SessionError> {
        if !is_valid_session_id(session_id) {
            return Err(SessionError::InvalidSessionId(session_id.to_string()));
        }

        let dir = root.as_ref().join(session_id);
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "session directory ready");

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl SessionBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        // Write aside then rename so readers never see a torn entry
        let target = self.entry_path(key);
        let staging = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&staging, value)?;
        fs::rename(&staging, &target)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionKey, SessionStore};
    use std::sync::Arc;
    use wannabe_types::SelectedRoles;

    #[test]
    fn test_missing_entry_is_none() {
        let root = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(root.path(), "s1").unwrap();
        assert_eq!(backend.get("wb_input").unwrap(), None);
    }

    #[test]
    fn test_set_get_remove() {
        let root = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(root.path(), "s1").unwrap();

        backend.set("wb_input", "{\"a\":1}").unwrap();
        assert_eq!(backend.get("wb_input").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(backend.dir().join("wb_input.json").exists());
        assert!(!backend.dir().join("wb_input.json.tmp").exists());

        backend.remove("wb_input").unwrap();
        assert_eq!(backend.get("wb_input").unwrap(), None);
        // removing twice is fine
        backend.remove("wb_input").unwrap();
    }

    #[test]
    fn test_sessions_are_isolated() {
        let root = tempfile::tempdir().unwrap();
        let a = SessionStore::new(Arc::new(FileBackend::open(root.path(), "a").unwrap()));
        let b = SessionStore::new(Arc::new(FileBackend::open(root.path(), "b").unwrap()));

        a.save_input(&SelectedRoles::new("x", "y")).unwrap();
        assert!(b.input().is_none());
    }

    #[test]
    fn test_reopen_sees_previous_writes() {
        let root = tempfile::tempdir().unwrap();
        {
            let store = SessionStore::new(Arc::new(FileBackend::open(root.path(), "s").unwrap()));
            store.save_input(&SelectedRoles::new("nurse", "doctor")).unwrap();
        }
        let store = SessionStore::new(Arc::new(FileBackend::open(root.path(), "s").unwrap()));
        assert_eq!(store.input(), Some(SelectedRoles::new("nurse", "doctor")));
    }

    #[test]
    fn test_hand_edited_file_falls_back() {
        let root = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(root.path(), "s").unwrap();
        fs::write(backend.dir().join("wb_results.json"), "not json at all").unwrap();

        let store = SessionStore::new(Arc::new(backend));
        assert!(store.results().is_none());
        assert_eq!(store.load(SessionKey::Results, 5u8), 5);
    }

    #[test]
    fn test_rejects_path_like_session_id() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileBackend::open(root.path(), "../escape"),
            Err(SessionError::InvalidSessionId(_))
        ));
        assert!(FileBackend::open(root.path(), "").is_err());
    }
}
