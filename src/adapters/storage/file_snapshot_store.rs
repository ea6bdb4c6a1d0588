//! File-based Snapshot Store Adapter
//!
//! Stores each interview session as `<session_id>.yaml` in one directory.
//! Saving overwrites the previous snapshot of the same session.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::SessionId;
use crate::ports::{SessionSnapshot, SnapshotError, SnapshotStore};

const SNAPSHOT_EXTENSION: &str = "yaml";

/// File-based storage for interview snapshots
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    base_path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// The directory is created on first save.
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSnapshotStore::new("./data/sessions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the snapshot file path for a session
    fn snapshot_path(&self, session_id: SessionId) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", session_id, SNAPSHOT_EXTENSION))
    }

    async fn read_snapshot(&self, path: &Path) -> Result<SessionSnapshot, SnapshotError> {
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|e| SnapshotError::IoError(e.to_string()))?;

        serde_yaml::from_str(&yaml).map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| SnapshotError::IoError(e.to_string()))?;

        let yaml = serde_yaml::to_string(snapshot)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))?;

        fs::write(self.snapshot_path(snapshot.session_id), yaml)
            .await
            .map_err(|e| SnapshotError::IoError(e.to_string()))?;

        tracing::debug!(session_id = %snapshot.session_id, "Snapshot written");
        Ok(())
    }

    async fn load(&self, session_id: SessionId) -> Result<SessionSnapshot, SnapshotError> {
        let path = self.snapshot_path(session_id);

        let yaml = match fs::read_to_string(&path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SnapshotError::NotFound(session_id))
            }
            Err(e) => return Err(SnapshotError::IoError(e.to_string())),
        };

        serde_yaml::from_str(&yaml).map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))
    }

    async fn exists(&self, session_id: SessionId) -> Result<bool, SnapshotError> {
        fs::try_exists(self.snapshot_path(session_id))
            .await
            .map_err(|e| SnapshotError::IoError(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<SessionId>, SnapshotError> {
        let mut dir = match fs::read_dir(&self.base_path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SnapshotError::IoError(e.to_string())),
        };

        let mut found = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| SnapshotError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.parse::<SessionId>().is_err() {
                continue;
            }
            match self.read_snapshot(&path).await {
                Ok(snapshot) => found.push(snapshot),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable snapshot")
                }
            }
        }

        found.sort_by_key(|s| s.saved_at);
        Ok(found.into_iter().map(|s| s.session_id).collect())
    }

    async fn delete(&self, session_id: SessionId) -> Result<(), SnapshotError> {
        match fs::remove_file(self.snapshot_path(session_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SnapshotError::IoError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::interview::{
        Demographics, InterviewEvent, InterviewSession, QuestionCatalog, Sex,
    };
    use tempfile::TempDir;

    fn started_session() -> InterviewSession {
        InterviewSession::new(QuestionCatalog::cardiology().unwrap().into_questions())
            .apply(InterviewEvent::started("P-1", Demographics::new(Sex::Female, 48).unwrap()).unwrap())
            .unwrap()
            .apply(InterviewEvent::answer("chief_complaint_main", "chest_pain"))
            .unwrap()
            .apply(InterviewEvent::answer(
                "symptom_character",
                vec!["pressing".to_string(), "other:worse at night".to_string()],
            ))
            .unwrap()
    }

    fn snapshot_at(secs: i64) -> SessionSnapshot {
        SessionSnapshot::capture(&started_session(), Timestamp::from_unix_secs(secs)).unwrap()
    }

    #[tokio::test]
    async fn save_and_load_round_trips_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path());
        let snapshot = snapshot_at(1_700_000_000);

        store.save(&snapshot).await.unwrap();
        let loaded = store.load(snapshot.session_id).await.unwrap();

        assert_eq!(loaded, snapshot);
        assert!(temp_dir
            .path()
            .join(format!("{}.yaml", snapshot.session_id))
            .exists());
    }

    #[tokio::test]
    async fn save_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path().join("nested").join("sessions"));

        store.save(&snapshot_at(1_700_000_000)).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn load_nonexistent_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path());

        let result = store.load(SessionId::new()).await;

        assert!(matches!(result, Err(SnapshotError::NotFound(_))));
    }

    #[tokio::test]
    async fn corrupt_file_fails_to_deserialize() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path());
        let id = SessionId::new();
        std::fs::write(temp_dir.path().join(format!("{}.yaml", id)), "session: [unclosed").unwrap();

        let result = store.load(id).await;

        assert!(matches!(result, Err(SnapshotError::DeserializationFailed(_))));
    }

    #[tokio::test]
    async fn edited_snapshot_with_invalid_age_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path());
        let snapshot = snapshot_at(1_700_000_000);
        store.save(&snapshot).await.unwrap();

        let path = temp_dir.path().join(format!("{}.yaml", snapshot.session_id));
        let yaml = std::fs::read_to_string(&path).unwrap();
        assert!(yaml.contains("age: 48"));
        std::fs::write(&path, yaml.replacen("age: 48", "age: 0", 1)).unwrap();

        let result = store.load(snapshot.session_id).await;

        assert!(matches!(result, Err(SnapshotError::DeserializationFailed(_))));
    }

    #[tokio::test]
    async fn exists_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path());
        let snapshot = snapshot_at(1_700_000_000);

        assert!(!store.exists(snapshot.session_id).await.unwrap());
        store.save(&snapshot).await.unwrap();
        assert!(store.exists(snapshot.session_id).await.unwrap());

        store.delete(snapshot.session_id).await.unwrap();
        assert!(!store.exists(snapshot.session_id).await.unwrap());

        // deleting again is fine
        store.delete(snapshot.session_id).await.unwrap();
    }

    #[tokio::test]
    async fn list_skips_foreign_files_and_orders_by_save_time() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path());
        let later = snapshot_at(1_700_000_900);
        let earlier = snapshot_at(1_700_000_000);
        store.save(&later).await.unwrap();
        store.save(&earlier).await.unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "hello").unwrap();
        std::fs::write(temp_dir.path().join("not-an-id.yaml"), "x: 1").unwrap();

        let ids = store.list().await.unwrap();

        assert_eq!(ids, vec![earlier.session_id, later.session_id]);
    }

    #[tokio::test]
    async fn list_of_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path().join("absent"));

        assert!(store.list().await.unwrap().is_empty());
    }
}
