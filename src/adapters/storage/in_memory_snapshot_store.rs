//! In-Memory Snapshot Store Adapter
//!
//! Keeps interview snapshots in memory. Useful for testing and for running
//! without a snapshot directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::ports::{SessionSnapshot, SnapshotError, SnapshotStore};

/// In-memory storage for interview snapshots
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    snapshots: Arc<RwLock<HashMap<SessionId, SessionSnapshot>>>,
}

impl InMemorySnapshotStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored snapshots (useful for tests)
    pub async fn clear(&self) {
        self.snapshots.write().await.clear();
    }

    /// Get the number of stored snapshots
    pub async fn snapshot_count(&self) -> usize {
        self.snapshots.read().await.len()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SnapshotError> {
        let mut snapshots = self.snapshots.write().await;
        snapshots.insert(snapshot.session_id, snapshot.clone());
        Ok(())
    }

    async fn load(&self, session_id: SessionId) -> Result<SessionSnapshot, SnapshotError> {
        let snapshots = self.snapshots.read().await;
        snapshots
            .get(&session_id)
            .cloned()
            .ok_or(SnapshotError::NotFound(session_id))
    }

    async fn exists(&self, session_id: SessionId) -> Result<bool, SnapshotError> {
        Ok(self.snapshots.read().await.contains_key(&session_id))
    }

    async fn list(&self) -> Result<Vec<SessionId>, SnapshotError> {
        let snapshots = self.snapshots.read().await;
        let mut entries: Vec<&SessionSnapshot> = snapshots.values().collect();
        entries.sort_by_key(|s| s.saved_at);
        Ok(entries.into_iter().map(|s| s.session_id).collect())
    }

    async fn delete(&self, session_id: SessionId) -> Result<(), SnapshotError> {
        self.snapshots.write().await.remove(&session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::interview::{
        Demographics, InterviewEvent, InterviewSession, QuestionCatalog, Sex,
    };

    fn snapshot(saved_at: Timestamp) -> SessionSnapshot {
        let session = InterviewSession::new(QuestionCatalog::cardiology().unwrap().into_questions())
            .apply(InterviewEvent::started("P-7", Demographics::new(Sex::Male, 61).unwrap()).unwrap())
            .unwrap();
        SessionSnapshot::capture(&session, saved_at).unwrap()
    }

    #[tokio::test]
    async fn save_and_load() {
        let store = InMemorySnapshotStore::new();
        let snap = snapshot(Timestamp::now());

        store.save(&snap).await.unwrap();
        let loaded = store.load(snap.session_id).await.unwrap();

        assert_eq!(loaded, snap);
        assert_eq!(store.snapshot_count().await, 1);
    }

    #[tokio::test]
    async fn load_missing_is_not_found() {
        let store = InMemorySnapshotStore::new();
        let result = store.load(SessionId::new()).await;
        assert!(matches!(result, Err(SnapshotError::NotFound(_))));
    }

    #[tokio::test]
    async fn save_replaces_previous_snapshot() {
        let store = InMemorySnapshotStore::new();
        let first = snapshot(Timestamp::from_unix_secs(1_700_000_000));
        let mut second = first.clone();
        second.saved_at = Timestamp::from_unix_secs(1_700_000_100);

        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();

        assert_eq!(store.snapshot_count().await, 1);
        assert_eq!(store.load(first.session_id).await.unwrap().saved_at, second.saved_at);
    }

    #[tokio::test]
    async fn list_is_ordered_by_save_time() {
        let store = InMemorySnapshotStore::new();
        let later = snapshot(Timestamp::from_unix_secs(1_700_000_500));
        let earlier = snapshot(Timestamp::from_unix_secs(1_700_000_000));

        store.save(&later).await.unwrap();
        store.save(&earlier).await.unwrap();

        assert_eq!(
            store.list().await.unwrap(),
            vec![earlier.session_id, later.session_id]
        );
    }

    #[tokio::test]
    async fn delete_removes_and_is_idempotent() {
        let store = InMemorySnapshotStore::new();
        let snap = snapshot(Timestamp::now());
        store.save(&snap).await.unwrap();

        store.delete(snap.session_id).await.unwrap();
        store.delete(snap.session_id).await.unwrap();

        assert!(!store.exists(snap.session_id).await.unwrap());
    }

    #[tokio::test]
    async fn clear_empties_store() {
        let store = InMemorySnapshotStore::new();
        store.save(&snapshot(Timestamp::now())).await.unwrap();
        store.clear().await;
        assert_eq!(store.snapshot_count().await, 0);
    }
}
