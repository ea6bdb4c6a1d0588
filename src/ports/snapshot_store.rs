//! Snapshot Store Port - Interface for persisting interview snapshots.
//!
//! The controller writes a snapshot at phase boundaries (start, analysis
//! received, report received). Snapshots can be loaded back to resume an
//! interview.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::interview::InterviewSession;

/// Errors that can occur during snapshot operations
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot not found for session: {0}")]
    NotFound(SessionId),

    #[error("Session has not been started; nothing to snapshot")]
    NotStarted,

    #[error("Failed to serialize snapshot: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize snapshot: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// A saved copy of an interview session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub saved_at: Timestamp,
    pub session: InterviewSession,
}

impl SessionSnapshot {
    /// Captures a started session.
    ///
    /// # Errors
    /// Returns `SnapshotError::NotStarted` for an idle session without id
    pub fn capture(session: &InterviewSession, saved_at: Timestamp) -> Result<Self, SnapshotError> {
        let session_id = session.session_id().ok_or(SnapshotError::NotStarted)?;
        Ok(Self {
            session_id,
            saved_at,
            session: session.clone(),
        })
    }
}

/// Port for persisting and loading interview snapshots
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Save a snapshot, replacing any earlier one for the same session
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SnapshotError>;

    /// Load the latest snapshot of a session
    ///
    /// # Errors
    /// Returns `SnapshotError::NotFound` if no snapshot exists
    async fn load(&self, session_id: SessionId) -> Result<SessionSnapshot, SnapshotError>;

    /// Check if a snapshot exists for a session
    async fn exists(&self, session_id: SessionId) -> Result<bool, SnapshotError>;

    /// Ids of all stored sessions
    async fn list(&self) -> Result<Vec<SessionId>, SnapshotError>;

    /// Delete the snapshot of a session; deleting a missing one is not an error
    async fn delete(&self, session_id: SessionId) -> Result<(), SnapshotError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::interview::{Demographics, InterviewEvent, Sex};

    #[test]
    fn idle_session_cannot_be_captured() {
        let session = InterviewSession::new(vec![]);
        let err = SessionSnapshot::capture(&session, Timestamp::now()).unwrap_err();
        assert!(matches!(err, SnapshotError::NotStarted));
    }

    #[test]
    fn started_session_is_captured_under_its_id() {
        let demographics = Demographics::new(Sex::Female, 40).unwrap();
        let session = InterviewSession::new(vec![])
            .apply(InterviewEvent::started("P1", demographics).unwrap())
            .unwrap();
        let snapshot = SessionSnapshot::capture(&session, Timestamp::now()).unwrap();
        assert_eq!(Some(snapshot.session_id), session.session_id());
        assert_eq!(snapshot.session, session);
    }

    #[test]
    fn not_found_error_mentions_session() {
        let id = SessionId::new();
        let err = SnapshotError::NotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
    }
}
