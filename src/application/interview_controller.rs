//! InterviewController - Drives one interview through both phases.
//!
//! The controller owns the [`InterviewSession`], turns user actions into
//! events, performs the analysis and report calls, and applies the fail
//! path when a call goes wrong. Snapshots are written after start, after
//! the analysis and after the report.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::application::prompts::{AnalysisRequest, ReportRequest};
use crate::domain::analysis::{decode_analysis, AnalysisResult};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::interview::{
    Answer, Demographics, InterviewError, InterviewEvent, InterviewSession, Phase, Question,
    ResponseEntry, Sex,
};
use crate::domain::report::{decode_report, ReportContent};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, RenderError, RenderOptions, ReportRenderer,
    RequestMetadata, RequestPurpose, SessionSnapshot, SnapshotError, SnapshotStore,
};

/// Default directory for exported reports.
pub const DEFAULT_REPORT_DIR: &str = "./reports";

/// Tunables of the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    /// Caller-side limit for each model call. `None` waits for the provider.
    pub request_timeout: Option<Duration>,
    /// Directory that `export_report` writes into.
    pub report_dir: PathBuf,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            request_timeout: None,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
        }
    }
}

/// Errors from exporting the final report.
#[derive(Debug, Error)]
pub enum ReportExportError {
    #[error("No report has been generated yet")]
    NoReport,

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Application service for a single interview.
pub struct InterviewController {
    session: InterviewSession,
    provider: Arc<dyn AIProvider>,
    snapshots: Arc<dyn SnapshotStore>,
    renderer: Arc<dyn ReportRenderer>,
    settings: ControllerSettings,
}

impl InterviewController {
    pub fn new(
        phase1_questions: Vec<Question>,
        provider: Arc<dyn AIProvider>,
        snapshots: Arc<dyn SnapshotStore>,
        renderer: Arc<dyn ReportRenderer>,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            session: InterviewSession::new(phase1_questions),
            provider,
            snapshots,
            renderer,
            settings,
        }
    }

    pub fn session(&self) -> &InterviewSession {
        &self.session
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// True while an analysis or report call is outstanding.
    pub fn is_loading(&self) -> bool {
        self.session.status().is_waiting()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    pub fn is_current_answered(&self) -> bool {
        self.session.is_current_answered()
    }

    /// Transcript entries of one phase as of now.
    pub fn responses(&self, phase: Phase) -> Vec<ResponseEntry> {
        self.session.responses(phase, Timestamp::now())
    }

    fn apply(&mut self, event: InterviewEvent) -> Result<(), InterviewError> {
        let name = event.name();
        self.session = self.session.apply(event)?;
        tracing::debug!(event = name, status = %self.session.status(), "Interview event applied");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts a new interview, discarding any previous one.
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank patient id or an age outside 1..150;
    ///   the current session is left untouched
    pub async fn start(
        &mut self,
        patient_id: &str,
        sex: Sex,
        age: u32,
    ) -> Result<SessionId, InterviewError> {
        let demographics = Demographics::new(sex, age)?;
        self.apply(InterviewEvent::started(patient_id, demographics)?)?;
        let session_id = self.session.session_id().ok_or(InterviewError::InvalidState {
            action: "start an interview",
            status: self.session.status(),
        })?;
        tracing::info!(session_id = %session_id, "Interview started");

        self.save_snapshot().await;
        Ok(session_id)
    }

    /// Records or replaces the answer to a question.
    pub fn set_answer(
        &mut self,
        question_id: impl Into<String>,
        answer: impl Into<Answer>,
    ) -> Result<(), InterviewError> {
        self.apply(InterviewEvent::answer(question_id, answer))
    }

    /// Moves to the next question; a no-op on the last one.
    pub fn advance(&mut self) -> Result<(), InterviewError> {
        self.apply(InterviewEvent::Advanced)
    }

    /// Moves to the previous question; a no-op on the first one.
    pub fn retreat(&mut self) -> Result<(), InterviewError> {
        self.apply(InterviewEvent::Retreated)
    }

    /// Submits phase one and waits for the follow-up questions.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the session is not in phase one
    /// - an upstream error if the call or its payload fails; the session is
    ///   then back in phase one with the error message set
    pub async fn complete_phase1(&mut self) -> Result<&AnalysisResult, InterviewError> {
        self.apply(InterviewEvent::Phase1Completed)?;
        let session_id = self.session.session_id();
        tracing::info!(session_id = ?session_id, "Phase one submitted for analysis");

        let entries = self.session.responses(Phase::One, Timestamp::now());
        let request = AnalysisRequest::new(&entries, self.session.demographics().copied())
            .to_completion_request(Self::metadata(session_id, RequestPurpose::Analysis));

        let outcome = match self.call_model(request).await {
            Ok(text) => decode_analysis(&text).map_err(InterviewError::from),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(analysis) => {
                let follow_ups = analysis.follow_up_questions.len();
                self.apply(InterviewEvent::analysis_received(analysis))?;
                tracing::info!(
                    session_id = ?session_id,
                    follow_ups,
                    phase2_questions = self.session.phase2_questions().len(),
                    "Analysis received"
                );
                self.save_snapshot().await;
                self.session
                    .analysis()
                    .ok_or(InterviewError::InvalidState {
                        action: "read the analysis",
                        status: self.session.status(),
                    })
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Submits phase two and waits for the report.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the session is not in phase two
    /// - an upstream error if the call or its payload fails; the session is
    ///   then back in phase two with the error message set
    pub async fn complete_phase2(&mut self) -> Result<&ReportContent, InterviewError> {
        self.apply(InterviewEvent::Phase2Completed)?;
        let session_id = self.session.session_id();
        tracing::info!(session_id = ?session_id, "Phase two submitted for report");

        let now = Timestamp::now();
        let phase1 = self.session.responses(Phase::One, now);
        let phase2 = self.session.responses(Phase::Two, now);
        let notes = self
            .session
            .analysis()
            .and_then(|analysis| analysis.clinical_notes.clone());
        let request = ReportRequest::new(&phase1, &phase2, notes)
            .to_completion_request(Self::metadata(session_id, RequestPurpose::Report));

        let outcome = match (self.call_model(request).await, session_id) {
            (Ok(text), Some(id)) => decode_report(&text, &phase1, &phase2, id, Timestamp::now())
                .map_err(InterviewError::from),
            (Ok(_), None) => Err(InterviewError::InvalidState {
                action: "assemble a report",
                status: self.session.status(),
            }),
            (Err(err), _) => Err(err),
        };

        match outcome {
            Ok(report) => {
                self.apply(InterviewEvent::ReportReceived(Box::new(report)))?;
                tracing::info!(session_id = ?session_id, "Report received");
                self.save_snapshot().await;
                self.session.report().ok_or(InterviewError::InvalidState {
                    action: "read the report",
                    status: self.session.status(),
                })
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Gives up on an outstanding call whose future was dropped.
    pub fn abandon_pending(&mut self, message: impl Into<String>) -> Result<(), InterviewError> {
        if self.is_loading() {
            self.apply(InterviewEvent::Failed(message.into()))?;
        }
        Ok(())
    }

    /// Returns to idle with no session.
    pub fn reset(&mut self) -> Result<(), InterviewError> {
        self.apply(InterviewEvent::Reset)?;
        tracing::info!("Interview reset");
        Ok(())
    }

    /// Replaces the current session with a stored snapshot.
    ///
    /// A snapshot caught mid-call is reverted to the phase it came from.
    pub async fn resume(&mut self, session_id: SessionId) -> Result<(), SnapshotError> {
        let snapshot = self.snapshots.load(session_id).await?;
        self.session = snapshot.session;
        if self.is_loading() {
            let reverted = self
                .session
                .apply(InterviewEvent::Failed("The interrupted request was not completed.".into()));
            if let Ok(session) = reverted {
                self.session = session;
            }
        }
        tracing::info!(session_id = %session_id, status = %self.session.status(), "Interview resumed");
        Ok(())
    }

    /// Renders the report and writes it into the report directory.
    pub async fn export_report(&self, options: &RenderOptions) -> Result<PathBuf, ReportExportError> {
        let report = self.session.report().ok_or(ReportExportError::NoReport)?;
        let document = self.renderer.render(report, options)?;

        tokio::fs::create_dir_all(&self.settings.report_dir).await?;
        let path = Path::new(&self.settings.report_dir).join(&document.file_name);
        tokio::fs::write(&path, document.content.as_bytes()).await?;

        tracing::info!(path = %path.display(), "Report exported");
        Ok(path)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn metadata(session_id: Option<SessionId>, purpose: RequestPurpose) -> RequestMetadata {
        RequestMetadata::new(session_id, purpose, uuid::Uuid::new_v4().to_string())
    }

    async fn call_model(&self, request: CompletionRequest) -> Result<String, InterviewError> {
        let call = self.provider.complete(request);
        let response = match self.settings.request_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                AIError::Timeout {
                    timeout_secs: limit.as_secs() as u32,
                }
            })??,
            None => call.await?,
        };
        Ok(response.content)
    }

    /// Reverts the waiting state and hands the error back.
    fn fail(&mut self, err: InterviewError) -> InterviewError {
        tracing::warn!(
            session_id = ?self.session.session_id(),
            status = %self.session.status(),
            code = ?err.code(),
            error = %err,
            "Interview call failed"
        );
        if let Err(apply_err) = self.apply(InterviewEvent::Failed(err.user_message())) {
            tracing::error!(error = %apply_err, "Could not apply failure");
        }
        err
    }

    async fn save_snapshot(&self) {
        let snapshot = match SessionSnapshot::capture(&self.session, Timestamp::now()) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "Snapshot skipped");
                return;
            }
        };
        if let Err(err) = self.snapshots.save(&snapshot).await {
            tracing::warn!(session_id = %snapshot.session_id, error = %err, "Snapshot save failed");
        }
    }
}
