//! Application layer - Interview orchestration.
//!
//! This layer drives the domain state machine and coordinates the ports:
//! it builds prompts, calls the language model, persists snapshots and
//! exports the finished report.

pub mod answer_input;
pub mod connection_check;
pub mod interview_controller;
pub mod prompts;

pub use answer_input::{parse_answer, AnswerInputError};
pub use connection_check::{ConnectionChecker, ConnectionReport, ConnectionStatus};
pub use interview_controller::{
    ControllerSettings, InterviewController, ReportExportError, DEFAULT_REPORT_DIR,
};
pub use prompts::{AnalysisRequest, PromptPair, ReportRequest};
