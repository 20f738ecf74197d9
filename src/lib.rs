pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod ui;
pub mod workflow;

pub use error::{ErrorKind, Severity, ValidationError, WorkflowError};
pub use workflow::{
    FilterSpec, Interview, InterviewId, NotificationDraft, Status, TransitionRequest,
    WorkflowEngine,
};

use api::{HttpInterviewStore, HttpMailSender, HttpMeetingProvisioner};

/// The engine wired to the production HTTP collaborators.
pub type HttpWorkflowEngine = WorkflowEngine<HttpInterviewStore, HttpMeetingProvisioner, HttpMailSender>;
