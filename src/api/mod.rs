//! Collaborator seams: the record store, the meeting service and the mail relay.
//!
//! The workflow engine is generic over these traits; the `Http*` types are
//! the production adapters.

pub mod client;
pub mod error;
pub mod types;

pub use client::{HttpInterviewStore, HttpMailSender, HttpMeetingProvisioner, HttpTransport};
pub use error::ApiError;
pub use types::{CreateInterview, MailAck, MeetingRequest, OutgoingMail, StatusUpdate};

use crate::workflow::{Interview, InterviewId, MeetingDetails};

/// Durable interview records. Repeating an identical status update is harmless.
#[allow(async_fn_in_trait)]
pub trait InterviewStore {
    async fn list_interviews(&self) -> Result<Vec<Interview>, ApiError>;

    async fn fetch_interview(&self, id: &InterviewId) -> Result<Interview, ApiError>;

    async fn create_interview(&self, request: &CreateInterview) -> Result<Interview, ApiError>;

    async fn update_status(
        &self,
        id: &InterviewId,
        update: &StatusUpdate,
    ) -> Result<Interview, ApiError>;
}

#[allow(async_fn_in_trait)]
pub trait MeetingProvisioner {
    async fn create_meeting(&self, request: &MeetingRequest) -> Result<MeetingDetails, ApiError>;
}

#[allow(async_fn_in_trait)]
pub trait MailSender {
    async fn send(&self, mail: &OutgoingMail) -> Result<MailAck, ApiError>;
}
