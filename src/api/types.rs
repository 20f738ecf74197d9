//! Wire types exchanged with the collaborator services.
//!
//! The record store speaks camelCase JSON. The meeting service uses the
//! snake_case shape common to conferencing APIs, where the meeting id may be
//! a number or a string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflow::{FeedbackRecord, MeetingDetails, NewInterview, Status};

/// Body of `POST /interviews`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterview {
    #[serde(flatten)]
    pub interview: NewInterview,
    pub status: Status,
    pub meeting_link: String,
    pub meeting_id: String,
    pub meeting_secret: String,
}

impl CreateInterview {
    pub fn new(interview: NewInterview, meeting: MeetingDetails) -> Self {
        Self {
            interview,
            status: Status::Scheduled,
            meeting_link: meeting.join_url,
            meeting_id: meeting.meeting_id,
            meeting_secret: meeting.password,
        }
    }
}

/// Body of `PUT /interviews/{id}/status`: the new status plus any fields
/// the transition sets alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_done: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackRecord>,
}

impl StatusUpdate {
    pub fn status(status: Status) -> Self {
        Self {
            status,
            is_done: None,
            feedback: None,
        }
    }

    pub fn completed(feedback: FeedbackRecord) -> Self {
        Self {
            status: Status::Completed,
            is_done: Some(true),
            feedback: Some(feedback),
        }
    }
}

/// Body of `POST /meetings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRequest {
    pub topic: String,
    pub start_time: DateTime<Utc>,
    /// Minutes.
    pub duration: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeetingResponse {
    pub join_url: String,
    pub id: serde_json::Value,
    #[serde(default)]
    pub password: String,
}

impl From<MeetingResponse> for MeetingDetails {
    fn from(resp: MeetingResponse) -> Self {
        let meeting_id = match resp.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        MeetingDetails {
            join_url: resp.join_url,
            meeting_id,
            password: resp.password,
        }
    }
}

/// Body of `POST /send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Acknowledgement from the mail relay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailAck {
    #[serde(default)]
    pub message_id: Option<String>,
}
