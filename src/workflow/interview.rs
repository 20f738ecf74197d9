use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::feedback::FeedbackRecord;
use super::status::Status;
use crate::error::ValidationError;

/// Opaque, stable identifier assigned by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewId(String);

impl InterviewId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InterviewId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for InterviewId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Joinable meeting returned by the provisioning service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDetails {
    pub join_url: String,
    pub meeting_id: String,
    pub password: String,
}

impl MeetingDetails {
    /// Details the provisioning service left blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("join_url", &self.join_url),
            ("meeting_id", &self.meeting_id),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// One interview between a company and a candidate.
///
/// Identity, candidate and meeting fields are fixed once the record exists.
/// Status, `is_done` and feedback only change through the workflow engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub(crate) id: InterviewId,
    pub(crate) candidate_name: String,
    pub(crate) role: String,
    #[serde(default)]
    pub(crate) interviewer_name: Option<String>,
    pub(crate) scheduled_at: DateTime<Utc>,
    #[serde(default = "default_duration_minutes")]
    pub(crate) duration_minutes: u32,
    pub(crate) status: Status,
    #[serde(default)]
    pub(crate) is_done: bool,
    #[serde(default)]
    pub(crate) meeting_link: Option<String>,
    #[serde(default)]
    pub(crate) meeting_id: Option<String>,
    #[serde(default)]
    pub(crate) meeting_secret: Option<String>,
    #[serde(default)]
    pub(crate) feedback: Option<FeedbackRecord>,
    pub(crate) candidate_contact: String,
}

fn default_duration_minutes() -> u32 {
    60
}

impl Interview {
    /// A freshly scheduled interview with a provisioned meeting.
    pub fn scheduled(id: InterviewId, request: &NewInterview, meeting: MeetingDetails) -> Self {
        Self {
            id,
            candidate_name: request.candidate_name.trim().to_string(),
            role: request.role.trim().to_string(),
            interviewer_name: request.interviewer_name.clone(),
            scheduled_at: request.scheduled_at,
            duration_minutes: request.duration_minutes,
            status: Status::Scheduled,
            is_done: false,
            meeting_link: Some(meeting.join_url),
            meeting_id: Some(meeting.meeting_id),
            meeting_secret: Some(meeting.password),
            feedback: None,
            candidate_contact: request.candidate_contact.trim().to_string(),
        }
    }

    pub fn id(&self) -> &InterviewId {
        &self.id
    }

    pub fn candidate_name(&self) -> &str {
        &self.candidate_name
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn interviewer_name(&self) -> Option<&str> {
        self.interviewer_name.as_deref()
    }

    pub fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_done(&self) -> bool {
        self.is_done
    }

    pub fn feedback(&self) -> Option<&FeedbackRecord> {
        self.feedback.as_ref()
    }

    pub fn candidate_contact(&self) -> &str {
        &self.candidate_contact
    }

    pub fn meeting_link(&self) -> Option<&str> {
        self.meeting_link.as_deref().filter(|l| !l.is_empty())
    }

    /// The provisioned meeting, if a link and an id were both attached.
    pub fn meeting(&self) -> Option<MeetingDetails> {
        let join_url = self.meeting_link()?;
        let meeting_id = self.meeting_id.as_deref().filter(|m| !m.is_empty())?;
        Some(MeetingDetails {
            join_url: join_url.to_string(),
            meeting_id: meeting_id.to_string(),
            password: self.meeting_secret.clone().unwrap_or_default(),
        })
    }
}

/// Request to schedule a new interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInterview {
    pub candidate_name: String,
    pub role: String,
    #[serde(default)]
    pub interviewer_name: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub candidate_contact: String,
}

impl NewInterview {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.candidate_name.trim().is_empty() {
            errors.push("candidate_name", "must not be empty");
        }
        if self.role.trim().is_empty() {
            errors.push("role", "must not be empty");
        }
        if self.duration_minutes == 0 {
            errors.push("duration_minutes", "must be greater than zero");
        }
        if let Err(message) = check_contact(&self.candidate_contact) {
            errors.push("candidate_contact", message);
        }
        errors.into_result()
    }

    /// Meeting topic shown in the conferencing service.
    pub fn meeting_topic(&self) -> String {
        format!(
            "Interview: {} for {}",
            self.candidate_name.trim(),
            self.role.trim()
        )
    }
}

/// Loose e-mail sanity check: one `@` with text on both sides and a dot in the domain.
pub(crate) fn check_contact(contact: &str) -> Result<(), &'static str> {
    let contact = contact.trim();
    if contact.is_empty() {
        return Err("is required");
    }
    match contact.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !contact.contains(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err("must be a valid email address"),
    }
}
