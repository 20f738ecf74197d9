//! Candidate e-mails tied to the cancel, accept and reject transitions.
//!
//! A [`NotificationDraft`] is pre-filled from a template, edited by the
//! operator, then handed as-is to the [`NotificationCoordinator`]. The
//! coordinator never rewrites or retries a draft on its own.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::interview::{Interview, check_contact};
use crate::api::{ApiError, MailAck, MailSender, OutgoingMail};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Cancellation,
    Acceptance,
    Rejection,
}

/// Editable subject and body for one pending notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub title: String,
    pub body: String,
}

impl NotificationDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Pre-filled draft for `kind`, interpolating candidate, role, date and company.
    pub fn template(kind: NotificationKind, interview: &Interview, company: &str) -> Self {
        let name = interview.candidate_name();
        let role = interview.role();
        let when = interview.scheduled_at().format("%d %b %Y, %H:%M UTC");

        match kind {
            NotificationKind::Cancellation => Self::new(
                format!("Interview cancelled: {role} at {company}"),
                format!(
                    "Dear {name},\n\n\
                     We regret to inform you that your interview for the {role} position, \
                     scheduled on {when}, has been cancelled.\n\n\
                     We will reach out if the opportunity reopens.\n\n\
                     Regards,\n{company} Recruitment Team"
                ),
            ),
            NotificationKind::Acceptance => Self::new(
                format!("Congratulations! {role} at {company}"),
                format!(
                    "Dear {name},\n\n\
                     Thank you for interviewing for the {role} position on {when}. \
                     We are pleased to inform you that you have been selected.\n\n\
                     Our team will contact you shortly with the next steps.\n\n\
                     Regards,\n{company} Recruitment Team"
                ),
            ),
            NotificationKind::Rejection => Self::new(
                format!("Your application for {role} at {company}"),
                format!(
                    "Dear {name},\n\n\
                     Thank you for interviewing for the {role} position on {when}. \
                     After careful consideration we have decided not to move forward \
                     with your application at this time.\n\n\
                     We wish you the best in your job search.\n\n\
                     Regards,\n{company} Recruitment Team"
                ),
            ),
        }
    }

    /// A draft is sendable when neither the subject nor the body is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.title.trim().is_empty() {
            errors.push("title", "must not be empty");
        }
        if self.body.trim().is_empty() {
            errors.push("body", "must not be empty");
        }
        errors.into_result()
    }
}

/// Recipient of a notification for `interview`, validated.
pub fn recipient_for(interview: &Interview) -> Result<String, ValidationError> {
    check_contact(interview.candidate_contact())
        .map(|()| interview.candidate_contact().trim().to_string())
        .map_err(|message| ValidationError::single("candidate_contact", message))
}

/// Hands drafts to the e-mail collaborator and reports its acknowledgement.
pub struct NotificationCoordinator<M> {
    mailer: M,
}

impl<M: MailSender> NotificationCoordinator<M> {
    pub fn new(mailer: M) -> Self {
        Self { mailer }
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Send `draft` to `recipient` exactly as given.
    ///
    /// Failures come back verbatim; nothing is retried here.
    pub async fn dispatch(
        &self,
        draft: &NotificationDraft,
        recipient: &str,
    ) -> Result<MailAck, ApiError> {
        let mail = OutgoingMail {
            to: recipient.to_string(),
            subject: draft.title.clone(),
            body: draft.body.clone(),
        };
        match self.mailer.send(&mail).await {
            Ok(ack) => {
                info!(recipient, message_id = ?ack.message_id, "notification dispatched");
                Ok(ack)
            }
            Err(e) => {
                warn!(recipient, error = %e, "notification dispatch failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::workflow::Status;
    use crate::workflow::interview::tests::sample_interview;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingMail>>,
        fail: bool,
    }

    impl MailSender for RecordingMailer {
        async fn send(&self, mail: &OutgoingMail) -> Result<MailAck, ApiError> {
            if self.fail {
                return Err(ApiError::Status {
                    status: 502,
                    message: "smtp relay down".into(),
                });
            }
            self.sent.lock().unwrap().push(mail.clone());
            Ok(MailAck {
                message_id: Some("m-1".into()),
            })
        }
    }

    #[test]
    fn templates_interpolate_interview_details() {
        let iv = sample_interview("iv-1", "Anita Rao", Status::Completed);
        let draft = NotificationDraft::template(NotificationKind::Acceptance, &iv, "Acme");
        assert_eq!(draft.title, "Congratulations! Backend Engineer at Acme");
        assert!(draft.body.starts_with("Dear Anita Rao,"));
        assert!(draft.body.contains("14 May 2030, 10:30 UTC"));
        assert!(draft.body.ends_with("Acme Recruitment Team"));
    }

    #[test]
    fn each_kind_has_distinct_template() {
        let iv = sample_interview("iv-1", "Anita Rao", Status::Scheduled);
        let cancel = NotificationDraft::template(NotificationKind::Cancellation, &iv, "Acme");
        let reject = NotificationDraft::template(NotificationKind::Rejection, &iv, "Acme");
        assert!(cancel.body.contains("has been cancelled"));
        assert!(reject.body.contains("not to move forward"));
        assert_ne!(cancel.title, reject.title);
    }

    #[test]
    fn blank_draft_is_invalid() {
        let err = NotificationDraft::new("Subject", "  \n ").validate().unwrap_err();
        assert!(err.has_field("body"));
        assert!(!err.has_field("title"));
        assert!(NotificationDraft::new("S", "Position on hold.").validate().is_ok());
    }

    #[test]
    fn recipient_requires_valid_contact() {
        let mut iv = sample_interview("iv-1", "Anita Rao", Status::Scheduled);
        assert_eq!(recipient_for(&iv).unwrap(), "anita@example.com");
        iv.candidate_contact = "nobody".into();
        assert!(recipient_for(&iv).unwrap_err().has_field("candidate_contact"));
    }

    #[tokio::test]
    async fn dispatch_sends_draft_verbatim() {
        let coordinator = NotificationCoordinator::new(RecordingMailer::default());
        let draft = NotificationDraft::new("Update", "Position on hold.");
        let ack = coordinator
            .dispatch(&draft, "anita@example.com")
            .await
            .unwrap();
        assert_eq!(ack.message_id.as_deref(), Some("m-1"));

        let sent = coordinator.mailer().sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "anita@example.com");
        assert_eq!(sent[0].subject, "Update");
        assert_eq!(sent[0].body, "Position on hold.");
    }

    #[tokio::test]
    async fn dispatch_failure_is_reported_verbatim() {
        let coordinator = NotificationCoordinator::new(RecordingMailer {
            fail: true,
            ..Default::default()
        });
        let err = coordinator
            .dispatch(&NotificationDraft::new("S", "B"), "anita@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API error (status 502): smtp relay down");
        assert!(coordinator.mailer().sent.lock().unwrap().is_empty());
    }
}
