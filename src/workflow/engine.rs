use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local, TimeZone};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::cache::InterviewCache;
use super::feedback::{FeedbackInput, capture_feedback};
use super::filter::{FilterSpec, filter};
use super::interview::{Interview, InterviewId, NewInterview};
use super::notification::{
    NotificationCoordinator, NotificationDraft, NotificationKind, recipient_for,
};
use super::status::{Event, InvalidTransition, Status, TransitionBlock, next_status};
use crate::api::{
    ApiError, CreateInterview, InterviewStore, MailAck, MailSender, MeetingProvisioner,
    MeetingRequest, StatusUpdate,
};
use crate::error::{ValidationError, WorkflowError};

/// A transition event together with the artifact it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionRequest {
    Conduct,
    Cancel(NotificationDraft),
    MarkDone(FeedbackInput),
    Accept(NotificationDraft),
    Reject(NotificationDraft),
}

impl TransitionRequest {
    pub fn event(&self) -> Event {
        match self {
            TransitionRequest::Conduct => Event::Conduct,
            TransitionRequest::Cancel(_) => Event::Cancel,
            TransitionRequest::MarkDone(_) => Event::MarkDone,
            TransitionRequest::Accept(_) => Event::Accept,
            TransitionRequest::Reject(_) => Event::Reject,
        }
    }
}

/// Result of a committed transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    pub from: Status,
    pub to: Status,
    /// The interview as now cached.
    pub interview: Interview,
    /// Meeting to open, for `Conduct`.
    pub join_url: Option<String>,
    /// Mail relay acknowledgement, for notification-coupled transitions.
    pub notification: Option<MailAck>,
}

/// Marks an interview as busy until dropped.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<InterviewId>>,
    id: InterviewId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

/// Drives interviews through their lifecycle.
///
/// Every transition re-checks the transition table against the cached
/// state, gathers its artifact (feedback or e-mail draft), calls the
/// collaborators and only then commits to the cache. At most one
/// transition per interview runs at a time; different interviews proceed
/// independently.
pub struct WorkflowEngine<S, M, N> {
    store: S,
    meetings: M,
    notifier: NotificationCoordinator<N>,
    company_name: String,
    cache: RwLock<InterviewCache>,
    in_flight: Mutex<HashSet<InterviewId>>,
}

impl<S, M, N> WorkflowEngine<S, M, N>
where
    S: InterviewStore,
    M: MeetingProvisioner,
    N: MailSender,
{
    pub fn new(store: S, meetings: M, mailer: N, company_name: impl Into<String>) -> Self {
        Self {
            store,
            meetings,
            notifier: NotificationCoordinator::new(mailer),
            company_name: company_name.into(),
            cache: RwLock::new(InterviewCache::new()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn meetings(&self) -> &M {
        &self.meetings
    }

    pub fn mailer(&self) -> &N {
        self.notifier.mailer()
    }

    fn acquire(&self, id: &InterviewId) -> Result<InFlight<'_>, WorkflowError> {
        let mut set = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !set.insert(id.clone()) {
            warn!(interview_id = %id, "request refused: transition already in flight");
            return Err(WorkflowError::Busy(id.clone()));
        }
        Ok(InFlight {
            set: &self.in_flight,
            id: id.clone(),
        })
    }

    /// Whether a transition is currently outstanding for `id`.
    pub fn is_in_flight(&self, id: &InterviewId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    /// Replace the cache with the record store's list, in its order.
    ///
    /// Interviews with a transition in flight keep their cached entry; the
    /// transition commits over it when it finishes.
    pub async fn sync(&self) -> Result<usize, WorkflowError> {
        let interviews = self
            .store
            .list_interviews()
            .await
            .map_err(|source| WorkflowError::Store { source })?;
        let mut cache = self.cache.write().await;
        let busy = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let merged: Vec<Interview> = interviews
            .into_iter()
            .map(|fresh| match cache.get(fresh.id()) {
                Some(cached) if busy.contains(fresh.id()) => {
                    debug!(interview_id = %fresh.id(), "kept cached entry during sync");
                    cached.clone()
                }
                _ => fresh,
            })
            .collect();
        cache.load(merged);
        info!(count = cache.len(), "interview cache synchronised");
        Ok(cache.len())
    }

    /// Re-read one interview from the record store.
    pub async fn refresh(&self, id: &InterviewId) -> Result<Interview, WorkflowError> {
        let _guard = self.acquire(id)?;
        let interview = self.store.fetch_interview(id).await.map_err(|source| {
            if source.is_not_found() {
                WorkflowError::NotFound(id.clone())
            } else {
                WorkflowError::Persistence {
                    id: id.clone(),
                    source,
                }
            }
        })?;
        self.cache.write().await.upsert(interview.clone());
        Ok(interview)
    }

    pub async fn get_interview(&self, id: &InterviewId) -> Option<Interview> {
        self.cache.read().await.get(id).cloned()
    }

    /// Interviews matching `spec` as of the operator's local calendar day.
    pub async fn filtered_view(&self, spec: &FilterSpec) -> Vec<Interview> {
        self.filtered_view_at(spec, &Local::now()).await
    }

    pub async fn filtered_view_at<Tz: TimeZone>(
        &self,
        spec: &FilterSpec,
        now: &DateTime<Tz>,
    ) -> Vec<Interview> {
        let cache = self.cache.read().await;
        filter(cache.iter(), spec, now)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Pre-filled notification for `kind`, ready for the operator to edit.
    pub async fn draft(
        &self,
        id: &InterviewId,
        kind: NotificationKind,
    ) -> Result<NotificationDraft, WorkflowError> {
        let interview = self
            .get_interview(id)
            .await
            .ok_or_else(|| WorkflowError::NotFound(id.clone()))?;
        Ok(NotificationDraft::template(
            kind,
            &interview,
            &self.company_name,
        ))
    }

    /// Provision a meeting, persist the new record and cache it as `Scheduled`.
    ///
    /// Nothing is cached unless both the meeting and the record exist.
    pub async fn schedule(&self, request: NewInterview) -> Result<Interview, WorkflowError> {
        request.validate()?;

        let meeting = self
            .meetings
            .create_meeting(&MeetingRequest {
                topic: request.meeting_topic(),
                start_time: request.scheduled_at,
                duration: request.duration_minutes,
            })
            .await
            .map_err(|source| {
                warn!(error = %source, "meeting provisioning failed");
                WorkflowError::Provisioning { source }
            })?;

        let missing = meeting.missing_fields();
        if !missing.is_empty() {
            let missing = missing.join(", ");
            warn!(%missing, "meeting service returned an unusable meeting");
            return Err(WorkflowError::Provisioning {
                source: ApiError::Incomplete { missing },
            });
        }

        let created = self
            .store
            .create_interview(&CreateInterview::new(request.clone(), meeting.clone()))
            .await
            .map_err(|source| {
                warn!(
                    meeting_id = %meeting.meeting_id,
                    error = %source,
                    "meeting provisioned but interview record was not created"
                );
                WorkflowError::Store { source }
            })?;

        let interview = Interview::scheduled(created.id().clone(), &request, meeting);
        self.cache.write().await.upsert(interview.clone());
        info!(interview_id = %interview.id(), candidate = interview.candidate_name(), "interview scheduled");
        Ok(interview)
    }

    /// Validate and run one transition on `id`.
    pub async fn request_transition(
        &self,
        id: &InterviewId,
        request: TransitionRequest,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let _guard = self.acquire(id)?;
        let event = request.event();

        let current = self
            .get_interview(id)
            .await
            .ok_or_else(|| WorkflowError::NotFound(id.clone()))?;
        let from = current.status();

        let to = next_status(from, current.is_done(), event).inspect_err(|e| {
            warn!(interview_id = %id, %event, %from, reason = %e.reason, "transition refused");
        })?;

        match request {
            TransitionRequest::Conduct => self.conduct(current, to).await,
            TransitionRequest::MarkDone(input) => self.mark_done(current, to, &input).await,
            TransitionRequest::Cancel(draft)
            | TransitionRequest::Accept(draft)
            | TransitionRequest::Reject(draft) => self.notify_and_commit(current, event, to, &draft).await,
        }
    }

    async fn conduct(&self, current: Interview, to: Status) -> Result<TransitionOutcome, WorkflowError> {
        let from = current.status();
        let Some(meeting) = current.meeting() else {
            return Err(InvalidTransition {
                from,
                event: Event::Conduct,
                reason: TransitionBlock::MeetingNotProvisioned,
            }
            .into());
        };

        if from == to {
            info!(interview_id = %current.id(), "resuming interview");
            return Ok(TransitionOutcome {
                from,
                to,
                interview: current,
                join_url: Some(meeting.join_url),
                notification: None,
            });
        }

        self.persist(current.id(), &StatusUpdate::status(to)).await?;
        let interview = self
            .commit(current, |iv| {
                iv.status = to;
            })
            .await;
        info!(interview_id = %interview.id(), %from, %to, "interview started");
        Ok(TransitionOutcome {
            from,
            to,
            interview,
            join_url: Some(meeting.join_url),
            notification: None,
        })
    }

    async fn mark_done(
        &self,
        current: Interview,
        to: Status,
        input: &FeedbackInput,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let from = current.status();
        if current.feedback().is_some() {
            return Err(InvalidTransition {
                from,
                event: Event::MarkDone,
                reason: TransitionBlock::NotPermitted,
            }
            .into());
        }

        let record = capture_feedback(input).inspect_err(|e| {
            warn!(interview_id = %current.id(), error = %e, "feedback rejected");
        })?;

        self.persist(current.id(), &StatusUpdate::completed(record.clone()))
            .await?;
        let interview = self
            .commit(current, |iv| {
                iv.status = to;
                iv.is_done = true;
                iv.feedback = Some(record);
            })
            .await;
        info!(interview_id = %interview.id(), %from, %to, "interview marked done");
        Ok(TransitionOutcome {
            from,
            to,
            interview,
            join_url: None,
            notification: None,
        })
    }

    /// Cancel, accept and reject: send the e-mail, then persist, then commit.
    async fn notify_and_commit(
        &self,
        current: Interview,
        event: Event,
        to: Status,
        draft: &NotificationDraft,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let from = current.status();
        let id = current.id().clone();

        let mut errors = ValidationError::new();
        if let Err(e) = draft.validate() {
            errors.extend(e);
        }
        let recipient = recipient_for(&current).map_err(|e| errors.extend(e)).ok();
        let Some(recipient) = recipient.filter(|_| errors.is_empty()) else {
            warn!(interview_id = %id, %event, error = %errors, "notification draft rejected");
            return Err(errors.into());
        };

        let ack = self
            .notifier
            .dispatch(draft, &recipient)
            .await
            .map_err(|source| WorkflowError::Dispatch {
                id: id.clone(),
                source,
            })?;

        if let Err(source) = self.store.update_status(&id, &StatusUpdate::status(to)).await {
            error!(
                interview_id = %id,
                %event,
                %recipient,
                error = %source,
                "notification sent but status update failed; records need reconciliation"
            );
            return Err(WorkflowError::Reconciliation {
                id,
                event,
                recipient,
                source,
            });
        }

        let interview = self
            .commit(current, |iv| {
                iv.status = to;
            })
            .await;
        info!(interview_id = %id, %from, %to, "interview closed");
        Ok(TransitionOutcome {
            from,
            to,
            interview,
            join_url: None,
            notification: Some(ack),
        })
    }

    async fn persist(&self, id: &InterviewId, update: &StatusUpdate) -> Result<(), WorkflowError> {
        match self.store.update_status(id, update).await {
            Ok(record) => {
                if record.status() != update.status {
                    warn!(
                        interview_id = %id,
                        expected = %update.status,
                        returned = %record.status(),
                        "record store echoed a different status"
                    );
                }
                Ok(())
            }
            Err(source) => {
                warn!(interview_id = %id, error = %source, "status update failed");
                Err(WorkflowError::Persistence {
                    id: id.clone(),
                    source,
                })
            }
        }
    }

    async fn commit(&self, mut interview: Interview, apply: impl FnOnce(&mut Interview)) -> Interview {
        apply(&mut interview);
        self.cache.write().await.upsert(interview.clone());
        interview
    }
}
