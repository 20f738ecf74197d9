use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The six states an interview moves through.
///
/// Each interview flows through: SCHEDULED → IN_PROGRESS → COMPLETED → ACCEPTED | REJECTED,
/// and may be CANCELLED any time before completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Scheduled,
    InProgress,
    Completed,
    Accepted,
    Rejected,
    Cancelled,
}

impl Status {
    /// No transition leaves a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Accepted | Status::Rejected | Status::Cancelled)
    }

    /// Human-readable label, also the text matched by the status search field.
    pub fn label(self) -> &'static str {
        match self {
            Status::Scheduled => "Scheduled",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
            Status::Accepted => "Accepted",
            Status::Rejected => "Rejected",
            Status::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a status string names none of the six states.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interview status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "scheduled" => Ok(Status::Scheduled),
            "inprogress" => Ok(Status::InProgress),
            "completed" => Ok(Status::Completed),
            "accepted" => Ok(Status::Accepted),
            "rejected" => Ok(Status::Rejected),
            "cancelled" | "canceled" => Ok(Status::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Operator-triggered events that request a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Conduct,
    Cancel,
    MarkDone,
    Accept,
    Reject,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Conduct => write!(f, "CONDUCT"),
            Event::Cancel => write!(f, "CANCEL"),
            Event::MarkDone => write!(f, "MARK_DONE"),
            Event::Accept => write!(f, "ACCEPT"),
            Event::Reject => write!(f, "REJECT"),
        }
    }
}

/// Why a requested event is not available from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionBlock {
    /// The interview already reached Accepted, Rejected or Cancelled.
    Terminal,
    /// The event is not defined for the current state.
    NotPermitted,
    /// Accept/Reject before the interview was marked done.
    AwaitingCompletion,
    /// Conduct on an interview with no provisioned meeting.
    MeetingNotProvisioned,
}

impl fmt::Display for TransitionBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionBlock::Terminal => write!(f, "interview is already closed"),
            TransitionBlock::NotPermitted => write!(f, "event is not allowed from this state"),
            TransitionBlock::AwaitingCompletion => {
                write!(f, "interview must be marked done with feedback first")
            }
            TransitionBlock::MeetingNotProvisioned => {
                write!(f, "no meeting has been provisioned for this interview")
            }
        }
    }
}

/// A requested event that the transition table refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {event} an interview that is {from}: {reason}")]
pub struct InvalidTransition {
    pub from: Status,
    pub event: Event,
    pub reason: TransitionBlock,
}

/// Compute the status an event leads to, or why it is refused.
///
/// - `Conduct` starts a scheduled interview and resumes one in progress.
/// - `Cancel` is allowed until the interview has been completed.
/// - `MarkDone` only completes an interview in progress.
/// - `Accept`/`Reject` need a completed interview with `is_done` set.
/// - Terminal states refuse everything.
pub fn next_status(from: Status, is_done: bool, event: Event) -> Result<Status, InvalidTransition> {
    let refuse = |reason| InvalidTransition {
        from,
        event,
        reason,
    };

    if from.is_terminal() {
        return Err(refuse(TransitionBlock::Terminal));
    }

    match (from, event) {
        (Status::Scheduled | Status::InProgress, Event::Conduct) => Ok(Status::InProgress),
        (Status::Scheduled | Status::InProgress, Event::Cancel) => Ok(Status::Cancelled),
        (Status::InProgress, Event::MarkDone) => Ok(Status::Completed),
        (Status::Completed, Event::Accept) if is_done => Ok(Status::Accepted),
        (Status::Completed, Event::Reject) if is_done => Ok(Status::Rejected),
        (Status::Completed, Event::Accept | Event::Reject) => {
            Err(refuse(TransitionBlock::AwaitingCompletion))
        }
        (Status::Scheduled | Status::InProgress, Event::Accept | Event::Reject) => {
            Err(refuse(TransitionBlock::AwaitingCompletion))
        }
        _ => Err(refuse(TransitionBlock::NotPermitted)),
    }
}
