mod cache;
mod engine;
mod feedback;
mod filter;
mod interview;
mod notification;
mod status;

pub use cache::InterviewCache;
pub use engine::{TransitionOutcome, TransitionRequest, WorkflowEngine};
pub use feedback::{FeedbackInput, FeedbackRecord, Score, capture_feedback, capture_feedback_at};
pub use filter::{DateFilter, FilterSpec, SearchField, StatusFilter, filter};
pub use interview::{Interview, InterviewId, MeetingDetails, NewInterview};
pub use notification::{NotificationCoordinator, NotificationDraft, NotificationKind, recipient_for};
pub use status::{Event, InvalidTransition, Status, TransitionBlock, UnknownStatus, next_status};
