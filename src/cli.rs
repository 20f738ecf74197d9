//! Command-line interface built on clap.
//!
//! [`Cli`] carries the global `--config` and `--verbose` flags; [`Command`]
//! has one subcommand per workflow operation.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::workflow::{FeedbackInput, NotificationKind};

/// interview-desk: run campus interviews from scheduling to final decision.
#[derive(Debug, Parser)]
#[command(name = "interview-desk", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the configuration file (defaults to ./interview-desk.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DraftKindArg {
    Cancel,
    Accept,
    Reject,
}

impl From<DraftKindArg> for NotificationKind {
    fn from(arg: DraftKindArg) -> Self {
        match arg {
            DraftKindArg::Cancel => NotificationKind::Cancellation,
            DraftKindArg::Accept => NotificationKind::Acceptance,
            DraftKindArg::Reject => NotificationKind::Rejection,
        }
    }
}

/// Optional overrides for the pre-filled notification.
#[derive(Debug, Clone, Args)]
pub struct DraftArgs {
    /// E-mail subject; defaults to the template subject.
    #[arg(long)]
    pub title: Option<String>,

    /// E-mail body; defaults to the template body.
    #[arg(long)]
    pub body: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List interviews matching a filter.
    List {
        /// Status to show, or "all".
        #[arg(long, default_value = "all")]
        status: String,

        /// all, today, upcoming or past.
        #[arg(long, default_value = "all")]
        date: String,

        /// Field the query searches: candidate, interviewer, position or status.
        #[arg(long, default_value = "candidate")]
        field: String,

        /// Case-insensitive substring to search for.
        #[arg(long, short, default_value = "")]
        query: String,

        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Use the long page size.
        #[arg(long, default_value_t = false)]
        long: bool,
    },

    /// Show one interview in detail.
    Show {
        id: String,

        /// Re-read the record from the store first.
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },

    /// Schedule a new interview and provision its meeting.
    Schedule {
        #[arg(long)]
        candidate: String,

        #[arg(long)]
        role: String,

        /// Candidate e-mail address.
        #[arg(long)]
        contact: String,

        /// Start time, RFC 3339 (e.g. 2026-11-02T09:30:00Z).
        #[arg(long)]
        at: DateTime<Utc>,

        #[arg(long)]
        interviewer: Option<String>,

        /// Minutes; defaults to the configured duration.
        #[arg(long)]
        duration: Option<u32>,
    },

    /// Start or resume an interview and print its meeting link.
    Conduct { id: String },

    /// Mark an interview done with scored feedback.
    Done {
        id: String,

        #[arg(long)]
        technical: Option<f64>,

        #[arg(long)]
        communication: Option<f64>,

        #[arg(long)]
        problem_solving: Option<f64>,

        #[arg(long)]
        overall: Option<f64>,

        #[arg(long, default_value = "")]
        comments: String,
    },

    /// Print the pre-filled notification for an interview.
    Draft { id: String, kind: DraftKindArg },

    /// Cancel an interview and notify the candidate.
    Cancel {
        id: String,
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Accept the candidate and notify them.
    Accept {
        id: String,
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Reject the candidate and notify them.
    Reject {
        id: String,
        #[command(flatten)]
        draft: DraftArgs,
    },
}

impl Command {
    /// Feedback carried by a `done` command.
    pub fn feedback(&self) -> Option<FeedbackInput> {
        match self {
            Command::Done {
                technical,
                communication,
                problem_solving,
                overall,
                comments,
                ..
            } => Some(FeedbackInput {
                technical: *technical,
                communication: *communication,
                problem_solving: *problem_solving,
                overall: *overall,
                comments: comments.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_list_filters() {
        let cli = Cli::parse_from([
            "interview-desk",
            "list",
            "--status",
            "scheduled",
            "--date",
            "upcoming",
            "-q",
            "an",
            "--long",
        ]);
        match cli.command {
            Command::List {
                status,
                date,
                field,
                query,
                page,
                long,
            } => {
                assert_eq!(status, "scheduled");
                assert_eq!(date, "upcoming");
                assert_eq!(field, "candidate");
                assert_eq!(query, "an");
                assert_eq!(page, 1);
                assert!(long);
            }
            _ => panic!("expected List command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "interview-desk",
            "--config",
            "desk.toml",
            "--verbose",
            "show",
            "iv-1",
            "--refresh",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("desk.toml")));
        assert!(matches!(cli.command, Command::Show { ref id, refresh: true } if id == "iv-1"));
    }

    #[test]
    fn cli_parses_done_feedback() {
        let cli = Cli::parse_from([
            "interview-desk",
            "done",
            "iv-1",
            "--technical",
            "8",
            "--communication",
            "7",
            "--problem-solving",
            "9",
            "--overall",
            "8",
            "--comments",
            "Strong candidate",
        ]);
        let feedback = cli.command.feedback().unwrap();
        assert_eq!(feedback, FeedbackInput::scored(8.0, 7.0, 9.0, 8.0, "Strong candidate"));
    }

    #[test]
    fn cli_parses_cancel_with_body_override() {
        let cli = Cli::parse_from([
            "interview-desk",
            "cancel",
            "iv-1",
            "--body",
            "Position on hold.",
        ]);
        match cli.command {
            Command::Cancel { id, draft } => {
                assert_eq!(id, "iv-1");
                assert_eq!(draft.body.as_deref(), Some("Position on hold."));
                assert!(draft.title.is_none());
            }
            _ => panic!("expected Cancel command"),
        }
    }

    #[test]
    fn cli_parses_schedule_time() {
        let cli = Cli::parse_from([
            "interview-desk",
            "schedule",
            "--candidate",
            "Anita Rao",
            "--role",
            "Backend Engineer",
            "--contact",
            "anita@example.com",
            "--at",
            "2026-11-02T09:30:00Z",
        ]);
        match cli.command {
            Command::Schedule { at, duration, .. } => {
                assert_eq!(at.to_rfc3339(), "2026-11-02T09:30:00+00:00");
                assert!(duration.is_none());
            }
            _ => panic!("expected Schedule command"),
        }
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
