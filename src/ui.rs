//! Terminal output: spinner while a collaborator call is outstanding,
//! coloured outcomes and the interview table.
//!
//! Uses `indicatif` for the spinner and `console` for styling.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{Severity, WorkflowError};
use crate::workflow::{Interview, NotificationDraft, Status, TransitionOutcome};

/// Spinner shown while a transition waits on its collaborators.
pub struct TransitionProgress {
    pb: ProgressBar,
    green: Style,
}

impl TransitionProgress {
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
        }
    }

    /// Clear the spinner and print the committed transition.
    pub fn complete(&self, outcome: &TransitionOutcome) {
        self.pb.finish_and_clear();
        println!(
            "  {} {} → {} ({})",
            self.green.apply_to("✓"),
            outcome.from,
            outcome.to,
            outcome.interview.candidate_name()
        );
        if let Some(url) = &outcome.join_url {
            println!("  Join: {url}");
        }
        if let Some(ack) = &outcome.notification {
            match &ack.message_id {
                Some(id) => println!("  E-mail sent (message {id})"),
                None => println!("  E-mail sent"),
            }
        }
    }

    pub fn abandon(&self) {
        self.pb.finish_and_clear();
    }
}

fn status_style(status: Status) -> Style {
    match status {
        Status::Scheduled => Style::new().cyan(),
        Status::InProgress => Style::new().yellow(),
        Status::Completed => Style::new().blue(),
        Status::Accepted => Style::new().green().bold(),
        Status::Rejected => Style::new().red(),
        Status::Cancelled => Style::new().dim(),
    }
}

/// Page size toggle for the interview list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub size: usize,
}

/// Slice out one page. Out-of-range pages are empty.
pub fn paginate<T>(items: &[T], page: Page) -> &[T] {
    if page.size == 0 || page.number == 0 {
        return &[];
    }
    let start = (page.number - 1).saturating_mul(page.size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page.size).min(items.len());
    &items[start..end]
}

pub fn page_count(total: usize, size: usize) -> usize {
    if size == 0 { 0 } else { total.div_ceil(size) }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

pub fn print_table(interviews: &[Interview], page: Page, total: usize) {
    let header = Style::new().bold();
    println!(
        "{}",
        header.apply_to(format!(
            "{:<12} {:<22} {:<22} {:<18} {:<17} {:<12} {:<4}",
            "ID", "CANDIDATE", "ROLE", "INTERVIEWER", "SCHEDULED (UTC)", "STATUS", "DONE"
        ))
    );
    for iv in interviews {
        println!(
            "{:<12} {:<22} {:<22} {:<18} {:<17} {} {:<4}",
            truncate(iv.id().as_str(), 12),
            truncate(iv.candidate_name(), 22),
            truncate(iv.role(), 22),
            truncate(iv.interviewer_name().unwrap_or("-"), 18),
            iv.scheduled_at().format("%Y-%m-%d %H:%M"),
            status_style(iv.status()).apply_to(format!("{:<12}", iv.status().label())),
            if iv.is_done() { "yes" } else { "" }
        );
    }
    println!(
        "page {}/{} · {} interview(s)",
        page.number,
        page_count(total, page.size).max(1),
        total
    );
}

pub fn print_interview(iv: &Interview) {
    let label = Style::new().bold();
    println!("{} {}", label.apply_to("Interview"), iv.id());
    println!("  Candidate:   {} <{}>", iv.candidate_name(), iv.candidate_contact());
    println!("  Role:        {}", iv.role());
    println!("  Interviewer: {}", iv.interviewer_name().unwrap_or("-"));
    println!(
        "  Scheduled:   {} ({} min)",
        iv.scheduled_at().format("%Y-%m-%d %H:%M UTC"),
        iv.duration_minutes()
    );
    println!(
        "  Status:      {}{}",
        status_style(iv.status()).apply_to(iv.status().label()),
        if iv.is_done() { " (done)" } else { "" }
    );
    if let Some(meeting) = iv.meeting() {
        println!("  Meeting:     {} (id {})", meeting.join_url, meeting.meeting_id);
    }
    if let Some(fb) = iv.feedback() {
        println!(
            "  Feedback:    technical {} · communication {} · problem solving {} · overall {}",
            fb.technical_score(),
            fb.communication_score(),
            fb.problem_solving_score(),
            fb.overall_score()
        );
        println!("               \"{}\"", fb.comments());
    }
}

pub fn print_draft(draft: &NotificationDraft, recipient: &str) {
    let label = Style::new().bold();
    println!("{} {}", label.apply_to("To:"), recipient);
    println!("{} {}", label.apply_to("Subject:"), draft.title);
    println!();
    println!("{}", draft.body);
}

/// Print a workflow error, styled by how the operator should react.
pub fn print_error(err: &WorkflowError) {
    let (style, mark) = match err.severity() {
        Severity::Recoverable => (Style::new().yellow(), "!"),
        Severity::Retryable => (Style::new().red(), "✗"),
        Severity::Reconcile => (Style::new().red().bold().reverse(), "‼"),
    };
    eprintln!("  {} {}", style.apply_to(mark), err);
    if let WorkflowError::Validation(v) = err {
        for field in v.fields() {
            eprintln!("      - {field}");
        }
    }
    if err.severity() == Severity::Reconcile {
        eprintln!(
            "    {}",
            style.apply_to("The candidate was notified but the record was not updated. Check the record before retrying.")
        );
    }
}
