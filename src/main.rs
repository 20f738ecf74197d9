use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use interview_desk::cli::{Cli, Command, DraftArgs};
use interview_desk::config::DeskConfig;
use interview_desk::ui::{self, Page, TransitionProgress};
use interview_desk::workflow::{
    FilterSpec, InterviewId, NewInterview, NotificationDraft, NotificationKind,
    TransitionRequest, recipient_for,
};
use interview_desk::{HttpWorkflowEngine, WorkflowError};

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "interview_desk=debug"
    } else {
        "interview_desk=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<WorkflowError>() {
                Some(workflow) => ui::print_error(workflow),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => DeskConfig::load_from(path, true)?,
        None => DeskConfig::load()?,
    };
    let engine = config.engine()?;
    engine.sync().await?;

    let feedback = cli.command.feedback();
    match cli.command {
        Command::List {
            status,
            date,
            field,
            query,
            page,
            long,
        } => {
            let spec = FilterSpec::parse(&status, &date, &field, &query)
                .map_err(WorkflowError::from)?;
            let view = engine.filtered_view(&spec).await;
            let page = Page {
                number: page,
                size: config.page_size(long),
            };
            ui::print_table(ui::paginate(&view, page), page, view.len());
        }
        Command::Show { id, refresh } => {
            let id = InterviewId::from(id);
            let interview = if refresh {
                engine.refresh(&id).await?
            } else {
                engine
                    .get_interview(&id)
                    .await
                    .ok_or(WorkflowError::NotFound(id))?
            };
            ui::print_interview(&interview);
        }
        Command::Schedule {
            candidate,
            role,
            contact,
            at,
            interviewer,
            duration,
        } => {
            let request = NewInterview {
                candidate_name: candidate,
                role,
                interviewer_name: interviewer,
                scheduled_at: at,
                duration_minutes: duration.unwrap_or(config.meeting_duration_minutes),
                candidate_contact: contact,
            };
            let progress = TransitionProgress::start("Provisioning meeting…");
            let result = engine.schedule(request).await;
            progress.abandon();
            let interview = result?;
            println!("Scheduled interview {}", interview.id());
            ui::print_interview(&interview);
        }
        Command::Draft { id, kind } => {
            let id = InterviewId::from(id);
            let draft = engine.draft(&id, kind.into()).await?;
            let interview = engine
                .get_interview(&id)
                .await
                .ok_or(WorkflowError::NotFound(id))?;
            let recipient = recipient_for(&interview).map_err(WorkflowError::from)?;
            ui::print_draft(&draft, &recipient);
        }
        Command::Done { id, .. } => {
            let request = TransitionRequest::MarkDone(feedback.unwrap_or_default());
            transition(&engine, &id, request, "Saving feedback…").await?;
        }
        Command::Conduct { id } => {
            transition(&engine, &id, TransitionRequest::Conduct, "Starting interview…").await?;
        }
        Command::Cancel { id, draft } => {
            let draft = edited_draft(&engine, &id, NotificationKind::Cancellation, draft).await?;
            transition(&engine, &id, TransitionRequest::Cancel(draft), "Sending cancellation…")
                .await?;
        }
        Command::Accept { id, draft } => {
            let draft = edited_draft(&engine, &id, NotificationKind::Acceptance, draft).await?;
            transition(&engine, &id, TransitionRequest::Accept(draft), "Sending acceptance…")
                .await?;
        }
        Command::Reject { id, draft } => {
            let draft = edited_draft(&engine, &id, NotificationKind::Rejection, draft).await?;
            transition(&engine, &id, TransitionRequest::Reject(draft), "Sending rejection…")
                .await?;
        }
    }

    Ok(())
}

/// Template draft with the operator's overrides applied.
async fn edited_draft(
    engine: &HttpWorkflowEngine,
    id: &str,
    kind: NotificationKind,
    overrides: DraftArgs,
) -> Result<NotificationDraft> {
    let template = engine.draft(&InterviewId::from(id), kind).await?;
    Ok(NotificationDraft {
        title: overrides.title.unwrap_or(template.title),
        body: overrides.body.unwrap_or(template.body),
    })
}

async fn transition(
    engine: &HttpWorkflowEngine,
    id: &str,
    request: TransitionRequest,
    message: &str,
) -> Result<()> {
    let progress = TransitionProgress::start(message);
    match engine
        .request_transition(&InterviewId::from(id), request)
        .await
    {
        Ok(outcome) => {
            progress.complete(&outcome);
            Ok(())
        }
        Err(e) => {
            progress.abandon();
            Err(e.into())
        }
    }
}
