use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use interview_scheduler::application::Application;
use interview_scheduler::appointment::Mode;
use interview_scheduler::config::{BookArgs, CancelArgs, Cli, ClientArgs, Command, EditArgs, ExportArgs, ServeArgs};
use interview_scheduler::display::{print_week, write_schedule_to_file};
use interview_scheduler::parser::{apply_bookings, load_bookings};
use interview_scheduler::remote::{HttpSchedulerApi, ScheduleStore};
use interview_scheduler::schedule::{fixture, AppointmentId, InterviewerId, ScheduleCoordinator};
use interview_scheduler::web;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Show(args) => show(args).await,
        Command::Book(args) => book(args).await,
        Command::Edit(args) => edit(args).await,
        Command::Cancel(args) => cancel(args).await,
        Command::Export(args) => export(args).await,
        Command::Reset(args) => reset(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let seed = match &args.seed {
        Some(path) => {
            let rows = load_bookings(path).with_context(|| format!("loading seed bookings from {}", path.display()))?;
            info!(bookings = rows.len(), path = %path.display(), "seeding from CSV");
            apply_bookings(&fixture::empty_week(), &rows).context("applying seed bookings")?
        }
        None => fixture::week(),
    };

    let store = Arc::new(ScheduleStore::new(seed));
    web::start_server(&args.bind, args.port, args.workers, store)
        .await
        .with_context(|| format!("serving on {}:{}", args.bind, args.port))
}

fn client(args: &ClientArgs) -> Result<HttpSchedulerApi> {
    HttpSchedulerApi::new(args.api_url.clone(), args.timeout()).context("building HTTP client")
}

async fn open(args: &ClientArgs) -> Result<Application> {
    let api = client(args)?;
    Application::start(Arc::new(api))
        .await
        .with_context(|| format!("loading the week from {}", args.api_url))
}

async fn show(args: ClientArgs) -> Result<()> {
    let api = client(&args)?;
    let coordinator = ScheduleCoordinator::load(Arc::new(api))
        .await
        .with_context(|| format!("loading the week from {}", args.api_url))?;
    print_week(&coordinator.snapshot());
    Ok(())
}

/// Mounts the appointment's day and returns the day's interviewer matching `name`
fn prepare(app: &mut Application, appointment: AppointmentId, interviewer: Option<&str>) -> Result<Option<InterviewerId>> {
    let snapshot = app.coordinator().snapshot();
    let day = snapshot
        .day_of(appointment)
        .with_context(|| format!("appointment {} is not on any day", appointment))?;
    app.select_day(&day.name)?;

    let Some(name) = interviewer else {
        return Ok(None);
    };
    let interviewer = snapshot
        .interviewer_by_name(name)
        .with_context(|| format!("no interviewer named `{}`", name))?;
    Ok(Some(interviewer.id))
}

/// Prints the in-flight view, waits for the call and prints the outcome
async fn finish(app: &mut Application, appointment: AppointmentId) -> Result<()> {
    println!("{}", app.view(appointment)?);
    app.settle().await;

    let view = app.view(appointment)?;
    println!("{}", view);
    if let Some(day) = app.day_item(app.selected_day()) {
        println!("{}: {}", day.name, day.spots_text());
    }
    match view.mode {
        Mode::ErrorSave | Mode::ErrorDelete => bail!("appointment {} was not changed", appointment),
        _ => Ok(()),
    }
}

async fn book(args: BookArgs) -> Result<()> {
    let mut app = open(&args.client).await?;
    let interviewer = prepare(&mut app, args.appointment, Some(&args.interviewer))?;

    app.add(args.appointment)?;
    app.set_student(args.appointment, &args.student)?;
    if let Some(interviewer) = interviewer {
        app.select_interviewer(args.appointment, interviewer)?;
    }
    app.save(args.appointment)?;
    finish(&mut app, args.appointment).await
}

async fn edit(args: EditArgs) -> Result<()> {
    let mut app = open(&args.client).await?;
    let interviewer = prepare(&mut app, args.appointment, args.interviewer.as_deref())?;

    app.edit(args.appointment)?;
    if let Some(student) = &args.student {
        app.set_student(args.appointment, student)?;
    }
    if let Some(interviewer) = interviewer {
        app.select_interviewer(args.appointment, interviewer)?;
    }
    app.save(args.appointment)?;
    finish(&mut app, args.appointment).await
}

async fn cancel(args: CancelArgs) -> Result<()> {
    let mut app = open(&args.client).await?;
    prepare(&mut app, args.appointment, None)?;

    app.delete(args.appointment)?;
    println!("{}", app.view(args.appointment)?);
    app.confirm(args.appointment)?;
    finish(&mut app, args.appointment).await
}

async fn export(args: ExportArgs) -> Result<()> {
    let api = client(&args.client)?;
    let coordinator = ScheduleCoordinator::load(Arc::new(api))
        .await
        .with_context(|| format!("loading the week from {}", args.client.api_url))?;
    let written = write_schedule_to_file(&coordinator.snapshot(), &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Wrote {} bookings to {}", written, args.output.display());
    Ok(())
}

async fn reset(args: ClientArgs) -> Result<()> {
    client(&args)?.reset().await.context("resetting the server's store")?;
    println!("Schedule reset to its seed");
    Ok(())
}
