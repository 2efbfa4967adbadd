use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use interview_scheduler::application::Application;
use interview_scheduler::appointment::Mode;
use interview_scheduler::error::{RemoteError, ScheduleError};
use interview_scheduler::remote::{HttpSchedulerApi, Operation, ScheduleStore, SchedulerApi};
use interview_scheduler::schedule::fixture::{self, SYLVIA_PALMER};
use interview_scheduler::schedule::{Interview, ScheduleCoordinator};
use interview_scheduler::web;

async fn spawn_server() -> (Arc<ScheduleStore>, HttpSchedulerApi, ServerHandle) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let store = Arc::new(ScheduleStore::with_fixture());
    let (server, addrs) = web::bind_server("127.0.0.1", 0, Some(1), store.clone()).unwrap();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let api = HttpSchedulerApi::new(format!("http://{}", addrs[0]), Duration::from_secs(5)).unwrap();
    (store, api, handle)
}

#[actix_web::test]
async fn loads_the_seeded_week_over_http() {
    let (_, api, handle) = spawn_server().await;

    let coordinator = ScheduleCoordinator::load(Arc::new(api)).await.unwrap();
    assert_eq!(*coordinator.snapshot(), fixture::week());

    handle.stop(true).await;
}

#[actix_web::test]
async fn books_and_cancels_through_the_server() {
    let (store, api, handle) = spawn_server().await;
    let mut app = Application::start(Arc::new(api)).await.unwrap();

    app.add(1).unwrap();
    app.set_student(1, "Lydia Miller-Jones").unwrap();
    app.select_interviewer(1, SYLVIA_PALMER).unwrap();
    app.save(1).unwrap();
    app.settle().await;

    assert_eq!(app.view(1).unwrap().mode, Mode::Show);
    assert_eq!(app.day_item("Monday").unwrap().spots_text(), "1 spot remaining");
    assert_eq!(
        store.schedule().interview_details(1).map(|details| details.student.to_string()),
        Some("Lydia Miller-Jones".to_string())
    );

    app.delete(1).unwrap();
    app.confirm(1).unwrap();
    app.settle().await;
    assert_eq!(app.view(1).unwrap().mode, Mode::Empty);
    assert!(!store.schedule().appointment(1).unwrap().is_booked());

    handle.stop(true).await;
}

#[actix_web::test]
async fn armed_failure_surfaces_as_an_error_view() {
    let (store, api, handle) = spawn_server().await;
    api.fail_next(Operation::Save).await.unwrap();
    let mut app = Application::start(Arc::new(api)).await.unwrap();

    app.add(4).unwrap();
    app.set_student(4, "Lydia Miller-Jones").unwrap();
    app.select_interviewer(4, SYLVIA_PALMER).unwrap();
    app.save(4).unwrap();
    app.settle().await;

    let error = app.view(4).unwrap();
    assert_eq!(error.mode, Mode::ErrorSave);
    assert!(error.contains_text("Could not book appointment."));
    app.close(4).unwrap();
    assert_eq!(app.view(4).unwrap().mode, Mode::Create);
    assert_eq!(store.schedule(), fixture::week());

    handle.stop(true).await;
}

#[actix_web::test]
async fn record_errors_and_reset() {
    let (store, api, handle) = spawn_server().await;

    let unknown = api
        .save_interview(99, &Interview { student: "Lydia".to_string(), interviewer: 1 })
        .await;
    assert_eq!(unknown, Err(RemoteError::UnknownAppointment(99)));
    assert!(matches!(api.delete_interview(99).await, Err(RemoteError::UnknownAppointment(99))));

    api.delete_interview(2).await.unwrap();
    assert!(!store.schedule().appointment(2).unwrap().is_booked());

    api.reset().await.unwrap();
    assert_eq!(store.schedule(), fixture::week());

    let coordinator = ScheduleCoordinator::with_snapshot(Arc::new(api), fixture::week());
    assert_eq!(
        coordinator
            .book_interview(1, Interview { student: "Lydia".to_string(), interviewer: 42 })
            .await,
        Err(ScheduleError::UnknownInterviewer(42))
    );

    handle.stop(true).await;
}
