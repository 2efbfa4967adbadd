use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use tracing::info;

use crate::error::RemoteError;
use crate::remote::wire::{ErrorBody, InterviewPayload};
use crate::remote::{Operation, ScheduleStore};
use crate::schedule::AppointmentId;

/// Shared state for every worker
pub struct AppState {
    pub store: Arc<ScheduleStore>,
}

fn error_response(error: &RemoteError) -> HttpResponse {
    let body = ErrorBody {
        error: error.to_string(),
    };
    match error {
        RemoteError::UnknownAppointment(_) => HttpResponse::NotFound().json(body),
        RemoteError::UnknownInterviewer(_) | RemoteError::InvalidInterview(_) => {
            HttpResponse::BadRequest().json(body)
        }
        _ => HttpResponse::InternalServerError().json(body),
    }
}

async fn get_days(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.day_summaries())
}

async fn get_appointments(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.schedule().appointments())
}

async fn get_interviewers(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.schedule().interviewers())
}

async fn put_interview(
    path: web::Path<AppointmentId>,
    payload: web::Json<InterviewPayload>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let appointment_id = path.into_inner();
    match state.store.put_interview(appointment_id, payload.into_inner().interview) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => error_response(&error),
    }
}

async fn delete_interview(path: web::Path<AppointmentId>, state: web::Data<AppState>) -> HttpResponse {
    match state.store.remove_interview(path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => error_response(&error),
    }
}

async fn debug_reset(state: web::Data<AppState>) -> HttpResponse {
    state.store.reset();
    HttpResponse::Ok().finish()
}

async fn debug_fail_next(path: web::Path<Operation>, state: web::Data<AppState>) -> HttpResponse {
    state.store.fail_next(path.into_inner());
    HttpResponse::Ok().finish()
}

/// Registers the scheduler API routes
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/days", web::get().to(get_days))
        .route("/api/appointments", web::get().to(get_appointments))
        .route("/api/interviewers", web::get().to(get_interviewers))
        .service(
            web::resource("/api/appointments/{id}")
                .route(web::put().to(put_interview))
                .route(web::delete().to(delete_interview)),
        )
        .route("/api/debug/reset", web::get().to(debug_reset))
        .route("/api/debug/fail-next/{operation}", web::get().to(debug_fail_next));
}

/// Binds the API without running it. Port 0 picks a free port; the bound
/// addresses are returned alongside the server.
pub fn bind_server(
    bind: &str,
    port: u16,
    workers: Option<usize>,
    store: Arc<ScheduleStore>,
) -> std::io::Result<(Server, Vec<SocketAddr>)> {
    let app_state = web::Data::new(AppState { store });

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    });
    if let Some(workers) = workers {
        server = server.workers(workers);
    }
    let server = server.bind((bind, port))?;
    let addrs = server.addrs();
    Ok((server.run(), addrs))
}

pub async fn start_server(
    bind: &str,
    port: u16,
    workers: Option<usize>,
    store: Arc<ScheduleStore>,
) -> std::io::Result<()> {
    let (server, addrs) = bind_server(bind, port, workers, store)?;
    for addr in &addrs {
        info!(%addr, "scheduler API listening");
    }
    server.await
}
