//! The remote scheduling capability and its two implementations: the
//! in-process [`ScheduleStore`] (also the backing store of the web server)
//! and [`HttpSchedulerApi`], which talks to that server over HTTP.

pub mod http;
pub mod store;
pub mod wire;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::schedule::{Appointment, AppointmentId, Day, Interview, Interviewer, InterviewerId};

pub use http::HttpSchedulerApi;
pub use store::{Operation, ScheduleStore};

#[async_trait]
pub trait SchedulerApi: Send + Sync {
    async fn read_days(&self) -> Result<Vec<Day>, RemoteError>;

    async fn read_appointments(&self) -> Result<BTreeMap<AppointmentId, Appointment>, RemoteError>;

    async fn read_interviewers(&self) -> Result<BTreeMap<InterviewerId, Interviewer>, RemoteError>;

    /// Books or replaces the interview on an appointment
    async fn save_interview(&self, appointment_id: AppointmentId, interview: &Interview) -> Result<(), RemoteError>;

    async fn delete_interview(&self, appointment_id: AppointmentId) -> Result<(), RemoteError>;
}

#[async_trait]
impl<T: SchedulerApi + ?Sized> SchedulerApi for Arc<T> {
    async fn read_days(&self) -> Result<Vec<Day>, RemoteError> {
        (**self).read_days().await
    }

    async fn read_appointments(&self) -> Result<BTreeMap<AppointmentId, Appointment>, RemoteError> {
        (**self).read_appointments().await
    }

    async fn read_interviewers(&self) -> Result<BTreeMap<InterviewerId, Interviewer>, RemoteError> {
        (**self).read_interviewers().await
    }

    async fn save_interview(&self, appointment_id: AppointmentId, interview: &Interview) -> Result<(), RemoteError> {
        (**self).save_interview(appointment_id, interview).await
    }

    async fn delete_interview(&self, appointment_id: AppointmentId) -> Result<(), RemoteError> {
        (**self).delete_interview(appointment_id).await
    }
}
