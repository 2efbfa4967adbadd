use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{RemoteError, ScheduleError};
use crate::schedule::{fixture, Appointment, AppointmentId, Day, Interview, Interviewer, InterviewerId, ScheduleSnapshot};
use super::wire::DaySummary;
use super::SchedulerApi;

/// A mutating call that can be made to fail on purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Save,
    Delete,
}

struct StoreState {
    schedule: ScheduleSnapshot,
    armed_failures: Vec<Operation>,
}

/// In-memory backing store for the week (in production, use a database).
///
/// Holds the seed it was created from so `reset` can restore it.
pub struct ScheduleStore {
    seed: ScheduleSnapshot,
    state: Mutex<StoreState>,
}

impl ScheduleStore {
    pub fn new(seed: ScheduleSnapshot) -> Self {
        Self {
            state: Mutex::new(StoreState {
                schedule: seed.clone(),
                armed_failures: Vec::new(),
            }),
            seed,
        }
    }

    /// Store seeded with the default week
    pub fn with_fixture() -> Self {
        Self::new(fixture::week())
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // every write replaces the snapshot whole, so a poisoned lock still holds a consistent week
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-seeds the store and disarms any pending failures
    pub fn reset(&self) {
        let mut state = self.lock();
        state.schedule = self.seed.clone();
        state.armed_failures.clear();
        info!("schedule store reset to seed");
    }

    /// Makes the next call of `operation` fail once
    pub fn fail_next(&self, operation: Operation) {
        debug!(?operation, "arming one-shot failure");
        self.lock().armed_failures.push(operation);
    }

    pub fn schedule(&self) -> ScheduleSnapshot {
        self.lock().schedule.clone()
    }

    pub fn day_summaries(&self) -> Vec<DaySummary> {
        let state = self.lock();
        state
            .schedule
            .days()
            .iter()
            .map(|day| DaySummary {
                day: day.clone(),
                spots: state.schedule.spots_remaining(day),
            })
            .collect()
    }

    pub fn put_interview(&self, appointment_id: AppointmentId, interview: Interview) -> Result<(), RemoteError> {
        if interview.student.trim().is_empty() {
            return Err(RemoteError::InvalidInterview("student name is blank".to_string()));
        }

        let mut state = self.lock();
        if take_armed(&mut state.armed_failures, Operation::Save) {
            warn!(appointment_id, "rejecting save (armed failure)");
            return Err(RemoteError::Rejected("book failed".to_string()));
        }

        state.schedule = state
            .schedule
            .with_interview(appointment_id, interview)
            .map_err(into_remote)?;
        debug!(appointment_id, "interview stored");
        Ok(())
    }

    pub fn remove_interview(&self, appointment_id: AppointmentId) -> Result<(), RemoteError> {
        let mut state = self.lock();
        if take_armed(&mut state.armed_failures, Operation::Delete) {
            warn!(appointment_id, "rejecting delete (armed failure)");
            return Err(RemoteError::Rejected("cancel failed".to_string()));
        }

        state.schedule = state
            .schedule
            .without_interview(appointment_id)
            .map_err(into_remote)?;
        debug!(appointment_id, "interview removed");
        Ok(())
    }
}

fn take_armed(armed: &mut Vec<Operation>, operation: Operation) -> bool {
    match armed.iter().position(|candidate| *candidate == operation) {
        Some(index) => {
            armed.remove(index);
            true
        }
        None => false,
    }
}

fn into_remote(error: ScheduleError) -> RemoteError {
    match error {
        ScheduleError::UnknownAppointment(id) => RemoteError::UnknownAppointment(id),
        ScheduleError::UnknownInterviewer(id) => RemoteError::UnknownInterviewer(id),
        ScheduleError::Remote(remote) => remote,
        other => RemoteError::Rejected(other.to_string()),
    }
}

#[async_trait]
impl SchedulerApi for ScheduleStore {
    async fn read_days(&self) -> Result<Vec<Day>, RemoteError> {
        Ok(self.lock().schedule.days().to_vec())
    }

    async fn read_appointments(&self) -> Result<BTreeMap<AppointmentId, Appointment>, RemoteError> {
        Ok(self.lock().schedule.appointments().clone())
    }

    async fn read_interviewers(&self) -> Result<BTreeMap<InterviewerId, Interviewer>, RemoteError> {
        Ok(self.lock().schedule.interviewers().clone())
    }

    async fn save_interview(&self, appointment_id: AppointmentId, interview: &Interview) -> Result<(), RemoteError> {
        self.put_interview(appointment_id, interview.clone())
    }

    async fn delete_interview(&self, appointment_id: AppointmentId) -> Result<(), RemoteError> {
        self.remove_interview(appointment_id)
    }
}
