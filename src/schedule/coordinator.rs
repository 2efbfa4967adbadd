use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::ScheduleError;
use crate::remote::SchedulerApi;
use super::snapshot::ScheduleSnapshot;
use super::types::{AppointmentId, Interview};

/// Single source of truth for the week.
///
/// Holds the current [`ScheduleSnapshot`] in a watch channel. A successful
/// mutation swaps in a whole new snapshot and wakes every subscriber; a failed
/// one leaves the channel untouched.
pub struct ScheduleCoordinator {
    api: Arc<dyn SchedulerApi>,
    snapshot: watch::Sender<Arc<ScheduleSnapshot>>,
}

impl ScheduleCoordinator {
    /// Fetches days, appointments and interviewers concurrently and merges them
    pub async fn load(api: Arc<dyn SchedulerApi>) -> Result<Self, ScheduleError> {
        let (days, appointments, interviewers) = tokio::try_join!(
            api.read_days(),
            api.read_appointments(),
            api.read_interviewers(),
        )?;
        let snapshot = ScheduleSnapshot::new(days, appointments, interviewers)?;
        info!(
            days = snapshot.days().len(),
            appointments = snapshot.appointments().len(),
            interviewers = snapshot.interviewers().len(),
            "schedule loaded"
        );
        Ok(Self::with_snapshot(api, snapshot))
    }

    pub fn with_snapshot(api: Arc<dyn SchedulerApi>, snapshot: ScheduleSnapshot) -> Self {
        let (sender, _) = watch::channel(Arc::new(snapshot));
        Self {
            api,
            snapshot: sender,
        }
    }

    /// The latest snapshot. Cheap: clones the `Arc`, not the week.
    pub fn snapshot(&self) -> Arc<ScheduleSnapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ScheduleSnapshot>> {
        self.snapshot.subscribe()
    }

    /// Saves the interview remotely, then attaches it to the appointment
    pub async fn book_interview(&self, appointment_id: AppointmentId, interview: Interview) -> Result<(), ScheduleError> {
        self.snapshot().check_booking(appointment_id, &interview)?;

        if let Err(error) = self.api.save_interview(appointment_id, &interview).await {
            warn!(appointment_id, %error, "save rejected");
            return Err(error.into());
        }

        let student = interview.student.clone();
        self.commit(|current| current.with_interview(appointment_id, interview))?;
        info!(appointment_id, %student, "interview booked");
        Ok(())
    }

    /// Deletes the interview remotely, then detaches it from the appointment
    pub async fn cancel_interview(&self, appointment_id: AppointmentId) -> Result<(), ScheduleError> {
        let current = self.snapshot();
        match current.appointment(appointment_id) {
            None => return Err(ScheduleError::UnknownAppointment(appointment_id)),
            Some(appointment) if !appointment.is_booked() => {
                return Err(ScheduleError::NotBooked(appointment_id))
            }
            Some(_) => {}
        }

        if let Err(error) = self.api.delete_interview(appointment_id).await {
            warn!(appointment_id, %error, "delete rejected");
            return Err(error.into());
        }

        self.commit(|current| current.without_interview(appointment_id))?;
        info!(appointment_id, "interview cancelled");
        Ok(())
    }

    /// Applies `update` to the latest snapshot under the channel's write lock,
    /// so concurrent commits from different slots never overwrite each other.
    fn commit<F>(&self, update: F) -> Result<(), ScheduleError>
    where
        F: FnOnce(&ScheduleSnapshot) -> Result<ScheduleSnapshot, ScheduleError>,
    {
        let mut outcome = Ok(());
        self.snapshot.send_if_modified(|current| {
            match update(current.as_ref()) {
                Ok(next) => {
                    *current = Arc::new(next);
                    true
                }
                Err(error) => {
                    outcome = Err(error);
                    false
                }
            }
        });
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::remote::{Operation, ScheduleStore};
    use crate::schedule::fixture;

    fn lydia() -> Interview {
        Interview {
            student: "Lydia Miller-Jones".to_string(),
            interviewer: 1,
        }
    }

    async fn coordinator() -> (Arc<ScheduleStore>, ScheduleCoordinator) {
        let store = Arc::new(ScheduleStore::with_fixture());
        let coordinator = ScheduleCoordinator::load(store.clone()).await.unwrap();
        (store, coordinator)
    }

    fn monday_spots(coordinator: &ScheduleCoordinator) -> usize {
        let snapshot = coordinator.snapshot();
        snapshot.spots_remaining(snapshot.day("Monday").unwrap())
    }

    #[tokio::test]
    async fn load_merges_the_three_reads() {
        let (_, coordinator) = coordinator().await;
        assert_eq!(*coordinator.snapshot(), fixture::week());
    }

    #[tokio::test]
    async fn booking_replaces_the_snapshot_and_notifies() {
        let (store, coordinator) = coordinator().await;
        let mut updates = coordinator.subscribe();
        let before = coordinator.snapshot();

        coordinator.book_interview(1, lydia()).await.unwrap();

        assert!(updates.has_changed().unwrap());
        let after = updates.borrow_and_update().clone();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(monday_spots(&coordinator), 1);
        assert_eq!(before.spots_remaining(before.day("Monday").unwrap()), 2);
        assert_eq!(store.schedule().appointment(1).unwrap().interview, Some(lydia()));
    }

    #[tokio::test]
    async fn rejected_save_leaves_snapshot_untouched() {
        let (store, coordinator) = coordinator().await;
        let updates = coordinator.subscribe();
        store.fail_next(Operation::Save);

        let result = coordinator.book_interview(1, lydia()).await;

        assert!(matches!(result, Err(ScheduleError::Remote(RemoteError::Rejected(_)))));
        assert!(!updates.has_changed().unwrap());
        assert_eq!(monday_spots(&coordinator), 2);
    }

    #[tokio::test]
    async fn unknown_records_never_reach_the_remote() {
        let (store, coordinator) = coordinator().await;
        store.fail_next(Operation::Save);

        let unknown = Interview {
            interviewer: 99,
            ..lydia()
        };
        assert_eq!(
            coordinator.book_interview(1, unknown).await,
            Err(ScheduleError::UnknownInterviewer(99))
        );
        // the armed failure was not consumed
        assert!(coordinator.book_interview(1, lydia()).await.is_err());
        assert_eq!(
            coordinator.cancel_interview(1).await,
            Err(ScheduleError::NotBooked(1))
        );
    }

    #[tokio::test]
    async fn cancel_frees_a_spot() {
        let (_, coordinator) = coordinator().await;
        coordinator.cancel_interview(2).await.unwrap();
        assert_eq!(monday_spots(&coordinator), 3);
        assert!(coordinator.snapshot().interview_details(2).is_none());
    }

    #[tokio::test]
    async fn concurrent_bookings_on_one_day_both_land() {
        let (_, coordinator) = coordinator().await;
        let (first, second) = tokio::join!(
            coordinator.book_interview(1, lydia()),
            coordinator.book_interview(4, Interview { student: "Ada".to_string(), interviewer: 2 }),
        );
        first.unwrap();
        second.unwrap();
        assert_eq!(monday_spots(&coordinator), 0);
    }
}
