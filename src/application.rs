use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::task::{self, JoinSet};
use tracing::{debug, error, info};

use crate::appointment::{render, AppointmentView, MutationResolved, PendingMutation, SlotController, Ticket};
use crate::display::format_spots;
use crate::error::{ScheduleError, SlotError};
use crate::remote::SchedulerApi;
use crate::schedule::{AppointmentId, InterviewerId, ScheduleCoordinator};

/// One entry of the day list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayListItem {
    pub name: String,
    pub spots: usize,
    pub selected: bool,
}

impl DayListItem {
    pub fn spots_text(&self) -> String {
        format_spots(self.spots)
    }
}

/// The schedule page: a day list plus the slots of the selected day.
///
/// Gestures go to the slot's controller. Saves and deletes run as tasks
/// against the coordinator; their results are routed to the slot that issued
/// them, or dropped if that slot has been unmounted since (the snapshot still
/// commits). After every result, idle slots are re-derived from the snapshot.
pub struct Application {
    coordinator: Arc<ScheduleCoordinator>,
    selected_day: String,
    slots: BTreeMap<AppointmentId, SlotController>,
    tasks: JoinSet<MutationResolved>,
    // issuer of each running task, for reporting a task that died
    issuers: HashMap<task::Id, (AppointmentId, Ticket)>,
}

impl Application {
    /// Loads the week and opens the first day (Monday)
    pub async fn start(api: Arc<dyn SchedulerApi>) -> Result<Self, ScheduleError> {
        let coordinator = ScheduleCoordinator::load(api).await?;
        Self::new(Arc::new(coordinator))
    }

    pub fn new(coordinator: Arc<ScheduleCoordinator>) -> Result<Self, ScheduleError> {
        let first_day = coordinator
            .snapshot()
            .days()
            .first()
            .map(|day| day.name.clone())
            .ok_or_else(|| ScheduleError::UnknownDay("Monday".to_string()))?;

        let mut app = Self {
            coordinator,
            selected_day: String::new(),
            slots: BTreeMap::new(),
            tasks: JoinSet::new(),
            issuers: HashMap::new(),
        };
        app.select_day(&first_day)?;
        Ok(app)
    }

    pub fn coordinator(&self) -> &Arc<ScheduleCoordinator> {
        &self.coordinator
    }

    pub fn selected_day(&self) -> &str {
        &self.selected_day
    }

    /// Unmounts the current day's slots and mounts the named day's, each in
    /// its natural starting mode
    pub fn select_day(&mut self, name: &str) -> Result<(), ScheduleError> {
        let snapshot = self.coordinator.snapshot();
        let day = snapshot
            .day(name)
            .ok_or_else(|| ScheduleError::UnknownDay(name.to_string()))?;

        self.slots = snapshot
            .appointments_for_day(&day.name)
            .into_iter()
            .map(|appointment| {
                (
                    appointment.id,
                    SlotController::new(appointment.id, appointment.is_booked()),
                )
            })
            .collect();
        self.selected_day = day.name.clone();
        debug!(day = %self.selected_day, slots = self.slots.len(), "day selected");
        Ok(())
    }

    pub fn day_list(&self) -> Vec<DayListItem> {
        let snapshot = self.coordinator.snapshot();
        snapshot
            .days()
            .iter()
            .map(|day| DayListItem {
                name: day.name.clone(),
                spots: snapshot.spots_remaining(day),
                selected: day.name == self.selected_day,
            })
            .collect()
    }

    pub fn day_item(&self, name: &str) -> Option<DayListItem> {
        self.day_list().into_iter().find(|item| item.name == name)
    }

    /// Mounted appointment ids in slot order
    pub fn appointment_ids(&self) -> Vec<AppointmentId> {
        self.coordinator
            .snapshot()
            .day(&self.selected_day)
            .map(|day| {
                day.appointments
                    .iter()
                    .copied()
                    .filter(|id| self.slots.contains_key(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn slot(&self, appointment_id: AppointmentId) -> Option<&SlotController> {
        self.slots.get(&appointment_id)
    }

    fn slot_mut(&mut self, appointment_id: AppointmentId) -> Result<&mut SlotController, SlotError> {
        self.slots
            .get_mut(&appointment_id)
            .ok_or(SlotError::NotMounted(appointment_id))
    }

    pub fn view(&self, appointment_id: AppointmentId) -> Result<AppointmentView, SlotError> {
        let slot = self
            .slots
            .get(&appointment_id)
            .ok_or(SlotError::NotMounted(appointment_id))?;
        Ok(render(slot, &self.coordinator.snapshot())?)
    }

    pub fn views(&self) -> Result<Vec<AppointmentView>, SlotError> {
        self.appointment_ids()
            .into_iter()
            .map(|id| self.view(id))
            .collect()
    }

    pub fn add(&mut self, appointment_id: AppointmentId) -> Result<(), SlotError> {
        self.slot_mut(appointment_id)?.add()
    }

    pub fn edit(&mut self, appointment_id: AppointmentId) -> Result<(), SlotError> {
        let snapshot = self.coordinator.snapshot();
        let interview = snapshot
            .appointment(appointment_id)
            .and_then(|appointment| appointment.interview.clone())
            .ok_or(ScheduleError::NotBooked(appointment_id));
        let slot = self.slot_mut(appointment_id)?;
        slot.edit(&interview?)
    }

    pub fn delete(&mut self, appointment_id: AppointmentId) -> Result<(), SlotError> {
        self.slot_mut(appointment_id)?.delete()
    }

    pub fn cancel(&mut self, appointment_id: AppointmentId) -> Result<(), SlotError> {
        self.slot_mut(appointment_id)?.cancel()
    }

    pub fn close(&mut self, appointment_id: AppointmentId) -> Result<(), SlotError> {
        self.slot_mut(appointment_id)?.close()
    }

    pub fn set_student(&mut self, appointment_id: AppointmentId, student: &str) -> Result<(), SlotError> {
        self.slot_mut(appointment_id)?.set_student(student)
    }

    pub fn select_interviewer(&mut self, appointment_id: AppointmentId, interviewer: InterviewerId) -> Result<(), SlotError> {
        self.slot_mut(appointment_id)?.select_interviewer(interviewer)
    }

    /// Submits the slot's form. The slot shows SAVING as soon as this returns.
    pub fn save(&mut self, appointment_id: AppointmentId) -> Result<(), SlotError> {
        let available = self
            .coordinator
            .snapshot()
            .day_of(appointment_id)
            .map(|day| day.interviewers.clone())
            .unwrap_or_default();
        let pending = self.slot_mut(appointment_id)?.save(&available)?;
        self.dispatch(pending);
        Ok(())
    }

    /// Answers the delete confirmation. The slot shows DELETING as soon as this returns.
    pub fn confirm(&mut self, appointment_id: AppointmentId) -> Result<(), SlotError> {
        let pending = self.slot_mut(appointment_id)?.confirm()?;
        self.dispatch(pending);
        Ok(())
    }

    fn dispatch(&mut self, pending: PendingMutation) {
        let coordinator = Arc::clone(&self.coordinator);
        let issuer = (pending.appointment_id, pending.ticket);
        debug!(appointment_id = pending.appointment_id, ticket = pending.ticket, "dispatching");
        let handle = self
            .tasks
            .spawn(async move { pending.execute(&coordinator).await });
        self.issuers.insert(handle.id(), issuer);
    }

    /// Number of dispatched calls whose results have not been routed yet
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for the next call to resolve and routes it. Returns `None` when
    /// nothing is in flight. A task that died without answering resolves its
    /// slot as failed.
    pub async fn next_resolution(&mut self) -> Option<MutationResolved> {
        loop {
            let resolved = match self.tasks.join_next_with_id().await? {
                Ok((id, resolved)) => {
                    self.issuers.remove(&id);
                    resolved
                }
                Err(join_error) => {
                    let Some((appointment_id, ticket)) = self.issuers.remove(&join_error.id()) else {
                        error!(%join_error, "unknown mutation task died");
                        continue;
                    };
                    error!(appointment_id, ticket, %join_error, "mutation task died");
                    MutationResolved {
                        appointment_id,
                        ticket,
                        outcome: Err(ScheduleError::TaskFailed(join_error.to_string())),
                    }
                }
            };
            self.route(&resolved);
            return Some(resolved);
        }
    }

    /// Waits until every dispatched call has resolved
    pub async fn settle(&mut self) {
        while self.next_resolution().await.is_some() {}
    }

    fn route(&mut self, resolved: &MutationResolved) {
        match self.slots.get_mut(&resolved.appointment_id) {
            Some(slot) => {
                slot.resolve(resolved);
            }
            None => info!(
                appointment_id = resolved.appointment_id,
                "slot unmounted before its call resolved; result discarded"
            ),
        }
        self.reconcile();
    }

    /// Brings idle slots back in line with the latest snapshot. A slot
    /// remounted while its own call was in flight never sees that call's
    /// result, so its mount-time mode can be out of date.
    fn reconcile(&mut self) {
        let snapshot = self.coordinator.snapshot();
        for (id, slot) in self.slots.iter_mut() {
            let booked = snapshot
                .appointment(*id)
                .map(|appointment| appointment.is_booked())
                .unwrap_or(false);
            slot.reconcile(booked);
        }
    }
}
