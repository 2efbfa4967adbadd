use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::error::{ScheduleError, SlotError};
use crate::form::InterviewForm;
use crate::schedule::{AppointmentId, Interview, InterviewerId, ScheduleCoordinator};
use crate::visual_mode::VisualMode;
use super::mode::{Action, Mode};

/// Identifies one save or delete attempt. Unique for the life of the process,
/// so a result can never be mistaken for a later attempt's.
pub type Ticket = u64;

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

fn issue_ticket() -> Ticket {
    NEXT_TICKET.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRequest {
    Book(Interview),
    Cancel,
}

/// A remote call a slot has committed to. The slot is already showing
/// SAVING or DELETING; run it with [`PendingMutation::execute`] and hand the
/// result back through [`SlotController::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub appointment_id: AppointmentId,
    pub ticket: Ticket,
    pub request: MutationRequest,
}

impl PendingMutation {
    pub async fn execute(self, coordinator: &ScheduleCoordinator) -> MutationResolved {
        let outcome = match self.request {
            MutationRequest::Book(interview) => coordinator.book_interview(self.appointment_id, interview).await,
            MutationRequest::Cancel => coordinator.cancel_interview(self.appointment_id).await,
        };
        MutationResolved {
            appointment_id: self.appointment_id,
            ticket: self.ticket,
            outcome,
        }
    }
}

/// Result of a remote call, addressed to the slot that issued it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationResolved {
    pub appointment_id: AppointmentId,
    pub ticket: Ticket,
    pub outcome: Result<(), ScheduleError>,
}

/// One bookable slot's view state.
///
/// Gestures are checked against the controls the current mode renders; while
/// a save or delete is in flight none are rendered, so a slot never has two
/// mutations outstanding.
#[derive(Debug, Clone)]
pub struct SlotController {
    appointment_id: AppointmentId,
    modes: VisualMode<Mode>,
    form: Option<InterviewForm>,
    in_flight: Option<Ticket>,
}

impl SlotController {
    /// Mounts a slot: EMPTY, or SHOW when an interview is already booked
    pub fn new(appointment_id: AppointmentId, booked: bool) -> Self {
        Self {
            appointment_id,
            modes: VisualMode::new(Mode::initial(booked)),
            form: None,
            in_flight: None,
        }
    }

    pub fn appointment_id(&self) -> AppointmentId {
        self.appointment_id
    }

    pub fn mode(&self) -> Mode {
        *self.modes.current()
    }

    pub fn history(&self) -> &VisualMode<Mode> {
        &self.modes
    }

    pub fn form(&self) -> Option<&InterviewForm> {
        self.form.as_ref()
    }

    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight
    }

    fn require(&self, action: Action) -> Result<(), SlotError> {
        let mode = self.mode();
        if mode.allows(action) {
            Ok(())
        } else {
            Err(SlotError::ControlUnavailable { action, mode })
        }
    }

    fn push(&mut self, mode: Mode) {
        debug!(appointment_id = self.appointment_id, from = %self.mode(), to = %mode, "transition");
        self.modes.transition(mode, false);
    }

    fn replace(&mut self, mode: Mode) {
        debug!(appointment_id = self.appointment_id, from = %self.mode(), to = %mode, "transition (replace)");
        self.modes.transition(mode, true);
    }

    fn back(&mut self) {
        self.modes.back();
        debug!(appointment_id = self.appointment_id, to = %self.mode(), "back");
    }

    /// EMPTY -> CREATE with a blank form
    pub fn add(&mut self) -> Result<(), SlotError> {
        self.require(Action::Add)?;
        self.form = Some(InterviewForm::default());
        self.push(Mode::Create);
        Ok(())
    }

    /// SHOW -> EDIT with the form pre-filled from `current`
    pub fn edit(&mut self, current: &Interview) -> Result<(), SlotError> {
        self.require(Action::Edit)?;
        self.form = Some(InterviewForm::from_interview(current));
        self.push(Mode::Edit);
        Ok(())
    }

    /// SHOW -> CONFIRM
    pub fn delete(&mut self) -> Result<(), SlotError> {
        self.require(Action::Delete)?;
        self.push(Mode::Confirm);
        Ok(())
    }

    /// Leaves CREATE, EDIT or CONFIRM for the view before it
    pub fn cancel(&mut self) -> Result<(), SlotError> {
        self.require(Action::Cancel)?;
        if self.mode().shows_form() {
            self.form = None;
        }
        self.back();
        Ok(())
    }

    /// Dismisses an error view, back to where the failed attempt started
    pub fn close(&mut self) -> Result<(), SlotError> {
        self.require(Action::Close)?;
        self.back();
        Ok(())
    }

    pub fn set_student(&mut self, student: &str) -> Result<(), SlotError> {
        self.require(Action::EnterStudent)?;
        if let Some(form) = self.form.as_mut() {
            form.student = student.to_string();
        }
        Ok(())
    }

    pub fn select_interviewer(&mut self, interviewer: InterviewerId) -> Result<(), SlotError> {
        self.require(Action::SelectInterviewer)?;
        if let Some(form) = self.form.as_mut() {
            form.interviewer = Some(interviewer);
        }
        Ok(())
    }

    /// CREATE/EDIT -> SAVING.
    ///
    /// Validates the form against the interviewers offered on the slot's day
    /// first; an invalid form stays open with its error and no call is made.
    pub fn save(&mut self, available: &[InterviewerId]) -> Result<PendingMutation, SlotError> {
        self.require(Action::Save)?;
        let form = self.form.get_or_insert_with(InterviewForm::default);
        let interview = form.submit(available)?;

        self.push(Mode::Saving);
        Ok(self.start(MutationRequest::Book(interview)))
    }

    /// CONFIRM -> DELETING
    pub fn confirm(&mut self) -> Result<PendingMutation, SlotError> {
        self.require(Action::Confirm)?;
        self.push(Mode::Deleting);
        Ok(self.start(MutationRequest::Cancel))
    }

    fn start(&mut self, request: MutationRequest) -> PendingMutation {
        let ticket = issue_ticket();
        self.in_flight = Some(ticket);
        PendingMutation {
            appointment_id: self.appointment_id,
            ticket,
            request,
        }
    }

    /// Applies the result of the in-flight call.
    ///
    /// Success replaces SAVING/DELETING so the stale entry is unreachable.
    /// Failure drops it and pushes the error view on top of the pre-attempt
    /// view: the form for a save, SHOW for a delete (the confirmation was
    /// already answered). Returns `false` when the result is not for the
    /// current attempt and was ignored.
    pub fn resolve(&mut self, resolved: &MutationResolved) -> bool {
        if resolved.appointment_id != self.appointment_id || self.in_flight != Some(resolved.ticket) {
            debug!(
                appointment_id = self.appointment_id,
                ticket = resolved.ticket,
                "ignoring result for another attempt"
            );
            return false;
        }
        self.in_flight = None;

        match (self.mode(), &resolved.outcome) {
            (Mode::Saving, Ok(())) => {
                self.form = None;
                self.replace(Mode::Show);
            }
            (Mode::Saving, Err(error)) => {
                warn!(appointment_id = self.appointment_id, %error, "could not book appointment");
                self.back();
                self.push(Mode::ErrorSave);
            }
            (Mode::Deleting, Ok(())) => self.replace(Mode::Empty),
            (Mode::Deleting, Err(error)) => {
                warn!(appointment_id = self.appointment_id, %error, "could not cancel appointment");
                self.back();
                if self.mode() == Mode::Confirm {
                    self.back();
                }
                self.push(Mode::ErrorDelete);
            }
            (mode, _) => {
                warn!(appointment_id = self.appointment_id, %mode, "result arrived outside SAVING/DELETING");
                return false;
            }
        }
        true
    }

    /// Re-derives an idle EMPTY/SHOW slot from whether its appointment is
    /// booked in the latest snapshot. Slots with a call in flight, an open
    /// form, a confirmation or an error view are left alone. Returns `true`
    /// when the slot was remounted.
    pub fn reconcile(&mut self, booked: bool) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        let stale = match self.mode() {
            Mode::Empty => booked,
            Mode::Show => !booked,
            _ => false,
        };
        if stale {
            debug!(appointment_id = self.appointment_id, booked, from = %self.mode(), "remounting from snapshot");
            self.form = None;
            self.modes.reset(Mode::initial(booked));
        }
        stale
    }
}
