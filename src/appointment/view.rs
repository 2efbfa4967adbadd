use std::fmt;

use crate::error::ScheduleError;
use crate::schedule::{Interviewer, ScheduleSnapshot};
use super::controller::SlotController;
use super::mode::{Action, Mode};

pub const SAVING: &str = "Saving";
pub const DELETING: &str = "Deleting";
pub const CONFIRM_DELETE: &str = "Are you sure you would like to delete?";
pub const ERROR_SAVE: &str = "Could not book appointment.";
pub const ERROR_DELETE: &str = "Could not cancel appointment.";
pub const STUDENT_PLACEHOLDER: &str = "Enter Student Name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewerChoice {
    pub interviewer: Interviewer,
    pub selected: bool,
}

/// What a slot draws for its current mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotView {
    Empty,
    Show {
        student: String,
        interviewer: Interviewer,
    },
    Form {
        student: String,
        interviewers: Vec<InterviewerChoice>,
        error: Option<String>,
    },
    Status(&'static str),
    Confirm(&'static str),
    Error(&'static str),
}

/// One rendered appointment: its time header, body and clickable controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentView {
    pub time: String,
    pub mode: Mode,
    pub body: SlotView,
    pub controls: &'static [Action],
}

impl AppointmentView {
    /// Every piece of text the slot shows, control labels included
    pub fn texts(&self) -> Vec<String> {
        let mut texts = vec![self.time.clone()];
        match &self.body {
            SlotView::Empty => {}
            SlotView::Show { student, interviewer } => {
                texts.push(student.clone());
                texts.push(interviewer.name.clone());
            }
            SlotView::Form { student, interviewers, error } => {
                texts.push(student.clone());
                texts.extend(interviewers.iter().map(|choice| choice.interviewer.name.clone()));
                texts.extend(error.iter().cloned());
            }
            SlotView::Status(message) | SlotView::Confirm(message) | SlotView::Error(message) => {
                texts.push(message.to_string());
            }
        }
        texts.extend(self.controls.iter().map(|action| action.label().to_string()));
        texts
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|text| text == needle)
    }
}

impl fmt::Display for AppointmentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}  ", self.time)?;
        match &self.body {
            SlotView::Empty => write!(f, "[open]")?,
            SlotView::Show { student, interviewer } => {
                write!(f, "{} with {}", student, interviewer.name)?
            }
            SlotView::Form { student, interviewers, error } => {
                let selected = interviewers
                    .iter()
                    .find(|choice| choice.selected)
                    .map(|choice| choice.interviewer.name.as_str())
                    .unwrap_or("no interviewer");
                let student = if student.is_empty() { STUDENT_PLACEHOLDER } else { student.as_str() };
                write!(f, "editing: {} / {}", student, selected)?;
                if let Some(error) = error {
                    write!(f, " ({})", error)?;
                }
            }
            SlotView::Status(message) | SlotView::Confirm(message) | SlotView::Error(message) => {
                write!(f, "{}", message)?
            }
        }

        if !self.controls.is_empty() {
            let labels: Vec<&str> = self.controls.iter().map(|action| action.label()).collect();
            write!(f, "  [{}]", labels.join(" | "))?;
        }
        Ok(())
    }
}

/// Derives a slot's view from its controller and the latest snapshot
pub fn render(slot: &SlotController, snapshot: &ScheduleSnapshot) -> Result<AppointmentView, ScheduleError> {
    let appointment_id = slot.appointment_id();
    let appointment = snapshot
        .appointment(appointment_id)
        .ok_or(ScheduleError::UnknownAppointment(appointment_id))?;
    let mode = slot.mode();

    let body = match mode {
        Mode::Empty => SlotView::Empty,
        Mode::Show => {
            let details = snapshot
                .interview_details(appointment_id)
                .ok_or(ScheduleError::NotBooked(appointment_id))?;
            SlotView::Show {
                student: details.student.to_string(),
                interviewer: details.interviewer.clone(),
            }
        }
        Mode::Create | Mode::Edit => {
            let form = slot.form().cloned().unwrap_or_default();
            let day_interviewers = snapshot
                .day_of(appointment_id)
                .map(|day| snapshot.interviewers_for_day(&day.name))
                .unwrap_or_default();
            SlotView::Form {
                student: form.student,
                interviewers: day_interviewers
                    .into_iter()
                    .map(|interviewer| InterviewerChoice {
                        selected: form.interviewer == Some(interviewer.id),
                        interviewer: interviewer.clone(),
                    })
                    .collect(),
                error: form.error.map(|error| error.to_string()),
            }
        }
        Mode::Saving => SlotView::Status(SAVING),
        Mode::Deleting => SlotView::Status(DELETING),
        Mode::Confirm => SlotView::Confirm(CONFIRM_DELETE),
        Mode::ErrorSave => SlotView::Error(ERROR_SAVE),
        Mode::ErrorDelete => SlotView::Error(ERROR_DELETE),
    };

    Ok(AppointmentView {
        time: appointment.time.clone(),
        mode,
        body,
        controls: mode.controls(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::fixture;

    #[test]
    fn booked_slot_shows_student_and_interviewer() {
        let week = fixture::week();
        let view = render(&SlotController::new(2, true), &week).unwrap();
        assert!(view.contains_text("Archie Cohen"));
        assert!(view.contains_text("Tori Malcolm"));
        assert!(view.contains_text("Edit"));
        assert!(view.contains_text("Delete"));
        assert_eq!(view.to_string(), "   1pm  Archie Cohen with Tori Malcolm  [Edit | Delete]");
    }

    #[test]
    fn form_offers_the_days_interviewers() {
        let week = fixture::week();
        let mut slot = SlotController::new(1, false);
        slot.add().unwrap();
        slot.select_interviewer(1).unwrap();

        let view = render(&slot, &week).unwrap();
        let SlotView::Form { interviewers, .. } = &view.body else {
            panic!("expected the form, got {:?}", view.body);
        };
        assert_eq!(interviewers.len(), 5);
        assert!(interviewers
            .iter()
            .any(|choice| choice.selected && choice.interviewer.name == "Sylvia Palmer"));
        assert!(view.contains_text("Save"));
    }

    #[test]
    fn in_flight_views_have_no_controls() {
        let week = fixture::week();
        let mut slot = SlotController::new(2, true);
        slot.delete().unwrap();
        assert!(render(&slot, &week).unwrap().contains_text(CONFIRM_DELETE));

        slot.confirm().unwrap();
        let view = render(&slot, &week).unwrap();
        assert_eq!(view.body, SlotView::Status(DELETING));
        assert!(view.controls.is_empty());
    }

    #[test]
    fn show_without_a_booking_is_an_error() {
        let week = fixture::week();
        assert_eq!(
            render(&SlotController::new(1, true), &week),
            Err(ScheduleError::NotBooked(1))
        );
    }
}
