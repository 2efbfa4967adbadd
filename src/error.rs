use thiserror::Error;

use crate::appointment::{Action, Mode};
use crate::schedule::{AppointmentId, DayId, InterviewerId};

/// Failure of a call against the remote scheduling capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("appointment {0} does not exist")]
    UnknownAppointment(AppointmentId),
    #[error("interviewer {0} does not exist")]
    UnknownInterviewer(InterviewerId),
    #[error("invalid interview: {0}")]
    InvalidInterview(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        RemoteError::Transport(error.to_string())
    }
}

/// Client-side form validation, checked before any remote call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Student name cannot be blank")]
    BlankStudentName,
    #[error("Please select an interviewer")]
    MissingInterviewer,
    #[error("Interviewer {0} is not available on this day")]
    InterviewerUnavailable(InterviewerId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("appointment {0} does not exist")]
    UnknownAppointment(AppointmentId),
    #[error("interviewer {0} does not exist")]
    UnknownInterviewer(InterviewerId),
    #[error("no interviewer named `{0}`")]
    UnknownInterviewerName(String),
    #[error("day `{0}` does not exist")]
    UnknownDay(String),
    #[error("{day} has no {time} slot")]
    UnknownSlot { day: String, time: String },
    #[error("day {day} lists appointment {appointment} which does not exist")]
    MissingAppointment { day: DayId, appointment: AppointmentId },
    #[error("appointment {0} has no interview booked")]
    NotBooked(AppointmentId),
    #[error("day {day} lists appointment {appointment} which belongs to day {owner}")]
    MisplacedAppointment { day: DayId, appointment: AppointmentId, owner: DayId },
    #[error("appointment {appointment} is booked with interviewer {interviewer} who does not exist")]
    DanglingInterviewer { appointment: AppointmentId, interviewer: InterviewerId },
    #[error("mutation task failed: {0}")]
    TaskFailed(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// A gesture a slot could not act on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("`{action}` is not available while the slot is {mode}")]
    ControlUnavailable { action: Action, mode: Mode },
    #[error("appointment {0} is not shown on the selected day")]
    NotMounted(AppointmentId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}
