use serde::{Deserialize, Serialize};

pub type DayId = u32;
pub type AppointmentId = u32;
pub type InterviewerId = u32;

/// A weekday offering a fixed set of appointment slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub id: DayId,
    pub name: String,
    pub appointments: Vec<AppointmentId>, // in slot order
    pub interviewers: Vec<InterviewerId>, // available on this day
}

/// A booked interview: owned by exactly one appointment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub student: String,
    pub interviewer: InterviewerId,
}

/// One bookable slot. `interview` is `None` for an empty slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub time: String,
    pub day: DayId,
    pub interview: Option<Interview>,
}

impl Appointment {
    pub fn is_booked(&self) -> bool {
        self.interview.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interviewer {
    pub id: InterviewerId,
    pub name: String,
    pub avatar: String,
}
