pub mod types;
pub mod slot_utils;
pub mod snapshot;
pub mod fixture;
pub mod coordinator;

pub use types::{Appointment, AppointmentId, Day, DayId, Interview, Interviewer, InterviewerId};
pub use snapshot::{InterviewDetails, ScheduleSnapshot};
pub use coordinator::ScheduleCoordinator;
