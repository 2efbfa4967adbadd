use std::collections::BTreeMap;

use crate::error::ScheduleError;
use super::slot_utils::count_open_slots;
use super::types::{Appointment, AppointmentId, Day, Interview, Interviewer, InterviewerId};

/// An interview with its interviewer resolved, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewDetails<'a> {
    pub student: &'a str,
    pub interviewer: &'a Interviewer,
}

/// Immutable view of the whole week.
///
/// Mutations never edit a snapshot in place: `with_interview` and
/// `without_interview` return a new one, which the coordinator swaps in as a
/// whole. Spots remaining are always computed from the appointments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleSnapshot {
    days: Vec<Day>,
    appointments: BTreeMap<AppointmentId, Appointment>,
    interviewers: BTreeMap<InterviewerId, Interviewer>,
}

impl ScheduleSnapshot {
    /// Merges the three bootstrap reads into one consistent week: every
    /// appointment a day lists exists and points back at that day, and every
    /// booked interviewer exists.
    pub fn new(
        days: Vec<Day>,
        appointments: BTreeMap<AppointmentId, Appointment>,
        interviewers: BTreeMap<InterviewerId, Interviewer>,
    ) -> Result<Self, ScheduleError> {
        for day in &days {
            for id in &day.appointments {
                let appointment = appointments.get(id).ok_or(ScheduleError::MissingAppointment {
                    day: day.id,
                    appointment: *id,
                })?;
                if appointment.day != day.id {
                    return Err(ScheduleError::MisplacedAppointment {
                        day: day.id,
                        appointment: *id,
                        owner: appointment.day,
                    });
                }
            }
        }

        for appointment in appointments.values() {
            if let Some(interview) = &appointment.interview {
                if !interviewers.contains_key(&interview.interviewer) {
                    return Err(ScheduleError::DanglingInterviewer {
                        appointment: appointment.id,
                        interviewer: interview.interviewer,
                    });
                }
            }
        }

        Ok(Self {
            days,
            appointments,
            interviewers,
        })
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn day(&self, name: &str) -> Option<&Day> {
        self.days.iter().find(|day| day.name == name)
    }

    /// The day whose slot list contains this appointment
    pub fn day_of(&self, appointment_id: AppointmentId) -> Option<&Day> {
        self.days
            .iter()
            .find(|day| day.appointments.contains(&appointment_id))
    }

    pub fn appointments(&self) -> &BTreeMap<AppointmentId, Appointment> {
        &self.appointments
    }

    pub fn appointment(&self, id: AppointmentId) -> Option<&Appointment> {
        self.appointments.get(&id)
    }

    pub fn interviewers(&self) -> &BTreeMap<InterviewerId, Interviewer> {
        &self.interviewers
    }

    pub fn interviewer(&self, id: InterviewerId) -> Option<&Interviewer> {
        self.interviewers.get(&id)
    }

    pub fn interviewer_by_name(&self, name: &str) -> Option<&Interviewer> {
        self.interviewers
            .values()
            .find(|interviewer| interviewer.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Number of this day's appointments with no interview
    pub fn spots_remaining(&self, day: &Day) -> usize {
        count_open_slots(
            day.appointments
                .iter()
                .filter_map(|id| self.appointments.get(id)),
        )
    }

    /// Appointments for the named day, in slot order. Unknown days yield nothing.
    pub fn appointments_for_day(&self, day_name: &str) -> Vec<&Appointment> {
        self.day(day_name)
            .map(|day| {
                day.appointments
                    .iter()
                    .filter_map(|id| self.appointments.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Interviewers available on the named day
    pub fn interviewers_for_day(&self, day_name: &str) -> Vec<&Interviewer> {
        self.day(day_name)
            .map(|day| {
                day.interviewers
                    .iter()
                    .filter_map(|id| self.interviewers.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn interview_details(&self, appointment_id: AppointmentId) -> Option<InterviewDetails<'_>> {
        let interview = self.appointments.get(&appointment_id)?.interview.as_ref()?;
        let interviewer = self.interviewers.get(&interview.interviewer)?;
        Some(InterviewDetails {
            student: &interview.student,
            interviewer,
        })
    }

    /// Checks that a booking refers to records that exist
    pub fn check_booking(&self, appointment_id: AppointmentId, interview: &Interview) -> Result<(), ScheduleError> {
        if !self.appointments.contains_key(&appointment_id) {
            return Err(ScheduleError::UnknownAppointment(appointment_id));
        }
        if !self.interviewers.contains_key(&interview.interviewer) {
            return Err(ScheduleError::UnknownInterviewer(interview.interviewer));
        }
        Ok(())
    }

    /// Copy of this snapshot with the interview attached (or replaced) on the appointment
    pub fn with_interview(&self, appointment_id: AppointmentId, interview: Interview) -> Result<Self, ScheduleError> {
        self.check_booking(appointment_id, &interview)?;
        let mut next = self.clone();
        if let Some(appointment) = next.appointments.get_mut(&appointment_id) {
            appointment.interview = Some(interview);
        }
        Ok(next)
    }

    /// Copy of this snapshot with the appointment's interview removed
    pub fn without_interview(&self, appointment_id: AppointmentId) -> Result<Self, ScheduleError> {
        if !self.appointments.contains_key(&appointment_id) {
            return Err(ScheduleError::UnknownAppointment(appointment_id));
        }
        let mut next = self.clone();
        if let Some(appointment) = next.appointments.get_mut(&appointment_id) {
            appointment.interview = None;
        }
        Ok(next)
    }
}
