use std::collections::BTreeMap;

use chrono::NaiveTime;

use crate::error::ScheduleError;
use super::slot_utils::hourly_slots;
use super::snapshot::ScheduleSnapshot;
use super::types::{Appointment, AppointmentId, Day, DayId, Interview, Interviewer, InterviewerId};

pub const SLOTS_PER_DAY: usize = 5;

pub const SYLVIA_PALMER: InterviewerId = 1;
pub const TORI_MALCOLM: InterviewerId = 2;

const WEEKDAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

const INTERVIEWERS: [(InterviewerId, &str, &str); 10] = [
    (1, "Sylvia Palmer", "https://i.imgur.com/LpaY82x.png"),
    (2, "Tori Malcolm", "https://i.imgur.com/Nmx0Qxo.png"),
    (3, "Mildred Nazir", "https://i.imgur.com/T2WwVfS.png"),
    (4, "Cohana Roy", "https://i.imgur.com/FK8V841.jpg"),
    (5, "Sven Jones", "https://i.imgur.com/twYrpay.jpg"),
    (6, "Susan Reynolds", "https://i.imgur.com/TdOAdde.jpg"),
    (7, "Alec Quon", "https://i.imgur.com/3tVgsra.jpg"),
    (8, "Viktor Jain", "https://i.imgur.com/iHq8K8Z.jpg"),
    (9, "Lindsay Chu", "https://i.imgur.com/nPywAp1.jpg"),
    (10, "Samantha Stanic", "https://i.imgur.com/okB9WKC.jpg"),
];

// interviewer roster per weekday, same order as WEEKDAYS
const ROSTERS: [[InterviewerId; 5]; 5] = [
    [1, 2, 3, 4, 5],
    [2, 3, 6, 7, 8],
    [1, 4, 7, 9, 10],
    [3, 5, 6, 8, 9],
    [2, 5, 7, 9, 10],
];

// (appointment, student, interviewer)
const BOOKINGS: [(AppointmentId, &str, InterviewerId); 11] = [
    (2, "Archie Cohen", 2),
    (3, "Chad Takahashi", 3),
    (5, "Jamal Jordan", 4),
    (6, "Leopold Silvers", 2),
    (9, "Liam Martinez", 6),
    (12, "Maria Boucher", 7),
    (13, "Michael Chan", 9),
    (15, "Yuko Smith", 10),
    (17, "Richard Wong", 5),
    (21, "Jaime Cho", 7),
    (24, "Emily Wu", 10),
];

/// Monday to Friday, five slots a day from noon, no interviews booked.
/// Appointment ids run 1..=25 in day order.
pub fn empty_week() -> ScheduleSnapshot {
    build_empty_week().unwrap_or_default()
}

fn build_empty_week() -> Result<ScheduleSnapshot, ScheduleError> {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
    let times = hourly_slots(noon, SLOTS_PER_DAY);

    let mut days = Vec::with_capacity(WEEKDAYS.len());
    let mut appointments = BTreeMap::new();
    let mut next_id: AppointmentId = 1;

    for ((index, name), roster) in WEEKDAYS.iter().enumerate().zip(ROSTERS.iter()) {
        let day_id = index as DayId + 1;
        let mut slot_ids = Vec::with_capacity(times.len());
        for time in &times {
            appointments.insert(
                next_id,
                Appointment {
                    id: next_id,
                    time: time.clone(),
                    day: day_id,
                    interview: None,
                },
            );
            slot_ids.push(next_id);
            next_id += 1;
        }
        days.push(Day {
            id: day_id,
            name: name.to_string(),
            appointments: slot_ids,
            interviewers: roster.to_vec(),
        });
    }

    let interviewers = INTERVIEWERS
        .iter()
        .map(|(id, name, avatar)| {
            (
                *id,
                Interviewer {
                    id: *id,
                    name: name.to_string(),
                    avatar: avatar.to_string(),
                },
            )
        })
        .collect();

    ScheduleSnapshot::new(days, appointments, interviewers)
}

/// The seeded week: Monday has two open slots (12pm and 3pm), Archie Cohen
/// is booked with Tori Malcolm at 1pm, Leopold Silvers on Tuesday at noon.
pub fn week() -> ScheduleSnapshot {
    build_week().unwrap_or_default()
}

fn build_week() -> Result<ScheduleSnapshot, ScheduleError> {
    BOOKINGS
        .iter()
        .try_fold(build_empty_week()?, |snapshot, (appointment, student, interviewer)| {
            let interview = Interview {
                student: student.to_string(),
                interviewer: *interviewer,
            };
            snapshot.with_interview(*appointment, interview)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_tables_build_a_consistent_week() {
        let empty = build_empty_week().unwrap();
        assert_eq!(empty.appointments().len(), WEEKDAYS.len() * SLOTS_PER_DAY);
        assert!(empty.appointments().values().all(|appointment| !appointment.is_booked()));

        let booked = build_week().unwrap();
        let count = booked.appointments().values().filter(|appointment| appointment.is_booked()).count();
        assert_eq!(count, BOOKINGS.len());
        assert_eq!(booked, week());
    }

    #[test]
    fn seeded_week_layout() {
        let week = week();
        let spots: Vec<(String, usize)> = week
            .days()
            .iter()
            .map(|day| (day.name.clone(), week.spots_remaining(day)))
            .collect();
        assert_eq!(
            spots,
            vec![
                ("Monday".to_string(), 2),
                ("Tuesday".to_string(), 3),
                ("Wednesday".to_string(), 2),
                ("Thursday".to_string(), 4),
                ("Friday".to_string(), 3),
            ]
        );
        assert_eq!(week.appointments().len(), 25);
        assert_eq!(week.interview_details(2).unwrap().student, "Archie Cohen");
        assert_eq!(week.interview_details(6).unwrap().student, "Leopold Silvers");
    }

    #[test]
    fn every_booking_uses_an_interviewer_of_its_day() {
        let week = week();
        for (appointment, _, interviewer) in BOOKINGS {
            let day = week.day_of(appointment).unwrap();
            assert!(day.interviewers.contains(&interviewer), "appointment {appointment}");
        }
    }
}
