use std::path::Path;

use csv::ReaderBuilder;
use thiserror::Error;

use crate::display::BookingRow;
use crate::error::ScheduleError;
use crate::schedule::slot_utils::parse_slot_time;
use crate::schedule::{AppointmentId, Interview, ScheduleSnapshot};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("could not read seed bookings: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {source}")]
    Booking {
        row: usize,
        #[source]
        source: ScheduleError,
    },
}

/// Loads bookings from a `day,time,student,interviewer` CSV (the format `export` writes).
/// Rows with a blank student are skipped.
pub fn load_bookings<P: AsRef<Path>>(csv_path: P) -> Result<Vec<BookingRow>, SeedError> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_path(csv_path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize::<BookingRow>() {
        let row = record?;
        if row.student.is_empty() {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Books each row into a copy of `base`, matching day by name, slot by time
/// label and interviewer by name. Later rows win when two name the same slot.
pub fn apply_bookings(base: &ScheduleSnapshot, rows: &[BookingRow]) -> Result<ScheduleSnapshot, SeedError> {
    let mut snapshot = base.clone();
    for (index, row) in rows.iter().enumerate() {
        let booking = resolve_booking(&snapshot, row)
            .and_then(|(appointment_id, interview)| snapshot.with_interview(appointment_id, interview));
        snapshot = booking.map_err(|source| SeedError::Booking {
            row: index + 1,
            source,
        })?;
    }
    Ok(snapshot)
}

fn resolve_booking(snapshot: &ScheduleSnapshot, row: &BookingRow) -> Result<(AppointmentId, Interview), ScheduleError> {
    let day = snapshot
        .days()
        .iter()
        .find(|day| day.name.eq_ignore_ascii_case(&row.day))
        .ok_or_else(|| ScheduleError::UnknownDay(row.day.clone()))?;

    let unknown_slot = || ScheduleError::UnknownSlot {
        day: day.name.clone(),
        time: row.time.clone(),
    };
    let wanted = parse_slot_time(&row.time).ok_or_else(unknown_slot)?;
    let appointment = snapshot
        .appointments_for_day(&day.name)
        .into_iter()
        .find(|appointment| parse_slot_time(&appointment.time) == Some(wanted))
        .ok_or_else(unknown_slot)?;

    let interviewer = snapshot
        .interviewer_by_name(&row.interviewer)
        .ok_or_else(|| ScheduleError::UnknownInterviewerName(row.interviewer.clone()))?;

    Ok((
        appointment.id,
        Interview {
            student: row.student.clone(),
            interviewer: interviewer.id,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::write_schedule_to_file;
    use crate::schedule::fixture;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_applies_bookings() {
        let file = write_csv(
            "day,time,student,interviewer\n\
             monday, 12pm ,Lydia Miller-Jones,Sylvia Palmer\n\
             Friday,4pm,,Sven Jones\n",
        );
        let rows = load_bookings(file.path()).unwrap();
        assert_eq!(rows.len(), 1);

        let week = apply_bookings(&fixture::empty_week(), &rows).unwrap();
        let details = week.interview_details(1).unwrap();
        assert_eq!(details.student, "Lydia Miller-Jones");
        assert_eq!(details.interviewer.name, "Sylvia Palmer");
        assert_eq!(week.spots_remaining(week.day("Monday").unwrap()), 4);
    }

    #[test]
    fn export_reloads_into_the_same_week() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_schedule_to_file(&fixture::week(), file.path()).unwrap();

        let rows = load_bookings(file.path()).unwrap();
        let reloaded = apply_bookings(&fixture::empty_week(), &rows).unwrap();
        assert_eq!(reloaded, fixture::week());
    }

    #[test]
    fn reports_the_offending_row() {
        let rows = vec![
            BookingRow {
                day: "Monday".to_string(),
                time: "12pm".to_string(),
                student: "Lydia".to_string(),
                interviewer: "Sylvia Palmer".to_string(),
            },
            BookingRow {
                day: "Monday".to_string(),
                time: "9am".to_string(),
                student: "Ada".to_string(),
                interviewer: "Sylvia Palmer".to_string(),
            },
        ];
        let error = apply_bookings(&fixture::empty_week(), &rows).unwrap_err();
        assert!(matches!(
            error,
            SeedError::Booking {
                row: 2,
                source: ScheduleError::UnknownSlot { .. }
            }
        ));
        assert_eq!(error.to_string(), "row 2: Monday has no 9am slot");
    }
}
