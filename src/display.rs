use std::path::Path;

use csv::Writer;
use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleSnapshot;

/// One booked slot as written to (and read back from) a schedule CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRow {
    pub day: String,
    pub time: String,
    pub student: String,
    pub interviewer: String,
}

/// Day-list text for a spot count: "no spots remaining", "1 spot remaining", "3 spots remaining"
pub fn format_spots(spots: usize) -> String {
    match spots {
        0 => "no spots remaining".to_string(),
        1 => "1 spot remaining".to_string(),
        n => format!("{} spots remaining", n),
    }
}

/// Formats a booking as shown in the week listing
pub fn format_booking(student: &str, interviewer: &str) -> String {
    format!("{} (with {})", student, interviewer)
}

/// Every booked slot of the week, in day then slot order
pub fn booking_rows(snapshot: &ScheduleSnapshot) -> Vec<BookingRow> {
    let mut rows = Vec::new();
    for day in snapshot.days() {
        for appointment in snapshot.appointments_for_day(&day.name) {
            if let Some(details) = snapshot.interview_details(appointment.id) {
                rows.push(BookingRow {
                    day: day.name.clone(),
                    time: appointment.time.clone(),
                    student: details.student.to_string(),
                    interviewer: details.interviewer.name.clone(),
                });
            }
        }
    }
    rows
}

/// Writes the week's bookings to a CSV file with a `day,time,student,interviewer` header
pub fn write_schedule_to_file<P: AsRef<Path>>(snapshot: &ScheduleSnapshot, path: P) -> Result<usize, csv::Error> {
    let mut writer = Writer::from_path(path)?;
    let rows = booking_rows(snapshot);
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(rows.len())
}

/// Prints the week in a readable format
pub fn print_week(snapshot: &ScheduleSnapshot) {
    for day in snapshot.days() {
        println!("\n=== {} ({}) ===", day.name, format_spots(snapshot.spots_remaining(day)));
        for appointment in snapshot.appointments_for_day(&day.name) {
            match snapshot.interview_details(appointment.id) {
                Some(details) => println!(
                    "  #{:<3} {:>5}  {}",
                    appointment.id,
                    appointment.time,
                    format_booking(details.student, &details.interviewer.name)
                ),
                None => println!("  #{:<3} {:>5}  [EMPTY]", appointment.id, appointment.time),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::fixture;

    #[test]
    fn spots_text_is_pluralised() {
        assert_eq!(format_spots(0), "no spots remaining");
        assert_eq!(format_spots(1), "1 spot remaining");
        assert_eq!(format_spots(2), "2 spots remaining");
    }

    #[test]
    fn rows_cover_every_booking_in_order() {
        let rows = booking_rows(&fixture::week());
        assert_eq!(rows.len(), 11);
        assert_eq!(
            rows[0],
            BookingRow {
                day: "Monday".to_string(),
                time: "1pm".to_string(),
                student: "Archie Cohen".to_string(),
                interviewer: "Tori Malcolm".to_string(),
            }
        );
        assert_eq!(rows[3].student, "Leopold Silvers");
    }

    #[test]
    fn writes_a_headed_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.csv");

        let written = write_schedule_to_file(&fixture::week(), &path).unwrap();
        assert_eq!(written, 11);

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("day,time,student,interviewer"));
        assert_eq!(lines.next(), Some("Monday,1pm,Archie Cohen,Tori Malcolm"));
    }
}
