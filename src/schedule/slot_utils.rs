use chrono::{Duration, NaiveTime};
use super::types::Appointment;

/// Formats a slot start time the way the schedule shows it ("12pm", "4pm", "9:30am")
pub fn format_slot_time(time: NaiveTime) -> String {
    if time.format("%M").to_string() == "00" {
        time.format("%-I%P").to_string()
    } else {
        time.format("%-I:%M%P").to_string()
    }
}

/// Parses a slot label back into a time ("12pm" -> 12:00, "9:30am" -> 09:30)
pub fn parse_slot_time(label: &str) -> Option<NaiveTime> {
    let label = label.trim().to_lowercase();
    let (clock, afternoon) = if let Some(clock) = label.strip_suffix("am") {
        (clock, false)
    } else if let Some(clock) = label.strip_suffix("pm") {
        (clock, true)
    } else {
        return None;
    };

    let (hours, minutes) = match clock.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None => (clock.parse::<u32>().ok()?, 0),
    };
    if !(1..=12).contains(&hours) {
        return None;
    }

    let hours = match (hours, afternoon) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Builds `count` hourly slot labels starting at `start`
pub fn hourly_slots(start: NaiveTime, count: usize) -> Vec<String> {
    (0..count)
        .map(|offset| {
            let (time, _) = start.overflowing_add_signed(Duration::hours(offset as i64));
            format_slot_time(time)
        })
        .collect()
}

/// Counts appointments with no interview booked
pub fn count_open_slots<'a>(appointments: impl IntoIterator<Item = &'a Appointment>) -> usize {
    appointments
        .into_iter()
        .filter(|appointment| !appointment.is_booked())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hourly_slots_from_noon() {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(hourly_slots(noon, 5), vec!["12pm", "1pm", "2pm", "3pm", "4pm"]);
    }

    #[test]
    fn parses_labels_with_and_without_minutes() {
        assert_eq!(parse_slot_time("12pm"), NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(parse_slot_time("12am"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_slot_time(" 9:30AM "), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_slot_time("13pm"), None);
        assert_eq!(parse_slot_time("noon"), None);
        assert_eq!(parse_slot_time("m"), None);
    }

    #[test]
    fn formats_half_hours() {
        let time = NaiveTime::from_hms_opt(21, 30, 0).unwrap();
        assert_eq!(format_slot_time(time), "9:30pm");
    }
}
