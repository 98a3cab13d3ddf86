use crate::settings::ClockFormat;
use chrono::{Datelike, Timelike};

pub fn format_time<T: Timelike>(t: &T, format: ClockFormat, show_seconds: bool) -> String {
    match format {
        ClockFormat::H24 => {
            if show_seconds {
                format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())
            } else {
                format!("{:02}:{:02}", t.hour(), t.minute())
            }
        }
        ClockFormat::H12 => {
            let (pm, hour) = t.hour12();
            let suffix = if pm { "PM" } else { "AM" };
            if show_seconds {
                format!("{:02}:{:02}:{:02} {}", hour, t.minute(), t.second(), suffix)
            } else {
                format!("{:02}:{:02} {}", hour, t.minute(), suffix)
            }
        }
    }
}

/// e.g. `Tuesday, March 4`
pub fn format_date<D: Datelike>(d: &D) -> String {
    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    let weekday = match d.weekday() {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    };
    format!("{}, {} {}", weekday, MONTHS[d.month0() as usize], d.day())
}
