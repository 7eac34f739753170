//! Incident timestamp and date-of-birth parsing.
//!
//! Both parsers return `None` for anything they cannot read; corrupted or
//! placeholder date text is expected and must not stop the batch.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

pub const TWO_DIGIT_YEAR_FORMAT: &str = "%m/%d/%y %H:%M";
pub const FOUR_DIGIT_YEAR_FORMAT: &str = "%m/%d/%Y %H:%M";
pub const DATE_OF_BIRTH_FORMAT: &str = "%Y-%m-%d";

/// Parse the incident date and time cells into one timestamp.
///
/// A date cell containing whitespace carries its own time (merged layout)
/// and overrides `time`. Colon-less four character times such as `1430`
/// are read as `14:30`.
pub fn parse_incident_datetime(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    let (date, time) = match date.split_once(char::is_whitespace) {
        Some((d, t)) => (d, t.trim()),
        None => (date, time.trim()),
    };

    let time = normalize_time(time);
    let format = year_format(date);

    match NaiveDateTime::parse_from_str(&format!("{} {}", date, time), format) {
        Ok(dt) => Some(dt),
        Err(e) => {
            warn!("Error parsing datetime: {} {} ({})", date, time, e);
            None
        }
    }
}

/// `1430` → `14:30`; anything else is returned as-is.
fn normalize_time(time: &str) -> String {
    if !time.contains(':') && time.chars().count() == 4 {
        let (hours, minutes): (String, String) = {
            let mut chars = time.chars();
            let hours = chars.by_ref().take(2).collect();
            (hours, chars.collect())
        };
        format!("{}:{}", hours, minutes)
    } else {
        time.to_string()
    }
}

/// Year width comes from the last slash-delimited segment of the date.
fn year_format(date: &str) -> &'static str {
    let year = date.rsplit('/').next().unwrap_or("");
    if year.chars().count() == 2 {
        TWO_DIGIT_YEAR_FORMAT
    } else {
        FOUR_DIGIT_YEAR_FORMAT
    }
}

/// Parse a `YYYY-MM-DD` date of birth. Only exact 10-character values are
/// attempted.
pub fn parse_date_of_birth(raw: &str) -> Option<NaiveDate> {
    if raw.chars().count() != 10 {
        if !raw.is_empty() {
            debug!("Skipping date of birth with unexpected length: {:?}", raw);
        }
        return None;
    }
    match NaiveDate::parse_from_str(raw, DATE_OF_BIRTH_FORMAT) {
        Ok(d) => Some(d),
        Err(e) => {
            warn!("Error parsing DOB: {} ({})", raw, e);
            None
        }
    }
}
