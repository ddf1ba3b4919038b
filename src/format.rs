//! Display formatting for durations and publication dates.

use chrono::{DateTime, Locale, NaiveDate};

/// Format a duration in seconds as `HH:MM:SS`.
///
/// Each unit is zero-padded to two digits. Hours are not wrapped at 24.
///
/// # Examples
///
/// ```
/// use podcastr::format::duration_to_time_string;
///
/// assert_eq!(duration_to_time_string(3981), "01:06:21");
/// assert_eq!(duration_to_time_string(0), "00:00:00");
/// ```
pub fn duration_to_time_string(duration: u64) -> String {
    let hours = duration / 3600;
    let minutes = (duration % 3600) / 60;
    let seconds = duration % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format an ISO-8601 publication date as `d MMM yy` in Brazilian Portuguese.
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates. Anything else is
/// returned unchanged so the UI still shows something.
///
/// # Examples
///
/// ```
/// use podcastr::format::format_published_at;
///
/// assert_eq!(format_published_at("2021-01-08 16:45:00"), "8 jan 21");
/// assert_eq!(format_published_at("yesterday"), "yesterday");
/// ```
pub fn format_published_at(published_at: &str) -> String {
    let trimmed = published_at.trim();

    let date = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
                .map(|dt| dt.date())
        })
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"));

    match date {
        Ok(date) => date
            .format_localized("%-d %b %y", Locale::pt_BR)
            .to_string(),
        Err(_) => published_at.to_string(),
    }
}
