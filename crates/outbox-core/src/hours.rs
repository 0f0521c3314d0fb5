//! Business-hours evaluation.

use chrono::{DateTime, Datelike, TimeZone, Timelike};

use outbox_types::config::BusinessHours;

/// Whether `instant` falls inside the configured business hours.
///
/// True iff the instant's weekday is one of the configured business weekdays
/// and its hour is within `[start_hour, end_hour)`. Generic over the time
/// zone so callers evaluate wall-clock time and tests inject a fixed instant.
pub fn is_business_hours<Tz: TimeZone>(instant: &DateTime<Tz>, config: &BusinessHours) -> bool {
    let on_business_day = config.weekdays.contains(&instant.weekday());
    let hour = instant.hour();
    let within_window = hour >= config.start_hour && hour < config.end_hour;

    on_business_day && within_window
}
