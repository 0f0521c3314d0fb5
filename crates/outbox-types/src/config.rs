//! Business-hours configuration.

use chrono::Weekday;

/// Business-hours window used to pick the auto-reply body.
///
/// `end_hour` is exclusive: the default window 8..18 covers 08:00:00 through
/// 17:59:59 on the configured weekdays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessHours {
    pub start_hour: u32,
    /// First hour outside the window.
    pub end_hour: u32,
    pub weekdays: Vec<Weekday>,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 18,
            weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }
}
