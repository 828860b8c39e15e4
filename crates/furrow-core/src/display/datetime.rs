//! Timestamp display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a timestamp as `YYYY-MM-DD HH:MM TZ` in a given time zone.
///
/// Plan metadata uses the system time zone; reminder triggers use the
/// planner's configured zone so they match what the device will show.
pub struct LocalDateTime<'a> {
    timestamp: &'a Timestamp,
    time_zone: TimeZone,
}

impl<'a> LocalDateTime<'a> {
    pub fn new(timestamp: &'a Timestamp, time_zone: TimeZone) -> Self {
        Self {
            timestamp,
            time_zone,
        }
    }

    pub fn system(timestamp: &'a Timestamp) -> Self {
        Self::new(timestamp, TimeZone::system())
    }
}

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.timestamp
                .to_zoned(self.time_zone.clone())
                .strftime("%Y-%m-%d %H:%M %Z")
        )
    }
}
