//! Timestamps attached to sensor updates.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::time::Duration;

/// A single logical point in time, millisecond resolution.
///
/// The epoch is chosen by whoever builds the scheduler: wall-clock UNIX time
/// on a host with a real clock, or time since boot on a device without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis().max(0) as u64)
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Interpret as milliseconds since the UNIX epoch.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0 as i64)
    }

    /// RFC 3339 rendering with millisecond precision, as Signal K expects.
    pub fn to_rfc3339(self) -> String {
        self.to_datetime()
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_else(|| format!("{}ms", self.0))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0.saturating_add(rhs.as_millis() as u64))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_duration() {
        let t = Timestamp::from_millis(1_000) + Duration::from_millis(250);
        assert_eq!(t.as_millis(), 1_250);
    }

    #[test]
    fn test_rfc3339() {
        let t = Timestamp::from_millis(1_500);
        assert_eq!(t.to_rfc3339(), "1970-01-01T00:00:01.500Z");
    }
}
