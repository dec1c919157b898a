// src/schedule/daily.rs

//! Daily time-of-day arithmetic.

use std::fmt;

use chrono::{DateTime, Days, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike};

/// A time of day at which a task runs once per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DailyTime(NaiveTime);

impl DailyTime {
    /// Parse `"HH:MM"` (or `"HH:MM:SS"`).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let shape_ok = matches!(s.len(), 5 | 8)
            && s.bytes()
                .enumerate()
                .all(|(i, b)| if i % 3 == 2 { b == b':' } else { b.is_ascii_digit() });
        if !shape_ok {
            return None;
        }

        let format = if s.len() == 5 { "%H:%M" } else { "%H:%M:%S" };
        NaiveTime::parse_from_str(s, format).ok().map(DailyTime)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(DailyTime)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// The first instant strictly after `after` whose local time is `self`.
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> DateTime<Tz> {
        next_occurrence(self.0, after)
    }
}

impl fmt::Display for DailyTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.second() == 0 {
            write!(f, "{}", self.0.format("%H:%M"))
        } else {
            write!(f, "{}", self.0.format("%H:%M:%S"))
        }
    }
}

/// The first instant strictly after `after` whose wall-clock time in
/// `after`'s zone is `at`.
///
/// A local time that does not exist on a given day (DST gap) is moved one
/// hour forward; an ambiguous one (DST overlap) takes the earlier instant.
pub fn next_occurrence<Tz: TimeZone>(at: NaiveTime, after: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = after.timezone();
    let start = after.date_naive();

    for offset in 0..=2 {
        let Some(date) = start.checked_add_days(Days::new(offset)) else {
            break;
        };
        let candidate = resolve_local(&tz, date.and_time(at));
        if candidate > *after {
            return candidate;
        }
    }

    after.clone() + TimeDelta::days(1)
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(naive + TimeDelta::hours(1)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}
