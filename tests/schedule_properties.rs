// tests/schedule_properties.rs

use chrono::{DateTime, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use proptest::prelude::*;

use anticron::schedule::{DailyTime, next_occurrence};

fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    // 2000-01-01 .. 2100-01-01, second resolution.
    (946_684_800i64..4_102_444_800i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

proptest! {
    #[test]
    fn next_occurrence_is_within_a_day_and_on_time(
        after in instant_strategy(),
        hour in 0u32..24,
        minute in 0u32..60,
    ) {
        let at = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
        let next = next_occurrence(at, &after);

        prop_assert!(next > after);
        prop_assert!(next - after <= TimeDelta::days(1));
        prop_assert_eq!(next.hour(), hour);
        prop_assert_eq!(next.minute(), minute);
        prop_assert_eq!(next.second(), 0);
    }

    #[test]
    fn repeated_rescheduling_advances_one_day_at_a_time(
        after in instant_strategy(),
        hour in 0u32..24,
        minute in 0u32..60,
    ) {
        let at = DailyTime::from_hm(hour, minute).unwrap();
        let first = at.next_after(&after);
        let second = at.next_after(&first);

        prop_assert_eq!(second - first, TimeDelta::days(1));
    }

    #[test]
    fn formatted_times_parse_back(hour in 0u32..24, minute in 0u32..60) {
        let text = format!("{hour:02}:{minute:02}");
        let parsed = DailyTime::parse(&text).unwrap();
        prop_assert_eq!(parsed.to_string(), text);
    }
}
