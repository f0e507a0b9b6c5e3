//! Civil-time helpers. Administrators type times and members read them in a
//! single fixed timezone; everything stored is UTC.

use chrono::{DateTime, Duration, Locale, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub const EVENT_TZ: Tz = chrono_tz::Europe::Moscow;

/// Input format of the event start time (`dd.mm.yyyy hh:mm`).
pub const INPUT_FORMAT: &str = "%d.%m.%Y %H:%M";

const DISPLAY_FORMAT: &str = "%-d %b %H:%M";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartTimeError {
    Unparseable,
    NotInFuture,
}

/// Parse administrator input as a civil time in [`EVENT_TZ`] and convert it
/// to UTC. The result must be strictly after `now`.
pub fn parse_start_time(
    input: &str,
    now: DateTime<Utc>,
) -> std::result::Result<DateTime<Utc>, StartTimeError> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), INPUT_FORMAT)
        .map_err(|_| StartTimeError::Unparseable)?;
    let local = EVENT_TZ
        .from_local_datetime(&naive)
        .single()
        .ok_or(StartTimeError::Unparseable)?;
    let utc = local.with_timezone(&Utc);
    if utc <= now {
        return Err(StartTimeError::NotInFuture);
    }
    Ok(utc)
}

/// `d MMM HH:mm` in [`EVENT_TZ`] with Russian month names.
pub fn format_event_time(t: DateTime<Utc>) -> String {
    t.with_timezone(&EVENT_TZ)
        .format_localized(DISPLAY_FORMAT, Locale::ru_RU)
        .to_string()
}

/// Example start time shown in the creation prompt: one week after `now`.
pub fn example_start_time(now: DateTime<Utc>) -> String {
    (now + Duration::days(7))
        .with_timezone(&EVENT_TZ)
        .format(INPUT_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn converts_moscow_input_to_utc() {
        let now = utc(2026, 1, 1, 0, 0);
        let parsed = parse_start_time("01.01.2099 10:00", now).unwrap();
        assert_eq!(parsed, utc(2099, 1, 1, 7, 0));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let now = utc(2026, 1, 1, 0, 0);
        assert!(parse_start_time("  15.03.2030 18:30\n", now).is_ok());
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        let now = utc(2026, 1, 1, 0, 0);
        for input in ["tomorrow", "2099-01-01 10:00", "32.01.2099 10:00", "01.01.2099"] {
            assert_eq!(
                parse_start_time(input, now),
                Err(StartTimeError::Unparseable),
                "{input}"
            );
        }
    }

    #[test]
    fn rejects_times_that_are_not_strictly_in_the_future() {
        let now = utc(2030, 6, 1, 9, 0);
        // 12:00 MSK == 09:00 UTC.
        assert_eq!(
            parse_start_time("01.06.2030 12:00", now),
            Err(StartTimeError::NotInFuture)
        );
        assert_eq!(
            parse_start_time("01.01.2020 12:00", now),
            Err(StartTimeError::NotInFuture)
        );
        assert!(parse_start_time("01.06.2030 12:01", now).is_ok());
    }

    #[test]
    fn formats_in_the_event_timezone() {
        let shown = format_event_time(utc(2099, 1, 5, 7, 30));
        assert!(shown.starts_with("5 "), "{shown}");
        assert!(shown.ends_with("10:30"), "{shown}");
    }

    #[test]
    fn example_is_a_week_ahead_in_input_format() {
        let now = utc(2030, 6, 1, 9, 0);
        assert_eq!(example_start_time(now), "08.06.2030 12:00");
    }
}
