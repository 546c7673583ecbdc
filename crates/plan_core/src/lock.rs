use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Lifecycle timestamps of one calendar day. Opened when the user starts the
/// day, shut down when they close it out.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayRecord {
    pub opened_at: Option<DateTime<Utc>>,
    pub shutdown_at: Option<DateTime<Utc>>,
}

impl DayRecord {
    /// The day is currently being executed.
    pub fn is_open(&self) -> bool {
        self.opened_at.is_some() && self.shutdown_at.is_none()
    }
}

/// Whether `target` is locked against standing-routine and window mutation.
///
/// A weekday locks only while the user is actively running it: today falls on
/// that weekday and today's record is opened but not yet shut down. Derived
/// fresh on every call, never stored.
pub fn is_locked(target: Weekday, today: NaiveDate, record: Option<&DayRecord>) -> bool {
    if today.weekday() != target {
        return false;
    }
    record.is_some_and(DayRecord::is_open)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn wednesday() -> NaiveDate {
        // 2026-02-04 is a Wednesday.
        NaiveDate::from_ymd_opt(2026, 2, 4).unwrap()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 4, hour, 0, 0).unwrap()
    }

    #[test]
    fn open_day_locks_its_own_weekday() {
        let record = DayRecord {
            opened_at: Some(at(8)),
            shutdown_at: None,
        };
        assert!(is_locked(Weekday::Wed, wednesday(), Some(&record)));
    }

    #[test]
    fn other_weekdays_stay_unlocked() {
        let record = DayRecord {
            opened_at: Some(at(8)),
            shutdown_at: None,
        };
        for target in [Weekday::Mon, Weekday::Tue, Weekday::Thu, Weekday::Fri, Weekday::Sat, Weekday::Sun] {
            assert!(!is_locked(target, wednesday(), Some(&record)));
        }
    }

    #[test]
    fn unopened_day_does_not_lock() {
        assert!(!is_locked(Weekday::Wed, wednesday(), None));
        assert!(!is_locked(Weekday::Wed, wednesday(), Some(&DayRecord::default())));
    }

    #[test]
    fn shutdown_releases_the_lock() {
        let record = DayRecord {
            opened_at: Some(at(8)),
            shutdown_at: Some(at(18)),
        };
        assert!(!is_locked(Weekday::Wed, wednesday(), Some(&record)));
    }
}
