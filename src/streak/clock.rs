use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

use crate::error::EngagementError;

/// The single timezone used to turn timestamps into calendar dates.
///
/// Every post and the reference date must go through the same clock;
/// mixing UTC and local normalization breaks adjacency at day boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayClock {
    offset: FixedOffset,
}

impl DayClock {
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, EngagementError> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
            .ok_or(EngagementError::InvalidTimezone(minutes))
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }

    /// `ts` shifted into this clock's zone
    pub fn localize(&self, ts: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        ts.with_timezone(&self.offset)
    }

    /// Calendar date of `ts` in this clock's zone; time of day is dropped.
    pub fn date_of(&self, ts: &DateTime<FixedOffset>) -> NaiveDate {
        self.localize(ts).date_naive()
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Parse a `YYYY-MM-DD` reference date given on the command line
pub fn parse_reference_date(s: &str) -> Result<NaiveDate, EngagementError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| EngagementError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_offset_round_trip() {
        let clock = DayClock::from_offset_minutes(-180).unwrap();
        assert_eq!(clock.offset_minutes(), -180);
        assert_eq!(DayClock::utc().offset_minutes(), 0);
    }

    #[test]
    fn test_out_of_range_offset_rejected() {
        assert_eq!(
            DayClock::from_offset_minutes(24 * 60),
            Err(EngagementError::InvalidTimezone(1440))
        );
        assert!(DayClock::from_offset_minutes(i32::MAX).is_err());
    }

    #[test]
    fn test_date_of_depends_on_clock_zone() {
        // 01:30 UTC is still the previous evening in Brasília
        let t = ts("2024-06-10T01:30:00Z");
        let brasilia = DayClock::from_offset_minutes(-180).unwrap();
        assert_eq!(
            brasilia.date_of(&t),
            NaiveDate::from_ymd_opt(2024, 6, 9).unwrap()
        );
        assert_eq!(
            DayClock::utc().date_of(&t),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        );
    }

    #[test]
    fn test_date_of_ignores_source_offset() {
        let clock = DayClock::from_offset_minutes(-180).unwrap();
        let a = ts("2024-06-09T23:59:00-03:00");
        let b = ts("2024-06-10T02:59:00+00:00");
        assert_eq!(clock.date_of(&a), clock.date_of(&b));
    }

    #[test]
    fn test_parse_reference_date() {
        assert_eq!(
            parse_reference_date("2024-06-10").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        );
        assert!(matches!(
            parse_reference_date("10/06/2024"),
            Err(EngagementError::InvalidDate(_))
        ));
    }
}
