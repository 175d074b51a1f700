use chrono::NaiveDate;

use crate::models::{PostRecord, StreakResult};
use crate::streak::clock::DayClock;

/// Computes streaks from post records using one fixed clock zone
#[derive(Debug, Clone, Copy)]
pub struct StreakCalculator {
    clock: DayClock,
}

impl StreakCalculator {
    pub fn new(clock: DayClock) -> Self {
        Self { clock }
    }

    /// Calendar dates of `records` in the calculator's zone, newest first,
    /// one entry per date.
    pub fn active_days(&self, records: &[PostRecord]) -> Vec<NaiveDate> {
        unique_days_desc(records.iter().map(|r| self.clock.date_of(&r.timestamp)))
    }

    pub fn compute(&self, records: &[PostRecord], reference: NaiveDate) -> StreakResult {
        compute_streak(self.active_days(records), reference)
    }
}

fn unique_days_desc(days: impl IntoIterator<Item = NaiveDate>) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = days.into_iter().collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();
    days
}

fn gap_days(newer: NaiveDate, older: NaiveDate) -> i64 {
    newer.signed_duration_since(older).num_days()
}

/// Current and best streak over already-normalized calendar dates.
///
/// `dates` may be unordered and contain duplicates. The current streak only
/// counts when the latest date is `reference` or the day before it.
pub fn compute_streak(
    dates: impl IntoIterator<Item = NaiveDate>,
    reference: NaiveDate,
) -> StreakResult {
    let days = unique_days_desc(dates);
    let Some(&most_recent) = days.first() else {
        return StreakResult::default();
    };

    let anchored = match reference.pred_opt() {
        Some(yesterday) => most_recent == reference || most_recent == yesterday,
        None => most_recent == reference,
    };

    let mut current = 0u32;
    if anchored {
        current = 1;
        for pair in days.windows(2) {
            if gap_days(pair[0], pair[1]) != 1 {
                break;
            }
            current += 1;
        }
    }

    let mut best = 1u32;
    let mut chain = 1u32;
    for pair in days.windows(2) {
        if gap_days(pair[0], pair[1]) == 1 {
            chain += 1;
        } else {
            best = best.max(chain);
            chain = 1;
        }
    }
    // the last chain never hits the break branch
    best = best.max(chain);

    StreakResult::new(current, best.max(current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use pretty_assertions::assert_eq;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    /// 2024-06-10, a Monday
    fn reference() -> NaiveDate {
        d(10)
    }

    fn record(s: &str) -> PostRecord {
        PostRecord {
            timestamp: DateTime::parse_from_rfc3339(s).unwrap(),
        }
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<NaiveDate> = Vec::new();
        assert_eq!(compute_streak(empty, reference()), StreakResult::new(0, 0));
    }

    #[test]
    fn test_single_post_today() {
        assert_eq!(compute_streak(vec![d(10)], reference()), StreakResult::new(1, 1));
    }

    #[test]
    fn test_single_post_yesterday() {
        assert_eq!(compute_streak(vec![d(9)], reference()), StreakResult::new(1, 1));
    }

    #[test]
    fn test_single_post_two_days_ago() {
        assert_eq!(compute_streak(vec![d(8)], reference()), StreakResult::new(0, 1));
    }

    #[test]
    fn test_three_day_chain_ending_today() {
        let result = compute_streak(vec![d(10), d(9), d(8)], reference());
        assert_eq!(result, StreakResult::new(3, 3));
    }

    #[test]
    fn test_chain_anchored_yesterday() {
        let result = compute_streak(vec![d(9), d(8)], reference());
        assert_eq!(result, StreakResult::new(2, 2));
    }

    #[test]
    fn test_broken_chain_keeps_max() {
        let result = compute_streak(vec![d(7), d(6)], reference());
        assert_eq!(result, StreakResult::new(0, 2));
    }

    #[test]
    fn test_two_chains() {
        let result = compute_streak(vec![d(10), d(9), d(5), d(4), d(3)], reference());
        assert_eq!(result, StreakResult::new(2, 3));
    }

    #[test]
    fn test_longest_chain_last_in_walk() {
        // oldest chain is the longest and is only recorded after the loop
        let result = compute_streak(vec![d(10), d(6), d(5), d(4), d(3)], reference());
        assert_eq!(result, StreakResult::new(1, 4));
    }

    #[test]
    fn test_same_day_posts_dedupe() {
        let calc = StreakCalculator::new(DayClock::utc());
        let records = vec![
            record("2024-06-10T07:00:00Z"),
            record("2024-06-10T21:30:00Z"),
        ];
        assert_eq!(calc.compute(&records, reference()), StreakResult::new(1, 1));
    }

    #[test]
    fn test_midnight_crossing_is_consecutive() {
        let calc = StreakCalculator::new(DayClock::utc());
        let records = vec![
            record("2024-06-09T23:59:00Z"),
            record("2024-06-10T00:01:00Z"),
        ];
        assert_eq!(calc.compute(&records, reference()), StreakResult::new(2, 2));
    }

    #[test]
    fn test_twenty_hours_apart_same_day() {
        let calc = StreakCalculator::new(DayClock::utc());
        let records = vec![
            record("2024-06-10T01:00:00Z"),
            record("2024-06-10T21:00:00Z"),
        ];
        assert_eq!(calc.compute(&records, reference()), StreakResult::new(1, 1));
    }

    #[test]
    fn test_timezone_changes_adjacency() {
        // 23:00 and 01:00 UTC on consecutive UTC days are the same evening in Brasília
        let records = vec![
            record("2024-06-09T23:00:00Z"),
            record("2024-06-10T01:00:00Z"),
        ];
        let utc = StreakCalculator::new(DayClock::utc());
        let brasilia = StreakCalculator::new(DayClock::from_offset_minutes(-180).unwrap());
        assert_eq!(utc.compute(&records, reference()), StreakResult::new(2, 2));
        assert_eq!(brasilia.compute(&records, reference()), StreakResult::new(1, 1));
        assert_eq!(brasilia.active_days(&records), vec![d(9)]);
    }

    #[test]
    fn test_future_dates_break_current_streak() {
        let result = compute_streak(vec![d(12), d(11), d(10)], reference());
        assert_eq!(result, StreakResult::new(0, 3));
    }

    #[test]
    fn test_order_independent() {
        let ordered = vec![d(10), d(9), d(8), d(5), d(4)];
        let shuffled = vec![d(4), d(9), d(10), d(5), d(8)];
        assert_eq!(
            compute_streak(ordered, reference()),
            compute_streak(shuffled, reference())
        );
    }

    #[test]
    fn test_duplicates_do_not_inflate() {
        let base = vec![d(10), d(9), d(5)];
        let dup = vec![d(10), d(9), d(9), d(5), d(10), d(5)];
        assert_eq!(compute_streak(base, reference()), compute_streak(dup, reference()));
    }

    #[test]
    fn test_idempotent() {
        let calc = StreakCalculator::new(DayClock::utc());
        let records = vec![record("2024-06-10T07:00:00Z"), record("2024-06-08T07:00:00Z")];
        assert_eq!(
            calc.compute(&records, reference()),
            calc.compute(&records, reference())
        );
    }

    #[test]
    fn test_extending_chain_never_lowers_max() {
        let mut dates = vec![d(7), d(6)];
        let before = compute_streak(dates.clone(), reference());
        dates.push(d(8));
        let after = compute_streak(dates, reference());
        assert!(after.max_streak >= before.max_streak);
        assert_eq!(after.max_streak, 3);
    }

    #[test]
    fn test_max_never_below_current() {
        let start = d(1);
        for len in 0..20i64 {
            for skip in 0..3i64 {
                let dates: Vec<NaiveDate> = (0..len)
                    .filter(|i| skip == 0 || i % (skip + 2) != 0)
                    .map(|i| start + Duration::days(i))
                    .collect();
                let reference = start + Duration::days(len.max(1) - 1);
                let result = compute_streak(dates, reference);
                assert!(result.max_streak >= result.current_streak);
            }
        }
    }

    #[test]
    fn test_long_chain_across_month_boundary() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 25).unwrap();
        let dates: Vec<NaiveDate> = (0..17).map(|i| start + Duration::days(i)).collect();
        assert_eq!(compute_streak(dates, reference()), StreakResult::new(17, 17));
    }
}
