use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::{CycleProgress, EngagementSnapshot, WeeklyProgress};

/// Devotionals per gamification cycle
pub const CYCLE_LENGTH: u32 = 10;

pub const DAYS_PER_WEEK: u32 = 7;

pub fn cycle_progress(total_devotionals: u32) -> CycleProgress {
    let remainder = total_devotionals % CYCLE_LENGTH;
    let current_cycle_progress = if remainder == 0 && total_devotionals > 0 {
        CYCLE_LENGTH
    } else {
        remainder
    };
    CycleProgress {
        completed_cycles: total_devotionals / CYCLE_LENGTH,
        current_cycle_progress,
    }
}

/// Distinct weekdays posted this week, out of seven
pub fn weekly_progress(days: &[Weekday]) -> WeeklyProgress {
    let mut seen = [false; DAYS_PER_WEEK as usize];
    for day in days {
        seen[day.num_days_from_sunday() as usize] = true;
    }
    let count = (seen.iter().filter(|s| **s).count() as u32).min(DAYS_PER_WEEK);
    WeeklyProgress {
        count,
        percentage: count as f64 / DAYS_PER_WEEK as f64 * 100.0,
    }
}

/// Presentation tier for the current cycle progress
pub fn flame_level(current_cycle_progress: u32) -> u8 {
    match current_cycle_progress {
        0..=2 => 1,
        3 | 4 => 2,
        5 | 6 => 3,
        7 | 8 => 4,
        9 => 5,
        _ => 6,
    }
}

/// Sunday that opens the calendar week containing `reference`
pub fn week_start(reference: NaiveDate) -> NaiveDate {
    reference - Duration::days(reference.weekday().num_days_from_sunday() as i64)
}

/// Weekdays of `dates` that fall inside the Sunday-start week of `reference`
pub fn week_days(
    dates: impl IntoIterator<Item = NaiveDate>,
    reference: NaiveDate,
) -> Vec<Weekday> {
    let start = week_start(reference);
    let end = start + Duration::days(DAYS_PER_WEEK as i64 - 1);
    dates
        .into_iter()
        .filter(|d| *d >= start && *d <= end)
        .map(|d| d.weekday())
        .collect()
}

impl EngagementSnapshot {
    pub fn new(total_devotionals: u32, weekly_days: &[Weekday]) -> Self {
        let cycle = cycle_progress(total_devotionals);
        Self {
            completed_cycles: cycle.completed_cycles,
            current_cycle_progress: cycle.current_cycle_progress,
            weekly_progress: weekly_progress(weekly_days).count,
            flame_level: flame_level(cycle.current_cycle_progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[test]
    fn test_cycle_progress_boundaries() {
        assert_eq!(
            cycle_progress(0),
            CycleProgress { completed_cycles: 0, current_cycle_progress: 0 }
        );
        assert_eq!(
            cycle_progress(10),
            CycleProgress { completed_cycles: 1, current_cycle_progress: 10 }
        );
        assert_eq!(
            cycle_progress(11),
            CycleProgress { completed_cycles: 1, current_cycle_progress: 1 }
        );
        assert_eq!(
            cycle_progress(37),
            CycleProgress { completed_cycles: 3, current_cycle_progress: 7 }
        );
        assert_eq!(
            cycle_progress(40),
            CycleProgress { completed_cycles: 4, current_cycle_progress: 10 }
        );
    }

    #[test]
    fn test_flame_levels() {
        let levels: Vec<u8> = (0..=10).map(flame_level).collect();
        assert_eq!(levels, vec![1, 1, 1, 2, 2, 3, 3, 4, 4, 5, 6]);
        assert_eq!(flame_level(25), 6);
    }

    #[test]
    fn test_weekly_progress_counts_distinct_days() {
        let progress = weekly_progress(&[Weekday::Mon, Weekday::Mon, Weekday::Wed]);
        assert_eq!(progress.count, 2);
        assert!((progress.percentage - 200.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_progress_full_and_empty() {
        let all = [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        assert_eq!(weekly_progress(&all).count, 7);
        assert_eq!(weekly_progress(&all).percentage, 100.0);
        assert_eq!(weekly_progress(&[]), WeeklyProgress { count: 0, percentage: 0.0 });
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // 2024-06-10 is a Monday
        assert_eq!(week_start(d(6, 10)), d(6, 9));
        assert_eq!(week_start(d(6, 9)), d(6, 9));
        assert_eq!(week_start(d(6, 15)), d(6, 9));
        assert_eq!(week_start(d(6, 2)), d(6, 2));
    }

    #[test]
    fn test_week_days_excludes_previous_week() {
        let dates = vec![d(6, 8), d(6, 9), d(6, 10), d(6, 10)];
        assert_eq!(
            week_days(dates, d(6, 10)),
            vec![Weekday::Sun, Weekday::Mon, Weekday::Mon]
        );
    }

    #[test]
    fn test_snapshot() {
        let snapshot = EngagementSnapshot::new(19, &[Weekday::Sun, Weekday::Mon]);
        assert_eq!(
            snapshot,
            EngagementSnapshot {
                completed_cycles: 1,
                current_cycle_progress: 9,
                weekly_progress: 2,
                flame_level: 5,
            }
        );
        assert_eq!(EngagementSnapshot::new(0, &[]).flame_level, 1);
        assert_eq!(EngagementSnapshot::new(20, &[]).flame_level, 6);
    }
}
