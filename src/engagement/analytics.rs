//! Member activity analytics for administrators.
//!
//! Each member's streak is recomputed from their post dates rather than read
//! from the stored profile, so the report is correct even when a profile
//! has not been reconciled yet.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::{Profile, StreakResult};
use crate::streak::compute_streak;

#[derive(Debug, Clone, Serialize)]
pub struct MemberActivity {
    pub user_id: String,
    pub display_name: String,
    pub total_devotionals: u32,
    pub last_post_date: Option<NaiveDate>,
    pub streak: StreakResult,
    /// First day of the report window
    pub window_start: NaiveDate,
    /// Distinct days posted inside the report window
    pub active_days_in_window: u32,
    pub posts_in_window: u32,
}

impl MemberActivity {
    /// Last post falls inside the report window
    pub fn is_active(&self) -> bool {
        self.last_post_date.is_some_and(|d| d >= self.window_start)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub members: u32,
    pub active_members: u32,
    pub posts_in_window: u32,
    pub window_days: u32,
    pub average_current_streak: f64,
    pub longest_current_streak: u32,
}

/// First day of a `window_days` window that ends on `reference`
pub fn window_start(reference: NaiveDate, window_days: u32) -> NaiveDate {
    reference - Duration::days(window_days.max(1) as i64 - 1)
}

/// Activity of one member as of `reference`. `post_dates` holds one
/// clock-normalized date per post; posts after `reference` are ignored.
pub fn member_activity(
    profile: &Profile,
    post_dates: &[NaiveDate],
    reference: NaiveDate,
    window_days: u32,
) -> MemberActivity {
    let start = window_start(reference, window_days);
    let visible: Vec<NaiveDate> = post_dates
        .iter()
        .copied()
        .filter(|d| *d <= reference)
        .collect();
    let in_window: Vec<NaiveDate> = visible.iter().copied().filter(|d| *d >= start).collect();
    let distinct: BTreeSet<NaiveDate> = in_window.iter().copied().collect();

    MemberActivity {
        user_id: profile.user_id.clone(),
        display_name: profile.display_name.clone(),
        total_devotionals: visible.len() as u32,
        last_post_date: visible.iter().max().copied(),
        streak: compute_streak(visible.iter().copied(), reference),
        window_start: start,
        active_days_in_window: distinct.len() as u32,
        posts_in_window: in_window.len() as u32,
    }
}

pub fn summarize(members: &[MemberActivity], window_days: u32) -> ActivitySummary {
    if members.is_empty() {
        return ActivitySummary {
            window_days,
            ..Default::default()
        };
    }

    let streak_sum: u32 = members.iter().map(|m| m.streak.current_streak).sum();
    ActivitySummary {
        members: members.len() as u32,
        active_members: members.iter().filter(|m| m.is_active()).count() as u32,
        posts_in_window: members.iter().map(|m| m.posts_in_window).sum(),
        window_days,
        average_current_streak: streak_sum as f64 / members.len() as f64,
        longest_current_streak: members
            .iter()
            .map(|m| m.streak.current_streak)
            .max()
            .unwrap_or(0),
    }
}

/// Members ordered for the admin table: longest current streak first, then name
pub fn rank_members(members: &mut [MemberActivity]) {
    members.sort_by(|a, b| {
        b.streak
            .current_streak
            .cmp(&a.streak.current_streak)
            .then_with(|| a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn activity(name: &str, dates: &[NaiveDate]) -> MemberActivity {
        let profile = Profile::new(&name.to_lowercase(), name);
        member_activity(&profile, dates, d(10), 7)
    }

    #[test]
    fn test_member_activity_window() {
        let m = activity("Ana", &[d(10), d(10), d(9), d(1)]);
        assert_eq!(m.total_devotionals, 4);
        assert_eq!(m.last_post_date, Some(d(10)));
        assert_eq!(m.streak, StreakResult::new(2, 2));
        assert_eq!(m.window_start, d(4));
        assert_eq!(m.active_days_in_window, 2);
        assert_eq!(m.posts_in_window, 3);
        assert!(m.is_active());
    }

    #[test]
    fn test_window_counts_are_separate_from_totals() {
        let m = activity("Davi", &[d(1), d(2), d(3), d(4), d(4)]);
        assert_eq!(m.total_devotionals, 5);
        assert_eq!(m.posts_in_window, 2);
        assert_eq!(m.active_days_in_window, 1);

        let summary = summarize(&[m], 7);
        assert_eq!(summary.posts_in_window, 2);
        assert_eq!(summary.active_members, 1);
    }

    #[test]
    fn test_posts_after_reference_are_ignored() {
        let m = activity("Eva", &[d(12), d(1)]);
        assert_eq!(m.total_devotionals, 1);
        assert_eq!(m.last_post_date, Some(d(1)));
        assert_eq!(m.posts_in_window, 0);
        assert_eq!(m.streak, StreakResult::new(0, 1));
        assert!(!m.is_active());
    }

    #[test]
    fn test_inactive_member() {
        let m = activity("Bia", &[d(1), d(2)]);
        assert!(!m.is_active());
        assert_eq!(m.streak.current_streak, 0);
        assert_eq!(m.streak.max_streak, 2);

        let none = activity("Caio", &[]);
        assert_eq!(none.last_post_date, None);
        assert_eq!(none.streak, StreakResult::default());
        assert!(!none.is_active());
    }

    #[test]
    fn test_window_start() {
        assert_eq!(window_start(d(10), 7), d(4));
        assert_eq!(window_start(d(10), 1), d(10));
        assert_eq!(window_start(d(10), 0), d(10));
    }

    #[test]
    fn test_summary() {
        let members = vec![
            activity("Ana", &[d(10), d(9), d(8)]),
            activity("Bia", &[d(9)]),
            activity("Caio", &[d(1)]),
        ];
        let summary = summarize(&members, 7);
        assert_eq!(summary.members, 3);
        assert_eq!(summary.active_members, 2);
        assert_eq!(summary.posts_in_window, 4);
        assert_eq!(summary.longest_current_streak, 3);
        assert!((summary.average_current_streak - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[], 7);
        assert_eq!(summary.members, 0);
        assert_eq!(summary.window_days, 7);
        assert_eq!(summary.average_current_streak, 0.0);
    }

    #[test]
    fn test_rank_members() {
        let mut members = vec![
            activity("caio", &[d(10)]),
            activity("Ana", &[d(10), d(9)]),
            activity("Bia", &[d(10)]),
        ];
        rank_members(&mut members);
        let names: Vec<&str> = members.iter().map(|m| m.display_name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bia", "caio"]);
    }
}
