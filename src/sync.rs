//! Streak reconciliation: recompute a member's streak from their post history
//! and write it back to the profile only when it changed.
//!
//! Read and write are not wrapped in a transaction; concurrent refreshes are
//! last-writer-wins and converge on the next refresh.

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::{PostRepo, ProfileRepo};
use crate::models::{Post, PostRecord, StreakResult};
use crate::streak::records::parse_timestamp;
use crate::streak::{compute_streak, parse_records, DayClock, StreakCalculator};

#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub result: StreakResult,
    pub previous: StreakResult,
    pub written: bool,
    /// Unique active dates, newest first
    pub active_days: Vec<NaiveDate>,
    pub total_devotionals: u32,
}

/// Load and validate every post of `user_id`
pub fn load_records(conn: &Connection, user_id: &str) -> Result<Vec<PostRecord>> {
    let raw = PostRepo::raw_posts_for_user(conn, user_id)?;
    parse_records(&raw).with_context(|| format!("Reading post history of '{}'", user_id))
}

/// Records dated on or before `reference`; later posts are not visible "as of" that date
pub fn records_as_of(
    records: Vec<PostRecord>,
    clock: DayClock,
    reference: NaiveDate,
) -> Vec<PostRecord> {
    records
        .into_iter()
        .filter(|r| clock.date_of(&r.timestamp) <= reference)
        .collect()
}

pub fn refresh_profile_streak(
    conn: &Connection,
    user_id: &str,
    clock: DayClock,
    reference: NaiveDate,
) -> Result<SyncOutcome> {
    let profile = ProfileRepo::get(conn, user_id)?
        .ok_or_else(|| anyhow!("No profile for user '{}'", user_id))?;
    let records = load_records(conn, user_id)?;
    let loaded = records.len();
    let records = records_as_of(records, clock, reference);
    if records.len() < loaded {
        log::debug!(
            "{} posts of {} dated after {} ignored",
            loaded - records.len(),
            user_id,
            reference
        );
    }

    let calc = StreakCalculator::new(clock);
    let active_days = calc.active_days(&records);
    let result = compute_streak(active_days.iter().copied(), reference);
    let previous = profile.stored_streak();

    let written = result != previous;
    if written {
        ProfileRepo::update_streak(conn, user_id, &result)?;
        log::info!(
            "streak for {} updated: {}/{} -> {}/{}",
            user_id,
            previous.current_streak,
            previous.max_streak,
            result.current_streak,
            result.max_streak
        );
    } else {
        log::debug!("streak for {} unchanged", user_id);
    }

    Ok(SyncOutcome {
        result,
        previous,
        written,
        active_days,
        total_devotionals: records.len() as u32,
    })
}

/// Store a check-in for an existing profile, then reconcile its streak.
/// Check-ins dated after `reference` are refused.
pub fn record_checkin(
    conn: &Connection,
    post: &Post,
    clock: DayClock,
    reference: NaiveDate,
) -> Result<SyncOutcome> {
    if ProfileRepo::get(conn, &post.user_id)?.is_none() {
        return Err(anyhow!("No profile for user '{}'", post.user_id));
    }
    let timestamp = parse_timestamp(&post.created_at)
        .ok_or_else(|| anyhow!("Invalid timestamp '{}'", post.created_at))?;
    let day = clock.date_of(&timestamp);
    if day > reference {
        bail!("Check-in date {} is after {}", day, reference);
    }
    PostRepo::insert(conn, post)?;
    log::info!("check-in stored for {} at {}", post.user_id, post.created_at);
    refresh_profile_streak(conn, &post.user_id, clock, reference)
}
