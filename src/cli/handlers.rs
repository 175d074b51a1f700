use anyhow::{anyhow, bail, Context, Result};
use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use std::collections::BTreeSet;
use std::path::Path;

use crate::config::AppConfig;
use crate::db::{PostRepo, ProfileRepo};
use crate::engagement::{
    member_activity, rank_members, summarize, week_days, week_start, weekly_progress,
    CYCLE_LENGTH, DAYS_PER_WEEK,
};
use crate::models::{EngagementSnapshot, ImportedPost, Post, RawPost};
use crate::streak::records::parse_timestamp;
use crate::streak::{compute_streak, parse_records, parse_reference_date, DayClock, StreakCalculator};
use crate::sync::{load_records, record_checkin, records_as_of, refresh_profile_streak};
use crate::utils::format::{flame_label, format_percentage, progress_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const FLAME: &str = "\x1b[38;2;232;120;48m";

// ─── Shared ──────────────────────────────────────────────────────────────────

/// Engagement state of one member as of a reference date
struct MemberView {
    total_devotionals: u32,
    /// One date per post
    post_dates: Vec<NaiveDate>,
    active_days: Vec<NaiveDate>,
}

fn member_view(
    conn: &Connection,
    user_id: &str,
    clock: DayClock,
    reference: NaiveDate,
) -> Result<MemberView> {
    let records = records_as_of(load_records(conn, user_id)?, clock, reference);
    Ok(MemberView {
        total_devotionals: records.len() as u32,
        post_dates: records.iter().map(|r| clock.date_of(&r.timestamp)).collect(),
        active_days: StreakCalculator::new(clock).active_days(&records),
    })
}

fn resolve_reference(date: Option<&str>, clock: DayClock) -> Result<NaiveDate> {
    match date {
        Some(s) => Ok(parse_reference_date(s)?),
        None => Ok(clock.today()),
    }
}

fn ensure_own_profile(conn: &Connection, config: &AppConfig) -> Result<()> {
    ProfileRepo::ensure(conn, &config.member.user_id, &config.member.display_name)?;
    Ok(())
}

fn print_snapshot(snapshot: &EngagementSnapshot) {
    let ring = progress_bar(snapshot.current_cycle_progress, CYCLE_LENGTH, 10);
    println!(
        "  Cycle:       {}  {}/{}  ({} completed)",
        ring, snapshot.current_cycle_progress, CYCLE_LENGTH, snapshot.completed_cycles
    );
    println_colored!(
        FLAME,
        "  Flame:       level {} · {}",
        snapshot.flame_level,
        flame_label(snapshot.flame_level)
    );
    println!(
        "  This week:   {}/{} days",
        snapshot.weekly_progress, DAYS_PER_WEEK
    );
}

// ─── Post ────────────────────────────────────────────────────────────────────

pub fn handle_post(
    conn: &Connection,
    config: &AppConfig,
    reflection: &str,
    scripture: Option<&str>,
    media: Option<&str>,
    at: Option<&str>,
) -> Result<()> {
    let reflection = reflection.trim();
    if reflection.is_empty() {
        bail!("A check-in needs a reflection");
    }
    let clock = config.day_clock()?;
    let timestamp = match at {
        Some(s) => parse_timestamp(s).ok_or_else(|| anyhow!("Invalid timestamp '{}'", s))?,
        None => clock.now(),
    };
    if clock.date_of(&timestamp) > clock.today() {
        bail!("Cannot check in for {}: that day has not started yet", clock.date_of(&timestamp));
    }

    ensure_own_profile(conn, config)?;
    let post = Post::checkin(&config.member.user_id, reflection, scripture, media, timestamp);
    let today = clock.today();
    let outcome = record_checkin(conn, &post, clock, today)?;
    let weekly = week_days(outcome.active_days.iter().copied(), today);
    let snapshot = EngagementSnapshot::new(outcome.total_devotionals, &weekly);

    println!();
    println_colored!(GREEN, "  ✓ Check-in recorded ({})", clock.date_of(&timestamp));
    println_colored!(
        BOLD,
        "  Streak:      {} days current  |  {} days best",
        outcome.result.current_streak,
        outcome.result.max_streak
    );
    print_snapshot(&snapshot);
    if snapshot.current_cycle_progress == CYCLE_LENGTH {
        println_colored!(AMBER, "  ★ Cycle {} complete!", snapshot.completed_cycles);
    }
    println!();
    Ok(())
}

// ─── Streak ──────────────────────────────────────────────────────────────────

pub fn handle_streak(conn: &Connection, config: &AppConfig, date: Option<&str>) -> Result<()> {
    let clock = config.day_clock()?;
    ensure_own_profile(conn, config)?;
    let user_id = &config.member.user_id;

    println!();
    match date {
        None => {
            let outcome = refresh_profile_streak(conn, user_id, clock, clock.today())?;
            println_colored!(
                BOLD,
                "  Streak:      {} days current  |  {} days best",
                outcome.result.current_streak,
                outcome.result.max_streak
            );
            if outcome.written {
                println_colored!(
                    DIM,
                    "  Profile updated (was {} / {})",
                    outcome.previous.current_streak,
                    outcome.previous.max_streak
                );
            }
        }
        Some(_) => {
            let reference = resolve_reference(date, clock)?;
            let view = member_view(conn, user_id, clock, reference)?;
            let result = compute_streak(view.active_days, reference);
            println_colored!(
                BOLD,
                "  Streak on {}:  {} days current  |  {} days best",
                reference,
                result.current_streak,
                result.max_streak
            );
        }
    }
    println!();
    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats(
    conn: &Connection,
    config: &AppConfig,
    week: bool,
    date: Option<&str>,
) -> Result<()> {
    let clock = config.day_clock()?;
    ensure_own_profile(conn, config)?;
    let reference = resolve_reference(date, clock)?;
    let view = member_view(conn, &config.member.user_id, clock, reference)?;

    let streak = compute_streak(view.active_days.iter().copied(), reference);
    let weekly = week_days(view.active_days.iter().copied(), reference);
    let snapshot = EngagementSnapshot::new(view.total_devotionals, &weekly);
    let progress = weekly_progress(&weekly);

    println!();
    println_colored!(FLAME, "  Geração Life — {}", config.member.display_name);
    println_colored!(DIM, "  as of {}", reference);
    println!();
    println_colored!(
        BOLD,
        "  Streak:      {} days current  |  {} days best",
        streak.current_streak,
        streak.max_streak
    );
    println!("  Devotionals: {}", view.total_devotionals);
    print_snapshot(&snapshot);
    println!("  Week goal:   {}", format_percentage(progress.percentage));

    if week {
        let start = week_start(reference);
        let posted: BTreeSet<NaiveDate> = view.active_days.iter().copied().collect();
        println!();
        println_colored!(DIM, "  D  S  T  Q  Q  S  S   (● posted, ○ missed, · ahead)");
        print!("  ");
        for offset in 0..DAYS_PER_WEEK as i64 {
            let day = start + Duration::days(offset);
            let icon = if posted.contains(&day) {
                format!("{}●\x1b[0m  ", GREEN)
            } else if day > reference {
                format!("{}·\x1b[0m  ", DIM)
            } else {
                format!("{}○\x1b[0m  ", DIM)
            };
            print!("{}", icon);
        }
        println!();
    }

    println!();
    Ok(())
}

// ─── Members (admin) ─────────────────────────────────────────────────────────

pub fn handle_members(conn: &Connection, config: &AppConfig, days: Option<u32>) -> Result<()> {
    let me = ProfileRepo::get(conn, &config.member.user_id)?;
    if !me.map(|p| p.is_admin).unwrap_or(false) {
        bail!("The members report is only available to administrators");
    }

    let clock = config.day_clock()?;
    let reference = clock.today();
    let window = days.unwrap_or(config.analytics.window_days).max(1);

    let mut members = Vec::new();
    for profile in ProfileRepo::list(conn)? {
        let view = member_view(conn, &profile.user_id, clock, reference)?;
        members.push(member_activity(&profile, &view.post_dates, reference, window));
    }
    rank_members(&mut members);
    let summary = summarize(&members, window);

    println!();
    println_colored!(FLAME, "  Member activity — last {} days", window);
    println!();
    println_colored!(
        DIM,
        "  {:<24} {:>7} {:>7} {:>6} {:>5} {:>6}  {}",
        "Member",
        "Streak",
        "Best",
        "Total",
        "Days",
        "Posts",
        "Last post"
    );
    for m in &members {
        let last = m
            .last_post_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "—".to_string());
        let line = format!(
            "  {:<24} {:>7} {:>7} {:>6} {:>5} {:>6}  {}",
            m.display_name,
            m.streak.current_streak,
            m.streak.max_streak,
            m.total_devotionals,
            m.active_days_in_window,
            m.posts_in_window,
            last
        );
        if m.is_active() {
            println!("{}", line);
        } else {
            println_colored!(DIM, "{}", line);
        }
    }
    println!();
    println_colored!(
        BOLD,
        "  {} of {} members active  ·  {} posts in window  ·  avg streak {:.1}  ·  top {}",
        summary.active_members,
        summary.members,
        summary.posts_in_window,
        summary.average_current_streak,
        summary.longest_current_streak
    );
    println!();
    Ok(())
}

// ─── Import ──────────────────────────────────────────────────────────────────

pub fn handle_import(conn: &Connection, config: &AppConfig, path: &Path) -> Result<()> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
    let entries: Vec<ImportedPost> =
        serde_json::from_str(&content).with_context(|| format!("Parsing {:?}", path))?;

    let imported = import_posts(conn, config, &entries)?;
    println_colored!(
        GREEN,
        "  ✓ Imported {} posts for {} members",
        entries.len(),
        imported.len()
    );
    Ok(())
}

/// Validate every entry, insert them in one transaction, then reconcile the
/// streak of each affected member. Returns the affected user ids.
pub fn import_posts(
    conn: &Connection,
    config: &AppConfig,
    entries: &[ImportedPost],
) -> Result<BTreeSet<String>> {
    let raw: Vec<RawPost> = entries
        .iter()
        .map(|e| RawPost::new(e.created_at.clone()))
        .collect();
    let records = parse_records(&raw)?;

    let tx = conn.unchecked_transaction()?;
    let mut users = BTreeSet::new();
    for (entry, record) in entries.iter().zip(&records) {
        let user_id = entry
            .user_id
            .clone()
            .unwrap_or_else(|| config.member.user_id.clone());
        if users.insert(user_id.clone()) {
            let name = if user_id == config.member.user_id {
                config.member.display_name.as_str()
            } else {
                user_id.as_str()
            };
            ProfileRepo::ensure(&tx, &user_id, name)?;
        }
        let post = Post::checkin(
            &user_id,
            entry.reflection.as_deref().unwrap_or_default(),
            entry.scripture.as_deref(),
            entry.media_url.as_deref(),
            record.timestamp,
        );
        PostRepo::insert(&tx, &post)?;
    }
    tx.commit()?;
    log::info!("imported {} posts for {} members", entries.len(), users.len());

    let clock = config.day_clock()?;
    let today = clock.today();
    for user_id in &users {
        refresh_profile_streak(conn, user_id, clock, today)?;
    }
    Ok(users)
}

// ─── Export ──────────────────────────────────────────────────────────────────

pub fn handle_export(conn: &Connection, config: &AppConfig) -> Result<()> {
    let clock = config.day_clock()?;
    ensure_own_profile(conn, config)?;
    let today = clock.today();
    let outcome = refresh_profile_streak(conn, &config.member.user_id, clock, today)?;
    let weekly = week_days(outcome.active_days.iter().copied(), today);
    let snapshot = EngagementSnapshot::new(outcome.total_devotionals, &weekly);
    let profile = ProfileRepo::get(conn, &config.member.user_id)?
        .ok_or_else(|| anyhow!("No profile for user '{}'", config.member.user_id))?;

    let doc = serde_json::json!({
        "date": today.format("%Y-%m-%d").to_string(),
        "profile": profile,
        "totalDevotionals": outcome.total_devotionals,
        "streak": outcome.result,
        "engagement": snapshot,
        "weeklyGoal": weekly_progress(&weekly),
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
