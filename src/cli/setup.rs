use anyhow::{Context, Result};
use rusqlite::Connection;
use std::io::{self, BufRead, Write};

use crate::config::AppConfig;
use crate::db::{MetaRepo, ProfileRepo};
use crate::models::Profile;
use crate::streak::DayClock;

pub fn handle_setup(conn: &Connection, config: &mut AppConfig, reset: bool) -> Result<()> {
    if !reset {
        if let Some(done) = MetaRepo::get(conn, "setup_done")? {
            if done == "1" {
                println!("Geração Life is already configured. Use --reset to reconfigure.");
                return Ok(());
            }
        }
    }

    println!();
    println!("  Geração Life — setup");
    println!();

    let name = prompt(&format!("  Your name [{}]: ", config.member.display_name))?;
    if !name.trim().is_empty() {
        config.member.display_name = name.trim().to_string();
    }

    let user_id = prompt(&format!("  Member id [{}]: ", config.member.user_id))?;
    if !user_id.trim().is_empty() {
        config.member.user_id = user_id.trim().to_string();
    }

    loop {
        let tz = prompt(&format!(
            "  UTC offset, e.g. -3 or +5:30 [{}]: ",
            format_tz_offset(config.clock.timezone_offset)
        ))?;
        if tz.trim().is_empty() {
            break;
        }
        match parse_tz_offset(tz.trim()) {
            Ok(minutes) if DayClock::from_offset_minutes(minutes).is_ok() => {
                config.clock.timezone_offset = minutes;
                break;
            }
            _ => println!("  '{}' is not a valid offset", tz.trim()),
        }
    }

    // The admin flag lives on the profile only
    let mut profile = ProfileRepo::get(conn, &config.member.user_id)?
        .unwrap_or_else(|| Profile::new(&config.member.user_id, &config.member.display_name));
    let current = if profile.is_admin { "Y/n" } else { "y/N" };
    let admin = prompt(&format!("  Administrator? [{}]: ", current))?;
    profile.is_admin = parse_yes_no(&admin, profile.is_admin);

    config.save().context("Saving config")?;

    profile.display_name = config.member.display_name.clone();
    ProfileRepo::upsert(conn, &profile)?;
    MetaRepo::set(conn, "setup_done", "1")?;

    println!();
    println!(
        "  ✓ Saved. Day boundaries use UTC{}.",
        format_tz_offset(config.clock.timezone_offset)
    );
    println!();
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().lock().read_line(&mut buf)?;
    Ok(buf.trim_end_matches('\n').trim_end_matches('\r').to_string())
}

/// Yes/no answer; blank keeps `current`
fn parse_yes_no(answer: &str, current: bool) -> bool {
    match answer.trim().to_lowercase().as_str() {
        "" => current,
        "y" | "yes" | "s" | "sim" => true,
        _ => false,
    }
}

/// Parse a UTC offset string into total minutes.
/// Accepts: "-3", "-03:00", "+5:30", "5", "5.5"
pub fn parse_tz_offset(s: &str) -> Result<i32> {
    let s = s.trim_start_matches('+');
    let negative = s.starts_with('-');
    let s = s.trim_start_matches('-');
    let sign = if negative { -1 } else { 1 };

    let minutes = if s.contains(':') {
        let mut parts = s.splitn(2, ':');
        let hours: i32 = parts.next().unwrap_or("0").parse()?;
        let mins: i32 = parts.next().unwrap_or("0").parse()?;
        hours * 60 + mins
    } else if s.contains('.') {
        let hours: f64 = s.parse()?;
        (hours * 60.0).round() as i32
    } else {
        let hours: i32 = s.parse()?;
        hours * 60
    };

    Ok(sign * minutes)
}

/// Format total minutes as "+H" or "-H:MM"
pub fn format_tz_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { "-" } else { "+" };
    let abs = minutes.abs();
    let h = abs / 60;
    let m = abs % 60;
    if m == 0 {
        format!("{}{}", sign, h)
    } else {
        format!("{}{}:{:02}", sign, h, m)
    }
}
