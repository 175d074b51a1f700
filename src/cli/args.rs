use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "geracao", version, author, about = "Devotional check-ins, streaks and cycles from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// First-run setup (member name, timezone)
    Setup {
        /// Reset existing configuration
        #[arg(long)]
        reset: bool,
    },
    /// Record a devotional check-in
    Post {
        /// Reflection text
        reflection: String,
        /// Scripture reference, e.g. "João 3:16"
        #[arg(long, short)]
        scripture: Option<String>,
        /// Link to a photo or video
        #[arg(long)]
        media: Option<String>,
        /// Timestamp of the check-in (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Recompute the streak and sync it to your profile
    Streak {
        /// Compute as of this date (YYYY-MM-DD) without saving
        #[arg(long)]
        date: Option<String>,
    },
    /// Show cycle, weekly goal and flame level
    Stats {
        /// Show the Sunday-start week as dots
        #[arg(long)]
        week: bool,
        /// Compute as of this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Member activity report (admins only)
    Members {
        /// Days counted as recent activity
        #[arg(long)]
        days: Option<u32>,
    },
    /// Import posts from a backend JSON export
    Import {
        /// Path to a JSON array of posts
        path: PathBuf,
    },
    /// Export your profile, streak and engagement snapshot as JSON
    Export,
}
