pub mod analytics;
pub mod derivations;

pub use analytics::{member_activity, rank_members, summarize};
pub use derivations::{week_days, week_start, weekly_progress, CYCLE_LENGTH, DAYS_PER_WEEK};
