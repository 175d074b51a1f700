pub mod engagement;
pub mod post;
pub mod profile;
pub mod streak;

pub use engagement::{CycleProgress, EngagementSnapshot, WeeklyProgress};
pub use post::{ImportedPost, Post, PostRecord, RawPost};
pub use profile::Profile;
pub use streak::StreakResult;
