use serde::{Deserialize, Serialize};

/// Current and best consecutive-day devotional streak.
///
/// `max_streak >= current_streak` holds for every value produced by the
/// calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResult {
    pub current_streak: u32,
    pub max_streak: u32,
}

impl StreakResult {
    pub fn new(current_streak: u32, max_streak: u32) -> Self {
        Self {
            current_streak,
            max_streak,
        }
    }
}
