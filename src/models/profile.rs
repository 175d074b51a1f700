use serde::{Deserialize, Serialize};

use crate::models::StreakResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    pub is_admin: bool,
    pub current_streak: u32,
    pub max_streak: u32,
}

impl Profile {
    pub fn new(user_id: &str, display_name: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            is_admin: false,
            current_streak: 0,
            max_streak: 0,
        }
    }

    /// Streak values as last persisted
    pub fn stored_streak(&self) -> StreakResult {
        StreakResult::new(self.current_streak, self.max_streak)
    }
}
