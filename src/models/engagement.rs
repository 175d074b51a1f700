use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleProgress {
    pub completed_cycles: u32,
    /// 0..=10; a just-completed cycle reads 10, not 0
    pub current_cycle_progress: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyProgress {
    pub count: u32,
    /// Unrounded; display code rounds
    pub percentage: f64,
}

/// Display values derived from the devotional total and this week's posts.
/// Recomputed on every read, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSnapshot {
    pub completed_cycles: u32,
    pub current_cycle_progress: u32,
    pub weekly_progress: u32,
    pub flame_level: u8,
}
