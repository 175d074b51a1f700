use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A stored devotional check-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Option<i64>,
    pub user_id: String,
    pub scripture: Option<String>,
    pub reflection: String,
    pub media_url: Option<String>,
    /// RFC 3339, UTC
    pub created_at: String,
}

impl Post {
    /// A new check-in; the timestamp is stored in UTC
    pub fn checkin(
        user_id: &str,
        reflection: &str,
        scripture: Option<&str>,
        media_url: Option<&str>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: None,
            user_id: user_id.to_string(),
            scripture: scripture.map(str::to_string),
            reflection: reflection.to_string(),
            media_url: media_url.map(str::to_string),
            created_at: timestamp
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// What the post-history provider hands over before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub created_at: String,
}

impl RawPost {
    pub fn new(created_at: impl Into<String>) -> Self {
        Self {
            created_at: created_at.into(),
        }
    }
}

/// A validated post timestamp. Only its calendar date matters for streaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostRecord {
    pub timestamp: DateTime<FixedOffset>,
}

/// One entry of a backend export file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedPost {
    pub created_at: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub scripture: Option<String>,
    #[serde(default)]
    pub reflection: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
}
