use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{Post, Profile, RawPost, StreakResult};

// ─── Profile repo ────────────────────────────────────────────────────────────

pub struct ProfileRepo;

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        user_id: row.get(0)?,
        display_name: row.get(1)?,
        is_admin: row.get::<_, i32>(2)? != 0,
        current_streak: row.get(3)?,
        max_streak: row.get(4)?,
    })
}

impl ProfileRepo {
    pub fn get(conn: &Connection, user_id: &str) -> Result<Option<Profile>> {
        conn.query_row(
            "SELECT user_id, display_name, is_admin, current_streak, max_streak
             FROM profiles WHERE user_id = ?1",
            params![user_id],
            profile_from_row,
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    /// Create the profile if missing; an existing row is left untouched
    pub fn ensure(conn: &Connection, user_id: &str, display_name: &str) -> Result<Profile> {
        conn.execute(
            "INSERT OR IGNORE INTO profiles (user_id, display_name) VALUES (?1, ?2)",
            params![user_id, display_name],
        )?;
        Self::get(conn, user_id)?.ok_or_else(|| anyhow!("Profile '{}' vanished", user_id))
    }

    /// Insert or update name and admin flag; streak columns are not touched
    pub fn upsert(conn: &Connection, profile: &Profile) -> Result<()> {
        conn.execute(
            "INSERT INTO profiles (user_id, display_name, is_admin) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET display_name = ?2, is_admin = ?3",
            params![profile.user_id, profile.display_name, profile.is_admin as i32],
        )?;
        Ok(())
    }

    pub fn update_streak(conn: &Connection, user_id: &str, streak: &StreakResult) -> Result<()> {
        let changed = conn.execute(
            "UPDATE profiles SET current_streak = ?1, max_streak = ?2, updated_at = datetime('now')
             WHERE user_id = ?3",
            params![streak.current_streak, streak.max_streak, user_id],
        )?;
        if changed == 0 {
            return Err(anyhow!("No profile for user '{}'", user_id));
        }
        Ok(())
    }

    pub fn list(conn: &Connection) -> Result<Vec<Profile>> {
        let mut stmt = conn.prepare(
            "SELECT user_id, display_name, is_admin, current_streak, max_streak
             FROM profiles ORDER BY display_name, user_id",
        )?;
        let rows = stmt.query_map([], profile_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }
}

// ─── Post repo ───────────────────────────────────────────────────────────────

pub struct PostRepo;

impl PostRepo {
    pub fn insert(conn: &Connection, post: &Post) -> Result<i64> {
        conn.execute(
            "INSERT INTO posts (user_id, scripture, reflection, media_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                post.user_id,
                post.scripture,
                post.reflection,
                post.media_url,
                post.created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Every post timestamp for the user, unordered and unvalidated
    pub fn raw_posts_for_user(conn: &Connection, user_id: &str) -> Result<Vec<RawPost>> {
        let mut stmt = conn.prepare("SELECT created_at FROM posts WHERE user_id = ?1")?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(RawPost {
                created_at: row.get(0)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn count_for_user(conn: &Connection, user_id: &str) -> Result<u32> {
        conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )
        .map_err(anyhow::Error::from)
    }

    /// Newest first. RFC 3339 UTC strings sort chronologically as text.
    pub fn recent_for_user(conn: &Connection, user_id: &str, limit: u32) -> Result<Vec<Post>> {
        let mut stmt = conn.prepare(
            "SELECT id, user_id, scripture, reflection, media_url, created_at
             FROM posts WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![user_id, limit], |row| {
            Ok(Post {
                id: Some(row.get(0)?),
                user_id: row.get(1)?,
                scripture: row.get(2)?,
                reflection: row.get(3)?,
                media_url: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}
