// src/repositories/user_repository.rs
//
// User cache rows

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::user::User;
use crate::error::{AppError, AppResult};

pub trait UserRepository: Send + Sync {
    /// Upsert a user fetched from the remote.
    fn mirror_remote(&self, user: &User) -> AppResult<()>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<User>>;
    fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;
    fn search_cached(&self, query: &str) -> AppResult<Vec<User>>;
    fn delete(&self, id: i64) -> AppResult<()>;
}

pub struct SqliteUserRepository {
    pool: Arc<ConnectionPool>,
}

const USER_COLUMNS: &str = "id, username, display_name, bio, avatar_url, story_count,
                            follower_count, following_count, joined_at";

impl SqliteUserRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
        let joined_at_str: String = row.get("joined_at")?;
        let joined_at = DateTime::parse_from_rfc3339(&joined_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(User {
            id: row.get("id")?,
            username: row.get("username")?,
            display_name: row.get("display_name")?,
            bio: row.get("bio")?,
            avatar_url: row.get("avatar_url")?,
            story_count: row.get::<_, i64>("story_count")? as u32,
            follower_count: row.get::<_, i64>("follower_count")? as u32,
            following_count: row.get::<_, i64>("following_count")? as u32,
            joined_at,
        })
    }
}

impl UserRepository for SqliteUserRepository {
    fn mirror_remote(&self, user: &User) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR REPLACE INTO users (
                id, username, display_name, bio, avatar_url, story_count,
                follower_count, following_count, joined_at, cached_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                user.id,
                user.username,
                user.display_name,
                user.bio,
                user.avatar_url,
                user.story_count as i64,
                user.follower_count as i64,
                user.following_count as i64,
                user.joined_at.to_rfc3339(),
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;

        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row(params![id], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let conn = self.pool.get()?;

        let sql = format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row(params![username], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn search_cached(&self, query: &str) -> AppResult<Vec<User>> {
        let conn = self.pool.get()?;

        let sql = format!(
            "SELECT {} FROM users
             WHERE username LIKE ?1 OR display_name LIKE ?1
             ORDER BY follower_count DESC",
            USER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let pattern = format!("%{}%", query);
        let users: Vec<User> = stmt
            .query_map(params![pattern], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
