// src/repositories/chapter_repository.rs
//
// Chapter cache rows
//
// List endpoints return chapters without their body text, so mirroring a
// summary must not wipe a cached body. Full mirrors skip the content write
// when the stored fingerprint already matches.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::chapter::{Chapter, ChapterStatus};
use crate::error::{AppError, AppResult};

pub trait ChapterRepository: Send + Sync {
    /// Upsert a chapter fetched with its body text.
    fn mirror_remote(&self, chapter: &Chapter) -> AppResult<()>;
    /// Upsert a chapter from a list payload; cached body text is preserved.
    fn mirror_summary(&self, chapter: &Chapter) -> AppResult<()>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Chapter>>;
    fn get_by_story_and_number(&self, story_id: i64, number: u32) -> AppResult<Option<Chapter>>;
    fn list_by_story(&self, story_id: i64) -> AppResult<Vec<Chapter>>;
    fn delete(&self, id: i64) -> AppResult<()>;
    fn delete_by_story(&self, story_id: i64) -> AppResult<()>;
}

pub struct SqliteChapterRepository {
    pool: Arc<ConnectionPool>,
}

const CHAPTER_COLUMNS: &str =
    "id, story_id, number, title, content, word_count, status, created_at, updated_at";

impl SqliteChapterRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map cache row to Chapter - returns rusqlite::Error for query_map compatibility
    fn row_to_chapter(row: &Row) -> Result<Chapter, rusqlite::Error> {
        let status_str: String = row.get("status")?;
        let status =
            ChapterStatus::parse(&status_str).ok_or(rusqlite::Error::InvalidQuery)?;

        let created_at_str: String = row.get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let updated_at_str: String = row.get("updated_at")?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(Chapter {
            id: row.get("id")?,
            story_id: row.get("story_id")?,
            number: row.get::<_, i64>("number")? as u32,
            title: row.get("title")?,
            content: row.get("content")?,
            word_count: row.get::<_, i64>("word_count")? as u32,
            status,
            created_at,
            updated_at,
        })
    }
}

impl ChapterRepository for SqliteChapterRepository {
    fn mirror_remote(&self, chapter: &Chapter) -> AppResult<()> {
        let conn = self.pool.get()?;

        let fingerprint = chapter.content_fingerprint();

        let cached_hash: Option<String> = conn
            .query_row(
                "SELECT content_hash FROM chapters WHERE id = ?1",
                params![chapter.id],
                |row| row.get(0),
            )
            .unwrap_or(None);

        if cached_hash.as_deref() == Some(fingerprint.as_str()) {
            // Body unchanged: refresh metadata only
            conn.execute(
                "UPDATE chapters SET
                    story_id = ?2, number = ?3, title = ?4, word_count = ?5,
                    status = ?6, created_at = ?7, updated_at = ?8, cached_at = ?9
                 WHERE id = ?1",
                params![
                    chapter.id,
                    chapter.story_id,
                    chapter.number as i64,
                    chapter.title,
                    chapter.word_count as i64,
                    chapter.status.to_string(),
                    chapter.created_at.to_rfc3339(),
                    chapter.updated_at.to_rfc3339(),
                    Utc::now().to_rfc3339(),
                ],
            )?;
            return Ok(());
        }

        conn.execute(
            "INSERT INTO chapters (
                id, story_id, number, title, content, content_hash, word_count,
                status, created_at, updated_at, cached_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(id) DO UPDATE SET
                story_id = excluded.story_id,
                number = excluded.number,
                title = excluded.title,
                content = excluded.content,
                content_hash = excluded.content_hash,
                word_count = excluded.word_count,
                status = excluded.status,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                cached_at = excluded.cached_at",
            params![
                chapter.id,
                chapter.story_id,
                chapter.number as i64,
                chapter.title,
                chapter.content,
                fingerprint,
                chapter.word_count as i64,
                chapter.status.to_string(),
                chapter.created_at.to_rfc3339(),
                chapter.updated_at.to_rfc3339(),
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn mirror_summary(&self, chapter: &Chapter) -> AppResult<()> {
        let conn = self.pool.get()?;

        // content and content_hash are deliberately absent from the update
        // list: summaries carry no body text.
        conn.execute(
            "INSERT INTO chapters (
                id, story_id, number, title, content, word_count,
                status, created_at, updated_at, cached_at
            ) VALUES (?1, ?2, ?3, ?4, '', ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                story_id = excluded.story_id,
                number = excluded.number,
                title = excluded.title,
                word_count = excluded.word_count,
                status = excluded.status,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                cached_at = excluded.cached_at",
            params![
                chapter.id,
                chapter.story_id,
                chapter.number as i64,
                chapter.title,
                chapter.word_count as i64,
                chapter.status.to_string(),
                chapter.created_at.to_rfc3339(),
                chapter.updated_at.to_rfc3339(),
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Chapter>> {
        let conn = self.pool.get()?;

        let sql = format!("SELECT {} FROM chapters WHERE id = ?1", CHAPTER_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row(params![id], Self::row_to_chapter) {
            Ok(chapter) => Ok(Some(chapter)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_by_story_and_number(&self, story_id: i64, number: u32) -> AppResult<Option<Chapter>> {
        let conn = self.pool.get()?;

        let sql = format!(
            "SELECT {} FROM chapters WHERE story_id = ?1 AND number = ?2",
            CHAPTER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row(params![story_id, number as i64], Self::row_to_chapter) {
            Ok(chapter) => Ok(Some(chapter)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_by_story(&self, story_id: i64) -> AppResult<Vec<Chapter>> {
        let conn = self.pool.get()?;

        let sql = format!(
            "SELECT {} FROM chapters WHERE story_id = ?1 ORDER BY number",
            CHAPTER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let chapters: Vec<Chapter> = stmt
            .query_map(params![story_id], Self::row_to_chapter)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(chapters)
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM chapters WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn delete_by_story(&self, story_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute("DELETE FROM chapters WHERE story_id = ?1", params![story_id])?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_pool;
    use crate::db::migrations::initialize_database;

    fn repo() -> SqliteChapterRepository {
        let pool = Arc::new(create_test_pool().unwrap());
        {
            let conn = pool.get().unwrap();
            initialize_database(&conn).unwrap();
        }
        SqliteChapterRepository::new(pool)
    }

    fn chapter(id: i64, number: u32, content: &str) -> Chapter {
        let now = Utc::now();
        Chapter {
            id,
            story_id: 1,
            number,
            title: Some(format!("Chapter {}", number)),
            content: content.to_string(),
            word_count: content.split_whitespace().count() as u32,
            status: ChapterStatus::Published,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_mirror_and_list_ordered() {
        let repo = repo();
        repo.mirror_remote(&chapter(2, 2, "second")).unwrap();
        repo.mirror_remote(&chapter(1, 1, "first")).unwrap();

        let chapters = repo.list_by_story(1).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].number, 1);
        assert_eq!(chapters[1].number, 2);
    }

    #[test]
    fn test_summary_mirror_preserves_body() {
        let repo = repo();
        repo.mirror_remote(&chapter(1, 1, "the full body text")).unwrap();

        // A list refresh carries no content
        let mut summary = chapter(1, 1, "");
        summary.title = Some("Renamed".to_string());
        repo.mirror_summary(&summary).unwrap();

        let loaded = repo.get_by_id(1).unwrap().unwrap();
        assert_eq!(loaded.title.as_deref(), Some("Renamed"));
        assert_eq!(loaded.content, "the full body text");
    }

    #[test]
    fn test_unchanged_body_keeps_fingerprint_path() {
        let repo = repo();
        let c = chapter(1, 1, "stable body");
        repo.mirror_remote(&c).unwrap();

        // Same body, new metadata: the metadata-only path must still apply
        let mut again = c.clone();
        again.title = Some("New Title".to_string());
        repo.mirror_remote(&again).unwrap();

        let loaded = repo.get_by_id(1).unwrap().unwrap();
        assert_eq!(loaded.title.as_deref(), Some("New Title"));
        assert_eq!(loaded.content, "stable body");
    }

    #[test]
    fn test_get_by_story_and_number() {
        let repo = repo();
        repo.mirror_remote(&chapter(5, 3, "x")).unwrap();

        assert!(repo.get_by_story_and_number(1, 3).unwrap().is_some());
        assert!(repo.get_by_story_and_number(1, 4).unwrap().is_none());
    }

    #[test]
    fn test_delete_by_story() {
        let repo = repo();
        repo.mirror_remote(&chapter(1, 1, "a")).unwrap();
        repo.mirror_remote(&chapter(2, 2, "b")).unwrap();

        repo.delete_by_story(1).unwrap();
        assert!(repo.list_by_story(1).unwrap().is_empty());
    }
}
