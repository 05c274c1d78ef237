// src/repositories/story_repository.rs
//
// Story cache rows + the purely-local library columns

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::reading_progress::ReadingProgress;
use crate::domain::story::{Story, StoryStatus};
use crate::error::{AppError, AppResult};

pub trait StoryRepository: Send + Sync {
    /// Upsert a story fetched from the remote.
    /// Local columns (favorite flag, reading progress) are left untouched.
    fn mirror_remote(&self, story: &Story) -> AppResult<()>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Story>>;
    fn list_by_author(&self, author_id: i64) -> AppResult<Vec<Story>>;
    fn list_favorites(&self) -> AppResult<Vec<Story>>;
    fn list_recently_updated(&self) -> AppResult<Vec<Story>>;
    fn list_most_read(&self) -> AppResult<Vec<Story>>;
    fn list_most_voted(&self) -> AppResult<Vec<Story>>;
    fn search_cached(&self, query: &str) -> AppResult<Vec<Story>>;
    fn set_favorited(&self, id: i64, favorited: bool) -> AppResult<()>;
    fn set_progress(&self, progress: &ReadingProgress) -> AppResult<()>;
    fn get_progress(&self, story_id: i64) -> AppResult<Option<ReadingProgress>>;
    fn bump_chapter_count(&self, story_id: i64, delta: i64) -> AppResult<()>;
    fn delete(&self, id: i64) -> AppResult<()>;
    fn exists(&self, id: i64) -> AppResult<bool>;
}

pub struct SqliteStoryRepository {
    pool: Arc<ConnectionPool>,
}

const STORY_COLUMNS: &str = "id, author_id, author_name, title, description, cover_url, tags,
                             status, chapter_count, read_count, vote_count, created_at,
                             updated_at, is_favorited, progress_chapter, progress_offset,
                             progress_updated_at";

impl SqliteStoryRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map cache row to Story - returns rusqlite::Error for query_map compatibility
    fn row_to_story(row: &Row) -> Result<Story, rusqlite::Error> {
        let tags_json: String = row.get("tags")?;
        let tags: Vec<String> = serde_json::from_str(&tags_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let status_str: String = row.get("status")?;
        let status =
            StoryStatus::parse(&status_str).ok_or(rusqlite::Error::InvalidQuery)?;

        let created_at_str: String = row.get("created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let updated_at_str: String = row.get("updated_at")?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let story_id: i64 = row.get("id")?;

        let progress_chapter: Option<i64> = row.get("progress_chapter")?;
        let progress_offset: Option<f64> = row.get("progress_offset")?;
        let progress_updated_at: Option<String> = row.get("progress_updated_at")?;

        let progress = match (progress_chapter, progress_offset, progress_updated_at) {
            (Some(chapter), Some(offset), Some(at)) => {
                let updated_at = DateTime::parse_from_rfc3339(&at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                Some(ReadingProgress {
                    story_id,
                    chapter_number: chapter as u32,
                    scroll_offset: offset as f32,
                    updated_at,
                })
            }
            _ => None,
        };

        Ok(Story {
            id: story_id,
            author_id: row.get("author_id")?,
            author_name: row.get("author_name")?,
            title: row.get("title")?,
            description: row.get("description")?,
            cover_url: row.get("cover_url")?,
            tags,
            status,
            chapter_count: row.get::<_, i64>("chapter_count")? as u32,
            read_count: row.get::<_, i64>("read_count")? as u64,
            vote_count: row.get::<_, i64>("vote_count")? as u64,
            is_favorited: row.get::<_, i64>("is_favorited")? != 0,
            progress,
            created_at,
            updated_at,
        })
    }

    fn list_with_order(&self, order_clause: &str) -> AppResult<Vec<Story>> {
        let conn = self.pool.get()?;

        let sql = format!("SELECT {} FROM stories ORDER BY {}", STORY_COLUMNS, order_clause);
        let mut stmt = conn.prepare(&sql)?;

        let stories: Vec<Story> = stmt
            .query_map([], Self::row_to_story)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stories)
    }
}

impl StoryRepository for SqliteStoryRepository {
    fn mirror_remote(&self, story: &Story) -> AppResult<()> {
        let conn = self.pool.get()?;

        let tags_json = serde_json::to_string(&story.tags)?;

        // Local columns are deliberately absent from the update list:
        // remote payloads never carry them.
        conn.execute(
            "INSERT INTO stories (
                id, author_id, author_name, title, description, cover_url, tags,
                status, chapter_count, read_count, vote_count, created_at,
                updated_at, cached_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(id) DO UPDATE SET
                author_id = excluded.author_id,
                author_name = excluded.author_name,
                title = excluded.title,
                description = excluded.description,
                cover_url = excluded.cover_url,
                tags = excluded.tags,
                status = excluded.status,
                chapter_count = excluded.chapter_count,
                read_count = excluded.read_count,
                vote_count = excluded.vote_count,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                cached_at = excluded.cached_at",
            params![
                story.id,
                story.author_id,
                story.author_name,
                story.title,
                story.description,
                story.cover_url,
                tags_json,
                story.status.to_string(),
                story.chapter_count as i64,
                story.read_count as i64,
                story.vote_count as i64,
                story.created_at.to_rfc3339(),
                story.updated_at.to_rfc3339(),
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Story>> {
        let conn = self.pool.get()?;

        let sql = format!("SELECT {} FROM stories WHERE id = ?1", STORY_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row(params![id], Self::row_to_story) {
            Ok(story) => Ok(Some(story)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_by_author(&self, author_id: i64) -> AppResult<Vec<Story>> {
        let conn = self.pool.get()?;

        let sql = format!(
            "SELECT {} FROM stories WHERE author_id = ?1 ORDER BY updated_at DESC",
            STORY_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let stories: Vec<Story> = stmt
            .query_map(params![author_id], Self::row_to_story)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stories)
    }

    fn list_favorites(&self) -> AppResult<Vec<Story>> {
        let conn = self.pool.get()?;

        let sql = format!(
            "SELECT {} FROM stories WHERE is_favorited = 1 ORDER BY updated_at DESC",
            STORY_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let stories: Vec<Story> = stmt
            .query_map([], Self::row_to_story)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stories)
    }

    fn list_recently_updated(&self) -> AppResult<Vec<Story>> {
        self.list_with_order("updated_at DESC")
    }

    fn list_most_read(&self) -> AppResult<Vec<Story>> {
        self.list_with_order("read_count DESC")
    }

    fn list_most_voted(&self) -> AppResult<Vec<Story>> {
        self.list_with_order("vote_count DESC")
    }

    fn search_cached(&self, query: &str) -> AppResult<Vec<Story>> {
        let conn = self.pool.get()?;

        let sql = format!(
            "SELECT {} FROM stories
             WHERE title LIKE ?1 OR description LIKE ?1
             ORDER BY read_count DESC",
            STORY_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let pattern = format!("%{}%", query);
        let stories: Vec<Story> = stmt
            .query_map(params![pattern], Self::row_to_story)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stories)
    }

    fn set_favorited(&self, id: i64, favorited: bool) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE stories SET is_favorited = ?2 WHERE id = ?1",
            params![id, favorited as i64],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn set_progress(&self, progress: &ReadingProgress) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE stories SET
                progress_chapter = ?2,
                progress_offset = ?3,
                progress_updated_at = ?4
             WHERE id = ?1",
            params![
                progress.story_id,
                progress.chapter_number as i64,
                progress.scroll_offset as f64,
                progress.updated_at.to_rfc3339(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn get_progress(&self, story_id: i64) -> AppResult<Option<ReadingProgress>> {
        Ok(self.get_by_id(story_id)?.and_then(|story| story.progress))
    }

    fn bump_chapter_count(&self, story_id: i64, delta: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "UPDATE stories
             SET chapter_count = MAX(0, chapter_count + ?2)
             WHERE id = ?1",
            params![story_id, delta],
        )?;

        Ok(())
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM stories WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn exists(&self, id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM stories WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_pool;
    use crate::db::migrations::initialize_database;

    fn repo() -> SqliteStoryRepository {
        let pool = Arc::new(create_test_pool().unwrap());
        {
            let conn = pool.get().unwrap();
            initialize_database(&conn).unwrap();
        }
        SqliteStoryRepository::new(pool)
    }

    fn story(id: i64, title: &str) -> Story {
        let now = Utc::now();
        Story {
            id,
            author_id: 10,
            author_name: "ana".to_string(),
            title: title.to_string(),
            description: "blurb".to_string(),
            cover_url: None,
            tags: vec!["romance".to_string()],
            status: StoryStatus::Ongoing,
            chapter_count: 2,
            read_count: 100,
            vote_count: 5,
            is_favorited: false,
            progress: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_mirror_and_get_roundtrip() {
        let repo = repo();
        repo.mirror_remote(&story(1, "The Quiet Harbor")).unwrap();

        let loaded = repo.get_by_id(1).unwrap().unwrap();
        assert_eq!(loaded.title, "The Quiet Harbor");
        assert_eq!(loaded.tags, vec!["romance".to_string()]);
        assert_eq!(loaded.status, StoryStatus::Ongoing);
        assert!(!loaded.is_favorited);
        assert!(loaded.progress.is_none());
    }

    #[test]
    fn test_mirror_preserves_local_columns() {
        let repo = repo();
        repo.mirror_remote(&story(1, "First Title")).unwrap();

        repo.set_favorited(1, true).unwrap();
        repo.set_progress(&ReadingProgress::new(1, 3, 0.5)).unwrap();

        // A later remote refresh must not clobber library state
        repo.mirror_remote(&story(1, "Renamed Title")).unwrap();

        let loaded = repo.get_by_id(1).unwrap().unwrap();
        assert_eq!(loaded.title, "Renamed Title");
        assert!(loaded.is_favorited);
        let progress = loaded.progress.unwrap();
        assert_eq!(progress.chapter_number, 3);
        assert!((progress.scroll_offset - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_list_favorites() {
        let repo = repo();
        repo.mirror_remote(&story(1, "A")).unwrap();
        repo.mirror_remote(&story(2, "B")).unwrap();
        repo.set_favorited(2, true).unwrap();

        let favorites = repo.list_favorites().unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, 2);
    }

    #[test]
    fn test_set_favorited_missing_row() {
        let repo = repo();
        assert!(matches!(
            repo.set_favorited(99, true),
            Err(AppError::NotFound)
        ));
    }

    #[test]
    fn test_search_cached_matches_title_and_description() {
        let repo = repo();
        let mut s = story(1, "Harbor Lights");
        s.description = "a slow-burn mystery".to_string();
        repo.mirror_remote(&s).unwrap();
        repo.mirror_remote(&story(2, "Other")).unwrap();

        assert_eq!(repo.search_cached("Harbor").unwrap().len(), 1);
        assert_eq!(repo.search_cached("slow-burn").unwrap().len(), 1);
        assert_eq!(repo.search_cached("nothing").unwrap().len(), 0);
    }

    #[test]
    fn test_bump_chapter_count_floors_at_zero() {
        let repo = repo();
        repo.mirror_remote(&story(1, "A")).unwrap();

        repo.bump_chapter_count(1, 1).unwrap();
        assert_eq!(repo.get_by_id(1).unwrap().unwrap().chapter_count, 3);

        repo.bump_chapter_count(1, -10).unwrap();
        assert_eq!(repo.get_by_id(1).unwrap().unwrap().chapter_count, 0);
    }
}
