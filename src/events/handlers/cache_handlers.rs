// src/events/handlers/cache_handlers.rs
//
// Cache maintenance driven by domain events.
//
// The cached story row keeps derived fields (chapter count) in step with
// authoring events, and story deletion purges the chapter rows. Handlers
// only touch the cache; a failed write is logged and the event moves on.

use std::sync::Arc;

use crate::events::types::{ChapterDeleted, ChapterPublished, StoryDeleted};
use crate::events::EventBus;
use crate::repositories::{ChapterRepository, StoryRepository};

pub fn register_cache_handlers(
    event_bus: &EventBus,
    story_repo: Arc<dyn StoryRepository>,
    chapter_repo: Arc<dyn ChapterRepository>,
) {
    {
        let story_repo = Arc::clone(&story_repo);
        event_bus.subscribe::<ChapterPublished, _>(move |event| {
            if let Err(e) = story_repo.bump_chapter_count(event.story_id, 1) {
                log::warn!(
                    "failed to bump chapter count for story {}: {}",
                    event.story_id,
                    e
                );
            }
        });
    }

    {
        let story_repo = Arc::clone(&story_repo);
        event_bus.subscribe::<ChapterDeleted, _>(move |event| {
            if !event.was_published {
                return;
            }
            if let Err(e) = story_repo.bump_chapter_count(event.story_id, -1) {
                log::warn!(
                    "failed to lower chapter count for story {}: {}",
                    event.story_id,
                    e
                );
            }
        });
    }

    event_bus.subscribe::<StoryDeleted, _>(move |event| {
        if let Err(e) = chapter_repo.delete_by_story(event.story_id) {
            log::warn!(
                "failed to purge chapters for deleted story {}: {}",
                event.story_id,
                e
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_pool;
    use crate::db::migrations::initialize_database;
    use crate::domain::chapter::{Chapter, ChapterStatus};
    use crate::domain::story::{Story, StoryStatus};
    use crate::repositories::{SqliteChapterRepository, SqliteStoryRepository};
    use chrono::Utc;

    fn fixture() -> (EventBus, Arc<dyn StoryRepository>, Arc<dyn ChapterRepository>) {
        let pool = Arc::new(create_test_pool().unwrap());
        {
            let conn = pool.get().unwrap();
            initialize_database(&conn).unwrap();
        }
        let story_repo: Arc<dyn StoryRepository> =
            Arc::new(SqliteStoryRepository::new(Arc::clone(&pool)));
        let chapter_repo: Arc<dyn ChapterRepository> =
            Arc::new(SqliteChapterRepository::new(pool));

        let bus = EventBus::new();
        register_cache_handlers(&bus, Arc::clone(&story_repo), Arc::clone(&chapter_repo));

        (bus, story_repo, chapter_repo)
    }

    fn story(id: i64) -> Story {
        let now = Utc::now();
        Story {
            id,
            author_id: 1,
            author_name: "ana".to_string(),
            title: "T".to_string(),
            description: String::new(),
            cover_url: None,
            tags: vec![],
            status: StoryStatus::Ongoing,
            chapter_count: 0,
            read_count: 0,
            vote_count: 0,
            is_favorited: false,
            progress: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn chapter(id: i64, story_id: i64) -> Chapter {
        let now = Utc::now();
        Chapter {
            id,
            story_id,
            number: 1,
            title: None,
            content: "text".to_string(),
            word_count: 1,
            status: ChapterStatus::Published,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_publish_bumps_cached_count() {
        let (bus, story_repo, _) = fixture();
        story_repo.mirror_remote(&story(1)).unwrap();

        bus.emit(ChapterPublished::new(10, 1, 1));

        assert_eq!(story_repo.get_by_id(1).unwrap().unwrap().chapter_count, 1);
    }

    #[test]
    fn test_draft_delete_does_not_touch_count() {
        let (bus, story_repo, _) = fixture();
        story_repo.mirror_remote(&story(1)).unwrap();

        bus.emit(ChapterDeleted::new(10, 1, false));

        assert_eq!(story_repo.get_by_id(1).unwrap().unwrap().chapter_count, 0);
    }

    #[test]
    fn test_story_delete_purges_chapters() {
        let (bus, _, chapter_repo) = fixture();
        chapter_repo.mirror_remote(&chapter(10, 1)).unwrap();

        bus.emit(StoryDeleted::new(1));

        assert!(chapter_repo.list_by_story(1).unwrap().is_empty());
    }
}
