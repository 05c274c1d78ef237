// src/services/library_service_tests.rs
//
// Optimistic favorite toggle with rollback, library refresh semantics,
// and progress persistence.

use std::sync::Arc;

use crate::db::connection::create_test_pool;
use crate::db::migrations::initialize_database;
use crate::domain::reading_progress::ReadingProgress;
use crate::domain::story::{Story, StoryStatus};
use crate::error::AppError;
use crate::events::{EventBus, StoryFavorited};
use crate::integrations::api::{MockStoryhubApi, StoryPayload};
use crate::repositories::{SqliteStoryRepository, StoryRepository};
use crate::services::library_service::LibraryService;
use chrono::Utc;

fn story_repo() -> Arc<dyn StoryRepository> {
    let pool = Arc::new(create_test_pool().unwrap());
    {
        let conn = pool.get().unwrap();
        initialize_database(&conn).unwrap();
    }
    Arc::new(SqliteStoryRepository::new(pool))
}

fn service(
    api: MockStoryhubApi,
    repo: Arc<dyn StoryRepository>,
    bus: Arc<EventBus>,
) -> LibraryService {
    LibraryService::new(Arc::new(api), repo, bus)
}

fn cached_story(id: i64) -> Story {
    let now = Utc::now();
    Story {
        id,
        author_id: 10,
        author_name: "ana".to_string(),
        title: format!("Story {}", id),
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

fn story_payload(id: i64) -> StoryPayload {
    StoryPayload {
        id,
        author_id: 10,
        author_name: "ana".to_string(),
        title: format!("Story {}", id),
        description: None,
        cover_url: None,
        tags: vec![],
        status: "ongoing".to_string(),
        chapter_count: 0,
        read_count: 0,
        vote_count: 0,
        created_at: "2024-05-01T10:00:00Z".to_string(),
        updated_at: "2024-05-02T10:00:00Z".to_string(),
    }
}

#[tokio::test]
async fn test_toggle_favorite_sets_flag_and_emits() {
    let repo = story_repo();
    repo.mirror_remote(&cached_story(1)).unwrap();

    let mut api = MockStoryhubApi::new();
    api.expect_add_favorite().returning(|_| Ok(()));

    let bus = Arc::new(EventBus::new());
    let counter = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    {
        let counter = Arc::clone(&counter);
        bus.subscribe::<StoryFavorited, _>(move |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });
    }

    let service = service(api, Arc::clone(&repo), bus);

    let now_favorited = service.toggle_favorite(1).await.unwrap();
    assert!(now_favorited);
    assert!(repo.get_by_id(1).unwrap().unwrap().is_favorited);
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_toggle_favorite_rolls_back_on_remote_failure() {
    let repo = story_repo();
    repo.mirror_remote(&cached_story(1)).unwrap();

    let mut api = MockStoryhubApi::new();
    api.expect_add_favorite()
        .returning(|_| Err(AppError::Http("connection refused".to_string())));

    let service = service(api, Arc::clone(&repo), Arc::new(EventBus::new()));

    let result = service.toggle_favorite(1).await;
    assert!(matches!(result, Err(AppError::Http(_))));

    // The optimistic flip was reverted
    assert!(!repo.get_by_id(1).unwrap().unwrap().is_favorited);
}

#[tokio::test]
async fn test_toggle_unfavorite_calls_remove() {
    let repo = story_repo();
    repo.mirror_remote(&cached_story(1)).unwrap();
    repo.set_favorited(1, true).unwrap();

    let mut api = MockStoryhubApi::new();
    api.expect_remove_favorite().times(1).returning(|_| Ok(()));

    let service = service(api, Arc::clone(&repo), Arc::new(EventBus::new()));

    let now_favorited = service.toggle_favorite(1).await.unwrap();
    assert!(!now_favorited);
    assert!(!repo.get_by_id(1).unwrap().unwrap().is_favorited);
}

#[tokio::test]
async fn test_toggle_favorite_unknown_story() {
    let api = MockStoryhubApi::new();
    let service = service(api, story_repo(), Arc::new(EventBus::new()));

    let result = service.toggle_favorite(42).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_library_refresh_remote_wins() {
    let repo = story_repo();
    repo.mirror_remote(&cached_story(1)).unwrap();
    repo.mirror_remote(&cached_story(2)).unwrap();
    repo.set_favorited(1, true).unwrap();
    repo.set_favorited(2, true).unwrap();

    // Remote library only has story 1
    let mut api = MockStoryhubApi::new();
    api.expect_list_library()
        .returning(|| Ok(vec![story_payload(1)]));

    let service = service(api, Arc::clone(&repo), Arc::new(EventBus::new()));

    let library = service.library().await.unwrap();
    assert_eq!(library.len(), 1);
    assert_eq!(library[0].id, 1);
    assert!(!repo.get_by_id(2).unwrap().unwrap().is_favorited);
}

#[tokio::test]
async fn test_library_serves_cache_when_offline() {
    let repo = story_repo();
    repo.mirror_remote(&cached_story(1)).unwrap();
    repo.set_favorited(1, true).unwrap();

    let mut api = MockStoryhubApi::new();
    api.expect_list_library()
        .returning(|| Err(AppError::Http("connection refused".to_string())));

    let service = service(api, repo, Arc::new(EventBus::new()));

    let library = service.library().await.unwrap();
    assert_eq!(library.len(), 1);
    assert_eq!(library[0].id, 1);
}

#[tokio::test]
async fn test_save_progress_keeps_local_write_when_push_fails() {
    let repo = story_repo();
    repo.mirror_remote(&cached_story(1)).unwrap();

    let mut api = MockStoryhubApi::new();
    api.expect_save_progress()
        .returning(|_| Err(AppError::Http("connection refused".to_string())));

    let service = service(api, Arc::clone(&repo), Arc::new(EventBus::new()));

    // Best-effort push: the call still succeeds
    service
        .save_progress(ReadingProgress::new(1, 3, 0.5))
        .await
        .unwrap();

    let progress = repo.get_progress(1).unwrap().unwrap();
    assert_eq!(progress.chapter_number, 3);
}

#[tokio::test]
async fn test_save_progress_rejects_invalid_offset() {
    let repo = story_repo();
    repo.mirror_remote(&cached_story(1)).unwrap();

    let api = MockStoryhubApi::new();
    let service = service(api, Arc::clone(&repo), Arc::new(EventBus::new()));

    let result = service
        .save_progress(ReadingProgress::new(1, 3, 1.5))
        .await;
    assert!(matches!(result, Err(AppError::Domain(_))));

    // Nothing was written locally
    assert!(repo.get_progress(1).unwrap().is_none());
}
