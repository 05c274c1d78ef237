// src/services/story_service_tests.rs
//
// Story read path: remote first, cached row as fallback, error when
// neither answers. Validation runs before anything reaches the network.

use std::sync::Arc;

use crate::config::ConfigStore;
use crate::db::connection::create_test_pool;
use crate::db::migrations::initialize_database;
use crate::domain::story::{Story, StoryStatus};
use crate::error::AppError;
use crate::events::EventBus;
use crate::integrations::api::{MockStoryhubApi, StoryPayload};
use crate::repositories::{SqliteStoryRepository, StoryRepository};
use crate::services::story_service::{CreateStoryRequest, StoryService};
use chrono::Utc;

fn story_repo() -> Arc<dyn StoryRepository> {
    let pool = Arc::new(create_test_pool().unwrap());
    {
        let conn = pool.get().unwrap();
        initialize_database(&conn).unwrap();
    }
    Arc::new(SqliteStoryRepository::new(pool))
}

fn config_store() -> Arc<ConfigStore> {
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::open(dir.path().join("config.json")).unwrap();
    std::mem::forget(dir);
    Arc::new(store)
}

fn service(api: MockStoryhubApi, repo: Arc<dyn StoryRepository>) -> StoryService {
    StoryService::new(
        Arc::new(api),
        repo,
        config_store(),
        Arc::new(EventBus::new()),
    )
}

fn story_payload(id: i64, title: &str) -> StoryPayload {
    StoryPayload {
        id,
        author_id: 10,
        author_name: "ana".to_string(),
        title: title.to_string(),
        description: Some("blurb".to_string()),
        cover_url: None,
        tags: vec!["romance".to_string()],
        status: "ongoing".to_string(),
        chapter_count: 2,
        read_count: 100,
        vote_count: 5,
        created_at: "2024-05-01T10:00:00Z".to_string(),
        updated_at: "2024-05-02T10:00:00Z".to_string(),
    }
}

fn cached_story(id: i64, title: &str) -> Story {
    let now = Utc::now();
    Story {
        id,
        author_id: 10,
        author_name: "ana".to_string(),
        title: title.to_string(),
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

#[tokio::test]
async fn test_get_story_mirrors_remote_into_cache() {
    let repo = story_repo();

    let mut api = MockStoryhubApi::new();
    api.expect_get_story()
        .returning(|id| Ok(story_payload(id, "The Quiet Harbor")));

    let service = service(api, Arc::clone(&repo));

    let story = service.get_story(1).await.unwrap();
    assert_eq!(story.title, "The Quiet Harbor");

    // The row landed in the cache
    let cached = repo.get_by_id(1).unwrap().unwrap();
    assert_eq!(cached.title, "The Quiet Harbor");
}

#[tokio::test]
async fn test_get_story_falls_back_to_cache_when_offline() {
    let repo = story_repo();
    repo.mirror_remote(&cached_story(1, "Cached Title")).unwrap();
    repo.set_favorited(1, true).unwrap();

    let mut api = MockStoryhubApi::new();
    api.expect_get_story()
        .returning(|_| Err(AppError::Http("connection refused".to_string())));

    let service = service(api, repo);

    let story = service.get_story(1).await.unwrap();
    assert_eq!(story.title, "Cached Title");
    // Fallback rows carry local library state
    assert!(story.is_favorited);
}

#[tokio::test]
async fn test_get_story_propagates_error_when_nothing_cached() {
    let mut api = MockStoryhubApi::new();
    api.expect_get_story()
        .returning(|_| Err(AppError::Http("connection refused".to_string())));

    let service = service(api, story_repo());

    let result = service.get_story(1).await;
    assert!(matches!(result, Err(AppError::Http(_))));
}

#[tokio::test]
async fn test_unauthorized_is_not_masked_by_cache() {
    let repo = story_repo();
    repo.mirror_remote(&cached_story(1, "Cached Title")).unwrap();

    let mut api = MockStoryhubApi::new();
    api.expect_get_story().returning(|_| Err(AppError::Unauthorized));

    let service = service(api, repo);

    // Unauthorized is not a remote outage; the cache must not hide it
    let result = service.get_story(1).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn test_create_story_rejects_blank_title_before_network() {
    // No expectation on create_story: reaching the network would panic
    let api = MockStoryhubApi::new();
    let service = service(api, story_repo());

    let result = service
        .create_story(CreateStoryRequest {
            title: "   ".to_string(),
            description: String::new(),
            cover_url: None,
            tags: vec![],
        })
        .await;

    assert!(matches!(result, Err(AppError::Domain(_))));
}

#[tokio::test]
async fn test_create_story_mirrors_and_returns() {
    let repo = story_repo();

    let mut api = MockStoryhubApi::new();
    api.expect_create_story()
        .returning(|body| {
            let mut payload = story_payload(7, "ignored");
            payload.title = body.title;
            Ok(payload)
        });

    let service = service(api, Arc::clone(&repo));

    let story = service
        .create_story(CreateStoryRequest {
            title: "New Story".to_string(),
            description: "blurb".to_string(),
            cover_url: None,
            tags: vec!["fantasy".to_string()],
        })
        .await
        .unwrap();

    assert_eq!(story.id, 7);
    assert_eq!(story.title, "New Story");
    assert!(repo.get_by_id(7).unwrap().is_some());
}

#[tokio::test]
async fn test_my_stories_requires_session() {
    let api = MockStoryhubApi::new();
    let service = service(api, story_repo());

    let result = service.my_stories().await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn test_delete_story_tolerates_uncached_row() {
    let mut api = MockStoryhubApi::new();
    api.expect_delete_story().returning(|_| Ok(()));

    let service = service(api, story_repo());

    // Never cached locally; delete must still succeed
    service.delete_story(99).await.unwrap();
}
