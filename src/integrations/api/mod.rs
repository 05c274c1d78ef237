// src/integrations/api/mod.rs
//
// StoryHub platform API
//
// The `StoryhubApi` trait is the seam between services and the network:
// services depend on the trait, `StoryhubClient` is the reqwest-backed
// implementation, and tests substitute a mock.

pub mod client;
pub mod dto;

use async_trait::async_trait;

use crate::error::AppResult;

pub use dto::{
    ChapterBody, ChapterPayload, ChapterSummaryPayload, LoginBody, ProgressBody, RegisterBody,
    SessionPayload, StoryBody, StoryPayload, UpdateProfileBody, UserPayload,
};

/// Which explore list to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExploreFeed {
    Featured,
    Trending,
    RecentlyUpdated,
}

impl ExploreFeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExploreFeed::Featured => "featured",
            ExploreFeed::Trending => "trending",
            ExploreFeed::RecentlyUpdated => "recently_updated",
        }
    }
}

/// Typed endpoints of the platform API.
///
/// All methods return wire payloads; mapping into domain entities happens
/// in the services, never here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryhubApi: Send + Sync {
    // Auth
    async fn login(&self, body: LoginBody) -> AppResult<SessionPayload>;
    async fn register(&self, body: RegisterBody) -> AppResult<SessionPayload>;

    // Profile
    async fn get_me(&self) -> AppResult<UserPayload>;
    async fn update_profile(&self, body: UpdateProfileBody) -> AppResult<UserPayload>;

    // Users
    async fn get_user(&self, id: i64) -> AppResult<UserPayload>;
    async fn list_user_stories(&self, user_id: i64) -> AppResult<Vec<StoryPayload>>;

    // Explore & search
    async fn list_stories(&self, feed: ExploreFeed) -> AppResult<Vec<StoryPayload>>;
    async fn search_stories(&self, query: String) -> AppResult<Vec<StoryPayload>>;
    async fn search_users(&self, query: String) -> AppResult<Vec<UserPayload>>;

    // Stories
    async fn get_story(&self, id: i64) -> AppResult<StoryPayload>;
    async fn create_story(&self, body: StoryBody) -> AppResult<StoryPayload>;
    async fn update_story(&self, id: i64, body: StoryBody) -> AppResult<StoryPayload>;
    async fn delete_story(&self, id: i64) -> AppResult<()>;
    async fn list_my_stories(&self) -> AppResult<Vec<StoryPayload>>;

    // Chapters
    async fn list_chapters(&self, story_id: i64) -> AppResult<Vec<ChapterSummaryPayload>>;
    async fn get_chapter(&self, id: i64) -> AppResult<ChapterPayload>;
    async fn create_chapter(&self, body: ChapterBody) -> AppResult<ChapterPayload>;
    async fn update_chapter(&self, id: i64, body: ChapterBody) -> AppResult<ChapterPayload>;
    async fn publish_chapter(&self, id: i64) -> AppResult<ChapterPayload>;
    async fn delete_chapter(&self, id: i64) -> AppResult<()>;

    // Library
    async fn list_library(&self) -> AppResult<Vec<StoryPayload>>;
    async fn add_favorite(&self, story_id: i64) -> AppResult<()>;
    async fn remove_favorite(&self, story_id: i64) -> AppResult<()>;
    async fn save_progress(&self, body: ProgressBody) -> AppResult<()>;
}
