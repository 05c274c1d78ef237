// src/integrations/api/dto.rs
//
// Wire payloads for the platform API.
//
// These mirror the JSON the API speaks and never leak into the domain:
// each payload knows how to convert itself into the matching entity, and
// requests are built from explicit body structs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::chapter::{Chapter, ChapterStatus};
use crate::domain::story::{Story, StoryStatus};
use crate::domain::user::User;
use crate::error::{AppError, AppResult};

// ============================================================================
// RESPONSE PAYLOADS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub story_count: u32,
    pub follower_count: u32,
    pub following_count: u32,
    pub joined_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryPayload {
    pub id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub tags: Vec<String>,
    pub status: String,
    pub chapter_count: u32,
    pub read_count: u64,
    pub vote_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterPayload {
    pub id: i64,
    pub story_id: i64,
    pub number: u32,
    pub title: Option<String>,
    pub content: String,
    pub word_count: u32,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// List payloads carry no body text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterSummaryPayload {
    pub id: i64,
    pub story_id: i64,
    pub number: u32,
    pub title: Option<String>,
    pub word_count: u32,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPayload {
    pub token: String,
    pub user: UserPayload,
}

/// Error envelope the API returns on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorPayload {
    pub message: String,
}

// ============================================================================
// REQUEST BODIES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterBody {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryBody {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressBody {
    pub story_id: i64,
    pub chapter_number: u32,
    pub scroll_offset: f32,
}

// ============================================================================
// WIRE → DOMAIN CONVERSION
// ============================================================================

fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

impl UserPayload {
    pub fn into_user(self) -> AppResult<User> {
        Ok(User {
            id: self.id,
            username: self.username,
            display_name: self.display_name,
            bio: self.bio.unwrap_or_default(),
            avatar_url: self.avatar_url,
            story_count: self.story_count,
            follower_count: self.follower_count,
            following_count: self.following_count,
            joined_at: parse_timestamp(&self.joined_at)?,
        })
    }
}

impl StoryPayload {
    /// Library state (favorite flag, progress) is local-only and starts
    /// empty here; the cache layer owns it.
    pub fn into_story(self) -> AppResult<Story> {
        let status = StoryStatus::parse(&self.status).ok_or_else(|| {
            AppError::Other(format!("Unknown story status '{}'", self.status))
        })?;

        Ok(Story {
            id: self.id,
            author_id: self.author_id,
            author_name: self.author_name,
            title: self.title,
            description: self.description.unwrap_or_default(),
            cover_url: self.cover_url,
            tags: self.tags,
            status,
            chapter_count: self.chapter_count,
            read_count: self.read_count,
            vote_count: self.vote_count,
            is_favorited: false,
            progress: None,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

impl ChapterPayload {
    pub fn into_chapter(self) -> AppResult<Chapter> {
        let status = ChapterStatus::parse(&self.status).ok_or_else(|| {
            AppError::Other(format!("Unknown chapter status '{}'", self.status))
        })?;

        Ok(Chapter {
            id: self.id,
            story_id: self.story_id,
            number: self.number,
            title: self.title,
            content: self.content,
            word_count: self.word_count,
            status,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

impl ChapterSummaryPayload {
    /// Summaries become chapters with an empty body; the cache preserves
    /// any body it already holds.
    pub fn into_chapter(self) -> AppResult<Chapter> {
        let status = ChapterStatus::parse(&self.status).ok_or_else(|| {
            AppError::Other(format!("Unknown chapter status '{}'", self.status))
        })?;

        Ok(Chapter {
            id: self.id,
            story_id: self.story_id,
            number: self.number,
            title: self.title,
            content: String::new(),
            word_count: self.word_count,
            status,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}
