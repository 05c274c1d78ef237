// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are UI-friendly representations
// - DTOs NEVER leak domain invariants
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO)

use serde::{Deserialize, Serialize};

use crate::domain::chapter::Chapter;
use crate::domain::reading_progress::ReadingProgress;
use crate::domain::story::Story;
use crate::domain::user::User;

// ============================================================================
// STORY DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryDto {
    pub id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub title: String,
    pub description: String,
    pub cover_url: Option<String>,
    pub tags: Vec<String>,
    pub status: String,
    pub chapter_count: u32,
    pub read_count: u64,
    pub vote_count: u64,
    pub is_favorited: bool,
    pub progress: Option<ReadingProgressDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Story> for StoryDto {
    fn from(story: Story) -> Self {
        Self {
            id: story.id,
            author_id: story.author_id,
            author_name: story.author_name,
            title: story.title,
            description: story.description,
            cover_url: story.cover_url,
            tags: story.tags,
            status: story.status.to_string(),
            chapter_count: story.chapter_count,
            read_count: story.read_count,
            vote_count: story.vote_count,
            is_favorited: story.is_favorited,
            progress: story.progress.map(ReadingProgressDto::from),
            created_at: story.created_at.to_rfc3339(),
            updated_at: story.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// CHAPTER DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterDto {
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

impl From<Chapter> for ChapterDto {
    fn from(chapter: Chapter) -> Self {
        Self {
            id: chapter.id,
            story_id: chapter.story_id,
            number: chapter.number,
            title: chapter.title,
            content: chapter.content,
            word_count: chapter.word_count,
            status: chapter.status.to_string(),
            created_at: chapter.created_at.to_rfc3339(),
            updated_at: chapter.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// USER DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub visible_name: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub story_count: u32,
    pub follower_count: u32,
    pub following_count: u32,
    pub joined_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        let visible_name = user.visible_name().to_string();
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            visible_name,
            bio: user.bio,
            avatar_url: user.avatar_url,
            story_count: user.story_count,
            follower_count: user.follower_count,
            following_count: user.following_count,
            joined_at: user.joined_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// READING PROGRESS DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingProgressDto {
    pub chapter_number: u32,
    pub scroll_offset: f32,
    pub updated_at: String,
}

impl From<ReadingProgress> for ReadingProgressDto {
    fn from(progress: ReadingProgress) -> Self {
        Self {
            chapter_number: progress.chapter_number,
            scroll_offset: progress.scroll_offset,
            updated_at: progress.updated_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::story::StoryStatus;
    use chrono::Utc;

    #[test]
    fn test_visible_name_prefers_display_name() {
        let user = User {
            id: 1,
            username: "night_owl".to_string(),
            display_name: Some("The Night Owl".to_string()),
            bio: String::new(),
            avatar_url: None,
            story_count: 0,
            follower_count: 0,
            following_count: 0,
            joined_at: Utc::now(),
        };
        let dto = UserDto::from(user);
        assert_eq!(dto.visible_name, "The Night Owl");
    }

    #[test]
    fn test_story_dto_carries_library_state() {
        let now = Utc::now();
        let story = Story {
            id: 1,
            author_id: 2,
            author_name: "ana".to_string(),
            title: "T".to_string(),
            description: String::new(),
            cover_url: None,
            tags: vec![],
            status: StoryStatus::Completed,
            chapter_count: 1,
            read_count: 0,
            vote_count: 0,
            is_favorited: true,
            progress: Some(ReadingProgress::new(1, 4, 0.25)),
            created_at: now,
            updated_at: now,
        };

        let dto = StoryDto::from(story);
        assert_eq!(dto.status, "completed");
        assert!(dto.is_favorited);
        assert_eq!(dto.progress.unwrap().chapter_number, 4);
    }
}
