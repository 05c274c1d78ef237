// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($event:ident) => {
        impl DomainEvent for $event {
            fn event_id(&self) -> Uuid {
                self.event_id
            }
            fn occurred_at(&self) -> DateTime<Utc> {
                self.occurred_at
            }
            fn event_type(&self) -> &'static str {
                stringify!($event)
            }
        }
    };
}

// ============================================================================
// STORY EVENTS
// ============================================================================

/// Emitted when the signed-in author creates a story
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub story_id: i64,
    pub title: String,
}

impl StoryCreated {
    pub fn new(story_id: i64, title: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            story_id,
            title,
        }
    }
}

impl_domain_event!(StoryCreated);

/// Emitted when the signed-in author edits a story's metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub story_id: i64,
}

impl StoryUpdated {
    pub fn new(story_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            story_id,
        }
    }
}

impl_domain_event!(StoryUpdated);

/// Emitted when the signed-in author deletes a story
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub story_id: i64,
}

impl StoryDeleted {
    pub fn new(story_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            story_id,
        }
    }
}

impl_domain_event!(StoryDeleted);

// ============================================================================
// CHAPTER EVENTS
// ============================================================================

/// Emitted when a chapter draft is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub chapter_id: i64,
    pub story_id: i64,
    pub number: u32,
}

impl ChapterCreated {
    pub fn new(chapter_id: i64, story_id: i64, number: u32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            chapter_id,
            story_id,
            number,
        }
    }
}

impl_domain_event!(ChapterCreated);

/// Emitted when a draft goes live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterPublished {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub chapter_id: i64,
    pub story_id: i64,
    pub number: u32,
}

impl ChapterPublished {
    pub fn new(chapter_id: i64, story_id: i64, number: u32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            chapter_id,
            story_id,
            number,
        }
    }
}

impl_domain_event!(ChapterPublished);

/// Emitted when a chapter is removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub chapter_id: i64,
    pub story_id: i64,
    pub was_published: bool,
}

impl ChapterDeleted {
    pub fn new(chapter_id: i64, story_id: i64, was_published: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            chapter_id,
            story_id,
            was_published,
        }
    }
}

impl_domain_event!(ChapterDeleted);

// ============================================================================
// LIBRARY EVENTS
// ============================================================================

/// Emitted after a favorite toggle is confirmed by the remote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryFavorited {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub story_id: i64,
}

impl StoryFavorited {
    pub fn new(story_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            story_id,
        }
    }
}

impl_domain_event!(StoryFavorited);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryUnfavorited {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub story_id: i64,
}

impl StoryUnfavorited {
    pub fn new(story_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            story_id,
        }
    }
}

impl_domain_event!(StoryUnfavorited);

/// Emitted whenever a reading bookmark is persisted locally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSaved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub story_id: i64,
    pub chapter_number: u32,
    pub scroll_offset: f32,
}

impl ProgressSaved {
    pub fn new(story_id: i64, chapter_number: u32, scroll_offset: f32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            story_id,
            chapter_number,
            scroll_offset,
        }
    }
}

impl_domain_event!(ProgressSaved);

// ============================================================================
// PROFILE & SESSION EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: i64,
    pub username: String,
}

impl SessionStarted {
    pub fn new(user_id: i64, username: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            username,
        }
    }
}

impl_domain_event!(SessionStarted);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl SessionEnded {
    pub fn new() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
        }
    }
}

impl Default for SessionEnded {
    fn default() -> Self {
        Self::new()
    }
}

impl_domain_event!(SessionEnded);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: i64,
}

impl ProfileUpdated {
    pub fn new(user_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
        }
    }
}

impl_domain_event!(ProfileUpdated);
