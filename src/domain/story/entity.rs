use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::reading_progress::ReadingProgress;

/// A serialized work composed of ordered chapters, owned by an author user.
/// Identity comes from the platform; the client never mints story ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    /// Platform identifier
    pub id: i64,

    /// Author user id
    pub author_id: i64,

    /// Author username, denormalized for list displays
    pub author_name: String,

    /// Story title
    pub title: String,

    /// Blurb shown on detail and list screens
    pub description: String,

    /// Cover image URL (if any)
    pub cover_url: Option<String>,

    /// Free-form tags
    pub tags: Vec<String>,

    /// Serialization status
    pub status: StoryStatus,

    /// Number of published chapters
    pub chapter_count: u32,

    /// Total reads across all chapters
    pub read_count: u64,

    /// Total votes across all chapters
    pub vote_count: u64,

    /// Whether this device's user has the story in their library.
    /// Purely local state; remote payloads never carry it.
    pub is_favorited: bool,

    /// This device's bookmark in the story, if reading has begun
    pub progress: Option<ReadingProgress>,

    /// Creation timestamp (platform)
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (platform)
    pub updated_at: DateTime<Utc>,
}

/// Serialization status of a story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryStatus {
    Ongoing,
    Completed,
}

impl Story {
    /// Update author-editable metadata.
    /// Preserves creation timestamp and updates the modification timestamp.
    pub fn update_metadata(
        &mut self,
        title: Option<String>,
        description: Option<String>,
        cover_url: Option<Option<String>>,
        tags: Option<Vec<String>>,
        status: Option<StoryStatus>,
    ) {
        if let Some(t) = title {
            self.title = t;
        }
        if let Some(d) = description {
            self.description = d;
        }
        if let Some(c) = cover_url {
            self.cover_url = c;
        }
        if let Some(t) = tags {
            self.tags = t;
        }
        if let Some(s) = status {
            self.status = s;
        }

        self.updated_at = Utc::now();
    }
}

impl StoryStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ongoing" => Some(StoryStatus::Ongoing),
            "completed" => Some(StoryStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoryStatus::Ongoing => write!(f, "ongoing"),
            StoryStatus::Completed => write!(f, "completed"),
        }
    }
}
