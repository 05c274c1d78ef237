use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{DomainError, DomainResult};

/// A numbered unit of story content.
/// Chapters are the unit of reading and of authoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    /// Platform identifier
    pub id: i64,

    /// Parent story id
    pub story_id: i64,

    /// Position within the story, starting at 1
    pub number: u32,

    /// Chapter title (optional)
    pub title: Option<String>,

    /// Chapter body text
    pub content: String,

    /// Word count of the body, kept in step with content
    pub word_count: u32,

    /// Draft or published
    pub status: ChapterStatus,

    /// Creation timestamp (platform)
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (platform)
    pub updated_at: DateTime<Utc>,
}

/// Publication status of a chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterStatus {
    Draft,
    Published,
}

impl Chapter {
    /// Replace title and/or body text.
    /// Word count and the modification timestamp follow the content.
    pub fn update_content(&mut self, title: Option<Option<String>>, content: Option<String>) {
        if let Some(t) = title {
            self.title = t;
        }
        if let Some(c) = content {
            self.word_count = c.split_whitespace().count() as u32;
            self.content = c;
        }
        self.updated_at = Utc::now();
    }

    /// Transition draft → published.
    /// A chapter with blank content cannot be published.
    pub fn publish(&mut self) -> DomainResult<()> {
        if self.status == ChapterStatus::Published {
            return Err(DomainError::InvalidStateTransition(
                "Chapter is already published".to_string(),
            ));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::InvariantViolation(
                "Cannot publish a chapter with no content".to_string(),
            ));
        }
        self.status = ChapterStatus::Published;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_published(&self) -> bool {
        self.status == ChapterStatus::Published
    }

    /// SHA-256 of the body text, hex-encoded.
    /// The cache uses this to skip rewriting unchanged content.
    pub fn content_fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.content.as_bytes());
        let digest = hasher.finalize();
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl ChapterStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(ChapterStatus::Draft),
            "published" => Some(ChapterStatus::Published),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChapterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChapterStatus::Draft => write!(f, "draft"),
            ChapterStatus::Published => write!(f, "published"),
        }
    }
}
