use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A platform account: reader, author, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Platform identifier
    pub id: i64,

    /// Unique handle
    pub username: String,

    /// Display name shown instead of the handle when set
    pub display_name: Option<String>,

    /// Profile text
    pub bio: String,

    /// Avatar image URL (if any)
    pub avatar_url: Option<String>,

    /// Number of stories the user has published
    pub story_count: u32,

    pub follower_count: u32,

    pub following_count: u32,

    /// Account creation timestamp (platform)
    pub joined_at: DateTime<Utc>,
}

impl User {
    /// Name to show in UI: display name when set, handle otherwise
    pub fn visible_name(&self) -> &str {
        match &self.display_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }
}
