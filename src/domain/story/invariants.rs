use super::entity::Story;
use crate::domain::{DomainError, DomainResult};

pub const MAX_TITLE_LEN: usize = 120;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_LEN: usize = 32;

/// Validates all Story invariants
pub fn validate_story(story: &Story) -> DomainResult<()> {
    validate_title(&story.title)?;
    validate_description(&story.description)?;
    validate_tags(&story.tags)?;
    Ok(())
}

/// Title cannot be blank and is capped in length
pub fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Story title cannot be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::InvariantViolation(format!(
            "Story title exceeds {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

/// Description is optional but capped in length
pub fn validate_description(description: &str) -> DomainResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::InvariantViolation(format!(
            "Story description exceeds {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(())
}

/// At most MAX_TAGS tags, each non-blank and capped in length
pub fn validate_tags(tags: &[String]) -> DomainResult<()> {
    if tags.len() > MAX_TAGS {
        return Err(DomainError::InvariantViolation(format!(
            "At most {} tags are allowed",
            MAX_TAGS
        )));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(DomainError::InvariantViolation(
                "Tags cannot be blank".to_string(),
            ));
        }
        if tag.chars().count() > MAX_TAG_LEN {
            return Err(DomainError::InvariantViolation(format!(
                "Tag '{}' exceeds {} characters",
                tag, MAX_TAG_LEN
            )));
        }
    }
    Ok(())
}

/// Invariants that must hold for the Story domain:
///
/// 1. Identity (platform id) is immutable
/// 2. Title is non-blank and at most MAX_TITLE_LEN characters
/// 3. Description is at most MAX_DESCRIPTION_LEN characters
/// 4. At most MAX_TAGS tags, each non-blank and at most MAX_TAG_LEN characters
/// 5. Favorite flag and reading progress are local-only state
/// 6. Created timestamp never changes

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn story(title: &str) -> Story {
        let now = Utc::now();
        Story {
            id: 1,
            author_id: 10,
            author_name: "ana".to_string(),
            title: title.to_string(),
            description: String::new(),
            cover_url: None,
            tags: Vec::new(),
            status: crate::domain::StoryStatus::Ongoing,
            chapter_count: 0,
            read_count: 0,
            vote_count: 0,
            is_favorited: false,
            progress: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_valid_story() {
        assert!(validate_story(&story("The Quiet Harbor")).is_ok());
    }

    #[test]
    fn test_blank_title_fails() {
        assert!(validate_story(&story("   ")).is_err());
    }

    #[test]
    fn test_overlong_title_fails() {
        assert!(validate_story(&story(&"x".repeat(MAX_TITLE_LEN + 1))).is_err());
    }

    #[test]
    fn test_too_many_tags_fails() {
        let mut s = story("ok");
        s.tags = (0..MAX_TAGS + 1).map(|i| format!("tag{}", i)).collect();
        assert!(validate_story(&s).is_err());
    }

    #[test]
    fn test_blank_tag_fails() {
        let mut s = story("ok");
        s.tags = vec!["romance".to_string(), "  ".to_string()];
        assert!(validate_story(&s).is_err());
    }
}
