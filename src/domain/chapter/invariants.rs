use super::entity::{Chapter, ChapterStatus};
use crate::domain::{DomainError, DomainResult};

pub const MAX_CHAPTER_TITLE_LEN: usize = 120;

/// Validates all Chapter invariants
pub fn validate_chapter(chapter: &Chapter) -> DomainResult<()> {
    validate_number(chapter.number)?;
    if let Some(title) = &chapter.title {
        validate_chapter_title(title)?;
    }
    validate_published_content(chapter)?;
    Ok(())
}

/// Chapter numbering starts at 1
fn validate_number(number: u32) -> DomainResult<()> {
    if number == 0 {
        return Err(DomainError::InvariantViolation(
            "Chapter number must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// An explicit title cannot be blank and is capped in length
pub fn validate_chapter_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Chapter title cannot be blank".to_string(),
        ));
    }
    if title.chars().count() > MAX_CHAPTER_TITLE_LEN {
        return Err(DomainError::InvariantViolation(format!(
            "Chapter title exceeds {} characters",
            MAX_CHAPTER_TITLE_LEN
        )));
    }
    Ok(())
}

/// A published chapter always has content
fn validate_published_content(chapter: &Chapter) -> DomainResult<()> {
    if chapter.status == ChapterStatus::Published && chapter.content.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "A published chapter cannot have blank content".to_string(),
        ));
    }
    Ok(())
}

/// Invariants that must hold for the Chapter domain:
///
/// 1. number >= 1 and unique within a story (uniqueness enforced by the cache)
/// 2. published chapters have non-blank content
/// 3. word_count tracks content
/// 4. draft → published is the only status transition
