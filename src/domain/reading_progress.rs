use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Per-story bookmark: the chapter being read and how far into it the
/// reader has scrolled, as a fraction of the chapter body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingProgress {
    pub story_id: i64,

    /// Chapter position within the story, starting at 1
    pub chapter_number: u32,

    /// 0.0 = top of chapter, 1.0 = fully read
    pub scroll_offset: f32,

    pub updated_at: DateTime<Utc>,
}

impl ReadingProgress {
    pub fn new(story_id: i64, chapter_number: u32, scroll_offset: f32) -> Self {
        Self {
            story_id,
            chapter_number,
            scroll_offset,
            updated_at: Utc::now(),
        }
    }

    /// Bookmark at the top of the first chapter
    pub fn start_of(story_id: i64) -> Self {
        Self::new(story_id, 1, 0.0)
    }
}

/// Offset must be a fraction and the chapter number must be valid
pub fn validate_reading_progress(progress: &ReadingProgress) -> DomainResult<()> {
    if progress.chapter_number == 0 {
        return Err(DomainError::InvariantViolation(
            "Progress chapter number must be at least 1".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&progress.scroll_offset) {
        return Err(DomainError::InvariantViolation(format!(
            "Scroll offset {} must be between 0.0 and 1.0",
            progress.scroll_offset
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_progress() {
        let p = ReadingProgress::new(1, 3, 0.42);
        assert!(validate_reading_progress(&p).is_ok());
    }

    #[test]
    fn test_zero_chapter_fails() {
        let p = ReadingProgress::new(1, 0, 0.0);
        assert!(validate_reading_progress(&p).is_err());
    }

    #[test]
    fn test_offset_out_of_range_fails() {
        let p = ReadingProgress::new(1, 1, 1.2);
        assert!(validate_reading_progress(&p).is_err());

        let p = ReadingProgress::new(1, 1, -0.1);
        assert!(validate_reading_progress(&p).is_err());
    }

    #[test]
    fn test_start_of_is_valid() {
        let p = ReadingProgress::start_of(9);
        assert_eq!(p.chapter_number, 1);
        assert_eq!(p.scroll_offset, 0.0);
        assert!(validate_reading_progress(&p).is_ok());
    }
}
