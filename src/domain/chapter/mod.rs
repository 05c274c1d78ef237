pub mod entity;
pub mod invariants;

pub use entity::{Chapter, ChapterStatus};
pub use invariants::validate_chapter;
