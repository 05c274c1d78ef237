pub mod entity;
pub mod invariants;

pub use entity::{Story, StoryStatus};
pub use invariants::{validate_description, validate_story, validate_tags, validate_title};
