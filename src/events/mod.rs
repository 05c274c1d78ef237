// src/events/mod.rs
//
// Internal Event System - Public API
//
// CRITICAL: EventHandler is INTERNAL and must NOT be exported

pub mod bus;
pub mod handlers;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    // Chapter
    ChapterCreated,
    ChapterDeleted,
    ChapterPublished,
    // Library
    ProgressSaved,
    // Profile & session
    ProfileUpdated,
    SessionEnded,
    SessionStarted,
    // Story
    StoryCreated,
    StoryDeleted,
    StoryFavorited,
    StoryUnfavorited,
    StoryUpdated,
};

pub use bus::EventBus;

pub use handlers::register_cache_handlers;

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
