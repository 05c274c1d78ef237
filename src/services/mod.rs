// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// One service per domain area. Services validate requests, call the
// remote, mirror results into the cache, and emit domain events.

pub mod chapter_service;
pub mod explore_service;
pub mod library_service;
pub mod profile_service;
pub mod reading_service;
pub mod search_service;
pub mod story_service;
pub mod user_service;

#[cfg(test)]
mod library_service_tests;
#[cfg(test)]
mod reading_service_tests;
#[cfg(test)]
mod story_service_tests;

// Re-export all services and their types
pub use story_service::{
    CreateStoryRequest,
    StoryService,
    UpdateStoryRequest,
};

pub use chapter_service::{
    ChapterService,
    CreateChapterRequest,
    UpdateChapterRequest,
};

pub use library_service::LibraryService;

pub use explore_service::ExploreService;

pub use search_service::{SearchService, MAX_QUERY_LEN, MIN_QUERY_LEN};

pub use profile_service::{
    LoginRequest,
    ProfileService,
    RegisterRequest,
    UpdateProfileRequest,
};

pub use user_service::UserService;

pub use reading_service::{
    AutosaveConfig,
    ProgressAutosaver,
    ProgressSink,
    ReaderSession,
    ReadingService,
};
