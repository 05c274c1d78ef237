// src/lib.rs
// StoryHub - Reading and writing platform client core
//
// Architecture:
// - Domain-centric: entities and invariants live in domain/
// - Local-first: the SQLite cache answers when the network cannot
// - Explicit: no implicit behavior, no magic
// - Application layer: the boundary a UI shell talks to

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_chapter,
    validate_reading_progress,
    validate_story,
    validate_user,
    // Chapter
    Chapter,
    ChapterStatus,
    // Reading progress
    ReadingProgress,
    // Story
    Story,
    StoryStatus,
    // User
    User,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    register_cache_handlers,
    ChapterCreated,
    ChapterDeleted,
    ChapterPublished,
    DomainEvent,
    EventBus,
    ProfileUpdated,
    ProgressSaved,
    SessionEnded,
    SessionStarted,
    StoryCreated,
    StoryDeleted,
    StoryFavorited,
    StoryUnfavorited,
    StoryUpdated,
};

// ============================================================================
// PUBLIC API - Configuration & Database
// ============================================================================

pub use config::{ClientConfig, ConfigStore};

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    ChapterRepository,
    SqliteChapterRepository,
    SqliteStoryRepository,
    SqliteUserRepository,
    StoryRepository,
    UserRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AutosaveConfig,
    ChapterService,
    CreateChapterRequest,
    CreateStoryRequest,
    ExploreService,
    LibraryService,
    LoginRequest,
    ProfileService,
    ProgressAutosaver,
    ProgressSink,
    ReaderSession,
    ReadingService,
    RegisterRequest,
    SearchService,
    StoryService,
    UpdateChapterRequest,
    UpdateProfileRequest,
    UpdateStoryRequest,
    UserService,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::AppState;

// Re-export application submodules
pub use application::dto;
pub use application::screens;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{ExploreFeed, StoryhubApi, StoryhubClient};
