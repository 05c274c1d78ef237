// src/application/state.rs

use std::sync::Arc;

use crate::events::EventBus;
use crate::services::{
    ChapterService, ExploreService, LibraryService, ProfileService, ReadingService, SearchService,
    StoryService, UserService,
};

/// The bundle of service handles a UI shell owns.
/// All fields are Arc-wrapped for thread-safe sharing across screens.
/// Services are initialized in main.rs and passed here.
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub explore_service: Arc<ExploreService>,
    pub search_service: Arc<SearchService>,
    pub story_service: Arc<StoryService>,
    pub chapter_service: Arc<ChapterService>,
    pub library_service: Arc<LibraryService>,
    pub profile_service: Arc<ProfileService>,
    pub user_service: Arc<UserService>,
    pub reading_service: Arc<ReadingService>,
}
