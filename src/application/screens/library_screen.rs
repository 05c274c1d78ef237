// src/application/screens/library_screen.rs

use std::sync::Arc;

use crate::application::dto::StoryDto;
use crate::application::resource::Resource;
use crate::services::LibraryService;

/// Library screen: the favorited stories with their reading progress.
pub struct LibraryScreen {
    library_service: Arc<LibraryService>,
    pub stories: Resource<Vec<StoryDto>>,
}

impl LibraryScreen {
    pub fn new(library_service: Arc<LibraryService>) -> Self {
        Self {
            library_service,
            stories: Resource::Loading,
        }
    }

    pub async fn on_open(&mut self) {
        self.load().await;
    }

    pub async fn on_refresh(&mut self) {
        self.load().await;
    }

    /// Remove a story straight from the library list.
    pub async fn on_favorite_toggled(&mut self, story_id: i64) {
        match self.library_service.toggle_favorite(story_id).await {
            Ok(_) => self.load().await,
            // The service reverted the local flag; the list stands
            Err(e) => log::warn!("favorite toggle for story {} failed: {}", story_id, e),
        }
    }

    async fn load(&mut self) {
        self.stories = Resource::Loading;
        let result = self.library_service.library().await;
        self.stories = Resource::from_result(
            result.map(|stories| stories.into_iter().map(StoryDto::from).collect()),
        );
    }
}
