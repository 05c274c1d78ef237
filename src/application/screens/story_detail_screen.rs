// src/application/screens/story_detail_screen.rs

use std::sync::Arc;

use crate::application::dto::{ChapterDto, StoryDto};
use crate::application::resource::Resource;
use crate::services::{ChapterService, LibraryService, StoryService};

/// Story detail: cover, blurb, table of contents, favorite button.
pub struct StoryDetailScreen {
    story_service: Arc<StoryService>,
    chapter_service: Arc<ChapterService>,
    library_service: Arc<LibraryService>,
    story_id: i64,
    pub story: Resource<StoryDto>,
    pub chapters: Resource<Vec<ChapterDto>>,
    /// Message from the last failed favorite toggle, if any
    pub favorite_error: Option<String>,
}

impl StoryDetailScreen {
    pub fn new(
        story_service: Arc<StoryService>,
        chapter_service: Arc<ChapterService>,
        library_service: Arc<LibraryService>,
        story_id: i64,
    ) -> Self {
        Self {
            story_service,
            chapter_service,
            library_service,
            story_id,
            story: Resource::Loading,
            chapters: Resource::Loading,
            favorite_error: None,
        }
    }

    pub async fn on_open(&mut self) {
        self.story = Resource::Loading;
        self.story = Resource::from_result(
            self.story_service
                .get_story(self.story_id)
                .await
                .map(StoryDto::from),
        );

        self.chapters = Resource::Loading;
        self.chapters = Resource::from_result(
            self.chapter_service
                .list_chapters(self.story_id)
                .await
                .map(|chapters| chapters.into_iter().map(ChapterDto::from).collect()),
        );
    }

    pub async fn on_favorite_toggled(&mut self) {
        self.favorite_error = None;

        match self.library_service.toggle_favorite(self.story_id).await {
            Ok(favorited) => {
                if let Resource::Success(story) = &mut self.story {
                    story.is_favorited = favorited;
                }
            }
            Err(e) => {
                // The service already reverted the local flag
                self.favorite_error = Some(e.to_string());
            }
        }
    }
}
