// src/application/screens/writer_screen.rs

use std::sync::Arc;

use crate::application::dto::{ChapterDto, StoryDto};
use crate::application::resource::Resource;
use crate::services::{
    ChapterService, CreateChapterRequest, CreateStoryRequest, StoryService, UpdateChapterRequest,
};

/// Authoring screen: the signed-in user's stories and chapter drafting.
pub struct WriterScreen {
    story_service: Arc<StoryService>,
    chapter_service: Arc<ChapterService>,
    pub my_stories: Resource<Vec<StoryDto>>,
    /// Message from the last failed editor action, if any
    pub editor_error: Option<String>,
}

impl WriterScreen {
    pub fn new(story_service: Arc<StoryService>, chapter_service: Arc<ChapterService>) -> Self {
        Self {
            story_service,
            chapter_service,
            my_stories: Resource::Loading,
            editor_error: None,
        }
    }

    pub async fn on_open(&mut self) {
        self.my_stories = Resource::Loading;
        let result = self.story_service.my_stories().await;
        self.my_stories = Resource::from_result(
            result.map(|stories| stories.into_iter().map(StoryDto::from).collect()),
        );
    }

    pub async fn on_story_created(
        &mut self,
        title: String,
        description: String,
        tags: Vec<String>,
    ) -> Option<StoryDto> {
        self.editor_error = None;

        let result = self
            .story_service
            .create_story(CreateStoryRequest {
                title,
                description,
                cover_url: None,
                tags,
            })
            .await;

        match result {
            Ok(story) => {
                let dto = StoryDto::from(story);
                if let Resource::Success(stories) = &mut self.my_stories {
                    stories.insert(0, dto.clone());
                }
                Some(dto)
            }
            Err(e) => {
                self.editor_error = Some(e.to_string());
                None
            }
        }
    }

    pub async fn on_story_deleted(&mut self, story_id: i64) {
        self.editor_error = None;

        match self.story_service.delete_story(story_id).await {
            Ok(()) => {
                if let Resource::Success(stories) = &mut self.my_stories {
                    stories.retain(|s| s.id != story_id);
                }
            }
            Err(e) => self.editor_error = Some(e.to_string()),
        }
    }

    pub async fn on_chapter_drafted(
        &mut self,
        story_id: i64,
        title: Option<String>,
        content: String,
    ) -> Option<ChapterDto> {
        self.editor_error = None;

        let result = self
            .chapter_service
            .create_chapter(CreateChapterRequest {
                story_id,
                title,
                content,
            })
            .await;

        match result {
            Ok(chapter) => Some(ChapterDto::from(chapter)),
            Err(e) => {
                self.editor_error = Some(e.to_string());
                None
            }
        }
    }

    pub async fn on_chapter_saved(
        &mut self,
        chapter_id: i64,
        title: Option<Option<String>>,
        content: Option<String>,
    ) -> Option<ChapterDto> {
        self.editor_error = None;

        let result = self
            .chapter_service
            .update_chapter(UpdateChapterRequest {
                chapter_id,
                title,
                content,
            })
            .await;

        match result {
            Ok(chapter) => Some(ChapterDto::from(chapter)),
            Err(e) => {
                self.editor_error = Some(e.to_string());
                None
            }
        }
    }

    /// Draft → published. The story list is reloaded so chapter counts
    /// stay honest.
    pub async fn on_chapter_published(&mut self, chapter_id: i64) -> Option<ChapterDto> {
        self.editor_error = None;

        match self.chapter_service.publish_chapter(chapter_id).await {
            Ok(chapter) => {
                let dto = ChapterDto::from(chapter);
                self.on_open().await;
                Some(dto)
            }
            Err(e) => {
                self.editor_error = Some(e.to_string());
                None
            }
        }
    }

    pub async fn on_chapter_deleted(&mut self, chapter_id: i64) {
        self.editor_error = None;

        if let Err(e) = self.chapter_service.delete_chapter(chapter_id).await {
            self.editor_error = Some(e.to_string());
        }
    }
}
