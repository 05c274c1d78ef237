// src/services/chapter_service.rs
use std::sync::Arc;

use crate::domain::chapter::{invariants::validate_chapter_title, validate_chapter, Chapter};
use crate::error::{AppError, AppResult};
use crate::events::{ChapterCreated, ChapterDeleted, ChapterPublished, EventBus};
use crate::integrations::api::{ChapterBody, StoryhubApi};
use crate::repositories::ChapterRepository;

#[derive(Debug, Clone)]
pub struct CreateChapterRequest {
    pub story_id: i64,
    pub title: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct UpdateChapterRequest {
    pub chapter_id: i64,
    pub title: Option<Option<String>>,
    pub content: Option<String>,
}

pub struct ChapterService {
    api: Arc<dyn StoryhubApi>,
    chapter_repo: Arc<dyn ChapterRepository>,
    event_bus: Arc<EventBus>,
}

impl ChapterService {
    pub fn new(
        api: Arc<dyn StoryhubApi>,
        chapter_repo: Arc<dyn ChapterRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            api,
            chapter_repo,
            event_bus,
        }
    }

    /// Remote first, cached row as fallback, error when neither answers.
    pub async fn get_chapter(&self, chapter_id: i64) -> AppResult<Chapter> {
        match self.api.get_chapter(chapter_id).await {
            Ok(payload) => {
                let chapter = payload.into_chapter()?;
                self.chapter_repo.mirror_remote(&chapter)?;
                Ok(chapter)
            }
            Err(e) if e.is_remote() => {
                log::warn!("chapter {} fetch failed, trying cache: {}", chapter_id, e);
                self.chapter_repo.get_by_id(chapter_id)?.ok_or(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Chapter list for a story's table of contents.
    /// List payloads carry no body text; cached bodies survive the mirror.
    pub async fn list_chapters(&self, story_id: i64) -> AppResult<Vec<Chapter>> {
        match self.api.list_chapters(story_id).await {
            Ok(payloads) => {
                for payload in payloads {
                    let summary = payload.into_chapter()?;
                    self.chapter_repo.mirror_summary(&summary)?;
                }
                Ok(self.chapter_repo.list_by_story(story_id)?)
            }
            Err(e) if e.is_remote() => {
                log::warn!(
                    "chapter list for story {} unavailable, serving cache: {}",
                    story_id,
                    e
                );
                let cached = self.chapter_repo.list_by_story(story_id)?;
                if cached.is_empty() {
                    Err(e)
                } else {
                    Ok(cached)
                }
            }
            Err(e) => Err(e),
        }
    }

    /// New chapters always start as drafts.
    pub async fn create_chapter(&self, request: CreateChapterRequest) -> AppResult<Chapter> {
        if let Some(title) = &request.title {
            validate_chapter_title(title).map_err(AppError::Domain)?;
        }

        let payload = self
            .api
            .create_chapter(ChapterBody {
                story_id: Some(request.story_id),
                title: request.title,
                content: request.content,
            })
            .await?;

        let chapter = payload.into_chapter()?;
        validate_chapter(&chapter).map_err(AppError::Domain)?;
        self.chapter_repo.mirror_remote(&chapter)?;

        self.event_bus.emit(ChapterCreated::new(
            chapter.id,
            chapter.story_id,
            chapter.number,
        ));

        Ok(chapter)
    }

    pub async fn update_chapter(&self, request: UpdateChapterRequest) -> AppResult<Chapter> {
        let mut chapter = self.get_chapter(request.chapter_id).await?;

        chapter.update_content(request.title, request.content);
        validate_chapter(&chapter).map_err(AppError::Domain)?;

        let payload = self
            .api
            .update_chapter(
                chapter.id,
                ChapterBody {
                    story_id: None,
                    title: chapter.title.clone(),
                    content: chapter.content.clone(),
                },
            )
            .await?;

        let updated = payload.into_chapter()?;
        self.chapter_repo.mirror_remote(&updated)?;

        Ok(updated)
    }

    /// Draft → published. The domain transition runs first so a blank
    /// draft never reaches the network.
    pub async fn publish_chapter(&self, chapter_id: i64) -> AppResult<Chapter> {
        let mut chapter = self.get_chapter(chapter_id).await?;
        chapter.publish().map_err(AppError::Domain)?;

        let payload = self.api.publish_chapter(chapter_id).await?;
        let published = payload.into_chapter()?;
        self.chapter_repo.mirror_remote(&published)?;

        self.event_bus.emit(ChapterPublished::new(
            published.id,
            published.story_id,
            published.number,
        ));

        Ok(published)
    }

    pub async fn delete_chapter(&self, chapter_id: i64) -> AppResult<()> {
        let chapter = self.get_chapter(chapter_id).await?;

        self.api.delete_chapter(chapter_id).await?;

        match self.chapter_repo.delete(chapter_id) {
            Ok(()) | Err(AppError::NotFound) => {}
            Err(e) => return Err(e),
        }

        self.event_bus.emit(ChapterDeleted::new(
            chapter.id,
            chapter.story_id,
            chapter.is_published(),
        ));

        Ok(())
    }
}
