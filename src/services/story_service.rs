// src/services/story_service.rs
use std::sync::Arc;

use crate::config::ConfigStore;
use crate::domain::story::{
    validate_description, validate_story, validate_tags, validate_title, Story, StoryStatus,
};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, StoryCreated, StoryDeleted, StoryUpdated};
use crate::integrations::api::{StoryBody, StoryhubApi};
use crate::repositories::StoryRepository;

#[derive(Debug, Clone)]
pub struct CreateStoryRequest {
    pub title: String,
    pub description: String,
    pub cover_url: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateStoryRequest {
    pub story_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub status: Option<StoryStatus>,
}

pub struct StoryService {
    api: Arc<dyn StoryhubApi>,
    story_repo: Arc<dyn StoryRepository>,
    config: Arc<ConfigStore>,
    event_bus: Arc<EventBus>,
}

impl StoryService {
    pub fn new(
        api: Arc<dyn StoryhubApi>,
        story_repo: Arc<dyn StoryRepository>,
        config: Arc<ConfigStore>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            api,
            story_repo,
            config,
            event_bus,
        }
    }

    /// Remote first, cached row as fallback, error when neither answers.
    pub async fn get_story(&self, story_id: i64) -> AppResult<Story> {
        match self.api.get_story(story_id).await {
            Ok(payload) => {
                let story = payload.into_story()?;
                self.story_repo.mirror_remote(&story)?;
                self.story_repo
                    .get_by_id(story_id)?
                    .ok_or(AppError::NotFound)
            }
            Err(e) if e.is_remote() => {
                log::warn!("story {} fetch failed, trying cache: {}", story_id, e);
                self.story_repo.get_by_id(story_id)?.ok_or(e)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn create_story(&self, request: CreateStoryRequest) -> AppResult<Story> {
        validate_title(&request.title).map_err(AppError::Domain)?;
        validate_description(&request.description).map_err(AppError::Domain)?;
        validate_tags(&request.tags).map_err(AppError::Domain)?;

        let payload = self
            .api
            .create_story(StoryBody {
                title: request.title,
                description: request.description,
                cover_url: request.cover_url,
                tags: request.tags,
                status: None,
            })
            .await?;

        let story = payload.into_story()?;
        validate_story(&story).map_err(AppError::Domain)?;
        self.story_repo.mirror_remote(&story)?;

        self.event_bus
            .emit(StoryCreated::new(story.id, story.title.clone()));

        Ok(story)
    }

    pub async fn update_story(&self, request: UpdateStoryRequest) -> AppResult<Story> {
        let mut story = self.get_story(request.story_id).await?;

        story.update_metadata(
            request.title,
            request.description,
            request.cover_url,
            request.tags,
            request.status,
        );
        validate_story(&story).map_err(AppError::Domain)?;

        let payload = self
            .api
            .update_story(
                story.id,
                StoryBody {
                    title: story.title.clone(),
                    description: story.description.clone(),
                    cover_url: story.cover_url.clone(),
                    tags: story.tags.clone(),
                    status: Some(story.status.to_string()),
                },
            )
            .await?;

        let updated = payload.into_story()?;
        self.story_repo.mirror_remote(&updated)?;

        self.event_bus.emit(StoryUpdated::new(updated.id));

        self.story_repo
            .get_by_id(updated.id)?
            .ok_or(AppError::NotFound)
    }

    pub async fn delete_story(&self, story_id: i64) -> AppResult<()> {
        self.api.delete_story(story_id).await?;

        // The cache may never have seen the row
        match self.story_repo.delete(story_id) {
            Ok(()) | Err(AppError::NotFound) => {}
            Err(e) => return Err(e),
        }

        self.event_bus.emit(StoryDeleted::new(story_id));

        Ok(())
    }

    /// Stories authored by the signed-in user
    pub async fn my_stories(&self) -> AppResult<Vec<Story>> {
        let user_id = self
            .config
            .session_user_id()
            .ok_or(AppError::Unauthorized)?;

        match self.api.list_my_stories().await {
            Ok(payloads) => {
                let mut stories = Vec::with_capacity(payloads.len());
                for payload in payloads {
                    let story = payload.into_story()?;
                    self.story_repo.mirror_remote(&story)?;
                    if let Some(cached) = self.story_repo.get_by_id(story.id)? {
                        stories.push(cached);
                    }
                }
                Ok(stories)
            }
            Err(e) if e.is_remote() => {
                log::warn!("own story list unavailable, serving cache: {}", e);
                Ok(self.story_repo.list_by_author(user_id)?)
            }
            Err(e) => Err(e),
        }
    }
}
