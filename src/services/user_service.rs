// src/services/user_service.rs
//
// Other users' public profiles and story lists.

use std::sync::Arc;

use crate::domain::story::Story;
use crate::domain::user::User;
use crate::error::AppResult;
use crate::integrations::api::StoryhubApi;
use crate::repositories::{StoryRepository, UserRepository};

pub struct UserService {
    api: Arc<dyn StoryhubApi>,
    user_repo: Arc<dyn UserRepository>,
    story_repo: Arc<dyn StoryRepository>,
}

impl UserService {
    pub fn new(
        api: Arc<dyn StoryhubApi>,
        user_repo: Arc<dyn UserRepository>,
        story_repo: Arc<dyn StoryRepository>,
    ) -> Self {
        Self {
            api,
            user_repo,
            story_repo,
        }
    }

    /// Remote first, cached row as fallback, error when neither answers.
    pub async fn get_user(&self, user_id: i64) -> AppResult<User> {
        match self.api.get_user(user_id).await {
            Ok(payload) => {
                let user = payload.into_user()?;
                self.user_repo.mirror_remote(&user)?;
                Ok(user)
            }
            Err(e) if e.is_remote() => {
                log::warn!("user {} fetch failed, trying cache: {}", user_id, e);
                self.user_repo.get_by_id(user_id)?.ok_or(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Stories published by a user.
    pub async fn stories_by(&self, user_id: i64) -> AppResult<Vec<Story>> {
        match self.api.list_user_stories(user_id).await {
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
                log::warn!(
                    "story list for user {} unavailable, serving cache: {}",
                    user_id,
                    e
                );
                let cached = self.story_repo.list_by_author(user_id)?;
                if cached.is_empty() {
                    Err(e)
                } else {
                    Ok(cached)
                }
            }
            Err(e) => Err(e),
        }
    }
}
