// src/services/search_service.rs
//
// Story and user search.

use std::sync::Arc;

use crate::domain::story::Story;
use crate::domain::user::User;
use crate::domain::{DomainError, DomainResult};
use crate::error::{AppError, AppResult};
use crate::integrations::api::StoryhubApi;
use crate::repositories::{StoryRepository, UserRepository};

pub const MIN_QUERY_LEN: usize = 2;
pub const MAX_QUERY_LEN: usize = 100;

pub struct SearchService {
    api: Arc<dyn StoryhubApi>,
    story_repo: Arc<dyn StoryRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl SearchService {
    pub fn new(
        api: Arc<dyn StoryhubApi>,
        story_repo: Arc<dyn StoryRepository>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            api,
            story_repo,
            user_repo,
        }
    }

    pub async fn search_stories(&self, query: &str) -> AppResult<Vec<Story>> {
        let query = validate_query(query).map_err(AppError::Domain)?;

        match self.api.search_stories(query.clone()).await {
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
                log::warn!("story search unavailable, serving cache: {}", e);
                let cached = self.story_repo.search_cached(&query)?;
                if cached.is_empty() {
                    Err(e)
                } else {
                    Ok(cached)
                }
            }
            Err(e) => Err(e),
        }
    }

    pub async fn search_users(&self, query: &str) -> AppResult<Vec<User>> {
        let query = validate_query(query).map_err(AppError::Domain)?;

        match self.api.search_users(query.clone()).await {
            Ok(payloads) => {
                let mut users = Vec::with_capacity(payloads.len());
                for payload in payloads {
                    let user = payload.into_user()?;
                    self.user_repo.mirror_remote(&user)?;
                    users.push(user);
                }
                Ok(users)
            }
            Err(e) if e.is_remote() => {
                log::warn!("user search unavailable, serving cache: {}", e);
                let cached = self.user_repo.search_cached(&query)?;
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

/// Queries are trimmed, non-blank, and length-bounded
fn validate_query(query: &str) -> DomainResult<String> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN {
        return Err(DomainError::InvariantViolation(format!(
            "Search query must be at least {} characters",
            MIN_QUERY_LEN
        )));
    }
    if trimmed.chars().count() > MAX_QUERY_LEN {
        return Err(DomainError::InvariantViolation(format!(
            "Search query exceeds {} characters",
            MAX_QUERY_LEN
        )));
    }
    Ok(trimmed.to_string())
}
