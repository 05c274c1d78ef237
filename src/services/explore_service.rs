// src/services/explore_service.rs
//
// Browse feeds: featured, trending, recently updated.

use std::sync::Arc;

use crate::domain::story::Story;
use crate::error::AppResult;
use crate::integrations::api::{ExploreFeed, StoryPayload, StoryhubApi};
use crate::repositories::StoryRepository;

pub struct ExploreService {
    api: Arc<dyn StoryhubApi>,
    story_repo: Arc<dyn StoryRepository>,
}

impl ExploreService {
    pub fn new(api: Arc<dyn StoryhubApi>, story_repo: Arc<dyn StoryRepository>) -> Self {
        Self { api, story_repo }
    }

    /// Fetch a feed, mirroring results into the cache. When the remote is
    /// unreachable the cache stands in, sorted to match the feed kind.
    pub async fn browse(&self, feed: ExploreFeed) -> AppResult<Vec<Story>> {
        match self.api.list_stories(feed).await {
            Ok(payloads) => self.mirror_and_rehydrate(payloads),
            Err(e) if e.is_remote() => {
                log::warn!("explore feed {} unavailable: {}", feed.as_str(), e);
                let cached = match feed {
                    ExploreFeed::Featured => self.story_repo.list_most_voted()?,
                    ExploreFeed::Trending => self.story_repo.list_most_read()?,
                    ExploreFeed::RecentlyUpdated => self.story_repo.list_recently_updated()?,
                };
                if cached.is_empty() {
                    Err(e)
                } else {
                    Ok(cached)
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Mirror remote payloads, then read the rows back so local library
    /// state (favorite flag, progress) is populated.
    fn mirror_and_rehydrate(&self, payloads: Vec<StoryPayload>) -> AppResult<Vec<Story>> {
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
}
