// src/application/screens/explore_screen.rs

use std::sync::Arc;

use crate::application::dto::StoryDto;
use crate::application::resource::Resource;
use crate::integrations::api::ExploreFeed;
use crate::services::ExploreService;

/// Browse screen: one feed visible at a time.
pub struct ExploreScreen {
    explore_service: Arc<ExploreService>,
    pub feed: ExploreFeed,
    pub stories: Resource<Vec<StoryDto>>,
}

impl ExploreScreen {
    pub fn new(explore_service: Arc<ExploreService>) -> Self {
        Self {
            explore_service,
            feed: ExploreFeed::Featured,
            stories: Resource::Loading,
        }
    }

    pub async fn on_open(&mut self) {
        self.load().await;
    }

    pub async fn on_feed_selected(&mut self, feed: ExploreFeed) {
        self.feed = feed;
        self.load().await;
    }

    pub async fn on_retry(&mut self) {
        self.load().await;
    }

    async fn load(&mut self) {
        self.stories = Resource::Loading;
        let result = self.explore_service.browse(self.feed).await;
        self.stories = Resource::from_result(
            result.map(|stories| stories.into_iter().map(StoryDto::from).collect()),
        );
    }
}
