// src/application/screens/search_screen.rs

use std::sync::Arc;

use crate::application::dto::{StoryDto, UserDto};
use crate::application::resource::Resource;
use crate::services::SearchService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Stories,
    Users,
}

/// Search screen: a query box and one result list per mode.
pub struct SearchScreen {
    search_service: Arc<SearchService>,
    pub query: String,
    pub mode: SearchMode,
    pub story_results: Resource<Vec<StoryDto>>,
    pub user_results: Resource<Vec<UserDto>>,
}

impl SearchScreen {
    pub fn new(search_service: Arc<SearchService>) -> Self {
        Self {
            search_service,
            query: String::new(),
            mode: SearchMode::Stories,
            story_results: Resource::Success(Vec::new()),
            user_results: Resource::Success(Vec::new()),
        }
    }

    pub fn on_query_changed(&mut self, query: String) {
        self.query = query;
    }

    pub fn on_mode_changed(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    pub async fn on_submit(&mut self) {
        match self.mode {
            SearchMode::Stories => {
                self.story_results = Resource::Loading;
                let result = self.search_service.search_stories(&self.query).await;
                self.story_results = Resource::from_result(
                    result.map(|stories| stories.into_iter().map(StoryDto::from).collect()),
                );
            }
            SearchMode::Users => {
                self.user_results = Resource::Loading;
                let result = self.search_service.search_users(&self.query).await;
                self.user_results = Resource::from_result(
                    result.map(|users| users.into_iter().map(UserDto::from).collect()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_pool;
    use crate::db::migrations::initialize_database;
    use crate::integrations::api::MockStoryhubApi;
    use crate::repositories::{SqliteStoryRepository, SqliteUserRepository};

    fn screen(api: MockStoryhubApi) -> SearchScreen {
        let pool = Arc::new(create_test_pool().unwrap());
        {
            let conn = pool.get().unwrap();
            initialize_database(&conn).unwrap();
        }
        let service = SearchService::new(
            Arc::new(api),
            Arc::new(SqliteStoryRepository::new(Arc::clone(&pool))),
            Arc::new(SqliteUserRepository::new(pool)),
        );
        SearchScreen::new(Arc::new(service))
    }

    #[tokio::test]
    async fn test_blank_query_becomes_error_state() {
        // Validation fails before the mock is touched
        let mut screen = screen(MockStoryhubApi::new());

        screen.on_query_changed("  ".to_string());
        screen.on_submit().await;

        assert!(screen.story_results.is_error());
    }

    #[tokio::test]
    async fn test_results_land_in_success_state() {
        let mut api = MockStoryhubApi::new();
        api.expect_search_stories().returning(|_| Ok(vec![]));

        let mut screen = screen(api);
        screen.on_query_changed("harbor".to_string());
        screen.on_submit().await;

        assert!(screen.story_results.is_success());
    }
}
