// src/main.rs
//
// Headless bootstrap: wires the full client core and reports cache
// health. A UI shell embeds the same wiring through AppState.

use std::sync::Arc;

use anyhow::Context;

use storyhub::application::state::AppState;
use storyhub::config::ConfigStore;
use storyhub::db::{create_connection_pool, get_cache_stats, initialize_database};
use storyhub::events::{register_cache_handlers, EventBus};
use storyhub::integrations::{StoryhubApi, StoryhubClient};
use storyhub::repositories::*;
use storyhub::services::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // 1. INFRASTRUCTURE
    let config = Arc::new(ConfigStore::open_default().context("loading client config")?);
    let event_bus = Arc::new(EventBus::new());
    let pool = Arc::new(create_connection_pool().context("opening cache database")?);
    let api: Arc<dyn StoryhubApi> =
        Arc::new(StoryhubClient::new(Arc::clone(&config)).context("building API client")?);

    // Initialize schema (idempotent)
    {
        let conn = pool.get()?;
        initialize_database(&conn).context("migrating cache schema")?;
    }

    // 2. REPOSITORIES
    let story_repo: Arc<dyn StoryRepository> =
        Arc::new(SqliteStoryRepository::new(Arc::clone(&pool)));
    let chapter_repo: Arc<dyn ChapterRepository> =
        Arc::new(SqliteChapterRepository::new(Arc::clone(&pool)));
    let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(Arc::clone(&pool)));

    // 3. SERVICES
    let explore_service = Arc::new(ExploreService::new(
        Arc::clone(&api),
        Arc::clone(&story_repo),
    ));
    let search_service = Arc::new(SearchService::new(
        Arc::clone(&api),
        Arc::clone(&story_repo),
        Arc::clone(&user_repo),
    ));
    let story_service = Arc::new(StoryService::new(
        Arc::clone(&api),
        Arc::clone(&story_repo),
        Arc::clone(&config),
        Arc::clone(&event_bus),
    ));
    let chapter_service = Arc::new(ChapterService::new(
        Arc::clone(&api),
        Arc::clone(&chapter_repo),
        Arc::clone(&event_bus),
    ));
    let library_service = Arc::new(LibraryService::new(
        Arc::clone(&api),
        Arc::clone(&story_repo),
        Arc::clone(&event_bus),
    ));
    let profile_service = Arc::new(ProfileService::new(
        Arc::clone(&api),
        Arc::clone(&user_repo),
        Arc::clone(&config),
        Arc::clone(&event_bus),
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&api),
        Arc::clone(&user_repo),
        Arc::clone(&story_repo),
    ));
    let reading_service = Arc::new(ReadingService::new(
        Arc::clone(&story_service),
        Arc::clone(&chapter_service),
        Arc::clone(&library_service),
        AutosaveConfig::default(),
    ));

    // 4. EVENT HANDLER REGISTRATION (WIRING)
    register_cache_handlers(&event_bus, Arc::clone(&story_repo), Arc::clone(&chapter_repo));

    // 5. APPLICATION STATE
    let state = AppState {
        event_bus,
        explore_service,
        search_service,
        story_service,
        chapter_service,
        library_service,
        profile_service,
        user_service,
        reading_service,
    };

    // 6. REPORT
    let stats = {
        let conn = pool.get()?;
        get_cache_stats(&conn)?
    };

    log::info!(
        "storyhub client core ready: {} users / {} stories / {} chapters cached ({} KiB), signed in: {}",
        stats.user_count,
        stats.story_count,
        stats.chapter_count,
        stats.size_bytes / 1024,
        state.profile_service.is_signed_in()
    );

    Ok(())
}
