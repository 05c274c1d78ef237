// src/services/library_service.rs
//
// The user's library: favorites and reading progress.
//
// The cached favorite set is the source of truth for display. A
// successful remote refresh overwrites local flags (remote wins; there is
// no offline queue). Favorite toggles are optimistic: flip locally, call
// the remote, revert on failure.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::reading_progress::{validate_reading_progress, ReadingProgress};
use crate::domain::story::Story;
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, ProgressSaved, StoryFavorited, StoryUnfavorited};
use crate::integrations::api::{ProgressBody, StoryhubApi};
use crate::repositories::StoryRepository;
use crate::services::reading_service::ProgressSink;

pub struct LibraryService {
    api: Arc<dyn StoryhubApi>,
    story_repo: Arc<dyn StoryRepository>,
    event_bus: Arc<EventBus>,
}

impl LibraryService {
    pub fn new(
        api: Arc<dyn StoryhubApi>,
        story_repo: Arc<dyn StoryRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            api,
            story_repo,
            event_bus,
        }
    }

    /// The favorited stories, refreshed from the remote when reachable.
    pub async fn library(&self) -> AppResult<Vec<Story>> {
        match self.api.list_library().await {
            Ok(payloads) => {
                let mut remote_ids: HashSet<i64> = HashSet::with_capacity(payloads.len());
                for payload in payloads {
                    let story = payload.into_story()?;
                    remote_ids.insert(story.id);
                    self.story_repo.mirror_remote(&story)?;
                    self.story_repo.set_favorited(story.id, true)?;
                }

                // Remote wins: drop local flags the remote no longer has
                for cached in self.story_repo.list_favorites()? {
                    if !remote_ids.contains(&cached.id) {
                        self.story_repo.set_favorited(cached.id, false)?;
                    }
                }

                Ok(self.story_repo.list_favorites()?)
            }
            Err(e) if e.is_remote() => {
                log::warn!("library refresh failed, serving cache: {}", e);
                Ok(self.story_repo.list_favorites()?)
            }
            Err(e) => Err(e),
        }
    }

    /// Optimistic toggle: flip the local flag, call the remote, revert on
    /// failure. Returns the resulting flag.
    pub async fn toggle_favorite(&self, story_id: i64) -> AppResult<bool> {
        let story = self
            .story_repo
            .get_by_id(story_id)?
            .ok_or(AppError::NotFound)?;

        let target = !story.is_favorited;
        self.story_repo.set_favorited(story_id, target)?;

        let remote_result = if target {
            self.api.add_favorite(story_id).await
        } else {
            self.api.remove_favorite(story_id).await
        };

        if let Err(e) = remote_result {
            self.story_repo.set_favorited(story_id, story.is_favorited)?;
            return Err(e);
        }

        if target {
            self.event_bus.emit(StoryFavorited::new(story_id));
        } else {
            self.event_bus.emit(StoryUnfavorited::new(story_id));
        }

        Ok(target)
    }

    /// Persist a bookmark: the local write always lands, the remote push
    /// is best-effort.
    pub async fn save_progress(&self, progress: ReadingProgress) -> AppResult<()> {
        validate_reading_progress(&progress).map_err(AppError::Domain)?;

        self.story_repo.set_progress(&progress)?;

        self.event_bus.emit(ProgressSaved::new(
            progress.story_id,
            progress.chapter_number,
            progress.scroll_offset,
        ));

        if let Err(e) = self
            .api
            .save_progress(ProgressBody {
                story_id: progress.story_id,
                chapter_number: progress.chapter_number,
                scroll_offset: progress.scroll_offset,
            })
            .await
        {
            log::warn!(
                "progress push for story {} failed, kept locally: {}",
                progress.story_id,
                e
            );
        }

        Ok(())
    }

    /// The saved bookmark for a story, if reading has begun.
    /// Local state only; the remote never overrides a device's position.
    pub fn progress(&self, story_id: i64) -> AppResult<Option<ReadingProgress>> {
        self.story_repo.get_progress(story_id)
    }
}

#[async_trait]
impl ProgressSink for LibraryService {
    async fn save(&self, progress: ReadingProgress) -> AppResult<()> {
        self.save_progress(progress).await
    }
}
