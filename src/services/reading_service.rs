// src/services/reading_service.rs
//
// Reader sessions and the debounced progress autosaver.
//
// CRITICAL RULES:
// - Scroll events arrive at arbitrary rate and must never block
// - The autosaver persists only after a quiet period (debounce)
// - Persisting goes through ProgressSink; the autosaver never touches
//   repositories or the network itself

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::domain::chapter::Chapter;
use crate::domain::reading_progress::ReadingProgress;
use crate::domain::story::Story;
use crate::error::AppResult;
use crate::services::chapter_service::ChapterService;
use crate::services::library_service::LibraryService;
use crate::services::story_service::StoryService;

/// Where debounced saves go. LibraryService is the production sink.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn save(&self, progress: ReadingProgress) -> AppResult<()>;
}

#[derive(Debug, Clone)]
pub struct AutosaveConfig {
    /// Quiet period before a pending position is persisted
    pub debounce_ms: u64,
    /// How often the background task checks for a due save
    pub poll_interval_ms: u64,
    /// Scroll deltas below this fraction don't restart the debounce window
    pub min_offset_delta: f32,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 2000,
            poll_interval_ms: 250,
            min_offset_delta: 0.01,
        }
    }
}

struct PendingSave {
    progress: ReadingProgress,
    last_event: Instant,
}

/// Background autosaver: collects positions, flushes after the debounce
/// window passes with no new events.
pub struct ProgressAutosaver {
    sink: Arc<dyn ProgressSink>,
    config: AutosaveConfig,
    pending: Arc<Mutex<Option<PendingSave>>>,
    task_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ProgressAutosaver {
    pub fn new(sink: Arc<dyn ProgressSink>, config: AutosaveConfig) -> Self {
        Self {
            sink,
            config,
            pending: Arc::new(Mutex::new(None)),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Spawn the background task. Restarts if already running.
    pub fn start(&self) {
        self.stop();

        let sink = Arc::clone(&self.sink);
        let pending = Arc::clone(&self.pending);
        let config = self.config.clone();

        let task = tokio::spawn(async move {
            let poll_interval = Duration::from_millis(config.poll_interval_ms);
            let debounce = Duration::from_millis(config.debounce_ms);

            loop {
                tokio::time::sleep(poll_interval).await;

                let due = {
                    let guard = pending.lock().unwrap();
                    match guard.as_ref() {
                        Some(p) => p.last_event.elapsed() >= debounce,
                        None => false,
                    }
                };

                if !due {
                    continue;
                }

                let progress = {
                    let mut guard = pending.lock().unwrap();
                    guard.take().map(|p| p.progress)
                };

                if let Some(progress) = progress {
                    if let Err(e) = sink.save(progress.clone()).await {
                        log::warn!(
                            "autosave for story {} failed: {}",
                            progress.story_id,
                            e
                        );
                    }
                }
            }
        });

        let mut handle = self.task_handle.lock().unwrap();
        *handle = Some(task);
    }

    pub fn stop(&self) {
        let mut handle = self.task_handle.lock().unwrap();
        if let Some(task) = handle.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task_handle.lock().unwrap().is_some()
    }

    /// Record a new position. Restarts the debounce window unless the
    /// movement is below the noise threshold.
    pub fn record(&self, progress: ReadingProgress) {
        let mut guard = self.pending.lock().unwrap();

        if let Some(p) = guard.as_ref() {
            let same_chapter = p.progress.chapter_number == progress.chapter_number;
            let delta = (p.progress.scroll_offset - progress.scroll_offset).abs();
            if same_chapter && delta < self.config.min_offset_delta {
                return;
            }
        }

        *guard = Some(PendingSave {
            progress,
            last_event: Instant::now(),
        });
    }

    /// Persist whatever is pending right now, skipping the debounce.
    pub async fn flush(&self) -> AppResult<()> {
        let progress = {
            let mut guard = self.pending.lock().unwrap();
            guard.take().map(|p| p.progress)
        };

        match progress {
            Some(progress) => self.sink.save(progress).await,
            None => Ok(()),
        }
    }
}

/// An open story in the reader: the story, its chapter list, and the
/// live position feeding the autosaver.
pub struct ReaderSession {
    story: Story,
    chapters: Vec<Chapter>,
    position: ReadingProgress,
    autosaver: ProgressAutosaver,
}

impl ReaderSession {
    fn new(
        story: Story,
        chapters: Vec<Chapter>,
        position: ReadingProgress,
        autosaver: ProgressAutosaver,
    ) -> Self {
        Self {
            story,
            chapters,
            position,
            autosaver,
        }
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn position(&self) -> &ReadingProgress {
        &self.position
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.chapters
            .iter()
            .find(|c| c.number == self.position.chapter_number)
    }

    /// Scroll within the current chapter. Offsets are clamped to 0.0–1.0.
    pub fn on_scroll(&mut self, scroll_offset: f32) {
        self.position = ReadingProgress::new(
            self.position.story_id,
            self.position.chapter_number,
            scroll_offset.clamp(0.0, 1.0),
        );
        self.autosaver.record(self.position.clone());
    }

    /// Jump to another chapter; the bookmark restarts at its top.
    pub fn on_chapter_changed(&mut self, chapter_number: u32) {
        self.position = ReadingProgress::new(self.position.story_id, chapter_number, 0.0);
        self.autosaver.record(self.position.clone());
    }

    /// Persist the final position and tear down the autosaver.
    pub async fn close(self) -> AppResult<()> {
        let result = self.autosaver.flush().await;
        self.autosaver.stop();
        result
    }
}

/// Opens reader sessions: resolves the story, its chapters, and the
/// starting position from the saved bookmark.
pub struct ReadingService {
    story_service: Arc<StoryService>,
    chapter_service: Arc<ChapterService>,
    library_service: Arc<LibraryService>,
    autosave_config: AutosaveConfig,
}

impl ReadingService {
    pub fn new(
        story_service: Arc<StoryService>,
        chapter_service: Arc<ChapterService>,
        library_service: Arc<LibraryService>,
        autosave_config: AutosaveConfig,
    ) -> Self {
        Self {
            story_service,
            chapter_service,
            library_service,
            autosave_config,
        }
    }

    pub async fn open(&self, story_id: i64) -> AppResult<ReaderSession> {
        let story = self.story_service.get_story(story_id).await?;
        let chapters = self.chapter_service.list_chapters(story_id).await?;

        let position = self
            .library_service
            .progress(story_id)?
            .unwrap_or_else(|| ReadingProgress::start_of(story_id));

        let sink: Arc<dyn ProgressSink> = self.library_service.clone();
        let autosaver = ProgressAutosaver::new(sink, self.autosave_config.clone());
        autosaver.start();

        Ok(ReaderSession::new(story, chapters, position, autosaver))
    }
}
