// src/application/screens/reader_screen.rs

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::dto::{ChapterDto, StoryDto};
use crate::application::resource::Resource;
use crate::services::{ReaderSession, ReadingService};

/// What the reader renders: the story, the open chapter, and the position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderViewDto {
    pub story: StoryDto,
    pub chapter: Option<ChapterDto>,
    pub chapter_number: u32,
    pub scroll_offset: f32,
}

/// Reader screen: owns the session whose scroll events feed the
/// debounced autosaver.
pub struct ReaderScreen {
    reading_service: Arc<ReadingService>,
    session: Option<ReaderSession>,
    pub view: Resource<ReaderViewDto>,
}

impl ReaderScreen {
    pub fn new(reading_service: Arc<ReadingService>) -> Self {
        Self {
            reading_service,
            session: None,
            view: Resource::Loading,
        }
    }

    pub async fn on_open(&mut self, story_id: i64) {
        self.view = Resource::Loading;

        match self.reading_service.open(story_id).await {
            Ok(session) => {
                self.view = Resource::Success(Self::view_of(&session));
                self.session = Some(session);
            }
            Err(e) => {
                self.view = Resource::Error(e.to_string());
            }
        }
    }

    /// Scroll events arrive at arbitrary rate; persistence is debounced
    /// inside the session's autosaver.
    pub fn on_scroll(&mut self, scroll_offset: f32) {
        if let Some(session) = &mut self.session {
            session.on_scroll(scroll_offset);
            if let Resource::Success(view) = &mut self.view {
                view.scroll_offset = session.position().scroll_offset;
            }
        }
    }

    pub fn on_chapter_selected(&mut self, chapter_number: u32) {
        if let Some(session) = &mut self.session {
            session.on_chapter_changed(chapter_number);
            self.view = Resource::Success(Self::view_of(session));
        }
    }

    /// Leaving the reader: flush the pending bookmark and stop the
    /// autosaver.
    pub async fn on_close(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.close().await {
                log::warn!("final progress save failed: {}", e);
            }
        }
    }

    fn view_of(session: &ReaderSession) -> ReaderViewDto {
        ReaderViewDto {
            story: StoryDto::from(session.story().clone()),
            chapter: session.current_chapter().cloned().map(ChapterDto::from),
            chapter_number: session.position().chapter_number,
            scroll_offset: session.position().scroll_offset,
        }
    }
}
