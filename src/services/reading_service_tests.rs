// src/services/reading_service_tests.rs
//
// Debounce behavior of the progress autosaver, driven on tokio's paused
// clock so quiet periods elapse instantly and deterministically.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::reading_progress::ReadingProgress;
use crate::error::{AppError, AppResult};
use crate::services::reading_service::{
    AutosaveConfig, MockProgressSink, ProgressAutosaver, ProgressSink,
};

/// Records every save it receives
struct CountingSink {
    saves: Mutex<Vec<ReadingProgress>>,
}

impl CountingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            saves: Mutex::new(Vec::new()),
        })
    }

    fn saved(&self) -> Vec<ReadingProgress> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressSink for CountingSink {
    async fn save(&self, progress: ReadingProgress) -> AppResult<()> {
        self.saves.lock().unwrap().push(progress);
        Ok(())
    }
}

fn config() -> AutosaveConfig {
    AutosaveConfig::default()
}

fn autosaver(sink: Arc<dyn ProgressSink>) -> ProgressAutosaver {
    let autosaver = ProgressAutosaver::new(sink, config());
    autosaver.start();
    autosaver
}

#[tokio::test(start_paused = true)]
async fn test_save_lands_after_quiet_period() {
    let sink = CountingSink::new();
    let autosaver = autosaver(sink.clone());

    autosaver.record(ReadingProgress::new(1, 2, 0.3));

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let saved = sink.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].chapter_number, 2);
    assert!((saved[0].scroll_offset - 0.3).abs() < f32::EPSILON);

    autosaver.stop();
}

#[tokio::test(start_paused = true)]
async fn test_no_save_before_quiet_period() {
    let sink = CountingSink::new();
    let autosaver = autosaver(sink.clone());

    autosaver.record(ReadingProgress::new(1, 1, 0.3));

    tokio::time::sleep(Duration::from_millis(1000)).await;

    assert!(sink.saved().is_empty());

    autosaver.stop();
}

#[tokio::test(start_paused = true)]
async fn test_rapid_scrolls_coalesce_into_one_save() {
    let sink = CountingSink::new();
    let autosaver = autosaver(sink.clone());

    // A burst of scrolling, each event inside the previous window
    autosaver.record(ReadingProgress::new(1, 1, 0.1));
    tokio::time::sleep(Duration::from_millis(500)).await;
    autosaver.record(ReadingProgress::new(1, 1, 0.3));
    tokio::time::sleep(Duration::from_millis(500)).await;
    autosaver.record(ReadingProgress::new(1, 1, 0.5));

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let saved = sink.saved();
    assert_eq!(saved.len(), 1);
    assert!((saved[0].scroll_offset - 0.5).abs() < f32::EPSILON);

    autosaver.stop();
}

#[tokio::test(start_paused = true)]
async fn test_tiny_deltas_do_not_restart_window() {
    let sink = CountingSink::new();
    let autosaver = autosaver(sink.clone());

    autosaver.record(ReadingProgress::new(1, 1, 0.5));
    tokio::time::sleep(Duration::from_millis(1500)).await;

    // Below the noise threshold: must not push the save further out
    autosaver.record(ReadingProgress::new(1, 1, 0.505));
    tokio::time::sleep(Duration::from_millis(750)).await;

    let saved = sink.saved();
    assert_eq!(saved.len(), 1);
    assert!((saved[0].scroll_offset - 0.5).abs() < f32::EPSILON);

    autosaver.stop();
}

#[tokio::test(start_paused = true)]
async fn test_chapter_change_is_not_noise() {
    let sink = CountingSink::new();
    let autosaver = autosaver(sink.clone());

    autosaver.record(ReadingProgress::new(1, 1, 0.0));
    tokio::time::sleep(Duration::from_millis(1500)).await;

    // Same offset, different chapter: restarts the window with the new position
    autosaver.record(ReadingProgress::new(1, 2, 0.0));
    tokio::time::sleep(Duration::from_millis(2500)).await;

    let saved = sink.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].chapter_number, 2);

    autosaver.stop();
}

#[tokio::test(start_paused = true)]
async fn test_flush_skips_the_debounce() {
    let sink = CountingSink::new();
    let autosaver = autosaver(sink.clone());

    autosaver.record(ReadingProgress::new(1, 4, 0.9));
    autosaver.flush().await.unwrap();

    let saved = sink.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].chapter_number, 4);

    // Nothing left pending for the background task
    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert_eq!(sink.saved().len(), 1);

    autosaver.stop();
}

#[tokio::test(start_paused = true)]
async fn test_flush_surfaces_sink_error() {
    let mut mock = MockProgressSink::new();
    mock.expect_save()
        .returning(|_| Err(AppError::Http("connection refused".to_string())));

    let autosaver = ProgressAutosaver::new(Arc::new(mock), config());
    autosaver.record(ReadingProgress::new(1, 1, 0.2));

    let result = autosaver.flush().await;
    assert!(matches!(result, Err(AppError::Http(_))));
}

#[tokio::test(start_paused = true)]
async fn test_flush_with_nothing_pending_is_a_noop() {
    let sink = CountingSink::new();
    let autosaver = ProgressAutosaver::new(
        Arc::clone(&sink) as Arc<dyn ProgressSink>,
        config(),
    );

    autosaver.flush().await.unwrap();
    assert!(sink.saved().is_empty());
}
