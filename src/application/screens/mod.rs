// src/application/screens/mod.rs
//
// Screen state holders
//
// One per screen, each a fixed set of named event methods mutating a
// Resource state. No cross-screen coordination: screens only share the
// services underneath.

pub mod explore_screen;
pub mod library_screen;
pub mod profile_screen;
pub mod reader_screen;
pub mod search_screen;
pub mod story_detail_screen;
pub mod writer_screen;

pub use explore_screen::ExploreScreen;
pub use library_screen::LibraryScreen;
pub use profile_screen::ProfileScreen;
pub use reader_screen::{ReaderScreen, ReaderViewDto};
pub use search_screen::{SearchMode, SearchScreen};
pub use story_detail_screen::StoryDetailScreen;
pub use writer_screen::WriterScreen;
