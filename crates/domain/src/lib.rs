mod archive;
mod autoplay;
mod comic;
mod error;
mod input;
mod library;
mod preferences;
mod session;

pub use archive::{detect_page_kind, natural_cmp, select_page_entries, title_from_file_name, PageKind};
pub use autoplay::{Autoplay, DEFAULT_AUTOPLAY_INTERVAL_MS};
pub use comic::{Comic, ComicId, PageImage};
pub use error::DomainError;
pub use input::ReaderInput;
pub use library::{
    continue_reading, filter_comics, library_stats, query_library, sort_comics, LibraryStats,
    SortCriterion,
};
pub use preferences::{
    DisplayPreferences, FitMode, ReadingDirection, ReadingFilter, ZOOM_DEFAULT, ZOOM_MAX,
    ZOOM_MIN, ZOOM_STEP,
};
pub use session::{PageView, ReadingSession};
