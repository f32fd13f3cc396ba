pub mod archive;
pub mod decoder;
pub mod fs;
pub mod migrations;
pub mod presenters;
pub mod sqlite;

pub use archive::{ZipArchiveExtractor, ZipArchiveReader};
pub use decoder::ImageCratePageDecoder;
pub use fs::{SystemClock, ThreadRandomSource, WalkdirArchiveScanner};
pub use presenters::{
    present_comic_row, present_import_report, present_page_view, present_restore_report,
    present_stats,
};
pub use sqlite::SqliteComicRepository;
