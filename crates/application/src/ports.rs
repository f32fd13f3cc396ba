use std::path::{Path, PathBuf};

use cbzz_domain::{Comic, ComicId, PageImage};
use chrono::{DateTime, Utc};

use crate::ApplicationError;

/// Key-value store of comic records keyed by id.
pub trait ComicRepository {
    fn initialize(&self) -> Result<(), ApplicationError>;

    fn list_comics(&self) -> Result<Vec<Comic>, ApplicationError>;

    /// Every record with `pages` left empty; cover and counters are kept.
    fn list_summaries(&self) -> Result<Vec<Comic>, ApplicationError>;

    fn find_comic(&self, comic_id: &ComicId) -> Result<Option<Comic>, ApplicationError>;

    /// Inserts or fully replaces the record, pages included.
    fn put_comic(&self, comic: &Comic) -> Result<(), ApplicationError>;

    /// Saves the mutable reading fields without rewriting page data.
    fn update_reading_state(
        &self,
        comic_id: &ComicId,
        last_read: usize,
        favorite: bool,
    ) -> Result<(), ApplicationError>;

    /// Returns false when no record had that id.
    fn delete_comic(&self, comic_id: &ComicId) -> Result<bool, ApplicationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub is_dir: bool,
}

/// An opened archive. Entries are read one at a time, in any order.
pub trait ArchiveReader {
    fn entries(&self) -> &[ArchiveEntry];

    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>, ApplicationError>;
}

pub trait ArchiveExtractor {
    fn open_archive(&self, bytes: Vec<u8>) -> Result<Box<dyn ArchiveReader>, ApplicationError>;
}

pub trait PageDecoder {
    fn decode_page(&self, entry_name: &str, bytes: Vec<u8>)
        -> Result<PageImage, ApplicationError>;
}

#[derive(Debug, Clone)]
pub struct ScannedArchive {
    pub path: PathBuf,
    pub file_name: String,
    pub file_size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ArchiveScanSummary {
    pub scanned_files: usize,
    pub archives: Vec<ScannedArchive>,
}

pub trait ArchiveScanner {
    /// Accepts a single archive path or a directory to search.
    fn scan_archives(&self, root: &Path) -> Result<ArchiveScanSummary, ApplicationError>;

    fn read_archive(&self, path: &Path) -> Result<Vec<u8>, ApplicationError>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub trait RandomSource {
    /// Uniform index in `0..upper`; `upper` is never zero.
    fn pick_index(&self, upper: usize) -> usize;

    /// Short lowercase base-36 token.
    fn token(&self) -> String;
}
