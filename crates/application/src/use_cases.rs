use cbzz_domain::{Comic, ComicId, LibraryStats, SortCriterion};

use crate::ApplicationError;

#[derive(Debug, Clone, Default)]
pub struct BootstrapLibraryCommand;

#[derive(Debug, Clone)]
pub struct ImportArchiveCommand {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ImportArchivesCommand {
    pub files: Vec<ImportArchiveCommand>,
}

#[derive(Debug, Clone)]
pub struct ImportPathsCommand {
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListComicsCommand {
    pub search: String,
    pub sort: SortCriterion,
}

/// What the library view shows: the filtered, sorted rows and stats over
/// the whole library. Rows carry no page data.
#[derive(Debug, Clone, Default)]
pub struct LibraryListing {
    pub comics: Vec<Comic>,
    pub stats: LibraryStats,
}

#[derive(Debug, Clone)]
pub struct OpenComicCommand {
    pub comic_id: ComicId,
}

#[derive(Debug, Clone)]
pub struct DeleteComicCommand {
    pub comic_id: ComicId,
}

#[derive(Debug, Clone)]
pub struct ToggleFavoriteCommand {
    pub comic_id: ComicId,
}

#[derive(Debug, Clone, Default)]
pub struct ContinueReadingQuery;

#[derive(Debug, Clone, Default)]
pub struct LibraryStatsQuery;

#[derive(Debug, Clone, Default)]
pub struct RandomComicQuery;

#[derive(Debug, Clone, Default)]
pub struct ExportLibraryCommand;

#[derive(Debug, Clone)]
pub struct RestoreBackupCommand {
    pub json: String,
}

#[derive(Debug)]
pub struct FileImportOutcome {
    pub file_name: String,
    pub result: Result<Comic, ApplicationError>,
}

/// Per-file results of a batch import, in processing order.
#[derive(Debug, Default)]
pub struct BatchImportReport {
    pub outcomes: Vec<FileImportOutcome>,
}

impl BatchImportReport {
    pub fn imported(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.imported()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub imported: usize,
    pub skipped: usize,
}
