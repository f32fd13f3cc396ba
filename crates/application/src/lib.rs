mod backup;
mod error;
#[cfg(test)]
mod fakes;
mod ports;
mod reader;
mod service;
mod use_cases;

pub use backup::{backup_file_name, BackupDocument, BACKUP_VERSION};
pub use error::ApplicationError;
pub use ports::{
    ArchiveEntry, ArchiveExtractor, ArchiveReader, ArchiveScanSummary, ArchiveScanner, Clock,
    ComicRepository, PageDecoder, RandomSource, ScannedArchive,
};
pub use reader::{ReaderController, ReaderOutcome};
pub use service::ApplicationService;
pub use use_cases::{
    BatchImportReport, BootstrapLibraryCommand, ContinueReadingQuery, DeleteComicCommand,
    ExportLibraryCommand, FileImportOutcome, ImportArchiveCommand, ImportArchivesCommand,
    ImportPathsCommand, LibraryListing, LibraryStatsQuery, ListComicsCommand, OpenComicCommand,
    RandomComicQuery, RestoreBackupCommand, RestoreReport, ToggleFavoriteCommand,
};
