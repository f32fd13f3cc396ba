use std::collections::HashSet;
use std::path::Path;

use cbzz_domain::{
    continue_reading, library_stats, query_library, select_page_entries, title_from_file_name,
    Comic, ComicId, LibraryStats,
};
use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::backup::{decode_backup_entry, parse_backup_entries};
use crate::{
    ApplicationError, ArchiveExtractor, ArchiveScanner, BackupDocument, BatchImportReport,
    BootstrapLibraryCommand, Clock, ComicRepository, ContinueReadingQuery, DeleteComicCommand,
    ExportLibraryCommand, FileImportOutcome, ImportArchiveCommand, ImportArchivesCommand,
    ImportPathsCommand, LibraryListing, LibraryStatsQuery, ListComicsCommand, OpenComicCommand,
    PageDecoder, RandomComicQuery, RandomSource, ReaderController, RestoreBackupCommand,
    RestoreReport, ToggleFavoriteCommand,
};

const MAX_ID_ATTEMPTS: usize = 8;

pub struct ApplicationService {
    repository: Box<dyn ComicRepository>,
    extractor: Box<dyn ArchiveExtractor>,
    decoder: Box<dyn PageDecoder>,
    scanner: Box<dyn ArchiveScanner>,
    clock: Box<dyn Clock>,
    random: Box<dyn RandomSource>,
}

impl ApplicationService {
    pub fn new(
        repository: Box<dyn ComicRepository>,
        extractor: Box<dyn ArchiveExtractor>,
        decoder: Box<dyn PageDecoder>,
        scanner: Box<dyn ArchiveScanner>,
        clock: Box<dyn Clock>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            repository,
            extractor,
            decoder,
            scanner,
            clock,
            random,
        }
    }

    pub fn bootstrap_library(
        &self,
        _command: BootstrapLibraryCommand,
    ) -> Result<(), ApplicationError> {
        self.repository
            .initialize()
            .map_err(|error| ApplicationError::StorageUnavailable(error.to_string()))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn import_archive(&self, command: ImportArchiveCommand) -> Result<Comic, ApplicationError> {
        let file_name = command.file_name;
        if file_name.trim().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "archive file name must not be empty".to_string(),
            ));
        }

        let mut archive = self.extractor.open_archive(command.bytes)?;
        let page_names = select_page_entries(
            archive
                .entries()
                .iter()
                .filter(|entry| !entry.is_dir)
                .map(|entry| entry.name.as_str()),
        );
        if page_names.is_empty() {
            return Err(ApplicationError::EmptyArchive(file_name));
        }

        let mut pages = Vec::with_capacity(page_names.len());
        for name in &page_names {
            let decoded = archive
                .read_entry(name)
                .and_then(|bytes| self.decoder.decode_page(name, bytes));
            match decoded {
                Ok(page) => pages.push(page),
                Err(error) => warn!("skipping page {name} in {file_name}: {error}"),
            }
        }
        if pages.is_empty() {
            return Err(ApplicationError::ExtractionFailed(file_name));
        }

        let now = self.clock.now();
        let comic = Comic::new(
            self.generate_comic_id(now)?,
            title_from_file_name(&file_name),
            pages,
            now,
        )?;
        self.repository.put_comic(&comic)?;
        info!(
            "imported {file_name} as {} ({} of {} pages)",
            comic.id,
            comic.page_count(),
            page_names.len()
        );
        Ok(comic)
    }

    /// Imports files one after another; a failing file does not stop the batch.
    pub fn import_archives(&self, command: ImportArchivesCommand) -> BatchImportReport {
        let mut report = BatchImportReport::default();
        for file in command.files {
            let file_name = file.file_name.clone();
            let result = self.import_archive(file);
            if let Err(error) = &result {
                warn!("failed to import {file_name}: {error}");
            }
            report.outcomes.push(FileImportOutcome { file_name, result });
        }
        report
    }

    pub fn import_paths(&self, command: ImportPathsCommand) -> BatchImportReport {
        let mut report = BatchImportReport::default();
        for path in command.paths {
            let scan = match self.scanner.scan_archives(Path::new(&path)) {
                Ok(scan) => scan,
                Err(error) => {
                    warn!("failed to scan {path}: {error}");
                    report.outcomes.push(FileImportOutcome {
                        file_name: path,
                        result: Err(error),
                    });
                    continue;
                }
            };

            for archive in scan.archives {
                let result = self
                    .scanner
                    .read_archive(&archive.path)
                    .and_then(|bytes| {
                        self.import_archive(ImportArchiveCommand {
                            file_name: archive.file_name.clone(),
                            bytes,
                        })
                    });
                if let Err(error) = &result {
                    warn!("failed to import {}: {error}", archive.path.display());
                }
                report.outcomes.push(FileImportOutcome {
                    file_name: archive.file_name,
                    result,
                });
            }
        }
        report
    }

    /// All records, in whatever order the store returns them.
    pub fn load_library(&self) -> Result<Vec<Comic>, ApplicationError> {
        self.repository.list_comics()
    }

    /// Filtered and sorted rows without page data; open one with `open_comic`.
    pub fn list_comics(&self, command: ListComicsCommand) -> Result<Vec<Comic>, ApplicationError> {
        let comics = self.repository.list_summaries()?;
        Ok(select_rows(comics, &command))
    }

    /// Rows and stats from a single page-less listing.
    pub fn browse_library(
        &self,
        command: ListComicsCommand,
    ) -> Result<LibraryListing, ApplicationError> {
        let comics = self.repository.list_summaries()?;
        let stats = library_stats(&comics);
        Ok(LibraryListing {
            comics: select_rows(comics, &command),
            stats,
        })
    }

    pub fn continue_reading(
        &self,
        _query: ContinueReadingQuery,
    ) -> Result<Option<Comic>, ApplicationError> {
        let comics = self.repository.list_summaries()?;
        match continue_reading(&comics) {
            Some(summary) => self.repository.find_comic(&summary.id),
            None => Ok(None),
        }
    }

    pub fn library_stats(&self, _query: LibraryStatsQuery) -> Result<LibraryStats, ApplicationError> {
        let comics = self.repository.list_summaries()?;
        Ok(library_stats(&comics))
    }

    pub fn random_comic(&self, _query: RandomComicQuery) -> Result<Comic, ApplicationError> {
        let comics = self.repository.list_summaries()?;
        if comics.is_empty() {
            return Err(ApplicationError::EmptyLibrary);
        }
        let index = self.random.pick_index(comics.len()).min(comics.len() - 1);
        self.open_comic(OpenComicCommand {
            comic_id: comics[index].id.clone(),
        })
    }

    pub fn open_comic(&self, command: OpenComicCommand) -> Result<Comic, ApplicationError> {
        self.repository
            .find_comic(&command.comic_id)?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("comic not found for id={}", command.comic_id))
            })
    }

    pub fn delete_comic(&self, command: DeleteComicCommand) -> Result<(), ApplicationError> {
        if !self.repository.delete_comic(&command.comic_id)? {
            return Err(ApplicationError::NotFound(format!(
                "comic not found for id={}",
                command.comic_id
            )));
        }
        info!("deleted comic {}", command.comic_id);
        Ok(())
    }

    /// Flips the favorite flag and returns the new value.
    pub fn toggle_favorite(&self, command: ToggleFavoriteCommand) -> Result<bool, ApplicationError> {
        let comic = self.open_comic(OpenComicCommand {
            comic_id: command.comic_id,
        })?;
        let favorite = !comic.favorite;
        self.repository
            .update_reading_state(&comic.id, comic.last_read, favorite)?;
        Ok(favorite)
    }

    pub fn export_library(
        &self,
        _command: ExportLibraryCommand,
    ) -> Result<BackupDocument, ApplicationError> {
        let comics = self.repository.list_comics()?;
        if comics.is_empty() {
            return Err(ApplicationError::NothingToExport);
        }
        Ok(BackupDocument::new(self.clock.now(), comics))
    }

    /// Adds backup records that are valid and not already in the library.
    pub fn restore_backup(
        &self,
        command: RestoreBackupCommand,
    ) -> Result<RestoreReport, ApplicationError> {
        let entries = parse_backup_entries(&command.json)?;
        let mut known: HashSet<ComicId> = self
            .repository
            .list_summaries()?
            .into_iter()
            .map(|comic| comic.id)
            .collect();

        let now = self.clock.now();
        let mut report = RestoreReport::default();
        for entry in entries {
            let comic = match decode_backup_entry(entry, now) {
                Ok(comic) => comic,
                Err(reason) => {
                    warn!("skipping backup entry: {reason}");
                    report.skipped += 1;
                    continue;
                }
            };
            if known.contains(&comic.id) {
                report.skipped += 1;
                continue;
            }
            self.repository.put_comic(&comic)?;
            known.insert(comic.id);
            report.imported += 1;
        }

        info!(
            "restored backup: imported={}, skipped={}",
            report.imported, report.skipped
        );
        Ok(report)
    }

    pub fn reader(&self, autoplay_interval_ms: u64) -> ReaderController<'_> {
        ReaderController::new(self.repository.as_ref(), autoplay_interval_ms)
    }

    fn generate_comic_id(&self, now: DateTime<Utc>) -> Result<ComicId, ApplicationError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate =
                ComicId::new(format!("{}{}", now.timestamp_millis(), self.random.token()))?;
            if self.repository.find_comic(&candidate)?.is_none() {
                return Ok(candidate);
            }
        }
        Err(ApplicationError::Persistence(
            "could not generate a unique comic id".to_string(),
        ))
    }
}

fn select_rows(comics: Vec<Comic>, command: &ListComicsCommand) -> Vec<Comic> {
    query_library(&comics, &command.search, command.sort)
        .into_iter()
        .cloned()
        .collect()
}
