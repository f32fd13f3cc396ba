mod config;
mod logging;
mod ui;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use cbzz_adapters::{
    present_comic_row, present_import_report, present_restore_report, present_stats,
    ImageCratePageDecoder, SqliteComicRepository, SystemClock, ThreadRandomSource,
    WalkdirArchiveScanner, ZipArchiveExtractor,
};
use cbzz_application::{
    backup_file_name, ApplicationService, BootstrapLibraryCommand, ContinueReadingQuery,
    DeleteComicCommand, ExportLibraryCommand, ImportPathsCommand, LibraryStatsQuery,
    ListComicsCommand, OpenComicCommand, RandomComicQuery, RestoreBackupCommand,
    ToggleFavoriteCommand,
};
use cbzz_domain::{ComicId, SortCriterion};
use clap::{Parser, Subcommand};
use config::AppConfig;
use log::info;

#[derive(Debug, Parser)]
#[command(name = "cbzz", version, about = "Read CBZ comics and keep a local library")]
struct Cli {
    /// Catalog database file; overrides CBZZ_CATALOG.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Open the library window (default).
    Ui,
    /// Import .cbz files, or every .cbz found under a folder.
    Import {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print the library.
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "recent", value_parser = parse_sort)]
        sort: SortCriterion,
    },
    /// Open a comic in the reader.
    Read { id: String },
    /// Resume the most recently added comic in progress.
    Continue,
    /// Open a random comic.
    Random,
    Delete { id: String },
    /// Toggle the favorite flag.
    Favorite { id: String },
    Stats,
    /// Write a JSON backup of the whole library.
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Add comics from a backup file; existing ids are kept.
    Restore { file: PathBuf },
}

#[derive(Debug, Clone)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

fn parse_sort(value: &str) -> Result<SortCriterion, String> {
    value.parse().map_err(|error: cbzz_domain::DomainError| error.to_string())
}

fn main() -> ExitCode {
    logging::init_logging();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return if error.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let config = AppConfig::from_env().with_catalog(cli.catalog);

    let service = build_application_service(&config);
    if let Err(error) = service.bootstrap_library(BootstrapLibraryCommand) {
        eprintln!("failed to bootstrap cbzz: {error}");
        return ExitCode::from(1);
    }

    match run_command(cli.command.unwrap_or(Command::Ui), &service, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

fn build_application_service(config: &AppConfig) -> ApplicationService {
    ApplicationService::new(
        Box::new(SqliteComicRepository::new(config.catalog_path.clone())),
        Box::new(ZipArchiveExtractor),
        Box::new(ImageCratePageDecoder),
        Box::new(WalkdirArchiveScanner),
        Box::new(SystemClock),
        Box::new(ThreadRandomSource),
    )
}

fn comic_id(raw: &str) -> Result<ComicId, CommandError> {
    ComicId::new(raw).map_err(|error| CommandError::Usage(format!("invalid comic id: {error}")))
}

fn run_command(
    command: Command,
    service: &ApplicationService,
    config: &AppConfig,
) -> Result<(), CommandError> {
    match command {
        Command::Ui => ui::launch_window(service, config, None).map_err(CommandError::Runtime),
        Command::Import { paths } => {
            let report = service.import_paths(ImportPathsCommand { paths });
            for line in present_import_report(&report) {
                println!("{line}");
            }
            if report.imported() == 0 && report.failed() > 0 {
                return Err(CommandError::Runtime("no comics were imported".to_string()));
            }
            Ok(())
        }
        Command::List { search, sort } => {
            let comics = service
                .list_comics(ListComicsCommand { search, sort })
                .map_err(|error| CommandError::Runtime(format!("list failed: {error}")))?;
            if comics.is_empty() {
                println!("no comics in library");
                return Ok(());
            }
            for comic in comics {
                println!("{}", present_comic_row(&comic));
            }
            Ok(())
        }
        Command::Read { id } => {
            let comic = service
                .open_comic(OpenComicCommand {
                    comic_id: comic_id(&id)?,
                })
                .map_err(|error| CommandError::Runtime(format!("open failed: {error}")))?;
            ui::launch_window(service, config, Some(comic)).map_err(CommandError::Runtime)
        }
        Command::Continue => {
            let comic = service
                .continue_reading(ContinueReadingQuery)
                .map_err(|error| CommandError::Runtime(format!("continue failed: {error}")))?
                .ok_or_else(|| CommandError::Runtime("no comic in progress".to_string()))?;
            ui::launch_window(service, config, Some(comic)).map_err(CommandError::Runtime)
        }
        Command::Random => {
            let comic = service
                .random_comic(RandomComicQuery)
                .map_err(|error| CommandError::Runtime(format!("random failed: {error}")))?;
            ui::launch_window(service, config, Some(comic)).map_err(CommandError::Runtime)
        }
        Command::Delete { id } => {
            let comic_id = comic_id(&id)?;
            service
                .delete_comic(DeleteComicCommand {
                    comic_id: comic_id.clone(),
                })
                .map_err(|error| CommandError::Runtime(format!("delete failed: {error}")))?;
            println!("deleted {comic_id}");
            Ok(())
        }
        Command::Favorite { id } => {
            let comic_id = comic_id(&id)?;
            let favorite = service
                .toggle_favorite(ToggleFavoriteCommand {
                    comic_id: comic_id.clone(),
                })
                .map_err(|error| CommandError::Runtime(format!("favorite failed: {error}")))?;
            println!(
                "{comic_id} {}",
                if favorite { "added to favorites" } else { "removed from favorites" }
            );
            Ok(())
        }
        Command::Stats => {
            let stats = service
                .library_stats(LibraryStatsQuery)
                .map_err(|error| CommandError::Runtime(format!("stats failed: {error}")))?;
            println!("{}", present_stats(&stats));
            Ok(())
        }
        Command::Export { out } => {
            let document = service
                .export_library(ExportLibraryCommand)
                .map_err(|error| CommandError::Runtime(format!("export failed: {error}")))?;
            let json = document
                .to_json()
                .map_err(|error| CommandError::Runtime(format!("export failed: {error}")))?;
            let dir = out.unwrap_or_else(|| config.backup_dir.clone());
            fs::create_dir_all(&dir)
                .map_err(|error| CommandError::Runtime(format!("export failed: {error}")))?;
            let path = dir.join(backup_file_name(document.exported_at));
            fs::write(&path, json)
                .map_err(|error| CommandError::Runtime(format!("export failed: {error}")))?;
            info!("exported {} comics", document.comics.len());
            println!("backup written to {}", path.display());
            Ok(())
        }
        Command::Restore { file } => {
            let json = fs::read_to_string(&file).map_err(|error| {
                CommandError::Runtime(format!("cannot read {}: {error}", file.display()))
            })?;
            let report = service
                .restore_backup(RestoreBackupCommand { json })
                .map_err(|error| CommandError::Runtime(format!("restore failed: {error}")))?;
            println!("{}", present_restore_report(&report));
            Ok(())
        }
    }
}
