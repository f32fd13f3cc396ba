use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use cbzz_domain::{detect_page_kind, Comic, ComicId, PageImage};
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::{
    ApplicationError, ApplicationService, ArchiveEntry, ArchiveExtractor, ArchiveReader,
    ArchiveScanSummary, ArchiveScanner, Clock, ComicRepository, PageDecoder, RandomSource,
    ScannedArchive,
};

/// Entry names containing this marker fail to read.
pub const FAIL_MARKER: &str = "broken";

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Fake archive bytes: one entry name per line, each entry holding its own name.
pub fn archive_of(names: &[&str]) -> Vec<u8> {
    names.join("\n").into_bytes()
}

pub fn sample_comic(id: &str, title: &str, total: usize, last_read: usize, age_days: i64) -> Comic {
    let pages = (0..total)
        .map(|index| PageImage::new("image/png", vec![index as u8]))
        .collect();
    let mut comic = Comic::new(
        ComicId::new(id).expect("id"),
        title,
        pages,
        fixed_now() - Duration::days(age_days),
    )
    .expect("comic");
    comic.last_read = last_read;
    comic
}

#[derive(Default)]
pub struct FakeRepository {
    pub comics: RefCell<Vec<Comic>>,
    pub fail_initialize: Cell<bool>,
    pub fail_writes: Cell<bool>,
    /// Number of full listings, page data included.
    pub list_calls: Cell<usize>,
}

impl FakeRepository {
    pub fn insert(&self, comic: Comic) {
        self.comics.borrow_mut().push(comic);
    }

    pub fn get(&self, id: &str) -> Option<Comic> {
        self.comics
            .borrow()
            .iter()
            .find(|comic| comic.id.as_str() == id)
            .cloned()
    }

    pub fn all(&self) -> Vec<Comic> {
        self.comics.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.comics.borrow().len()
    }

    fn check_writable(&self) -> Result<(), ApplicationError> {
        if self.fail_writes.get() {
            return Err(ApplicationError::Persistence("disk full".to_string()));
        }
        Ok(())
    }
}

impl ComicRepository for FakeRepository {
    fn initialize(&self) -> Result<(), ApplicationError> {
        if self.fail_initialize.get() {
            return Err(ApplicationError::Io("read-only directory".to_string()));
        }
        Ok(())
    }

    fn list_comics(&self) -> Result<Vec<Comic>, ApplicationError> {
        self.list_calls.set(self.list_calls.get() + 1);
        Ok(self.all())
    }

    fn list_summaries(&self) -> Result<Vec<Comic>, ApplicationError> {
        Ok(self
            .all()
            .into_iter()
            .map(|mut comic| {
                comic.pages.clear();
                comic
            })
            .collect())
    }

    fn find_comic(&self, comic_id: &ComicId) -> Result<Option<Comic>, ApplicationError> {
        Ok(self.get(comic_id.as_str()))
    }

    fn put_comic(&self, comic: &Comic) -> Result<(), ApplicationError> {
        self.check_writable()?;
        let mut comics = self.comics.borrow_mut();
        match comics.iter_mut().find(|stored| stored.id == comic.id) {
            Some(stored) => *stored = comic.clone(),
            None => comics.push(comic.clone()),
        }
        Ok(())
    }

    fn update_reading_state(
        &self,
        comic_id: &ComicId,
        last_read: usize,
        favorite: bool,
    ) -> Result<(), ApplicationError> {
        self.check_writable()?;
        let mut comics = self.comics.borrow_mut();
        let stored = comics
            .iter_mut()
            .find(|stored| &stored.id == comic_id)
            .ok_or_else(|| ApplicationError::NotFound(comic_id.to_string()))?;
        stored.last_read = last_read;
        stored.favorite = favorite;
        Ok(())
    }

    fn delete_comic(&self, comic_id: &ComicId) -> Result<bool, ApplicationError> {
        self.check_writable()?;
        let mut comics = self.comics.borrow_mut();
        let before = comics.len();
        comics.retain(|comic| &comic.id != comic_id);
        Ok(comics.len() != before)
    }
}

impl ComicRepository for Rc<FakeRepository> {
    fn initialize(&self) -> Result<(), ApplicationError> {
        self.as_ref().initialize()
    }

    fn list_comics(&self) -> Result<Vec<Comic>, ApplicationError> {
        self.as_ref().list_comics()
    }

    fn list_summaries(&self) -> Result<Vec<Comic>, ApplicationError> {
        self.as_ref().list_summaries()
    }

    fn find_comic(&self, comic_id: &ComicId) -> Result<Option<Comic>, ApplicationError> {
        self.as_ref().find_comic(comic_id)
    }

    fn put_comic(&self, comic: &Comic) -> Result<(), ApplicationError> {
        self.as_ref().put_comic(comic)
    }

    fn update_reading_state(
        &self,
        comic_id: &ComicId,
        last_read: usize,
        favorite: bool,
    ) -> Result<(), ApplicationError> {
        self.as_ref()
            .update_reading_state(comic_id, last_read, favorite)
    }

    fn delete_comic(&self, comic_id: &ComicId) -> Result<bool, ApplicationError> {
        self.as_ref().delete_comic(comic_id)
    }
}

struct FakeArchive {
    entries: Vec<ArchiveEntry>,
}

impl ArchiveReader for FakeArchive {
    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>, ApplicationError> {
        if name.contains(FAIL_MARKER) {
            return Err(ApplicationError::Decode(format!("corrupt entry {name}")));
        }
        Ok(name.as_bytes().to_vec())
    }
}

pub struct FakeExtractor;

impl ArchiveExtractor for FakeExtractor {
    fn open_archive(&self, bytes: Vec<u8>) -> Result<Box<dyn ArchiveReader>, ApplicationError> {
        let listing = String::from_utf8(bytes)
            .map_err(|_| ApplicationError::Decode("not an archive".to_string()))?;
        let entries = listing
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| ArchiveEntry {
                name: line.to_string(),
                is_dir: line.ends_with('/'),
            })
            .collect();
        Ok(Box::new(FakeArchive { entries }))
    }
}

pub struct FakeDecoder;

impl PageDecoder for FakeDecoder {
    fn decode_page(&self, entry_name: &str, bytes: Vec<u8>) -> Result<PageImage, ApplicationError> {
        let mime = detect_page_kind(entry_name)
            .mime()
            .ok_or_else(|| ApplicationError::Decode(format!("unsupported page {entry_name}")))?;
        Ok(PageImage::new(mime, bytes))
    }
}

#[derive(Default)]
pub struct FakeScanner {
    archives: RefCell<Vec<(String, Vec<u8>)>>,
}

impl FakeScanner {
    pub fn add(&self, path: &str, bytes: Vec<u8>) -> &Self {
        self.archives.borrow_mut().push((path.to_string(), bytes));
        self
    }
}

impl ArchiveScanner for Rc<FakeScanner> {
    fn scan_archives(&self, root: &Path) -> Result<ArchiveScanSummary, ApplicationError> {
        let root = root.to_string_lossy().to_string();
        let prefix = format!("{root}/");
        let mut found: Vec<ScannedArchive> = self
            .archives
            .borrow()
            .iter()
            .filter(|(path, _)| path == &root || path.starts_with(&prefix))
            .map(|(path, bytes)| ScannedArchive {
                path: PathBuf::from(path),
                file_name: path.rsplit('/').next().unwrap_or(path).to_string(),
                file_size: bytes.len() as u64,
            })
            .collect();
        if found.is_empty() {
            return Err(ApplicationError::InvalidInput(format!(
                "path does not exist: {root}"
            )));
        }
        found.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(ArchiveScanSummary {
            scanned_files: found.len(),
            archives: found,
        })
    }

    fn read_archive(&self, path: &Path) -> Result<Vec<u8>, ApplicationError> {
        let wanted = path.to_string_lossy().to_string();
        self.archives
            .borrow()
            .iter()
            .find(|(path, _)| path == &wanted)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| ApplicationError::Io(format!("cannot read {wanted}")))
    }
}

pub struct FakeClock;

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        fixed_now()
    }
}

#[derive(Default)]
pub struct FakeRandom {
    counter: Cell<usize>,
}

impl RandomSource for FakeRandom {
    fn pick_index(&self, _upper: usize) -> usize {
        0
    }

    fn token(&self) -> String {
        let value = self.counter.get();
        self.counter.set(value + 1);
        format!("tok{value}")
    }
}

#[derive(Default)]
pub struct FakeWorld {
    pub repository: Rc<FakeRepository>,
    pub scanner: Rc<FakeScanner>,
}

pub fn service_with(world: &FakeWorld) -> ApplicationService {
    ApplicationService::new(
        Box::new(Rc::clone(&world.repository)),
        Box::new(FakeExtractor),
        Box::new(FakeDecoder),
        Box::new(Rc::clone(&world.scanner)),
        Box::new(FakeClock),
        Box::<FakeRandom>::default(),
    )
}
