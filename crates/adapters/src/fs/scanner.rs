use std::fs;
use std::path::Path;

use cbzz_application::{ApplicationError, ArchiveScanSummary, ArchiveScanner, ScannedArchive};
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct WalkdirArchiveScanner;

impl WalkdirArchiveScanner {
    fn scanned(path: &Path) -> Result<ScannedArchive, ApplicationError> {
        let metadata = path
            .metadata()
            .map_err(|error| ApplicationError::Io(error.to_string()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(ScannedArchive {
            path: path.to_path_buf(),
            file_name,
            file_size: metadata.len(),
        })
    }
}

fn is_cbz(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("cbz"))
}

impl ArchiveScanner for WalkdirArchiveScanner {
    fn scan_archives(&self, root: &Path) -> Result<ArchiveScanSummary, ApplicationError> {
        if root.is_file() {
            if !is_cbz(root) {
                return Err(ApplicationError::InvalidInput(format!(
                    "not a .cbz archive: {}",
                    root.display()
                )));
            }
            return Ok(ArchiveScanSummary {
                scanned_files: 1,
                archives: vec![Self::scanned(root)?],
            });
        }

        if !root.is_dir() {
            return Err(ApplicationError::InvalidInput(format!(
                "path does not exist: {}",
                root.display()
            )));
        }

        let mut summary = ArchiveScanSummary::default();
        for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            summary.scanned_files += 1;
            if is_cbz(entry.path()) {
                summary.archives.push(Self::scanned(entry.path())?);
            }
        }
        summary.archives.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(summary)
    }

    fn read_archive(&self, path: &Path) -> Result<Vec<u8>, ApplicationError> {
        fs::read(path).map_err(|error| ApplicationError::Io(format!("{}: {error}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn finds_cbz_files_recursively_in_path_order() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join("series")).expect("mkdir");
        fs::write(dir.path().join("series").join("b.CBZ"), b"bb").expect("write");
        fs::write(dir.path().join("a.cbz"), b"a").expect("write");
        fs::write(dir.path().join("notes.txt"), b"x").expect("write");

        let summary = WalkdirArchiveScanner
            .scan_archives(dir.path())
            .expect("scan");
        assert_eq!(summary.scanned_files, 3);
        let names: Vec<&str> = summary
            .archives
            .iter()
            .map(|archive| archive.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.cbz", "b.CBZ"]);
        assert_eq!(summary.archives[1].file_size, 2);
    }

    #[test]
    fn accepts_a_single_archive_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("one.cbz");
        fs::write(&path, b"zip").expect("write");

        let summary = WalkdirArchiveScanner.scan_archives(&path).expect("scan");
        assert_eq!(summary.archives.len(), 1);
        assert_eq!(
            WalkdirArchiveScanner.read_archive(&path).expect("read"),
            b"zip".to_vec()
        );
    }

    #[test]
    fn rejects_missing_paths_and_other_files() {
        let dir = TempDir::new().expect("tempdir");
        let text = dir.path().join("notes.txt");
        fs::write(&text, b"x").expect("write");

        assert!(matches!(
            WalkdirArchiveScanner.scan_archives(&dir.path().join("missing")),
            Err(ApplicationError::InvalidInput(_))
        ));
        assert!(matches!(
            WalkdirArchiveScanner.scan_archives(&text),
            Err(ApplicationError::InvalidInput(_))
        ));
    }
}
