use std::io::{Cursor, Read};

use cbzz_application::{ApplicationError, ArchiveEntry, ArchiveExtractor, ArchiveReader};
use zip::ZipArchive;

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOCATION: u64 = 32 * 1024 * 1024;

#[derive(Debug, Default)]
pub struct ZipArchiveExtractor;

impl ArchiveExtractor for ZipArchiveExtractor {
    fn open_archive(&self, bytes: Vec<u8>) -> Result<Box<dyn ArchiveReader>, ApplicationError> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|error| ApplicationError::Decode(format!("not a zip archive: {error}")))?;
        let entries = archive
            .file_names()
            .map(|name| ArchiveEntry {
                name: name.to_string(),
                is_dir: name.ends_with('/'),
            })
            .collect();
        Ok(Box::new(ZipArchiveReader { archive, entries }))
    }
}

pub struct ZipArchiveReader {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    entries: Vec<ArchiveEntry>,
}

impl ArchiveReader for ZipArchiveReader {
    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>, ApplicationError> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|error| ApplicationError::Decode(format!("{name}: {error}")))?;
        let mut bytes = Vec::with_capacity(initial_capacity(file.size()));
        file.read_to_end(&mut bytes)
            .map_err(|error| ApplicationError::Decode(format!("{name}: {error}")))?;
        Ok(bytes)
    }
}

/// Declared sizes come from the archive header and are not trusted.
fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOCATION)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::*;

    fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in files {
            if name.ends_with('/') {
                writer
                    .add_directory(*name, SimpleFileOptions::default())
                    .expect("add dir");
            } else {
                writer
                    .start_file(*name, SimpleFileOptions::default())
                    .expect("start file");
                writer.write_all(data).expect("write");
            }
        }
        writer.finish().expect("finish").into_inner()
    }

    #[test]
    fn lists_entries_and_reads_content() {
        let bytes = build_zip(&[("pages/", b""), ("pages/01.jpg", b"one"), ("info.xml", b"<x/>")]);
        let mut reader = ZipArchiveExtractor.open_archive(bytes).expect("open");

        let names: Vec<(&str, bool)> = reader
            .entries()
            .iter()
            .map(|entry| (entry.name.as_str(), entry.is_dir))
            .collect();
        assert_eq!(
            names,
            vec![("pages/", true), ("pages/01.jpg", false), ("info.xml", false)]
        );
        assert_eq!(reader.read_entry("pages/01.jpg").expect("read"), b"one".to_vec());
    }

    #[test]
    fn missing_entry_is_a_decode_error() {
        let bytes = build_zip(&[("01.jpg", b"one")]);
        let mut reader = ZipArchiveExtractor.open_archive(bytes).expect("open");
        assert!(matches!(
            reader.read_entry("02.jpg"),
            Err(ApplicationError::Decode(_))
        ));
    }

    #[test]
    fn declared_entry_size_only_bounds_the_reservation() {
        assert_eq!(initial_capacity(3), 3);
        assert_eq!(initial_capacity(u64::MAX), MAX_PREALLOCATION as usize);
    }

    #[test]
    fn rejects_bytes_that_are_not_a_zip() {
        let result = ZipArchiveExtractor.open_archive(b"definitely not a zip".to_vec());
        assert!(matches!(result, Err(ApplicationError::Decode(_))));
    }
}
