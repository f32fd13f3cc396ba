use std::fmt::{Display, Formatter};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComicId(String);

impl ComicId {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::EmptyComicId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ComicId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ComicId> for String {
    fn from(value: ComicId) -> Self {
        value.0
    }
}

impl Display for ComicId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single page image held in memory. Its portable form is a
/// `data:<mime>;base64,<payload>` URL.
#[derive(Clone, PartialEq, Eq)]
pub struct PageImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PageImage {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, BASE64.encode(&self.bytes))
    }

    pub fn from_data_url(value: &str) -> Result<Self, DomainError> {
        let malformed = || DomainError::MalformedDataUrl(truncate_for_error(value));
        let rest = value.strip_prefix("data:").ok_or_else(malformed)?;
        let (mime, payload) = rest.split_once(";base64,").ok_or_else(malformed)?;
        if mime.is_empty() {
            return Err(malformed());
        }
        let bytes = BASE64.decode(payload.trim()).map_err(|_| malformed())?;
        Ok(Self::new(mime, bytes))
    }
}

impl std::fmt::Debug for PageImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageImage")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Serialize for PageImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> Deserialize<'de> for PageImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_data_url(&raw).map_err(serde::de::Error::custom)
    }
}

fn truncate_for_error(value: &str) -> String {
    value.chars().take(32).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comic {
    pub id: ComicId,
    pub title: String,
    pub cover: PageImage,
    pub pages: Vec<PageImage>,
    pub last_read: usize,
    pub total_pages: usize,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub favorite: bool,
}

impl Comic {
    /// Builds a fresh record; the first page becomes the cover.
    pub fn new(
        id: ComicId,
        title: impl Into<String>,
        pages: Vec<PageImage>,
        added_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let cover = pages
            .first()
            .cloned()
            .ok_or_else(|| DomainError::NoPages(id.to_string()))?;
        Ok(Self {
            id,
            title: title.into(),
            cover,
            total_pages: pages.len(),
            pages,
            last_read: 0,
            added_at,
            favorite: false,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn last_page_index(&self) -> usize {
        self.pages.len().saturating_sub(1)
    }

    pub fn clamp_page(&self, index: usize) -> usize {
        index.min(self.last_page_index())
    }

    /// Reading progress in `[0, 1]`; single-page comics always report 0.
    pub fn progress_ratio(&self) -> f64 {
        if self.total_pages <= 1 {
            return 0.0;
        }
        let ratio = self.last_read as f64 / (self.total_pages - 1) as f64;
        ratio.clamp(0.0, 1.0)
    }

    pub fn progress_percent(&self) -> u32 {
        (self.progress_ratio() * 100.0).round() as u32
    }

    pub fn is_in_progress(&self) -> bool {
        self.last_read > 0 && self.last_read + 1 < self.total_pages
    }

    pub fn is_completed(&self) -> bool {
        self.total_pages > 1 && self.last_read + 1 >= self.total_pages
    }

    /// Restores the record invariants after loading it from an untrusted source.
    pub fn normalize(&mut self) -> Result<(), DomainError> {
        if self.pages.is_empty() {
            return Err(DomainError::NoPages(self.id.to_string()));
        }
        self.total_pages = self.pages.len();
        self.last_read = self.clamp_page(self.last_read);
        Ok(())
    }
}
