use cbzz_domain::{Comic, ComicId, PageImage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ApplicationError;

pub const BACKUP_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub comics: Vec<Comic>,
}

impl BackupDocument {
    pub fn new(exported_at: DateTime<Utc>, comics: Vec<Comic>) -> Self {
        Self {
            version: BACKUP_VERSION,
            exported_at,
            comics,
        }
    }

    pub fn to_json(&self) -> Result<String, ApplicationError> {
        serde_json::to_string(self).map_err(|error| ApplicationError::Decode(error.to_string()))
    }
}

pub fn backup_file_name(now: DateTime<Utc>) -> String {
    format!("cbzz-backup-{}.json", now.format("%Y-%m-%d"))
}

/// Raw `comics` entries of a backup; each one is validated separately.
pub(crate) fn parse_backup_entries(json: &str) -> Result<Vec<Value>, ApplicationError> {
    let mut document: Value = serde_json::from_str(json)
        .map_err(|error| ApplicationError::InvalidFormat(error.to_string()))?;
    match document.get_mut("comics").map(Value::take) {
        Some(Value::Array(entries)) => Ok(entries),
        Some(_) => Err(ApplicationError::InvalidFormat(
            "`comics` is not an array".to_string(),
        )),
        None => Err(ApplicationError::InvalidFormat(
            "missing `comics`".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackupComic {
    id: String,
    title: String,
    #[serde(default)]
    cover: Option<PageImage>,
    pages: Vec<PageImage>,
    #[serde(default)]
    last_read: usize,
    #[serde(default)]
    added_at: Option<DateTime<Utc>>,
    #[serde(default)]
    favorite: bool,
}

/// Turns one backup entry into a record, or explains why it is skipped.
pub(crate) fn decode_backup_entry(entry: Value, now: DateTime<Utc>) -> Result<Comic, String> {
    if !has_text(&entry, "id") || !has_text(&entry, "title") {
        return Err("missing id or title".to_string());
    }
    match entry.get("pages") {
        Some(Value::Array(pages)) if !pages.is_empty() => {}
        _ => return Err("missing pages".to_string()),
    }

    let raw: BackupComic = serde_json::from_value(entry).map_err(|error| error.to_string())?;
    let id = ComicId::new(raw.id).map_err(|error| error.to_string())?;
    let cover = raw
        .cover
        .or_else(|| raw.pages.first().cloned())
        .ok_or_else(|| "missing pages".to_string())?;
    let mut comic = Comic {
        id,
        title: raw.title,
        cover,
        total_pages: raw.pages.len(),
        pages: raw.pages,
        last_read: raw.last_read,
        added_at: raw.added_at.unwrap_or(now),
        favorite: raw.favorite,
    };
    comic.normalize().map_err(|error| error.to_string())?;
    Ok(comic)
}

fn has_text(entry: &Value, key: &str) -> bool {
    entry
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|value| !value.trim().is_empty())
}
