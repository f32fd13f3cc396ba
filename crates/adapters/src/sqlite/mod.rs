mod queries;

use std::fs;
use std::path::PathBuf;

use cbzz_application::{ApplicationError, ComicRepository};
use cbzz_domain::{Comic, ComicId};
use log::debug;
use rusqlite::Connection;

use crate::migrations::MIGRATIONS;

#[derive(Debug, Clone)]
pub struct SqliteComicRepository {
    path: PathBuf,
}

impl SqliteComicRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open_connection(&self) -> Result<Connection, ApplicationError> {
        let conn = Connection::open(&self.path).map_err(persistence)?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(persistence)?;
        Ok(conn)
    }
}

fn persistence(error: rusqlite::Error) -> ApplicationError {
    ApplicationError::Persistence(error.to_string())
}

impl ComicRepository for SqliteComicRepository {
    fn initialize(&self) -> Result<(), ApplicationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "catalog path must not be empty".to_string(),
            ));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|error| ApplicationError::Io(error.to_string()))?;
            }
        }

        let conn = self.open_connection()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(persistence)?;

        for migration in MIGRATIONS {
            conn.execute_batch(migration).map_err(persistence)?;
        }

        debug!("catalog ready at {}", self.path.display());
        Ok(())
    }

    fn list_comics(&self) -> Result<Vec<Comic>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::list_comics(&conn).map_err(persistence)
    }

    fn list_summaries(&self) -> Result<Vec<Comic>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::list_summaries(&conn).map_err(persistence)
    }

    fn find_comic(&self, comic_id: &ComicId) -> Result<Option<Comic>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::find_comic(&conn, comic_id.as_str()).map_err(persistence)
    }

    fn put_comic(&self, comic: &Comic) -> Result<(), ApplicationError> {
        let mut conn = self.open_connection()?;
        let tx = conn.transaction().map_err(persistence)?;
        queries::upsert_comic(&tx, comic).map_err(persistence)?;
        queries::replace_pages(&tx, comic.id.as_str(), &comic.pages).map_err(persistence)?;
        tx.commit().map_err(persistence)
    }

    fn update_reading_state(
        &self,
        comic_id: &ComicId,
        last_read: usize,
        favorite: bool,
    ) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        let updated = queries::update_reading_state(&conn, comic_id.as_str(), last_read, favorite)
            .map_err(persistence)?;
        if updated == 0 {
            return Err(ApplicationError::NotFound(format!(
                "comic not found for id={comic_id}"
            )));
        }
        Ok(())
    }

    fn delete_comic(&self, comic_id: &ComicId) -> Result<bool, ApplicationError> {
        let conn = self.open_connection()?;
        let deleted = queries::delete_comic(&conn, comic_id.as_str()).map_err(persistence)?;
        Ok(deleted > 0)
    }
}
