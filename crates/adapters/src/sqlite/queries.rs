use cbzz_domain::{Comic, ComicId, PageImage};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Error, Result, Row, Transaction};

const COMIC_COLUMNS: &str =
    "id, title, cover_mime, cover_data, last_read, total_pages, added_at, favorite";

pub fn upsert_comic(tx: &Transaction<'_>, comic: &Comic) -> Result<()> {
    tx.execute(
        "INSERT INTO comics
         (id, title, cover_mime, cover_data, last_read, total_pages, added_at, favorite)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            cover_mime = excluded.cover_mime,
            cover_data = excluded.cover_data,
            last_read = excluded.last_read,
            total_pages = excluded.total_pages,
            added_at = excluded.added_at,
            favorite = excluded.favorite",
        params![
            comic.id.as_str(),
            comic.title,
            comic.cover.mime,
            comic.cover.bytes,
            comic.last_read as i64,
            comic.total_pages as i64,
            format_timestamp(comic.added_at),
            comic.favorite,
        ],
    )?;
    Ok(())
}

pub fn replace_pages(tx: &Transaction<'_>, comic_id: &str, pages: &[PageImage]) -> Result<()> {
    tx.execute("DELETE FROM pages WHERE comic_id = ?1", params![comic_id])?;
    let mut stmt = tx.prepare(
        "INSERT INTO pages (comic_id, page_index, mime, data)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (index, page) in pages.iter().enumerate() {
        stmt.execute(params![comic_id, index as i64, page.mime, page.bytes])?;
    }
    Ok(())
}

pub fn update_reading_state(
    conn: &Connection,
    comic_id: &str,
    last_read: usize,
    favorite: bool,
) -> Result<usize> {
    conn.execute(
        "UPDATE comics SET last_read = ?2, favorite = ?3 WHERE id = ?1",
        params![comic_id, last_read as i64, favorite],
    )
}

pub fn delete_comic(conn: &Connection, comic_id: &str) -> Result<usize> {
    conn.execute("DELETE FROM comics WHERE id = ?1", params![comic_id])
}

pub fn list_summaries(conn: &Connection) -> Result<Vec<Comic>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COMIC_COLUMNS} FROM comics ORDER BY added_at DESC, id ASC"
    ))?;
    let rows = stmt.query_map([], comic_without_pages)?;
    rows.collect()
}

pub fn list_comics(conn: &Connection) -> Result<Vec<Comic>> {
    let mut comics = list_summaries(conn)?;
    for comic in &mut comics {
        comic.pages = load_pages(conn, comic.id.as_str())?;
    }
    Ok(comics)
}

pub fn find_comic(conn: &Connection, comic_id: &str) -> Result<Option<Comic>> {
    let mut stmt = conn.prepare(&format!("SELECT {COMIC_COLUMNS} FROM comics WHERE id = ?1"))?;
    let mut rows = stmt.query(params![comic_id])?;
    if let Some(row) = rows.next()? {
        let mut comic = comic_without_pages(row)?;
        comic.pages = load_pages(conn, comic_id)?;
        return Ok(Some(comic));
    }
    Ok(None)
}

#[cfg(test)]
pub fn count_pages(conn: &Connection, comic_id: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM pages WHERE comic_id = ?1",
        params![comic_id],
        |row| row.get(0),
    )
}

fn load_pages(conn: &Connection, comic_id: &str) -> Result<Vec<PageImage>> {
    let mut stmt = conn.prepare(
        "SELECT mime, data FROM pages
         WHERE comic_id = ?1
         ORDER BY page_index ASC",
    )?;
    let rows = stmt.query_map(params![comic_id], |row| {
        Ok(PageImage::new(row.get::<_, String>(0)?, row.get(1)?))
    })?;
    rows.collect()
}

fn comic_without_pages(row: &Row<'_>) -> Result<Comic> {
    let id: String = row.get(0)?;
    let id = ComicId::new(id).map_err(|error| conversion_error(0, Type::Text, error))?;
    let added_at: String = row.get(6)?;
    let last_read: i64 = row.get(4)?;
    let total_pages: i64 = row.get(5)?;
    Ok(Comic {
        id,
        title: row.get(1)?,
        cover: PageImage::new(row.get::<_, String>(2)?, row.get(3)?),
        pages: Vec::new(),
        last_read: usize::try_from(last_read).unwrap_or_default(),
        total_pages: usize::try_from(total_pages).unwrap_or_default(),
        added_at: parse_timestamp(&added_at)?,
        favorite: row.get(7)?,
    })
}

fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|error| conversion_error(6, Type::Text, error))
}

fn conversion_error(
    column: usize,
    kind: Type,
    error: impl std::error::Error + Send + Sync + 'static,
) -> Error {
    Error::FromSqlConversionFailure(column, kind, Box::new(error))
}
