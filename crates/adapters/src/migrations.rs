/// Schema steps, applied in order on every start. Each one must be idempotent.
pub const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS comics (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        cover_mime TEXT NOT NULL,
        cover_data BLOB NOT NULL,
        last_read INTEGER NOT NULL DEFAULT 0,
        total_pages INTEGER NOT NULL,
        added_at TEXT NOT NULL,
        favorite INTEGER NOT NULL DEFAULT 0
    );",
    "CREATE TABLE IF NOT EXISTS pages (
        comic_id TEXT NOT NULL REFERENCES comics(id) ON DELETE CASCADE,
        page_index INTEGER NOT NULL,
        mime TEXT NOT NULL,
        data BLOB NOT NULL,
        PRIMARY KEY (comic_id, page_index)
    );",
    "CREATE INDEX IF NOT EXISTS idx_comics_added_at ON comics(added_at);",
];
