//! SQLite content store
//!
//! # Architecture
//!
//! ```text
//! render task ──→ SqliteRepository (r2d2 pool, max 4)
//!                     │
//!                     ├──→ items ── item_tags ── tags
//!                     └──→ comments (parent-linked, per item)
//! ```
//!
//! WAL mode lets page renders read while a comment submission writes.
//! Timestamps are stored as RFC 3339 UTC strings so that string order is
//! time order; date archives are translated to UTC ranges using the site's
//! UTC offset before querying.

use anyhow::Context;
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, SecondsFormat, TimeZone, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;

use super::repository::{CommentFields, ContentRepository, FieldError, ValidationErrors};
use super::{
    page_count, ApprovalState, Comment, ContentItem, ItemPage, ListFilter, Tag, Thumbnail,
};

const SCHEMA_VERSION: i32 = 1;

/// Columns shared by every item query, in `map_item` order
const ITEM_COLUMNS: &str = "i.id, i.slug, i.title, i.published_at, i.body, i.excerpt, \
     i.thumbnail_url, i.thumbnail_alt, i.password, i.comments_open, \
     (SELECT COUNT(*) FROM comments c WHERE c.item_id = i.id AND c.state = 'approved')";

const COMMENT_COLUMNS: &str =
    "id, item_id, parent_id, author, author_url, body, created_at, state";

/// A post to insert (used by `seed` and tests)
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub slug: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub body: String,
    pub excerpt: Option<String>,
    pub thumbnail: Option<Thumbnail>,
    pub password: Option<String>,
    pub comments_open: bool,
    pub tags: Vec<(String, String)>,
}

/// Content repository backed by a SQLite database
pub struct SqliteRepository {
    pool: Pool<SqliteConnectionManager>,
    utc_offset: FixedOffset,
}

impl SqliteRepository {
    /// Open (and migrate) the database at `db_path`
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be applied.
    pub fn open(db_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let manager = SqliteConnectionManager::file(db_path)
            .with_init(|c| c.execute_batch("PRAGMA busy_timeout=5000;"));
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .with_context(|| format!("Failed to open {}", db_path.display()))?;

        Self::from_pool(pool)
    }

    /// Private in-memory database. One connection, kept alive for the pool's life.
    pub fn in_memory() -> anyhow::Result<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(SqliteConnectionManager::memory())?;
        Self::from_pool(pool)
    }

    fn from_pool(pool: Pool<SqliteConnectionManager>) -> anyhow::Result<Self> {
        let conn = pool.get()?;
        Self::init_schema(&conn)?;
        drop(conn);

        Ok(Self {
            pool,
            utc_offset: Utc.fix(),
        })
    }

    /// Offset used to map date archives onto local calendar days
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    fn conn(&self) -> anyhow::Result<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    fn init_schema(conn: &Connection) -> anyhow::Result<()> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            "#,
        )?;

        let current_version: i32 = conn
            .query_row(
                "SELECT COALESCE(
                    (SELECT CAST(value AS INTEGER) FROM metadata WHERE key = 'schema_version'),
                    0
                )",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        if current_version < 1 {
            Self::apply_schema_v1(conn)?;
        }

        Ok(())
    }

    fn apply_schema_v1(conn: &Connection) -> anyhow::Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS metadata (
                key TEXT PRIMARY KEY,
                value TEXT
            );

            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slug TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                published_at TEXT NOT NULL,
                body TEXT NOT NULL,
                excerpt TEXT,
                thumbnail_url TEXT,
                thumbnail_alt TEXT,
                password TEXT,
                comments_open INTEGER NOT NULL DEFAULT 1
            );
            CREATE INDEX IF NOT EXISTS idx_items_published ON items(published_at);

            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slug TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS item_tags (
                item_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                PRIMARY KEY (item_id, tag_id)
            );

            CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item_id INTEGER NOT NULL,
                parent_id INTEGER,
                author TEXT NOT NULL,
                author_email TEXT NOT NULL,
                author_url TEXT,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL,
                state TEXT NOT NULL DEFAULT 'pending'
            );
            CREATE INDEX IF NOT EXISTS idx_comments_item ON comments(item_id, state);
            "#,
        )?;

        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
            params![SCHEMA_VERSION.to_string()],
        )?;

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a post with its tags, returning the new id
    pub fn insert_item(&self, item: &NewItem) -> anyhow::Result<i64> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO items (slug, title, published_at, body, excerpt,
                                thumbnail_url, thumbnail_alt, password, comments_open)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                item.slug,
                item.title,
                format_ts(&item.published_at),
                item.body,
                item.excerpt,
                item.thumbnail.as_ref().map(|t| t.url.as_str()),
                item.thumbnail.as_ref().map(|t| t.alt.as_str()),
                item.password,
                item.comments_open,
            ],
        )
        .with_context(|| format!("Failed to insert item '{}'", item.slug))?;
        let item_id = tx.last_insert_rowid();

        for (slug, name) in &item.tags {
            tx.execute(
                "INSERT INTO tags (slug, name) VALUES (?1, ?2)
                 ON CONFLICT(slug) DO UPDATE SET name = excluded.name",
                params![slug, name],
            )?;
            let tag_id: i64 =
                tx.query_row("SELECT id FROM tags WHERE slug = ?1", [slug], |r| r.get(0))?;
            tx.execute(
                "INSERT OR IGNORE INTO item_tags (item_id, tag_id) VALUES (?1, ?2)",
                params![item_id, tag_id],
            )?;
        }

        tx.commit()?;
        Ok(item_id)
    }

    /// Insert a comment as-is (no validation); used for seeding
    pub fn insert_comment(
        &self,
        item_id: i64,
        fields: &CommentFields,
        state: ApprovalState,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<Comment> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO comments (item_id, parent_id, author, author_email, author_url,
                                   body, created_at, state)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                item_id,
                fields.parent_id,
                fields.author.trim(),
                fields.email.trim(),
                fields.url(),
                fields.body.trim(),
                format_ts(&created_at),
                state.as_str(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        Ok(Comment {
            id,
            item_id,
            parent_id: fields.parent_id,
            author: fields.author.trim().to_string(),
            author_url: fields.url().map(String::from),
            body: fields.body.trim().to_string(),
            created_at: parse_ts(&format_ts(&created_at))?,
            state,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// WHERE clause and parameters for a listing filter
    fn filter_clause(&self, filter: &ListFilter) -> anyhow::Result<(String, Vec<Value>)> {
        Ok(match filter {
            ListFilter::All => (String::new(), Vec::new()),
            ListFilter::Tag(slug) => (
                "WHERE i.id IN (SELECT it.item_id FROM item_tags it
                                JOIN tags t ON t.id = it.tag_id WHERE t.slug = ?)"
                    .to_string(),
                vec![Value::Text(slug.clone())],
            ),
            ListFilter::Date { year, month, day } => {
                let (start, end) = self
                    .local_date_range(*year, *month, *day)
                    .context("Invalid archive date")?;
                (
                    "WHERE i.published_at >= ? AND i.published_at < ?".to_string(),
                    vec![Value::Text(start), Value::Text(end)],
                )
            }
            ListFilter::Search(query) => {
                let pattern = format!("%{}%", escape_like(query.trim()));
                (
                    "WHERE (i.title LIKE ? ESCAPE '\\' OR i.body LIKE ? ESCAPE '\\')"
                        .to_string(),
                    vec![Value::Text(pattern.clone()), Value::Text(pattern)],
                )
            }
        })
    }

    /// UTC bounds `[start, end)` of a local year, month or day
    fn local_date_range(
        &self,
        year: i32,
        month: Option<u32>,
        day: Option<u32>,
    ) -> Option<(String, String)> {
        let (start, end) = match (month, day) {
            (Some(m), Some(d)) => {
                let start = NaiveDate::from_ymd_opt(year, m, d)?;
                (start, start.succ_opt()?)
            }
            (Some(m), None) => {
                let start = NaiveDate::from_ymd_opt(year, m, 1)?;
                let end = if m == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(year, m + 1, 1)?
                };
                (start, end)
            }
            _ => (
                NaiveDate::from_ymd_opt(year, 1, 1)?,
                NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
            ),
        };

        let to_utc = |date: NaiveDate| -> Option<String> {
            let local = self
                .utc_offset
                .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
                .single()?;
            Some(format_ts(&local.with_timezone(&Utc)))
        };

        Some((to_utc(start)?, to_utc(end)?))
    }
}

impl ContentRepository for SqliteRepository {
    fn list_items(
        &self,
        filter: &ListFilter,
        page: u32,
        per_page: u32,
    ) -> anyhow::Result<ItemPage> {
        let conn = self.conn()?;
        let (clause, values) = self.filter_clause(filter)?;

        let total_items: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM items i {}", clause),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;
        let total_items = total_items.max(0) as u64;

        let per_page = per_page.max(1);
        let offset = (page.max(1) as i64 - 1) * per_page as i64;

        let mut page_values = values;
        page_values.push(Value::Integer(per_page as i64));
        page_values.push(Value::Integer(offset));

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items i {} ORDER BY i.published_at DESC, i.id DESC LIMIT ? OFFSET ?",
            ITEM_COLUMNS, clause
        ))?;
        let items = stmt
            .query_map(params_from_iter(page_values.iter()), map_item)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ItemPage {
            items,
            total_pages: page_count(total_items, per_page),
        })
    }

    fn get_item(&self, slug: &str) -> anyhow::Result<Option<ContentItem>> {
        let conn = self.conn()?;
        let item = conn
            .query_row(
                &format!("SELECT {} FROM items i WHERE i.slug = ?1", ITEM_COLUMNS),
                [slug],
                map_item,
            )
            .optional()?;
        Ok(item)
    }

    fn get_item_by_id(&self, id: i64) -> anyhow::Result<Option<ContentItem>> {
        let conn = self.conn()?;
        let item = conn
            .query_row(
                &format!("SELECT {} FROM items i WHERE i.id = ?1", ITEM_COLUMNS),
                [id],
                map_item,
            )
            .optional()?;
        Ok(item)
    }

    fn get_tags(&self, item_id: i64) -> anyhow::Result<Vec<Tag>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT t.id, t.slug, t.name FROM tags t
             JOIN item_tags it ON it.tag_id = t.id
             WHERE it.item_id = ?1 ORDER BY t.name",
        )?;
        let tags = stmt
            .query_map([item_id], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    slug: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn tag_name(&self, slug: &str) -> anyhow::Result<Option<String>> {
        let conn = self.conn()?;
        let name = conn
            .query_row("SELECT name FROM tags WHERE slug = ?1", [slug], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(name)
    }

    fn get_comments(
        &self,
        item_id: i64,
        viewer_email: Option<&str>,
    ) -> anyhow::Result<Vec<Comment>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM comments
             WHERE item_id = ?1
               AND (state = 'approved' OR (?2 IS NOT NULL AND author_email = ?2 COLLATE NOCASE))
             ORDER BY created_at, id",
            COMMENT_COLUMNS
        ))?;
        let comments = stmt
            .query_map(params![item_id, viewer_email], map_comment)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    fn submit_comment(
        &self,
        item_id: i64,
        fields: &CommentFields,
        moderation: bool,
    ) -> anyhow::Result<Result<Comment, ValidationErrors>> {
        let mut errors = fields.validate();

        if let Some(parent_id) = fields.parent_id.filter(|p| *p != 0) {
            let conn = self.conn()?;
            let belongs: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM comments WHERE id = ?1 AND item_id = ?2)",
                params![parent_id, item_id],
                |row| row.get(0),
            )?;
            if !belongs {
                errors.add("comment", FieldError::InvalidParent);
            }
        }

        if !errors.is_empty() {
            return Ok(Err(errors));
        }

        let fields = CommentFields {
            parent_id: fields.parent_id.filter(|p| *p != 0),
            ..fields.clone()
        };
        let state = if moderation {
            ApprovalState::Pending
        } else {
            ApprovalState::Approved
        };

        let comment = self.insert_comment(item_id, &fields, state, Utc::now())?;
        tracing::info!(
            item_id,
            comment_id = comment.id,
            state = state.as_str(),
            "Comment stored"
        );
        Ok(Ok(comment))
    }

    fn count_items(&self) -> anyhow::Result<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Row mapping
// ─────────────────────────────────────────────────────────────────────────────

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_ts(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Bad timestamp '{}'", s))?
        .with_timezone(&Utc))
}

fn ts_column(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

fn map_item(row: &Row) -> rusqlite::Result<ContentItem> {
    let thumbnail_url: Option<String> = row.get(6)?;
    let thumbnail_alt: Option<String> = row.get(7)?;
    let comment_count: i64 = row.get(10)?;

    Ok(ContentItem {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        published_at: ts_column(row, 3)?,
        body: row.get(4)?,
        excerpt: row.get::<_, Option<String>>(5)?.filter(|e| !e.trim().is_empty()),
        thumbnail: thumbnail_url.filter(|u| !u.is_empty()).map(|url| Thumbnail {
            url,
            alt: thumbnail_alt.unwrap_or_default(),
        }),
        password: row.get(8)?,
        comments_open: row.get(9)?,
        comment_count: comment_count.max(0) as u32,
    })
}

fn map_comment(row: &Row) -> rusqlite::Result<Comment> {
    let state: String = row.get(7)?;
    Ok(Comment {
        id: row.get(0)?,
        item_id: row.get(1)?,
        parent_id: row.get(2)?,
        author: row.get(3)?,
        author_url: row.get(4)?,
        body: row.get(5)?,
        created_at: ts_column(row, 6)?,
        state: ApprovalState::from_str(&state),
    })
}

/// Escape LIKE wildcards so user queries match literally
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
