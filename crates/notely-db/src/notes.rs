//! Note repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite, Transaction};
use std::time::Instant;
use tracing::{debug, info};

use notely_core::{
    normalize_tags, CreateNoteRequest, Error, Note, NoteRepository, Result, UpdateNoteRequest,
};

use crate::escape_like;

/// Stored timestamp layout: fixed width, so text order equals time order.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

const NOTE_COLUMNS: &str = "id, title, content, tags, created_at, updated_at";

/// SQLite implementation of NoteRepository.
#[derive(Clone)]
pub struct SqliteNoteRepository {
    pool: Pool<Sqlite>,
}

impl SqliteNoteRepository {
    /// Create a new SqliteNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

// =============================================================================
// ROW AND TIMESTAMP HELPERS
// =============================================================================

/// Current time at the precision the table stores.
fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Timestamp for a mutation of a row last touched at `previous`.
///
/// Always strictly later than `previous`, even if the clock has not moved
/// (or moved backwards) since.
fn next_update_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now_utc();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Serialization(format!("Invalid {} '{}': {}", column, raw, e)))
}

fn encode_tags(tags: &[String]) -> Result<String> {
    Ok(serde_json::to_string(tags)?)
}

fn decode_tags(raw: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(raw)?)
}

/// Map a database row to a Note.
fn map_row_to_note(row: &SqliteRow) -> Result<Note> {
    let tags: String = row.try_get("tags")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Note {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        tags: decode_tags(&tags)?,
        created_at: parse_timestamp("created_at", &created_at)?,
        updated_at: parse_timestamp("updated_at", &updated_at)?,
    })
}

fn map_rows(rows: Vec<SqliteRow>) -> Result<Vec<Note>> {
    rows.iter().map(map_row_to_note).collect()
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    async fn list_all(&self) -> Result<Vec<Note>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let result = self.list_all_tx(&mut tx).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(result)
    }

    async fn fetch(&self, id: i64) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let result = self.fetch_tx(&mut tx, id).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(result)
    }

    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let result = self.insert_tx(&mut tx, req).await?;
        tx.commit().await.map_err(Error::Database)?;
        info!(
            subsystem = "database",
            component = "notes",
            op = "insert",
            note_id = result.id,
            "Note created"
        );
        Ok(result)
    }

    async fn update(&self, id: i64, req: UpdateNoteRequest) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let result = self.update_tx(&mut tx, id, req).await?;
        tx.commit().await.map_err(Error::Database)?;
        info!(
            subsystem = "database",
            component = "notes",
            op = "update",
            note_id = id,
            "Note updated"
        );
        Ok(result)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        self.delete_tx(&mut tx, id).await?;
        tx.commit().await.map_err(Error::Database)?;
        info!(
            subsystem = "database",
            component = "notes",
            op = "delete",
            note_id = id,
            "Note deleted"
        );
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<Note>> {
        // Blank queries match nothing rather than everything.
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let result = self.search_tx(&mut tx, query).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(result)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM note")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(count)
    }
}

// =============================================================================
// TRANSACTION-AWARE VARIANTS
// =============================================================================

impl SqliteNoteRepository {
    /// List all notes within an existing transaction, most recently updated first.
    pub async fn list_all_tx(&self, tx: &mut Transaction<'_, Sqlite>) -> Result<Vec<Note>> {
        let start = Instant::now();
        let sql = format!(
            "SELECT {} FROM note ORDER BY updated_at DESC, id DESC",
            NOTE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&mut **tx)
            .await
            .map_err(Error::Database)?;
        let notes = map_rows(rows)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "list_all",
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed notes"
        );
        Ok(notes)
    }

    /// Fetch a note within an existing transaction.
    pub async fn fetch_tx(&self, tx: &mut Transaction<'_, Sqlite>, id: i64) -> Result<Note> {
        let sql = format!("SELECT {} FROM note WHERE id = ?", NOTE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound(id))?;
        map_row_to_note(&row)
    }

    /// Insert a note within an existing transaction.
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        req: CreateNoteRequest,
    ) -> Result<Note> {
        req.validate()?;

        let now = now_utc();
        let tags = normalize_tags(req.tags);
        let stamp = format_timestamp(&now);

        let result = sqlx::query(
            "INSERT INTO note (title, content, tags, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(encode_tags(&tags)?)
        .bind(&stamp)
        .bind(&stamp)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        Ok(Note {
            id: result.last_insert_rowid(),
            title: req.title,
            content: req.content,
            tags,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update within an existing transaction.
    pub async fn update_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        id: i64,
        req: UpdateNoteRequest,
    ) -> Result<Note> {
        let mut note = self.fetch_tx(tx, id).await?;
        req.validate()?;

        if let Some(title) = req.title {
            note.title = title;
        }
        if let Some(content) = req.content {
            note.content = content;
        }
        if let Some(tags) = req.tags {
            note.tags = normalize_tags(tags);
        }
        note.updated_at = next_update_timestamp(note.updated_at);

        sqlx::query(
            "UPDATE note SET title = ?, content = ?, tags = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&note.title)
        .bind(&note.content)
        .bind(encode_tags(&note.tags)?)
        .bind(format_timestamp(&note.updated_at))
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        Ok(note)
    }

    /// Delete a note within an existing transaction.
    pub async fn delete_tx(&self, tx: &mut Transaction<'_, Sqlite>, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM note WHERE id = ?")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    /// Search title and content within an existing transaction.
    ///
    /// Matching is a case-insensitive substring test with SQLite `LIKE`
    /// semantics: ASCII letters fold, other scripts compare exactly.
    pub async fn search_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        query: &str,
    ) -> Result<Vec<Note>> {
        let start = Instant::now();
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = format!("%{}%", escape_like(query));
        let sql = format!(
            "SELECT {} FROM note
             WHERE title LIKE ? ESCAPE '\\' OR content LIKE ? ESCAPE '\\'
             ORDER BY updated_at DESC, id DESC",
            NOTE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&mut **tx)
            .await
            .map_err(Error::Database)?;
        let notes = map_rows(rows)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "search",
            query = %query,
            result_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Searched notes"
        );
        Ok(notes)
    }
}
