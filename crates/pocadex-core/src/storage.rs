use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{ToSql, Type};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::PocadexError;
use crate::models::{
    CollectionRow, Condition, NewPhotocard, NewUserPhotocard, Photocard, PhotocardFilter,
    UserPhotocard, UserPhotocardUpdate,
};

const SCHEMA_V1: &str = include_str!("../../../migrations/001_initial.sql");

const PHOTOCARD_COLUMNS: &str = "id, filename, image_url, category, release_type,
     release_structure, album_name, store, version, member, created_at, updated_at";

const USER_PHOTOCARD_COLUMNS: &str = "id, user_id, photocard_id, user_image_url, condition,
     acquired_date, notes, created_at, updated_at";

/// Collection entry columns (0..9) followed by catalog columns (9..21).
const COLLECTION_SELECT: &str = "SELECT up.id, up.user_id, up.photocard_id, up.user_image_url,
            up.condition, up.acquired_date, up.notes, up.created_at, up.updated_at,
            p.id, p.filename, p.image_url, p.category, p.release_type, p.release_structure,
            p.album_name, p.store, p.version, p.member, p.created_at, p.updated_at
     FROM user_photocard up
     JOIN photocard p ON up.photocard_id = p.id";

const CATALOG_OFFSET: usize = 9;

/// SQLite-backed storage for the catalog and user collections.
pub struct Storage {
    conn: Connection,
}

/// Outcome of [`Storage::bulk_import`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub imported: Vec<Photocard>,
    /// Filenames already in the catalog or repeated in the input.
    pub skipped: Vec<String>,
    /// `(filename, error message)` for rows the database rejected.
    pub failed: Vec<(String, String)>,
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, PocadexError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, PocadexError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    // ── Catalog ─────────────────────────────────────────────────

    /// Insert a catalog entry. Filenames are unique.
    pub fn create_photocard(&self, card: &NewPhotocard) -> Result<Photocard, PocadexError> {
        let id = insert_photocard(&self.conn, card, Utc::now()).map_err(|e| {
            if is_unique_violation(&e) {
                PocadexError::DuplicateFilename(card.filename.clone())
            } else {
                e.into()
            }
        })?;
        tracing::debug!(id, filename = %card.filename, "photocard created");
        Ok(fetch_photocard(&self.conn, id)?)
    }

    /// Get a catalog entry by its database ID.
    pub fn get_photocard(&self, id: i64) -> Result<Option<Photocard>, PocadexError> {
        self.conn
            .query_row(
                &format!("SELECT {PHOTOCARD_COLUMNS} FROM photocard WHERE id = ?1"),
                params![id],
                |row| row_to_photocard(row, 0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a catalog entry by its exact source filename.
    pub fn get_photocard_by_filename(
        &self,
        filename: &str,
    ) -> Result<Option<Photocard>, PocadexError> {
        self.conn
            .query_row(
                &format!("SELECT {PHOTOCARD_COLUMNS} FROM photocard WHERE filename = ?1"),
                params![filename],
                |row| row_to_photocard(row, 0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// List catalog entries matching every condition set in `filter`,
    /// ordered by ID.
    pub fn list_photocards(&self, filter: &PhotocardFilter) -> Result<Vec<Photocard>, PocadexError> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        let exact = [
            ("category = ?", filter.category.map(|v| v.as_str())),
            ("release_type = ?", filter.release_type.map(|v| v.as_str())),
            (
                "release_structure = ?",
                filter.release_structure.map(|v| v.as_str()),
            ),
            ("member = ?", filter.member.map(|v| v.as_str())),
            ("version = ?", filter.version.map(|v| v.as_str())),
        ];
        for (clause, value) in exact {
            if let Some(value) = value {
                clauses.push(clause);
                values.push(Box::new(value));
            }
        }
        if let Some(album) = &filter.album_name {
            clauses.push("album_name LIKE ? ESCAPE '\\'");
            values.push(Box::new(like_pattern(album)));
        }
        if let Some(store) = &filter.store {
            clauses.push("store LIKE ? ESCAPE '\\'");
            values.push(Box::new(like_pattern(store)));
        }

        let mut sql = format!("SELECT {PHOTOCARD_COLUMNS} FROM photocard");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| row_to_photocard(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Insert many catalog entries in one transaction.
    ///
    /// Filenames already stored, or repeated earlier in `cards`, are skipped.
    /// A row the database rejects is recorded in `failed` and the rest of the
    /// batch continues.
    pub fn bulk_import(&self, cards: &[NewPhotocard]) -> Result<ImportSummary, PocadexError> {
        let mut summary = ImportSummary::default();
        if cards.is_empty() {
            return Ok(summary);
        }

        let tx = self.conn.unchecked_transaction()?;
        let now = Utc::now();
        let mut seen: HashSet<&str> = HashSet::new();

        for card in cards {
            if !seen.insert(card.filename.as_str()) || filename_exists(&tx, &card.filename)? {
                summary.skipped.push(card.filename.clone());
                continue;
            }
            match insert_photocard(&tx, card, now) {
                Ok(id) => summary.imported.push(fetch_photocard(&tx, id)?),
                Err(e) => {
                    tracing::warn!(filename = %card.filename, error = %e, "photocard import failed");
                    summary.failed.push((card.filename.clone(), e.to_string()));
                }
            }
        }
        tx.commit()?;

        tracing::info!(
            imported = summary.imported.len(),
            skipped = summary.skipped.len(),
            failed = summary.failed.len(),
            "bulk import completed"
        );
        Ok(summary)
    }

    // ── Collection ──────────────────────────────────────────────

    /// Add a catalog card to a user's collection.
    pub fn add_to_collection(
        &self,
        input: &NewUserPhotocard,
    ) -> Result<UserPhotocard, PocadexError> {
        if self.get_photocard(input.photocard_id)?.is_none() {
            return Err(PocadexError::PhotocardNotFound(input.photocard_id));
        }
        let now = timestamp(Utc::now());
        self.conn.execute(
            "INSERT INTO user_photocard (user_id, photocard_id, user_image_url, condition,
             acquired_date, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                input.user_id,
                input.photocard_id,
                input.user_image_url,
                input.condition.as_db_str(),
                input.acquired_date.map(timestamp),
                non_empty(input.notes.as_deref()),
                now,
            ],
        ).map_err(|e| {
            if is_unique_violation(&e) {
                PocadexError::AlreadyCollected {
                    user_id: input.user_id.clone(),
                    photocard_id: input.photocard_id,
                }
            } else {
                e.into()
            }
        })?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, user_id = %input.user_id, photocard_id = input.photocard_id, "card collected");
        Ok(fetch_user_photocard(&self.conn, id)?)
    }

    /// A user's collection joined with catalog data, newest first.
    pub fn get_user_collection(&self, user_id: &str) -> Result<Vec<CollectionRow>, PocadexError> {
        let mut stmt = self.conn.prepare(&format!(
            "{COLLECTION_SELECT}
             WHERE up.user_id = ?1
             ORDER BY up.created_at DESC, up.id DESC"
        ))?;
        let rows = stmt
            .query_map(params![user_id], row_to_collection_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// One collection entry, only if it belongs to `user_id`.
    pub fn get_user_photocard(
        &self,
        id: i64,
        user_id: &str,
    ) -> Result<Option<CollectionRow>, PocadexError> {
        self.conn
            .query_row(
                &format!("{COLLECTION_SELECT} WHERE up.id = ?1 AND up.user_id = ?2"),
                params![id, user_id],
                row_to_collection_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Apply the fields set in `update`. `updated_at` is always bumped.
    pub fn update_user_photocard(
        &self,
        update: &UserPhotocardUpdate,
    ) -> Result<UserPhotocard, PocadexError> {
        let mut sets: Vec<&str> = vec!["updated_at = ?"];
        let mut values: Vec<Box<dyn ToSql>> = vec![Box::new(timestamp(Utc::now()))];

        if let Some(condition) = update.condition {
            sets.push("condition = ?");
            values.push(Box::new(condition.as_db_str()));
        }
        if let Some(acquired) = update.acquired_date {
            sets.push("acquired_date = ?");
            values.push(Box::new(acquired.map(timestamp)));
        }
        if let Some(notes) = &update.notes {
            sets.push("notes = ?");
            values.push(Box::new(non_empty(notes.as_deref()).map(str::to_owned)));
        }
        values.push(Box::new(update.id));
        values.push(Box::new(update.user_id.clone()));

        let sql = format!(
            "UPDATE user_photocard SET {} WHERE id = ? AND user_id = ?",
            sets.join(", ")
        );
        let changed = self.conn.execute(&sql, params_from_iter(values.iter()))?;
        if changed == 0 {
            return Err(PocadexError::CollectionEntryNotFound {
                id: update.id,
                user_id: update.user_id.clone(),
            });
        }
        Ok(fetch_user_photocard(&self.conn, update.id)?)
    }

    /// Delete a collection entry owned by `user_id`. Returns whether a row
    /// was removed.
    pub fn remove_from_collection(&self, id: i64, user_id: &str) -> Result<bool, PocadexError> {
        let changed = self.conn.execute(
            "DELETE FROM user_photocard WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(changed > 0)
    }
}

// ── Migrations ──────────────────────────────────────────────────

fn run_migrations(conn: &Connection) -> Result<(), PocadexError> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", 1)?;
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────

fn insert_photocard(
    conn: &Connection,
    card: &NewPhotocard,
    now: DateTime<Utc>,
) -> rusqlite::Result<i64> {
    let now = timestamp(now);
    conn.execute(
        "INSERT INTO photocard (filename, image_url, category, release_type,
         release_structure, album_name, store, version, member, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        params![
            card.filename,
            card.image_url,
            card.category.as_str(),
            card.release_type.as_str(),
            card.release_structure.as_str(),
            card.album_name,
            card.store,
            card.version.as_str(),
            card.member.as_str(),
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn fetch_photocard(conn: &Connection, id: i64) -> rusqlite::Result<Photocard> {
    conn.query_row(
        &format!("SELECT {PHOTOCARD_COLUMNS} FROM photocard WHERE id = ?1"),
        params![id],
        |row| row_to_photocard(row, 0),
    )
}

fn fetch_user_photocard(conn: &Connection, id: i64) -> rusqlite::Result<UserPhotocard> {
    conn.query_row(
        &format!("SELECT {USER_PHOTOCARD_COLUMNS} FROM user_photocard WHERE id = ?1"),
        params![id],
        |row| row_to_user_photocard(row, 0),
    )
}

fn filename_exists(conn: &Connection, filename: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM photocard WHERE filename = ?1)",
        params![filename],
        |row| row.get(0),
    )
}

/// Fixed-width RFC 3339 so stored timestamps sort as text.
fn timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC 3339 first (what we write via `timestamp`).
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // SQLite's datetime('now') produces "YYYY-MM-DD HH:MM:SS".
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Substring pattern for `LIKE ... ESCAPE '\'`.
fn like_pattern(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

// ── Row mapping helpers ─────────────────────────────────────────

fn enum_col<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn datetime_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_datetime(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("invalid timestamp {raw:?}").into(),
        )
    })
}

fn opt_datetime_col(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(_) => datetime_col(row, idx).map(Some),
        None => Ok(None),
    }
}

fn condition_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Condition> {
    let raw: String = row.get(idx)?;
    Condition::from_db_str(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown condition {raw:?}").into(),
        )
    })
}

fn row_to_photocard(row: &rusqlite::Row<'_>, off: usize) -> rusqlite::Result<Photocard> {
    Ok(Photocard {
        id: row.get(off)?,
        filename: row.get(off + 1)?,
        image_url: row.get(off + 2)?,
        category: enum_col(row, off + 3)?,
        release_type: enum_col(row, off + 4)?,
        release_structure: enum_col(row, off + 5)?,
        album_name: row.get(off + 6)?,
        store: row.get(off + 7)?,
        version: enum_col(row, off + 8)?,
        member: enum_col(row, off + 9)?,
        created_at: datetime_col(row, off + 10)?,
        updated_at: datetime_col(row, off + 11)?,
    })
}

fn row_to_user_photocard(row: &rusqlite::Row<'_>, off: usize) -> rusqlite::Result<UserPhotocard> {
    Ok(UserPhotocard {
        id: row.get(off)?,
        user_id: row.get(off + 1)?,
        photocard_id: row.get(off + 2)?,
        user_image_url: row.get(off + 3)?,
        condition: condition_col(row, off + 4)?,
        acquired_date: opt_datetime_col(row, off + 5)?,
        notes: row.get(off + 6)?,
        created_at: datetime_col(row, off + 7)?,
        updated_at: datetime_col(row, off + 8)?,
    })
}

fn row_to_collection_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CollectionRow> {
    Ok(CollectionRow {
        entry: row_to_user_photocard(row, 0)?,
        photocard: row_to_photocard(row, CATALOG_OFFSET)?,
    })
}
