/// SQLite implementation of the book storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving books and settings. It handles all SQL queries and data
/// conversion.

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::domain::{Book, BookId, BookPatch, BookStatus, Identity, OrderUpdate, Settings};
use crate::storage::{migrations, BookStorage, StorageError};

const BOOK_COLUMNS: &str = "id, title, status, sort_order, started_at, completed_at";

/// SQLite-based storage implementation
pub struct SqliteStorage {
    conn: Connection,
}

/// A books row as read from SQLite, before validation
struct BookRow {
    id: String,
    title: String,
    status: String,
    order: i64,
    started_at: Option<String>,
    completed_at: Option<String>,
}

impl BookRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            status: row.get(2)?,
            order: row.get(3)?,
            started_at: row.get(4)?,
            completed_at: row.get(5)?,
        })
    }

    fn into_book(self) -> Result<Book, StorageError> {
        let id = BookId::from_string(&self.id).map_err(|_| StorageError::CorruptRow {
            column: "id",
            value: self.id.clone(),
        })?;
        let status = self
            .status
            .parse::<BookStatus>()
            .map_err(|_| StorageError::CorruptRow {
                column: "status",
                value: self.status.clone(),
            })?;

        Ok(Book::from_existing(
            id,
            self.title,
            status,
            self.order,
            parse_timestamp("started_at", self.started_at)?,
            parse_timestamp("completed_at", self.completed_at)?,
        ))
    }
}

fn parse_timestamp(
    column: &'static str,
    value: Option<String>,
) -> Result<Option<DateTime<Utc>>, StorageError> {
    match value {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| StorageError::CorruptRow { column, value: s }),
    }
}

fn format_timestamp(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|dt| dt.to_rfc3339_opts(SecondsFormat::Micros, true))
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }

    fn query_books(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Book>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, BookRow::read)?;

        let mut books = Vec::new();
        for row in rows {
            books.push(row?.into_book()?);
        }
        Ok(books)
    }
}

impl BookStorage for SqliteStorage {
    fn list_books(&self) -> Result<Vec<Book>, StorageError> {
        let sql = format!(
            "SELECT {} FROM books ORDER BY sort_order ASC, rowid ASC",
            BOOK_COLUMNS
        );
        self.query_books(&sql, &[])
    }

    fn get_book(&self, book_id: &BookId) -> Result<Option<Book>, StorageError> {
        let sql = format!("SELECT {} FROM books WHERE id = ?1", BOOK_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, params![book_id.to_string()], BookRow::read)
            .optional()?;

        row.map(BookRow::into_book).transpose()
    }

    fn insert_book(&self, title: &str) -> Result<BookId, StorageError> {
        let next_order: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(sort_order), 0) + 1 FROM books",
            [],
            |row| row.get(0),
        )?;
        let book = Book::new(title.to_string(), next_order);

        self.conn.execute(
            "INSERT INTO books (id, title, status, sort_order, started_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, NULL, NULL)",
            params![
                book.id.to_string(),
                book.title,
                book.status.as_str(),
                book.order
            ],
        )?;

        tracing::debug!("Inserted book: {} ({}) at order {}", book.title, book.id, book.order);
        Ok(book.id)
    }

    fn patch_book(&self, book_id: &BookId, patch: &BookPatch) -> Result<Option<Book>, StorageError> {
        let Some(mut book) = self.get_book(book_id)? else {
            tracing::warn!("Ignoring patch for missing book: {}", book_id);
            return Ok(None);
        };

        book.apply_patch(patch, Utc::now());

        // Only the columns the patch touches are written
        self.conn.execute(
            "UPDATE books SET
                title = CASE WHEN ?2 THEN ?3 ELSE title END,
                sort_order = CASE WHEN ?4 THEN ?5 ELSE sort_order END,
                status = CASE WHEN ?6 THEN ?7 ELSE status END,
                started_at = CASE WHEN ?6 THEN ?8 ELSE started_at END,
                completed_at = CASE WHEN ?6 THEN ?9 ELSE completed_at END
             WHERE id = ?1",
            params![
                book_id.to_string(),
                patch.title.is_some(),
                book.title,
                patch.order.is_some(),
                book.order,
                patch.status.is_some(),
                book.status.as_str(),
                format_timestamp(book.started_at),
                format_timestamp(book.completed_at)
            ],
        )?;

        tracing::debug!("Patched book {}: {:?}", book_id, patch);
        self.get_book(book_id)
    }

    fn delete_book(&self, book_id: &BookId) -> Result<bool, StorageError> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM books WHERE id = ?1", params![book_id.to_string()])?;

        tracing::debug!("Deleted book {} (rows affected: {})", book_id, rows_affected);
        Ok(rows_affected > 0)
    }

    fn batch_set_order(&self, updates: &[OrderUpdate]) -> Result<usize, StorageError> {
        let mut stmt = self
            .conn
            .prepare("UPDATE books SET sort_order = ?1 WHERE id = ?2")?;

        let mut applied = 0;
        for update in updates {
            applied += stmt.execute(params![update.order, update.id.to_string()])?;
        }

        if applied < updates.len() {
            tracing::warn!(
                "Reorder touched {} of {} books; missing ids were skipped",
                applied,
                updates.len()
            );
        }
        tracing::debug!("Applied {} order updates", applied);
        Ok(applied)
    }

    fn clear_all_books(&self) -> Result<usize, StorageError> {
        let removed = self.conn.execute("DELETE FROM books", [])?;
        tracing::info!("Cleared {} books", removed);
        Ok(removed)
    }

    fn get_settings(&self, identity: &Identity) -> Result<Option<Settings>, StorageError> {
        let settings = self
            .conn
            .query_row(
                "SELECT year_goal, school_year FROM settings WHERE user_id = ?1",
                params![identity.as_str()],
                |row| {
                    Ok(Settings {
                        user_id: identity.clone(),
                        year_goal: row.get(0)?,
                        school_year: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(settings)
    }

    fn upsert_settings(
        &self,
        identity: &Identity,
        year_goal: u32,
        school_year: &str,
    ) -> Result<Settings, StorageError> {
        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM settings WHERE user_id = ?1",
                params![identity.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(id) => {
                self.conn.execute(
                    "UPDATE settings SET year_goal = ?2, school_year = ?3 WHERE id = ?1",
                    params![id, year_goal, school_year],
                )?;
                tracing::debug!("Updated settings for {}", identity);
            }
            None => {
                self.conn.execute(
                    "INSERT INTO settings (id, user_id, year_goal, school_year)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        Uuid::new_v4().to_string(),
                        identity.as_str(),
                        year_goal,
                        school_year
                    ],
                )?;
                tracing::debug!("Created settings for {}", identity);
            }
        }

        Ok(Settings {
            user_id: identity.clone(),
            year_goal,
            school_year: school_year.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SqliteStorage {
        SqliteStorage::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_appends_to_end() {
        let storage = storage();
        storage.insert_book("First").unwrap();
        storage.insert_book("Second").unwrap();

        let books = storage.list_books().unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "First");
        assert_eq!(books[0].order, 1);
        assert_eq!(books[1].order, 2);
        assert!(books.iter().all(|b| b.status == BookStatus::Planned));
    }

    #[test]
    fn test_insert_after_gap_uses_max() {
        let storage = storage();
        let a = storage.insert_book("A").unwrap();
        storage
            .batch_set_order(&[OrderUpdate { id: a, order: 10 }])
            .unwrap();
        let b = storage.insert_book("B").unwrap();
        assert_eq!(storage.get_book(&b).unwrap().unwrap().order, 11);
    }

    #[test]
    fn test_patch_missing_book_is_noop() {
        let storage = storage();
        let result = storage
            .patch_book(&BookId::new(), &BookPatch::status(BookStatus::Reading))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_patch_status_persists_timestamps() {
        let storage = storage();
        let id = storage.insert_book("Middlemarch").unwrap();

        let reading = storage
            .patch_book(&id, &BookPatch::status(BookStatus::Reading))
            .unwrap()
            .unwrap();
        assert_eq!(reading.status, BookStatus::Reading);
        assert!(reading.started_at.is_some());
        assert!(reading.completed_at.is_none());

        let renamed = storage.patch_book(&id, &BookPatch::title("Middlemarch (Penguin)")).unwrap().unwrap();
        assert_eq!(renamed.started_at, reading.started_at);
        assert_eq!(renamed.status, BookStatus::Reading);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let storage = storage();
        let keep = storage.insert_book("Keep").unwrap();
        let gone = storage.insert_book("Gone").unwrap();

        assert!(storage.delete_book(&gone).unwrap());
        assert!(!storage.delete_book(&gone).unwrap());

        let books = storage.list_books().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, keep);
    }

    #[test]
    fn test_clear_all() {
        let storage = storage();
        storage.insert_book("A").unwrap();
        storage.insert_book("B").unwrap();
        assert_eq!(storage.clear_all_books().unwrap(), 2);
        assert!(storage.list_books().unwrap().is_empty());

        // Numbering restarts once the list is empty
        let id = storage.insert_book("C").unwrap();
        assert_eq!(storage.get_book(&id).unwrap().unwrap().order, 1);
    }

    #[test]
    fn test_batch_skips_missing_ids() {
        let storage = storage();
        let a = storage.insert_book("A").unwrap();
        let applied = storage
            .batch_set_order(&[
                OrderUpdate { id: BookId::new(), order: 1 },
                OrderUpdate { id: a.clone(), order: 5 },
            ])
            .unwrap();
        assert_eq!(applied, 1);
        assert_eq!(storage.get_book(&a).unwrap().unwrap().order, 5);
    }

    #[test]
    fn test_settings_upsert() {
        let storage = storage();
        let me = Identity::default();
        assert!(storage.get_settings(&me).unwrap().is_none());

        storage.upsert_settings(&me, 12, "2024-2025").unwrap();
        storage.upsert_settings(&me, 20, "2025-2026").unwrap();

        let settings = storage.get_settings(&me).unwrap().unwrap();
        assert_eq!(settings.year_goal, 20);
        assert_eq!(settings.school_year, "2025-2026");

        let count: i64 = storage
            .conn
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);

        let other = Identity::new("someone-else").unwrap();
        assert!(storage.get_settings(&other).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_status_is_reported() {
        let storage = storage();
        storage
            .conn
            .execute_batch("PRAGMA ignore_check_constraints = ON")
            .unwrap();
        storage
            .conn
            .execute(
                "INSERT INTO books (id, title, status, sort_order) VALUES (?1, 'X', 'lost', 1)",
                params![Uuid::new_v4().to_string()],
            )
            .unwrap();

        let result = storage.list_books();
        assert!(matches!(result, Err(StorageError::CorruptRow { column: "status", .. })));
    }

    #[test]
    fn test_equal_orders_list_in_insertion_order() {
        let storage = storage();
        let a = storage.insert_book("A").unwrap();
        let b = storage.insert_book("B").unwrap();
        storage
            .batch_set_order(&[
                OrderUpdate { id: b, order: 1 },
                OrderUpdate { id: a, order: 1 },
            ])
            .unwrap();

        let titles: Vec<String> = storage.list_books().unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }
}
