//! SQLite-backed store and the query layer built on top of it.
//!
//! [`Database`] is the store client: a single connection behind an async
//! mutex, constructed explicitly and handed to the HTTP layer as app data.
//! Each resource gets its own file of `impl Database` blocks.

mod categories;
mod query;
mod reviews;
mod seed;
pub mod test_data;
mod users;

use rusqlite::{Connection, Error, ToSql};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{ApiError, ApiResult};

pub use query::{ReviewQuery, SortBy, SortOrder, DEFAULT_LIMIT};
pub use seed::{CommentSeed, ReviewSeed, SeedData};

pub(crate) const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS categories (
        slug TEXT PRIMARY KEY,
        description TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS users (
        username TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        avatar_url TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS reviews (
        review_id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        category TEXT NOT NULL REFERENCES categories(slug),
        designer TEXT NOT NULL,
        owner TEXT NOT NULL REFERENCES users(username),
        review_body TEXT NOT NULL,
        review_img_url TEXT NOT NULL
            DEFAULT 'https://images.pexels.com/photos/163064/play-stone-network-networked-interactive-163064.jpeg',
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        votes INTEGER NOT NULL DEFAULT 0
    );
    CREATE TABLE IF NOT EXISTS comments (
        comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
        body TEXT NOT NULL,
        review_id INTEGER NOT NULL REFERENCES reviews(review_id) ON DELETE CASCADE,
        author TEXT NOT NULL REFERENCES users(username),
        votes INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS comments_review_id ON comments(review_id);
";

// Children first so no foreign key is left dangling mid-drop
pub(crate) const DROP_SCHEMA: &str = "
    DROP TABLE IF EXISTS comments;
    DROP TABLE IF EXISTS reviews;
    DROP TABLE IF EXISTS users;
    DROP TABLE IF EXISTS categories;
";

/// Tables an existence check may target. Identifiers cannot be bound as
/// parameters, so only these names ever reach the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Categories,
    Reviews,
    Users,
}

impl Table {
    pub fn as_sql(self) -> &'static str {
        match self {
            Table::Categories => "categories",
            Table::Reviews => "reviews",
            Table::Users => "users",
        }
    }

    pub fn not_found_message(self) -> &'static str {
        match self {
            Table::Categories => "category not found",
            Table::Reviews => "review id not found",
            Table::Users => "user not found",
        }
    }
}

/// Fails with [`ApiError::NotFound`] unless some row of `table` has `column`
/// equal to `value`.
///
/// Runs on a borrowed connection so callers can hold the lock across the
/// check and the mutation that depends on it. `column` must be a literal
/// column name of `table`.
pub fn check_exists(
    conn: &Connection,
    table: Table,
    column: &'static str,
    value: &dyn ToSql,
) -> ApiResult<()> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1)",
        table.as_sql(),
        column
    );
    let exists: bool = conn.query_row(&sql, [value], |row| row.get(0))?;
    if exists {
        Ok(())
    } else {
        log::debug!("[DB] no {} row with {} matching", table.as_sql(), column);
        Err(ApiError::NotFound(table.not_found_message().to_string()))
    }
}

// Handle to the store, cheap to clone
#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    // Open (or create) the database file at `db_path`
    pub fn new(db_path: &str) -> Result<Self, Error> {
        let conn = Connection::open(db_path)?;
        log::info!("[DB] connection established at: {}", db_path);
        Self::from_connection(conn)
    }

    // Private in-memory store, used by tests and throwaway runs
    pub fn in_memory() -> Result<Self, Error> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, Error> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // Create the database schema
    pub async fn create_schema(&self) -> Result<(), Error> {
        let conn = self.conn.lock().await;
        conn.execute_batch(SCHEMA).map_err(|e| {
            log::error!("[DB] failed creating schema: {}", e);
            e
        })?;
        log::info!("[DB] schema ready");
        Ok(())
    }

    /// Closes the connection once no other handle shares it.
    ///
    /// Best effort: with live clones this only logs a warning, and the
    /// connection closes when the last clone is dropped. Returns whether the
    /// connection was closed here.
    pub async fn close(self) -> Result<bool, Error> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex.into_inner();
                conn.close().map_err(|(_, e)| e)?;
                log::info!("[DB] connection closed");
                Ok(true)
            }
            Err(_) => {
                log::warn!("[DB] close requested while the connection is still shared");
                Ok(false)
            }
        }
    }
}
