use rusqlite::{OptionalExtension, Row};

use super::{Database, Table};
use crate::error::{ApiError, ApiResult};
use crate::models::User;

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        username: row.get(0)?,
        name: row.get(1)?,
        avatar_url: row.get(2)?,
    })
}

impl Database {
    pub async fn fetch_users(&self) -> ApiResult<Vec<User>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT username, name, avatar_url FROM users ORDER BY username")?;
        let users = stmt
            .query_map([], map_user_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub async fn fetch_user(&self, username: &str) -> ApiResult<User> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT username, name, avatar_url FROM users WHERE username = ?1",
            [username],
            map_user_row,
        )
        .optional()?
        .ok_or_else(|| ApiError::NotFound(Table::Users.not_found_message().to_string()))
    }
}
