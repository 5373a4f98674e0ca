use super::Database;
use crate::error::ApiResult;
use crate::models::Category;

impl Database {
    pub async fn fetch_categories(&self) -> ApiResult<Vec<Category>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT slug, description FROM categories ORDER BY slug")?;
        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    slug: row.get(0)?,
                    description: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("[DB] fetched {} categories", categories.len());
        Ok(categories)
    }
}
