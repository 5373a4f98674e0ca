// Fixture loading: wipe the schema and insert a known data set
use chrono::{DateTime, Utc};
use rusqlite::{params, Error};

use super::{Database, DROP_SCHEMA, SCHEMA};
use crate::models::{Category, User};

#[derive(Debug, Clone)]
pub struct ReviewSeed {
    pub title: String,
    pub designer: String,
    pub owner: String,
    pub review_img_url: String,
    pub review_body: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub votes: i64,
}

#[derive(Debug, Clone)]
pub struct CommentSeed {
    pub body: String,
    pub votes: i64,
    pub author: String,
    /// 1-based position of the review in [`SeedData::reviews`]
    pub review_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub categories: Vec<Category>,
    pub users: Vec<User>,
    pub reviews: Vec<ReviewSeed>,
    pub comments: Vec<CommentSeed>,
}

impl Database {
    /// Drops and recreates every table, then loads `data` in one transaction.
    /// Review ids follow insertion order starting at 1.
    pub async fn seed(&self, data: &SeedData) -> Result<(), Error> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        tx.execute_batch(DROP_SCHEMA)?;
        tx.execute_batch(SCHEMA)?;

        for category in &data.categories {
            tx.execute(
                "INSERT INTO categories (slug, description) VALUES (?1, ?2)",
                params![category.slug, category.description],
            )?;
        }
        for user in &data.users {
            tx.execute(
                "INSERT INTO users (username, name, avatar_url) VALUES (?1, ?2, ?3)",
                params![user.username, user.name, user.avatar_url],
            )?;
        }
        for review in &data.reviews {
            tx.execute(
                "INSERT INTO reviews
                    (title, designer, owner, review_img_url, review_body, category, created_at, votes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    review.title,
                    review.designer,
                    review.owner,
                    review.review_img_url,
                    review.review_body,
                    review.category,
                    review.created_at,
                    review.votes,
                ],
            )?;
        }
        for comment in &data.comments {
            tx.execute(
                "INSERT INTO comments (body, votes, author, review_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    comment.body,
                    comment.votes,
                    comment.author,
                    comment.review_id,
                    comment.created_at,
                ],
            )?;
        }

        tx.commit()?;
        log::info!(
            "[DB] seeded {} categories, {} users, {} reviews, {} comments",
            data.categories.len(),
            data.users.len(),
            data.reviews.len(),
            data.comments.len()
        );
        Ok(())
    }
}
