// Query layer for reviews and the comments hanging off them
use chrono::Utc;
use rusqlite::{named_params, params, Connection, OptionalExtension, Row};

use super::query::{ReviewQuery, REVIEW_SELECT};
use super::{check_exists, Database, Table};
use crate::error::{ApiError, ApiResult};
use crate::models::{Comment, NewReview, Review};

fn review_not_found() -> ApiError {
    ApiError::NotFound(Table::Reviews.not_found_message().to_string())
}

fn map_review_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        review_id: row.get("review_id")?,
        title: row.get("title")?,
        review_body: row.get("review_body")?,
        designer: row.get("designer")?,
        review_img_url: row.get("review_img_url")?,
        votes: row.get("votes")?,
        category: row.get("category")?,
        owner: row.get("owner")?,
        created_at: row.get("created_at")?,
        comment_count: row.get("comment_count")?,
    })
}

fn map_comment_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        comment_id: row.get("comment_id")?,
        body: row.get("body")?,
        review_id: row.get("review_id")?,
        author: row.get("author")?,
        votes: row.get("votes")?,
        created_at: row.get("created_at")?,
    })
}

// Single review with its comment count, None when the id is unknown
fn select_review(conn: &Connection, review_id: i64) -> rusqlite::Result<Option<Review>> {
    let sql = format!("{REVIEW_SELECT} WHERE reviews.review_id = ?1 GROUP BY reviews.review_id");
    conn.query_row(&sql, [review_id], map_review_row).optional()
}

impl Database {
    pub async fn fetch_review(&self, review_id: i64) -> ApiResult<Review> {
        let conn = self.conn.lock().await;
        select_review(&conn, review_id)?.ok_or_else(review_not_found)
    }

    /// Lists reviews for an already validated query. An empty page is a
    /// successful empty list; an unknown category filter is NotFound.
    pub async fn fetch_reviews(&self, query: &ReviewQuery) -> ApiResult<Vec<Review>> {
        let conn = self.conn.lock().await;
        if let Some(category) = &query.category {
            check_exists(&conn, Table::Categories, "slug", category)?;
        }

        let offset = query.offset()?;
        let params = query.params(&offset);
        let mut stmt = conn.prepare(&query.sql())?;
        let reviews = stmt
            .query_map(params.as_slice(), map_review_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "[DB] fetched {} reviews (sort_by={}, order={}, limit={}, page={})",
            reviews.len(),
            query.sort_by,
            query.order,
            query.limit,
            query.page
        );
        Ok(reviews)
    }

    /// Owner and category must already exist. Both are checked under the
    /// lock before the INSERT; the foreign keys back that up.
    pub async fn insert_review(&self, review: &NewReview) -> ApiResult<Review> {
        let conn = self.conn.lock().await;
        for (table, column, value) in [
            (Table::Categories, "slug", &review.category),
            (Table::Users, "username", &review.owner),
        ] {
            check_exists(&conn, table, column, value).map_err(|err| match err {
                ApiError::NotFound(_) => ApiError::referenced_missing(),
                other => other,
            })?;
        }

        conn.execute(
            "INSERT INTO reviews (owner, title, review_body, designer, category, created_at)
             VALUES (:owner, :title, :review_body, :designer, :category, :created_at)",
            named_params! {
                ":owner": review.owner,
                ":title": review.title,
                ":review_body": review.review_body,
                ":designer": review.designer,
                ":category": review.category,
                ":created_at": Utc::now(),
            },
        )?;
        let review_id = conn.last_insert_rowid();
        let created = select_review(&conn, review_id)?.ok_or_else(review_not_found)?;
        log::info!("[DB] review inserted: {}", created.review_id);
        Ok(created)
    }

    /// Applies `votes = votes + delta` in one statement so concurrent
    /// increments are serialised by the store. SQLite widens an overflowing
    /// sum to REAL, so the UPDATE only matches while the sum stays an
    /// integer; an out-of-range delta writes nothing.
    pub async fn increment_review_votes(&self, review_id: i64, delta: i64) -> ApiResult<Review> {
        let conn = self.conn.lock().await;
        let updated: Option<i64> = conn
            .query_row(
                "UPDATE reviews SET votes = votes + ?1
                 WHERE review_id = ?2 AND typeof(votes + ?1) = 'integer'
                 RETURNING review_id",
                params![delta, review_id],
                |row| row.get(0),
            )
            .optional()?;
        if updated.is_none() {
            check_exists(&conn, Table::Reviews, "review_id", &review_id)?;
            log::debug!("[DB] review {} votes + {} out of range", review_id, delta);
            return Err(ApiError::InvalidInput("vote count out of range".to_string()));
        }
        let review = select_review(&conn, review_id)?.ok_or_else(review_not_found)?;
        log::debug!("[DB] review {} votes now {}", review_id, review.votes);
        Ok(review)
    }

    // Existence is checked first so a missing id never reaches the DELETE
    pub async fn remove_review(&self, review_id: i64) -> ApiResult<()> {
        let conn = self.conn.lock().await;
        check_exists(&conn, Table::Reviews, "review_id", &review_id)?;
        conn.execute("DELETE FROM reviews WHERE review_id = ?1", [review_id])?;
        log::info!("[DB] review deleted: {}", review_id);
        Ok(())
    }

    // Comments for a review, newest first
    pub async fn fetch_review_comments(&self, review_id: i64) -> ApiResult<Vec<Comment>> {
        let conn = self.conn.lock().await;
        check_exists(&conn, Table::Reviews, "review_id", &review_id)?;
        let mut stmt = conn.prepare(
            "SELECT comment_id, body, review_id, author, votes, created_at
             FROM comments WHERE review_id = ?1
             ORDER BY created_at DESC, comment_id DESC",
        )?;
        let comments = stmt
            .query_map([review_id], map_comment_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_data::test_data;
    use crate::db::{SortBy, SortOrder};

    async fn seeded_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.seed(&test_data()).await.unwrap();
        db
    }

    fn new_review(category: &str) -> NewReview {
        NewReview {
            owner: "bainesface".into(),
            title: "Azul".into(),
            review_body: "Tiles, patterns and quiet ruthlessness.".into(),
            designer: "Michael Kiesling".into(),
            category: category.into(),
        }
    }

    #[tokio::test]
    async fn test_fetch_review_counts_comments() {
        let db = seeded_db().await;
        let review = db.fetch_review(2).await.unwrap();
        assert_eq!(review.review_id, 2);
        assert_eq!(review.title, "Jenga");
        assert_eq!(review.comment_count, 3);

        let uncommented = db.fetch_review(1).await.unwrap();
        assert_eq!(uncommented.comment_count, 0);
    }

    #[tokio::test]
    async fn test_fetch_review_not_found() {
        let db = seeded_db().await;
        match db.fetch_review(999_999_999).await {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "review id not found"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_reviews_defaults() {
        let db = seeded_db().await;
        let reviews = db.fetch_reviews(&ReviewQuery::default()).await.unwrap();
        assert_eq!(reviews.len(), 10);
        assert!(reviews
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
        assert_eq!(reviews[0].review_id, 7);
    }

    #[tokio::test]
    async fn test_fetch_reviews_second_page() {
        let db = seeded_db().await;
        let query = ReviewQuery {
            page: 2,
            ..ReviewQuery::default()
        };
        let reviews = db.fetch_reviews(&query).await.unwrap();
        let ids: Vec<i64> = reviews.iter().map(|r| r.review_id).collect();
        assert_eq!(ids, vec![5, 6, 13]);
    }

    #[tokio::test]
    async fn test_fetch_reviews_sorted_by_votes_ascending() {
        let db = seeded_db().await;
        let query = ReviewQuery {
            sort_by: SortBy::Votes,
            order: SortOrder::Asc,
            limit: 20,
            ..ReviewQuery::default()
        };
        let reviews = db.fetch_reviews(&query).await.unwrap();
        assert_eq!(reviews.len(), 13);
        assert!(reviews.windows(2).all(|pair| pair[0].votes <= pair[1].votes));
    }

    #[tokio::test]
    async fn test_fetch_reviews_past_last_page_is_empty() {
        let db = seeded_db().await;
        let query = ReviewQuery {
            page: 50,
            ..ReviewQuery::default()
        };
        assert!(db.fetch_reviews(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_reviews_by_category() {
        let db = seeded_db().await;
        let query = ReviewQuery {
            category: Some("dexterity".into()),
            ..ReviewQuery::default()
        };
        let reviews = db.fetch_reviews(&query).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].category, "dexterity");

        let empty = ReviewQuery {
            category: Some("children's games".into()),
            ..ReviewQuery::default()
        };
        assert!(db.fetch_reviews(&empty).await.unwrap().is_empty());

        let unknown = ReviewQuery {
            category: Some("not-a-category".into()),
            ..ReviewQuery::default()
        };
        assert!(matches!(
            db.fetch_reviews(&unknown).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_review() {
        let db = seeded_db().await;
        let created = db.insert_review(&new_review("euro game")).await.unwrap();
        assert_eq!(created.review_id, 14);
        assert_eq!(created.votes, 0);
        assert_eq!(created.comment_count, 0);
        assert!(!created.review_img_url.is_empty());

        let fetched = db.fetch_review(created.review_id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_insert_review_unknown_category() {
        let db = seeded_db().await;
        match db.insert_review(&new_review("space opera")).await {
            Err(ApiError::ConstraintViolation(_)) => {}
            other => panic!("expected ConstraintViolation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_insert_review_unknown_owner() {
        let db = seeded_db().await;
        let review = NewReview {
            owner: "nobody-here".into(),
            ..new_review("euro game")
        };
        match db.insert_review(&review).await {
            Err(ApiError::ConstraintViolation(msg)) => {
                assert_eq!(msg, "referenced resource does not exist")
            }
            other => panic!("expected ConstraintViolation, got {:?}", other),
        }
        // nothing was written, so the next id is still 14
        let created = db.insert_review(&new_review("euro game")).await.unwrap();
        assert_eq!(created.review_id, 14);
    }

    #[tokio::test]
    async fn test_increment_votes_round_trip() {
        let db = seeded_db().await;
        let before = db.fetch_review(2).await.unwrap().votes;

        let up = db.increment_review_votes(2, 5).await.unwrap();
        assert_eq!(up.votes, before + 5);
        assert_eq!(up.comment_count, 3);

        let down = db.increment_review_votes(2, -5).await.unwrap();
        assert_eq!(down.votes, before);

        let unchanged = db.increment_review_votes(2, 0).await.unwrap();
        assert_eq!(unchanged.votes, before);
    }

    #[tokio::test]
    async fn test_increment_votes_overflow_leaves_review_readable() {
        let db = seeded_db().await;
        let before = db.fetch_review(2).await.unwrap();

        match db.increment_review_votes(2, i64::MAX).await {
            Err(ApiError::InvalidInput(msg)) => assert_eq!(msg, "vote count out of range"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
        let after = db.fetch_review(2).await.unwrap();
        assert_eq!(after, before);

        // the far edge of the range is still reachable
        let low = db.increment_review_votes(2, i64::MIN).await.unwrap();
        assert_eq!(low.votes, before.votes + i64::MIN);
        let all = ReviewQuery {
            limit: 100,
            ..ReviewQuery::default()
        };
        assert_eq!(db.fetch_reviews(&all).await.unwrap().len(), 13);
    }

    #[tokio::test]
    async fn test_increment_votes_not_found() {
        let db = seeded_db().await;
        assert!(matches!(
            db.increment_review_votes(999_999_999, 1).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_review() {
        let db = seeded_db().await;
        db.remove_review(2).await.unwrap();
        assert!(matches!(db.fetch_review(2).await, Err(ApiError::NotFound(_))));

        // comments go with it
        let conn = db.conn.lock().await;
        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM comments WHERE review_id = 2", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_remove_missing_review_leaves_store_untouched() {
        let db = seeded_db().await;
        match db.remove_review(999_999_999).await {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "review id not found"),
            other => panic!("expected NotFound, got {:?}", other),
        }
        let all = ReviewQuery {
            limit: 100,
            ..ReviewQuery::default()
        };
        assert_eq!(db.fetch_reviews(&all).await.unwrap().len(), 13);
    }

    #[tokio::test]
    async fn test_fetch_review_comments() {
        let db = seeded_db().await;
        let comments = db.fetch_review_comments(3).await.unwrap();
        assert_eq!(comments.len(), 3);
        assert!(comments.iter().all(|c| c.review_id == 3));
        assert!(comments
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));

        assert!(db.fetch_review_comments(1).await.unwrap().is_empty());
        assert!(matches!(
            db.fetch_review_comments(999_999_999).await,
            Err(ApiError::NotFound(_))
        ));
    }
}
