//! Listing parameters for `GET /api/reviews` and the SQL they produce.
//!
//! Sort column and direction are identifiers, which SQLite cannot bind, so
//! client strings are parsed into [`SortBy`] / [`SortOrder`] first and only
//! their fixed `as_sql` spellings are ever written into the statement.
//! Everything else (category, limit, offset) is bound.

use std::fmt;
use std::str::FromStr;

use rusqlite::ToSql;

use crate::error::ApiError;

pub const DEFAULT_LIMIT: u32 = 10;

// Review row plus its comment count, ready for a WHERE / GROUP BY tail
pub(crate) const REVIEW_SELECT: &str = "SELECT reviews.review_id, reviews.title, \
     reviews.review_body, reviews.designer, reviews.review_img_url, reviews.votes, \
     reviews.category, reviews.owner, reviews.created_at, \
     CAST(COUNT(comments.review_id) AS INTEGER) AS comment_count \
     FROM reviews LEFT JOIN comments ON comments.review_id = reviews.review_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    CreatedAt,
    Category,
    Title,
    Designer,
    Owner,
    ReviewImgUrl,
    ReviewBody,
    Votes,
}

impl SortBy {
    pub const ALL: [SortBy; 8] = [
        SortBy::CreatedAt,
        SortBy::Category,
        SortBy::Title,
        SortBy::Designer,
        SortBy::Owner,
        SortBy::ReviewImgUrl,
        SortBy::ReviewBody,
        SortBy::Votes,
    ];

    pub fn as_sql(self) -> &'static str {
        match self {
            SortBy::CreatedAt => "created_at",
            SortBy::Category => "category",
            SortBy::Title => "title",
            SortBy::Designer => "designer",
            SortBy::Owner => "owner",
            SortBy::ReviewImgUrl => "review_img_url",
            SortBy::ReviewBody => "review_body",
            SortBy::Votes => "votes",
        }
    }
}

impl FromStr for SortBy {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::ALL
            .into_iter()
            .find(|column| column.as_sql() == s)
            .ok_or_else(|| ApiError::InvalidInput("invalid sort by value".to_string()))
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ApiError::InvalidInput("invalid order value".to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Validated listing request. Construct with [`ReviewQuery::from_params`] so
/// every whitelist check runs before any SQL is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewQuery {
    pub sort_by: SortBy,
    pub order: SortOrder,
    pub limit: u32,
    /// 1-based page number
    pub page: u32,
    pub category: Option<String>,
}

impl Default for ReviewQuery {
    fn default() -> Self {
        Self {
            sort_by: SortBy::default(),
            order: SortOrder::default(),
            limit: DEFAULT_LIMIT,
            page: 1,
            category: None,
        }
    }
}

impl ReviewQuery {
    pub fn from_params(
        sort_by: Option<&str>,
        order: Option<&str>,
        limit: Option<u32>,
        page: Option<u32>,
        category: Option<String>,
    ) -> Result<Self, ApiError> {
        let defaults = Self::default();
        let sort_by = sort_by.map(str::parse::<SortBy>).transpose()?.unwrap_or(defaults.sort_by);
        let order = order.map(str::parse::<SortOrder>).transpose()?.unwrap_or(defaults.order);
        let limit = limit.unwrap_or(defaults.limit);
        let page = page.unwrap_or(defaults.page);
        if limit == 0 || page == 0 {
            return Err(ApiError::invalid_data_type());
        }
        let query = Self {
            sort_by,
            order,
            limit,
            page,
            category,
        };
        query.offset()?;
        Ok(query)
    }

    /// Rows skipped before this page. Pages far enough out to overflow an
    /// SQLite integer are rejected as bad query input.
    pub fn offset(&self) -> Result<i64, ApiError> {
        i64::from(self.page.saturating_sub(1))
            .checked_mul(i64::from(self.limit))
            .ok_or_else(ApiError::invalid_data_type)
    }

    pub(crate) fn sql(&self) -> String {
        let filter = if self.category.is_some() {
            " WHERE reviews.category = :category"
        } else {
            ""
        };
        // review_id breaks ties so pages never overlap
        format!(
            "{REVIEW_SELECT}{filter} GROUP BY reviews.review_id \
             ORDER BY reviews.{column} {dir}, reviews.review_id {dir} \
             LIMIT :limit OFFSET :offset",
            column = self.sort_by.as_sql(),
            dir = self.order.as_sql(),
        )
    }

    pub(crate) fn params<'a>(&'a self, offset: &'a i64) -> Vec<(&'static str, &'a dyn ToSql)> {
        let mut params: Vec<(&'static str, &'a dyn ToSql)> = vec![
            (":limit", &self.limit as &dyn ToSql),
            (":offset", offset as &dyn ToSql),
        ];
        if let Some(category) = &self.category {
            params.push((":category", category as &dyn ToSql));
        }
        params
    }
}
