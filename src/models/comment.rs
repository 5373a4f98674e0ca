use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Comment {
    pub comment_id: i64,
    pub body: String,
    pub review_id: i64,
    pub author: String,   // username
    pub votes: i64,
    pub created_at: DateTime<Utc>,
}
