// src/models/review.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub review_id: i64,
    pub title: String,
    pub review_body: String,
    pub designer: String,
    pub review_img_url: String,
    pub votes: i64,
    pub category: String,     // slug of the owning category
    pub owner: String,        // username of the author
    pub created_at: DateTime<Utc>,
    pub comment_count: i64,   // derived per read, never stored
}

// Body of POST /api/reviews. id, votes, image and timestamp are server-assigned.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewReview {
    pub owner: String,
    pub title: String,
    pub review_body: String,
    pub designer: String,
    pub category: String,
}

// Body of PATCH /api/reviews/{review_id}
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct VoteUpdate {
    pub inc_votes: i64,
}
