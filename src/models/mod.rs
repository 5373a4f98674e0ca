pub mod category;
pub mod comment;
pub mod review;
pub mod user;

pub use category::Category;
pub use comment::Comment;
pub use review::{NewReview, Review, VoteUpdate};
pub use user::User;
