//! Domain Entities

pub mod category;
pub mod comment;
pub mod genre;
pub mod review;
pub mod title;

pub use category::Category;
pub use comment::{COMMENT_TEXT_MAX_LENGTH, Comment, CommentDetails};
pub use genre::Genre;
pub use review::{REVIEW_TEXT_MAX_LENGTH, Review, ReviewDetails};
pub use title::{Title, TitleDetails};
