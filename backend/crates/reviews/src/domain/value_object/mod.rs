//! Value Objects

pub mod score;
pub mod slug;
pub mod title_year;

pub use score::{Score, ScoreError};
pub use slug::{Slug, SlugError};
pub use title_year::{TitleYear, TitleYearError};
