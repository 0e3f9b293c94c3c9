//! Title Entity
//!
//! A reviewable work. The rating is not stored on the row; it is the
//! mean of the title's review scores, computed by the store at read
//! time and carried on [`TitleDetails`].

use kernel::id::{CategoryId, TitleId};

use crate::domain::entity::{Category, Genre};
use crate::domain::value_object::TitleYear;

/// Title entity (storage shape)
#[derive(Debug, Clone)]
pub struct Title {
    pub title_id: TitleId,
    pub name: String,
    pub year: TitleYear,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl Title {
    pub fn new(
        name: String,
        year: TitleYear,
        description: Option<String>,
        category_id: Option<CategoryId>,
    ) -> Self {
        Self {
            title_id: TitleId::new(),
            name,
            year,
            description,
            category_id,
        }
    }
}

/// Title read model: the entity joined with its category, genres, and
/// the computed rating (`None` when the title has no reviews yet)
#[derive(Debug, Clone)]
pub struct TitleDetails {
    pub title: Title,
    pub category: Option<Category>,
    pub genres: Vec<Genre>,
    pub rating: Option<f64>,
}
