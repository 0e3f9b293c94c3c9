//! Category Entity

use kernel::id::CategoryId;

use crate::domain::value_object::Slug;

/// Category of reviewable works (film, book, music, ...)
#[derive(Debug, Clone)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
    pub slug: Slug,
}

impl Category {
    pub fn new(name: String, slug: Slug) -> Self {
        Self {
            category_id: CategoryId::new(),
            name,
            slug,
        }
    }
}
