//! Genre Entity

use kernel::id::GenreId;

use crate::domain::value_object::Slug;

/// Genre tag attachable to any number of titles
#[derive(Debug, Clone)]
pub struct Genre {
    pub genre_id: GenreId,
    pub name: String,
    pub slug: Slug,
}

impl Genre {
    pub fn new(name: String, slug: Slug) -> Self {
        Self {
            genre_id: GenreId::new(),
            name,
            slug,
        }
    }
}
