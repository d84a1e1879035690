use std::sync::Arc;

use crate::application::authors::AuthorRepository;
use crate::application::books::BookRepository;
use crate::application::repos::StoreHealth;

#[derive(Clone)]
pub struct ApiState {
    pub authors: Arc<AuthorRepository>,
    pub books: Arc<BookRepository>,
    pub health: Arc<dyn StoreHealth>,
    /// Upper bound accepted for `per_page` on `GET /books`.
    pub max_per_page: u32,
}
