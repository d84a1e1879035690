mod authors;
mod books;
mod health;

pub use authors::{
    author_books, create_author, delete_author, list_authors, show_author, update_author,
};
pub use books::{create_book, delete_book, list_books, show_book, update_book};
pub use health::health;
