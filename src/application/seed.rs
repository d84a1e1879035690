//! Deterministic sample data for development databases.

use time::{Date, Month};
use tracing::info;

use crate::application::repos::{
    AuthorStore, BookStore, CreateAuthorParams, CreateBookParams, StoreError,
};

const DEFAULT_AUTHORS: u32 = 100;
const DEFAULT_BOOKS_PER_AUTHOR: u32 = 3;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Clara", "Dmitri", "Elena", "Farid", "Greta", "Hiro", "Ines", "Jonas",
];
const LAST_NAMES: &[&str] = &[
    "Abernathy", "Bianchi", "Castellanos", "Dubois", "Eriksen", "Fontaine", "Gallagher",
    "Hoffmann", "Ivanova", "Jovanovic",
];
const TITLE_ADJECTIVES: &[&str] = &[
    "Silent", "Crimson", "Hidden", "Last", "Northern", "Paper", "Quiet", "Distant",
];
const TITLE_NOUNS: &[&str] = &[
    "Harbor", "Archive", "Orchard", "Lantern", "Frontier", "Garden", "Meridian", "Tide",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlan {
    pub authors: u32,
    pub books_per_author: u32,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            authors: DEFAULT_AUTHORS,
            books_per_author: DEFAULT_BOOKS_PER_AUTHOR,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub authors: u64,
    pub books: u64,
}

/// Insert `plan.authors` authors, each with `plan.books_per_author` books.
///
/// The generated values depend only on the position of the record, so two runs
/// with the same plan insert the same rows.
pub async fn seed(
    authors: &dyn AuthorStore,
    books: &dyn BookStore,
    plan: SeedPlan,
) -> Result<SeedSummary, StoreError> {
    let mut summary = SeedSummary::default();

    for index in 0..plan.authors as usize {
        let author = authors.create_author(sample_author(index)).await?;
        summary.authors += 1;

        for book_index in 0..plan.books_per_author as usize {
            let position = index * plan.books_per_author as usize + book_index;
            books
                .create_book(sample_book(author.id, &author.name, position))
                .await?;
            summary.books += 1;
        }
    }

    info!(
        target = "bookshelf::seed",
        authors = summary.authors,
        books = summary.books,
        "Seeded sample data"
    );
    Ok(summary)
}

fn sample_author(index: usize) -> CreateAuthorParams {
    let first = FIRST_NAMES[index % FIRST_NAMES.len()];
    let last = LAST_NAMES[(index / FIRST_NAMES.len()) % LAST_NAMES.len()];
    let generation = index / (FIRST_NAMES.len() * LAST_NAMES.len());
    let name = if generation == 0 {
        format!("{first} {last}")
    } else {
        format!("{first} {last} {}", generation + 1)
    };

    CreateAuthorParams {
        bio: Some(format!(
            "{name} writes about {} places and the people who keep them.",
            TITLE_ADJECTIVES[index % TITLE_ADJECTIVES.len()].to_lowercase()
        )),
        email: None,
        birth_date: sample_date(1940, 60, index),
        name,
    }
}

fn sample_book(author_id: i64, author_name: &str, position: usize) -> CreateBookParams {
    let adjective = TITLE_ADJECTIVES[position % TITLE_ADJECTIVES.len()];
    let noun = TITLE_NOUNS[(position / TITLE_ADJECTIVES.len()) % TITLE_NOUNS.len()];

    CreateBookParams {
        title: format!("The {adjective} {noun}"),
        author_id,
        description: Some(format!(
            "A novel by {author_name} set around a {} {}.",
            adjective.to_lowercase(),
            noun.to_lowercase()
        )),
        publish_date: sample_date(1970, 55, position),
    }
}

fn sample_date(base_year: i32, span: usize, index: usize) -> Option<Date> {
    let year = base_year + ((index * 7) % span) as i32;
    let month = Month::try_from(((index % 12) + 1) as u8).ok()?;
    let day = ((index * 3) % 28 + 1) as u8;
    Date::from_calendar_date(year, month, day).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_authors_are_deterministic_and_distinct() {
        assert_eq!(sample_author(0), sample_author(0));
        assert_ne!(sample_author(0).name, sample_author(1).name);
        assert_ne!(sample_author(0).name, sample_author(100).name);
    }

    #[test]
    fn sample_dates_are_always_valid() {
        for index in 0..500 {
            assert!(sample_date(1940, 60, index).is_some(), "index {index}");
        }
    }

    #[test]
    fn sample_books_reference_their_author() {
        let book = sample_book(7, "Ada Abernathy", 4);
        assert_eq!(book.author_id, 7);
        assert!(book.title.starts_with("The "));
        assert!(book.title.len() <= 255);
    }
}
