//! Domain records for authors and their books.

pub mod dates;
pub mod entities;
