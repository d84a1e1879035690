//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, with = "iso_date::option")]
    pub birth_date: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A book always references an existing author; deleting the author removes its books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "iso_date::option")]
    pub publish_date: Option<Date>,
    pub author_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::{Month, macros::datetime};

    #[test]
    fn author_serializes_dates_as_calendar_strings() {
        let author = Author {
            id: 1,
            name: "Jane Doe".to_string(),
            email: None,
            bio: None,
            birth_date: Some(Date::from_calendar_date(1980, Month::January, 1).expect("date")),
            created_at: datetime!(2024-10-03 05:41:53 UTC),
            updated_at: datetime!(2024-10-03 05:41:53 UTC),
        };

        let value = serde_json::to_value(&author).expect("serialize author");
        assert_eq!(value["birth_date"], json!("1980-01-01"));
        assert_eq!(value["bio"], json!(null));
        assert_eq!(value["created_at"], json!("2024-10-03T05:41:53Z"));
    }

    #[test]
    fn book_without_publish_date_round_trips_as_null() {
        let value = json!({
            "id": 4,
            "title": "Untitled",
            "description": null,
            "publish_date": null,
            "author_id": 2,
            "created_at": "2024-10-03T05:41:53Z",
            "updated_at": "2024-10-03T05:41:53Z"
        });

        let book: Book = serde_json::from_value(value).expect("deserialize book");
        assert_eq!(book.publish_date, None);
        assert_eq!(book.author_id, 2);
    }
}
