//! Rule sets for each write endpoint and the conversions into store parameters.

use crate::application::repos::{
    CreateAuthorParams, CreateBookParams, UpdateAuthorParams, UpdateBookParams,
};

use super::{FieldErrors, Rule, RuleSet, ValidatedFields};

pub const MAX_STRING_LENGTH: usize = 255;

pub fn store_author() -> RuleSet {
    RuleSet::new()
        .field(
            "name",
            &[Rule::Required, Rule::String, Rule::MaxLength(MAX_STRING_LENGTH)],
        )
        .field(
            "email",
            &[
                Rule::Nullable,
                Rule::String,
                Rule::Email,
                Rule::MaxLength(MAX_STRING_LENGTH),
                Rule::UniqueAuthorEmail { ignore_id: None },
            ],
        )
        .field("bio", &[Rule::Nullable, Rule::String])
        .field("birth_date", &[Rule::Nullable, Rule::Date])
}

/// Every field is optional; a supplied email must not belong to another author.
pub fn update_author(author_id: i64) -> RuleSet {
    RuleSet::new()
        .field(
            "name",
            &[
                Rule::Sometimes,
                Rule::Required,
                Rule::String,
                Rule::MaxLength(MAX_STRING_LENGTH),
            ],
        )
        .field(
            "email",
            &[
                Rule::Sometimes,
                Rule::Required,
                Rule::String,
                Rule::Email,
                Rule::MaxLength(MAX_STRING_LENGTH),
                Rule::UniqueAuthorEmail {
                    ignore_id: Some(author_id),
                },
            ],
        )
        .field("bio", &[Rule::Nullable, Rule::String])
        .field("birth_date", &[Rule::Nullable, Rule::Date])
}

pub fn store_book() -> RuleSet {
    RuleSet::new()
        .field(
            "title",
            &[Rule::Required, Rule::String, Rule::MaxLength(MAX_STRING_LENGTH)],
        )
        .field(
            "author_id",
            &[Rule::Required, Rule::Integer, Rule::ExistsAuthor],
        )
        .field("description", &[Rule::Nullable, Rule::String])
        .field("publish_date", &[Rule::Nullable, Rule::Date])
}

pub fn update_book() -> RuleSet {
    RuleSet::new()
        .field(
            "title",
            &[
                Rule::Sometimes,
                Rule::Required,
                Rule::String,
                Rule::MaxLength(MAX_STRING_LENGTH),
            ],
        )
        .field(
            "author_id",
            &[
                Rule::Sometimes,
                Rule::Required,
                Rule::Integer,
                Rule::ExistsAuthor,
            ],
        )
        .field("description", &[Rule::Nullable, Rule::String])
        .field("publish_date", &[Rule::Nullable, Rule::Date])
}

pub fn book_list_query(max_per_page: u32) -> RuleSet {
    RuleSet::new()
        .field(
            "per_page",
            &[
                Rule::Sometimes,
                Rule::Integer,
                Rule::Min(1),
                Rule::Max(i64::from(max_per_page)),
            ],
        )
        .field(
            "page",
            &[
                Rule::Sometimes,
                Rule::Integer,
                Rule::Min(1),
                Rule::Max(i64::from(u32::MAX)),
            ],
        )
}

pub fn create_author_params(fields: &ValidatedFields) -> Result<CreateAuthorParams, FieldErrors> {
    Ok(CreateAuthorParams {
        name: required(fields.string("name"), "name")?,
        email: fields.nullable_string("email").flatten(),
        bio: fields.nullable_string("bio").flatten(),
        birth_date: fields.nullable_date("birth_date").flatten(),
    })
}

pub fn update_author_params(fields: &ValidatedFields) -> UpdateAuthorParams {
    UpdateAuthorParams {
        name: fields.string("name"),
        email: fields.string("email"),
        bio: fields.nullable_string("bio"),
        birth_date: fields.nullable_date("birth_date"),
    }
}

pub fn create_book_params(fields: &ValidatedFields) -> Result<CreateBookParams, FieldErrors> {
    Ok(CreateBookParams {
        title: required(fields.string("title"), "title")?,
        author_id: required(fields.integer("author_id"), "author_id")?,
        description: fields.nullable_string("description").flatten(),
        publish_date: fields.nullable_date("publish_date").flatten(),
    })
}

pub fn update_book_params(fields: &ValidatedFields) -> UpdateBookParams {
    UpdateBookParams {
        title: fields.string("title"),
        author_id: fields.integer("author_id"),
        description: fields.nullable_string("description"),
        publish_date: fields.nullable_date("publish_date"),
    }
}

/// Paging arguments from a validated `GET /books` query: `(per_page, page)`.
pub fn book_list_args(fields: &ValidatedFields) -> (Option<u32>, Option<u32>) {
    let as_u32 = |field: &str| {
        fields
            .integer(field)
            .and_then(|value| u32::try_from(value).ok())
    };
    (as_u32("per_page"), as_u32("page"))
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, FieldErrors> {
    value.ok_or_else(|| {
        let mut errors = FieldErrors::new();
        errors.add(field, format!("The {} field is required.", field.replace('_', " ")));
        errors
    })
}
