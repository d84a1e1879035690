//! Declarative field validation that runs before any repository write.
//!
//! [`check_rules`] is a pure function over the JSON input. [`validate`] adds the
//! rules that need the store (foreign-key existence, uniqueness) by asking a
//! [`ReferenceCheck`] implementation, and only for values that already passed
//! the pure rules.

pub mod requests;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use time::Date;

use crate::application::error::RepositoryError;
use crate::domain::dates::parse_iso_date;

pub type Input = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Skip the field entirely when the key is absent.
    Sometimes,
    /// Present and not null, empty, or blank.
    Required,
    /// `null` or a blank string passes as `null` without further checks.
    Nullable,
    String,
    /// Maximum string length in characters.
    MaxLength(usize),
    /// JSON integer or a string holding one.
    Integer,
    Min(i64),
    Max(i64),
    /// `YYYY-MM-DD`.
    Date,
    Email,
    ExistsAuthor,
    UniqueAuthorEmail { ignore_id: Option<i64> },
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rules: &[Rule]) -> Self {
        self.fields.push((name, rules.to_vec()));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &[Rule])> {
        self.fields
            .iter()
            .map(|(name, rules)| (*name, rules.as_slice()))
    }
}

/// Field name → messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// The subset of the input named by the rule set and present in the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedFields(Input);

impl ValidatedFields {
    pub fn string(&self, field: &str) -> Option<String> {
        self.0
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// `Some(None)` when the field was sent as `null`.
    pub fn nullable_string(&self, field: &str) -> Option<Option<String>> {
        self.0
            .get(field)
            .map(|value| value.as_str().map(str::to_string))
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        self.0.get(field).and_then(as_integer)
    }

    /// `Some(None)` when the field was sent as `null`.
    pub fn nullable_date(&self, field: &str) -> Option<Option<Date>> {
        self.0
            .get(field)
            .map(|value| value.as_str().and_then(parse_iso_date))
    }
}

#[cfg(test)]
impl ValidatedFields {
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

/// Store-backed lookups needed by the reference rules.
#[async_trait]
pub trait ReferenceCheck: Send + Sync {
    async fn author_exists(&self, id: i64) -> Result<bool, RepositoryError>;

    async fn author_email_taken(
        &self,
        email: &str,
        ignore_id: Option<i64>,
    ) -> Result<bool, RepositoryError>;
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("validation failed: {0}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Lookup(#[from] RepositoryError),
}

enum FieldOutcome {
    Absent,
    Valid(Value),
    Invalid(Vec<String>),
}

/// Evaluate every rule that does not need the store.
pub fn check_rules(input: &Input, rules: &RuleSet) -> Result<ValidatedFields, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut validated = Input::new();

    for (field, field_rules) in rules.fields() {
        match check_field(field, input.get(field), field_rules) {
            FieldOutcome::Absent => {}
            FieldOutcome::Valid(value) => {
                validated.insert(field.to_string(), value);
            }
            FieldOutcome::Invalid(messages) => {
                for message in messages {
                    errors.add(field, message);
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(ValidatedFields(validated))
    } else {
        Err(errors)
    }
}

/// Evaluate all rules, including the reference rules answered by `references`.
pub async fn validate(
    input: &Input,
    rules: &RuleSet,
    references: &dyn ReferenceCheck,
) -> Result<ValidatedFields, ValidationError> {
    let mut errors = FieldErrors::new();
    let mut validated = Input::new();

    for (field, field_rules) in rules.fields() {
        match check_field(field, input.get(field), field_rules) {
            FieldOutcome::Absent => {}
            FieldOutcome::Valid(value) => {
                match check_references(field, &value, field_rules, references).await? {
                    Some(message) => errors.add(field, message),
                    None => {
                        validated.insert(field.to_string(), value);
                    }
                }
            }
            FieldOutcome::Invalid(messages) => {
                for message in messages {
                    errors.add(field, message);
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(ValidatedFields(validated))
    } else {
        Err(ValidationError::Invalid(errors))
    }
}

fn check_field(field: &str, value: Option<&Value>, rules: &[Rule]) -> FieldOutcome {
    let label = field_label(field);

    if value.is_none() && rules.contains(&Rule::Sometimes) {
        return FieldOutcome::Absent;
    }
    if rules.contains(&Rule::Required) && is_blank(value) {
        return FieldOutcome::Invalid(vec![format!("The {label} field is required.")]);
    }
    let Some(value) = value else {
        return FieldOutcome::Absent;
    };
    // Blank strings count as null on nullable fields.
    let null_like = value.is_null() || value.as_str().is_some_and(|text| text.trim().is_empty());
    if null_like && rules.contains(&Rule::Nullable) {
        return FieldOutcome::Valid(Value::Null);
    }

    let messages: Vec<String> = rules
        .iter()
        .filter_map(|rule| check_rule(&label, value, rule))
        .collect();

    if messages.is_empty() {
        FieldOutcome::Valid(value.clone())
    } else {
        FieldOutcome::Invalid(messages)
    }
}

fn check_rule(label: &str, value: &Value, rule: &Rule) -> Option<String> {
    match rule {
        Rule::Sometimes
        | Rule::Required
        | Rule::Nullable
        | Rule::ExistsAuthor
        | Rule::UniqueAuthorEmail { .. } => None,
        Rule::String => (!value.is_string()).then(|| format!("The {label} field must be a string.")),
        Rule::MaxLength(max) => value
            .as_str()
            .filter(|text| text.chars().count() > *max)
            .map(|_| format!("The {label} field must not be greater than {max} characters.")),
        Rule::Integer => as_integer(value)
            .is_none()
            .then(|| format!("The {label} field must be an integer.")),
        Rule::Min(min) => as_integer(value)
            .filter(|number| number < min)
            .map(|_| format!("The {label} field must be at least {min}.")),
        Rule::Max(max) => as_integer(value)
            .filter(|number| number > max)
            .map(|_| format!("The {label} field must not be greater than {max}.")),
        Rule::Date => value
            .as_str()
            .and_then(parse_iso_date)
            .is_none()
            .then(|| format!("The {label} field must be a valid date.")),
        Rule::Email => (!value.as_str().is_some_and(looks_like_email))
            .then(|| format!("The {label} field must be a valid email address.")),
    }
}

async fn check_references(
    field: &str,
    value: &Value,
    rules: &[Rule],
    references: &dyn ReferenceCheck,
) -> Result<Option<String>, RepositoryError> {
    if value.is_null() {
        return Ok(None);
    }
    let label = field_label(field);

    for rule in rules {
        match rule {
            Rule::ExistsAuthor => {
                let exists = match as_integer(value) {
                    Some(id) => references.author_exists(id).await?,
                    None => false,
                };
                if !exists {
                    return Ok(Some(format!("The selected {label} is invalid.")));
                }
            }
            Rule::UniqueAuthorEmail { ignore_id } => {
                let Some(email) = value.as_str() else {
                    continue;
                };
                if references.author_email_taken(email, *ignore_id).await? {
                    return Ok(Some(format!("The {label} has already been taken.")));
                }
            }
            _ => {}
        }
    }

    Ok(None)
}

fn field_label(field: &str) -> String {
    field.replace('_', " ")
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}
