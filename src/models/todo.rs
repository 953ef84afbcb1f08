use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};

pub const MAX_DESCRIPTION_LEN: usize = 255;

/// A persisted todo item. The id is assigned by storage and immutable;
/// both timestamps are maintained by the store.
#[derive(Serialize, Deserialize, Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = crate::repository::schema::todos)]
pub struct Todo {
    pub id: i32,
    pub description: String,
    pub checked: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::repository::schema::todos)]
pub struct NewTodo<'a> {
    pub description: &'a str,
    pub checked: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One page of todos plus the metadata the list endpoint exposes.
#[derive(Serialize, Deserialize, Debug)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
}

/// Request body for create and update. Both fields are optional at the
/// deserialization layer so that absence becomes a field error rather than
/// a framework-level parse failure.
#[derive(Debug, Deserialize)]
pub struct TodoPayload {
    pub description: Option<String>,
    pub checked: Option<bool>,
}

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Default, Serialize)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    fn add(&mut self, field: &'static str, message: &str) {
        self.0.entry(field).or_default().push(message.to_string());
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.keys().copied().collect()
    }
}

impl TodoPayload {
    /// Checks the field constraints: description required with length 1..=255,
    /// checked required. Returns the validated pair or every failing field.
    pub fn validate(self) -> Result<(String, bool), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let description = match self.description {
            Some(d) if d.is_empty() => {
                errors.add("description", "The description field is required.");
                None
            }
            Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => {
                errors.add(
                    "description",
                    "The description must not be greater than 255 characters.",
                );
                None
            }
            Some(d) => Some(d),
            None => {
                errors.add("description", "The description field is required.");
                None
            }
        };

        let checked = self.checked;
        if checked.is_none() {
            errors.add("checked", "The checked field is required.");
        }

        match (description, checked) {
            (Some(d), Some(c)) if errors.is_empty() => Ok((d, c)),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(description: Option<&str>, checked: Option<bool>) -> TodoPayload {
        TodoPayload {
            description: description.map(str::to_string),
            checked,
        }
    }

    #[test]
    fn accepts_valid_payload() {
        let (description, checked) = payload(Some("Buy milk"), Some(false))
            .validate()
            .expect("payload should be valid");
        assert_eq!(description, "Buy milk");
        assert!(!checked);
    }

    #[test]
    fn accepts_description_at_max_length() {
        let long = "x".repeat(MAX_DESCRIPTION_LEN);
        assert!(payload(Some(&long), Some(true)).validate().is_ok());
    }

    #[test]
    fn rejects_missing_description() {
        let errors = payload(None, Some(true)).validate().unwrap_err();
        assert_eq!(errors.fields(), vec!["description"]);
    }

    #[test]
    fn rejects_empty_description() {
        let errors = payload(Some(""), Some(true)).validate().unwrap_err();
        assert_eq!(errors.fields(), vec!["description"]);
    }

    #[test]
    fn rejects_overlong_description() {
        let long = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        let errors = payload(Some(&long), Some(true)).validate().unwrap_err();
        assert_eq!(errors.fields(), vec!["description"]);
    }

    #[test]
    fn rejects_missing_checked() {
        let errors = payload(Some("Buy milk"), None).validate().unwrap_err();
        assert_eq!(errors.fields(), vec!["checked"]);
    }

    #[test]
    fn reports_every_failing_field() {
        let errors = payload(None, None).validate().unwrap_err();
        assert_eq!(errors.fields(), vec!["checked", "description"]);
    }
}
