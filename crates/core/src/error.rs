//! Domain error model.

use serde::Serialize;
use thiserror::Error;

/// Input field a validation failure is attributed to.
///
/// The serialized names match the input shapes accepted at the HTTP boundary so
/// a form can show the message next to the offending control.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Price,
    SelectedCategoryId,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::SelectedCategoryId => "selected_category_id",
        }
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure attributable to one specific input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// All field failures collected for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Record the error side of `result`, passing the success value through.
    pub fn collect<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.push(e);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First message attached to `field`, if any.
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(value: FieldError) -> Self {
        Self(vec![value])
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            core::fmt::Display::fmt(e, f)?;
        }
        Ok(())
    }
}

/// Domain-level error.
///
/// Field rules report [`FieldError`]s directly; this covers the failures that
/// are not attributable to an input field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure, non-positive value).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_reports_nothing() {
        let errors = ValidationErrors::new();
        assert!(errors.is_empty());
        assert_eq!(errors.message_for(Field::Name), None);
    }

    #[test]
    fn collect_keeps_every_failure_in_order() {
        let mut errors = ValidationErrors::new();
        let name: Option<&str> = errors.collect(Err(FieldError::new(Field::Name, "bad name")));
        let price = errors.collect(Ok::<_, FieldError>(10));
        errors.collect::<()>(Err(FieldError::new(Field::Price, "bad price")));

        assert!(name.is_none());
        assert_eq!(price, Some(10));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message_for(Field::Price), Some("bad price"));
        assert_eq!(errors.to_string(), "name: bad name; price: bad price");
    }

    #[test]
    fn field_serializes_as_form_key() {
        assert_eq!(Field::SelectedCategoryId.as_str(), "selected_category_id");
        assert_eq!(Field::Name.to_string(), "name");
    }
}
