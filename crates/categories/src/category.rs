use serde::{Deserialize, Serialize};

use catalog_core::{CategoryId, Entity, Field, FieldError, ValueObject};

/// Maximum category name length, in characters.
pub const CATEGORY_NAME_MAX_LEN: usize = 100;

/// A validated category name: present, not blank, at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    /// Validate a submitted name. `None` models a form that omitted the field.
    pub fn parse(raw: Option<&str>) -> Result<Self, FieldError> {
        let raw = match raw {
            Some(s) if !s.trim().is_empty() => s,
            _ => return Err(FieldError::new(Field::Name, "Category name is required")),
        };

        if raw.chars().count() > CATEGORY_NAME_MAX_LEN {
            return Err(FieldError::new(
                Field::Name,
                format!("Category name must be at most {CATEGORY_NAME_MAX_LEN} characters"),
            ));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for CategoryName {}

impl core::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insert shape: everything but the gateway-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: CategoryName,
}

impl NewCategory {
    pub fn new(name: CategoryName) -> Self {
        Self { name }
    }
}

/// Entity: Category.
///
/// The inverse `products` relationship is not materialised here; products own
/// the reference and are resolved against categories, never the other way round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: CategoryId,
    name: CategoryName,
}

impl Category {
    pub fn new(id: CategoryId, name: CategoryName) -> Self {
        Self { id, name }
    }

    pub fn name(&self) -> &CategoryName {
        &self.name
    }

    /// Full-attribute replacement; the id is immutable.
    pub fn rename(&mut self, name: CategoryName) {
        self.name = name;
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }
}
