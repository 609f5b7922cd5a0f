use serde::{Deserialize, Serialize};

use catalog_categories::Category;
use catalog_core::{CategoryId, Entity, Field, FieldError, ProductId, ValueObject};

use crate::price::Price;

/// Maximum product name length, in characters.
pub const PRODUCT_NAME_MAX_LEN: usize = 200;

/// A validated product name: present, not blank, at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductName(String);

impl ProductName {
    pub fn parse(raw: Option<&str>) -> Result<Self, FieldError> {
        let raw = match raw {
            Some(s) if !s.trim().is_empty() => s,
            _ => return Err(FieldError::new(Field::Name, "Product name is required")),
        };

        if raw.chars().count() > PRODUCT_NAME_MAX_LEN {
            return Err(FieldError::new(
                Field::Name,
                format!("Product name must be at most {PRODUCT_NAME_MAX_LEN} characters"),
            ));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ProductName {}

impl core::fmt::Display for ProductName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insert shape: everything but the gateway-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: ProductName,
    pub price: Price,
    pub category_id: CategoryId,
}

/// Replacement values for an update (whole-entity, not a patch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: ProductName,
    pub price: Price,
    pub category_id: CategoryId,
}

/// Persisted product shape: the category is held by id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: ProductName,
    pub price: Price,
    pub category_id: CategoryId,
}

impl ProductRecord {
    pub fn from_new(id: ProductId, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            price: new.price,
            category_id: new.category_id,
        }
    }

    /// Overwrite the fields that differ from `changes`.
    ///
    /// Returns the fields that were actually replaced (empty when the
    /// submission matched the current state).
    pub fn apply(&mut self, changes: ProductChanges) -> Vec<Field> {
        let mut changed = Vec::new();

        if self.name != changes.name {
            self.name = changes.name;
            changed.push(Field::Name);
        }

        if self.price != changes.price {
            self.price = changes.price;
            changed.push(Field::Price);
        }

        if self.category_id != changes.category_id {
            self.category_id = changes.category_id;
            changed.push(Field::SelectedCategoryId);
        }

        changed
    }
}

/// Entity: Product, with its category resolved at read time.
///
/// `category` is `None` only when the referenced category was deleted after the
/// product was written; `category_id` still carries the stale reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    record: ProductRecord,
    category: Option<Category>,
}

impl Product {
    /// Attach the resolved category to a persisted record.
    ///
    /// A category whose id does not match the record's reference is discarded.
    pub fn resolve(record: ProductRecord, category: Option<Category>) -> Self {
        let category = category.filter(|c| c.id() == record.category_id);
        Self { record, category }
    }

    pub fn name(&self) -> &ProductName {
        &self.record.name
    }

    pub fn price(&self) -> Price {
        self.record.price
    }

    pub fn category_id(&self) -> CategoryId {
        self.record.category_id
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.record.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_categories::CategoryName;

    fn category(id: i64, name: &str) -> Category {
        Category::new(
            CategoryId::new(id).unwrap(),
            CategoryName::parse(Some(name)).unwrap(),
        )
    }

    fn record() -> ProductRecord {
        ProductRecord {
            id: ProductId::new(1).unwrap(),
            name: ProductName::parse(Some("Phone")).unwrap(),
            price: Price::from_cents(49_999).unwrap(),
            category_id: CategoryId::new(1).unwrap(),
        }
    }

    #[test]
    fn blank_product_name_is_required() {
        let err = ProductName::parse(Some("  ")).unwrap_err();
        assert_eq!(err.field, Field::Name);
        assert_eq!(err.message, "Product name is required");
    }

    #[test]
    fn product_name_limit_is_200() {
        assert!(ProductName::parse(Some(&"x".repeat(200))).is_ok());
        assert!(ProductName::parse(Some(&"x".repeat(201))).is_err());
    }

    #[test]
    fn apply_only_reports_differing_fields() {
        let mut r = record();
        let changed = r.apply(ProductChanges {
            name: ProductName::parse(Some("Phone")).unwrap(),
            price: Price::from_cents(39_999).unwrap(),
            category_id: CategoryId::new(1).unwrap(),
        });
        assert_eq!(changed, vec![Field::Price]);
        assert_eq!(r.price.cents(), 39_999);
        assert_eq!(r.id.get(), 1);
    }

    #[test]
    fn apply_treats_case_change_as_a_rename() {
        let mut r = record();
        let changed = r.apply(ProductChanges {
            name: ProductName::parse(Some("PHONE")).unwrap(),
            price: r.price,
            category_id: r.category_id,
        });
        assert_eq!(changed, vec![Field::Name]);
        assert_eq!(r.name.as_str(), "PHONE");
    }

    #[test]
    fn resolve_keeps_matching_category() {
        let p = Product::resolve(record(), Some(category(1, "Electronics")));
        assert_eq!(p.category().unwrap().name().as_str(), "Electronics");
    }

    #[test]
    fn resolve_drops_mismatched_category_but_keeps_reference() {
        let p = Product::resolve(record(), Some(category(2, "Books")));
        assert!(p.category().is_none());
        assert_eq!(p.category_id().get(), 1);
    }

    #[test]
    fn dangling_reference_is_preserved() {
        let p = Product::resolve(record(), None);
        assert!(p.category().is_none());
        assert_eq!(p.category_id().get(), 1);
        assert_eq!(p.id().get(), 1);
    }
}
