use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use catalog_categories::Category;
use catalog_core::{CategoryId, Entity, ProductId};
use catalog_products::{PRICE_SCALE, Product};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CategoryRequest {
    /// Optional echo of the path id on updates.
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    /// Optional echo of the path id on updates.
    pub id: Option<i64>,
    pub selected_category_id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

impl ProductRequest {
    /// The submitted category; ids that cannot exist resolve to nothing.
    pub fn category_id(&self) -> Option<CategoryId> {
        self.selected_category_id
            .and_then(|raw| CategoryId::new(raw).ok())
    }
}

// -------------------------
// View models
// -------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub price_formatted: String,
    pub category: CategoryView,
}

/// One entry of a category selection control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
    pub selected: bool,
}

/// Create/edit form for a product, including the selectable categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductForm {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub selected_category_id: Option<i64>,
    pub available_categories: Vec<SelectOption>,
}

impl ProductForm {
    /// Empty create form; nothing pre-selected.
    pub fn blank(categories: &[Category]) -> Self {
        Self {
            available_categories: category_options(categories, None),
            ..Self::default()
        }
    }

    /// Edit form for an existing product with its current category selected.
    pub fn for_product(product: &Product, categories: &[Category]) -> Self {
        let selected = product.category_id();
        Self {
            id: Some(product.id().get()),
            name: Some(product.name().to_string()),
            price: Some(product.price().amount()),
            selected_category_id: Some(selected.get()),
            available_categories: category_options(categories, Some(selected)),
        }
    }

    /// Re-render a rejected submission. `id` is the product being edited
    /// (`None` on create). `selected` overrides the submitted category when
    /// given; the option flags follow `selected` only.
    pub fn resubmitted(
        id: Option<ProductId>,
        request: &ProductRequest,
        categories: &[Category],
        selected: Option<CategoryId>,
    ) -> Self {
        Self {
            id: id.map(|id| id.get()).or(request.id),
            name: request.name.clone(),
            price: request.price,
            selected_category_id: selected
                .map(|id| id.get())
                .or(request.selected_category_id),
            available_categories: category_options(categories, selected),
        }
    }
}

// -------------------------
// Mapping helpers
// -------------------------

pub fn category_view(category: &Category) -> CategoryView {
    CategoryView {
        id: category.id().get(),
        name: category.name().to_string(),
    }
}

/// A product whose category is gone keeps the stale id with an empty name.
pub fn product_view(product: &Product) -> ProductView {
    let category = match product.category() {
        Some(c) => category_view(c),
        None => CategoryView {
            id: product.category_id().get(),
            name: String::new(),
        },
    };

    ProductView {
        id: product.id().get(),
        name: product.name().to_string(),
        price: product.price().amount(),
        price_formatted: format_price(product.price().amount()),
        category,
    }
}

pub fn category_options(categories: &[Category], selected: Option<CategoryId>) -> Vec<SelectOption> {
    categories
        .iter()
        .map(|c| SelectOption {
            value: c.id().to_string(),
            text: c.name().to_string(),
            selected: selected == Some(c.id()),
        })
        .collect()
}

/// Two fractional digits with thousands grouping, e.g. `1,234.50`.
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    let whole = rounded
        .trunc()
        .to_u128()
        .unwrap_or_default()
        .to_formatted_string(&Locale::en);

    let fixed = format!("{:.*}", PRICE_SCALE as usize, rounded);
    let fraction = fixed.rsplit_once('.').map_or("00", |(_, f)| f);
    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{sign}{whole}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_categories::CategoryName;
    use catalog_products::{Price, ProductName, ProductRecord};

    fn category(id: i64, name: &str) -> Category {
        Category::new(
            CategoryId::new(id).unwrap(),
            CategoryName::parse(Some(name)).unwrap(),
        )
    }

    fn phone(category: Option<Category>) -> Product {
        Product::resolve(
            ProductRecord {
                id: ProductId::new(1).unwrap(),
                name: ProductName::parse(Some("Phone")).unwrap(),
                price: Price::from_cents(123_450).unwrap(),
                category_id: CategoryId::new(1).unwrap(),
            },
            category,
        )
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn formats_two_decimals_with_grouping() {
        assert_eq!(format_price(dec("499.99")), "499.99");
        assert_eq!(format_price(dec("1234.5")), "1,234.50");
        assert_eq!(format_price(dec("1000000")), "1,000,000.00");
        assert_eq!(format_price(dec("0")), "0.00");
        assert_eq!(format_price(dec("999")), "999.00");
        assert_eq!(format_price(dec("-1234")), "-1,234.00");
        assert_eq!(format_price(dec("12345678.125")), "12,345,678.13");
    }

    #[test]
    fn product_view_copies_fields_and_category() {
        let view = product_view(&phone(Some(category(1, "Electronics"))));
        assert_eq!(view.id, 1);
        assert_eq!(view.name, "Phone");
        assert_eq!(view.price_formatted, "1,234.50");
        assert_eq!(
            view.category,
            CategoryView {
                id: 1,
                name: "Electronics".into()
            }
        );
    }

    #[test]
    fn dangling_category_keeps_stale_id() {
        let view = product_view(&phone(None));
        assert_eq!(view.category.id, 1);
        assert!(view.category.name.is_empty());
    }

    #[test]
    fn only_the_matching_option_is_selected() {
        let cats = [category(1, "Electronics"), category(2, "Books")];
        let opts = category_options(&cats, CategoryId::new(2).ok());
        assert_eq!(opts.len(), 2);
        assert_eq!((opts[0].value.as_str(), opts[0].selected), ("1", false));
        assert_eq!((opts[1].text.as_str(), opts[1].selected), ("Books", true));

        assert!(category_options(&cats, None).iter().all(|o| !o.selected));
    }

    #[test]
    fn edit_form_preselects_current_category() {
        let cats = [category(1, "Electronics"), category(2, "Books")];
        let form = ProductForm::for_product(&phone(Some(cats[0].clone())), &cats);
        assert_eq!(form.selected_category_id, Some(1));
        assert!(form.available_categories[0].selected);
        assert_eq!(form.price, Some(dec("1234.50")));
    }

    #[test]
    fn resubmitted_form_keeps_input_and_applies_override() {
        let cats = [category(1, "Electronics"), category(2, "Books")];
        let request = ProductRequest {
            id: Some(1),
            selected_category_id: Some(99),
            name: Some(String::new()),
            price: Some(dec("5")),
        };

        let form = ProductForm::resubmitted(None, &request, &cats, CategoryId::new(1).ok());
        assert_eq!(form.id, Some(1));
        assert_eq!(form.selected_category_id, Some(1));
        assert_eq!(form.name.as_deref(), Some(""));
        assert!(form.available_categories[0].selected);

        let form = ProductForm::resubmitted(None, &request, &cats, None);
        assert_eq!(form.selected_category_id, Some(99));
        assert!(form.available_categories.iter().all(|o| !o.selected));
    }

    #[test]
    fn resubmitted_edit_form_takes_the_edited_product_id() {
        let cats = [category(1, "Electronics")];
        let request = ProductRequest {
            selected_category_id: Some(1),
            name: Some(String::new()),
            ..ProductRequest::default()
        };

        let form = ProductForm::resubmitted(
            ProductId::new(7).ok(),
            &request,
            &cats,
            CategoryId::new(1).ok(),
        );
        assert_eq!(form.id, Some(7));

        let form = ProductForm::resubmitted(None, &request, &cats, None);
        assert_eq!(form.id, None);
    }

    #[test]
    fn non_positive_category_ids_resolve_to_nothing() {
        let request = ProductRequest {
            selected_category_id: Some(0),
            ..ProductRequest::default()
        };
        assert!(request.category_id().is_none());
    }
}
