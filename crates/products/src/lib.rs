//! Products domain module.
//!
//! This crate contains business rules for catalog products, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod price;
pub mod product;

pub use price::{PRICE_MAX, PRICE_SCALE, Price};
pub use product::{
    NewProduct, PRODUCT_NAME_MAX_LEN, Product, ProductChanges, ProductName, ProductRecord,
};
