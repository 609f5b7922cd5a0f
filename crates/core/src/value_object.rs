//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two instances holding the same values
/// are interchangeable. In this codebase they are the validated input shapes
/// (`CategoryName`, `ProductName`, `Price`), which can only be constructed
/// through their `parse` functions, so holding one proves the value passed
/// validation.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
