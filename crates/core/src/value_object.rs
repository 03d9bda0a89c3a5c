//! Value object trait: equality by value, not identity.

/// Marker trait for immutable domain values compared by their attributes.
///
/// `Money` and `Period` are value objects; an invoice record is not (it has a
/// `RecordId`). Value objects never change after construction; to "modify"
/// one, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
