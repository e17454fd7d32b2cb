//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values; two
/// with the same values are the same value. `Cpf` is the canonical example
/// here: a `Customer` is an entity, the tax identifier it carries is not.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
