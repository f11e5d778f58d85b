//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two action names
/// with the same text are the same action, regardless of which request carried
/// them. To "modify" a value object, build a new one.
///
/// The trait requires:
/// - **Clone**: value objects are passed around freely (context, logs, records)
/// - **PartialEq**: compared by attribute values
/// - **Debug**: must be loggable
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
