//! Value object trait: equality by value, not identity.
//!
//! Metric readings, analytic sub-records and reports are values: they carry no
//! identity and are never mutated after construction. A job, by contrast, is
//! identified by its `JobId` and changes status over its lifetime.

/// Marker trait for value objects.
///
/// Requires `Clone + PartialEq + Debug` so values can be handed across the
/// pipeline stages by copy and compared in tests.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
