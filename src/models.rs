//! Declarative resource configuration.
//!
//! Instead of discovering serialization and filter behavior from attributes
//! scattered over the entity, each resource publishes two explicit tables:
//! a field-visibility table consumed by the projection layer, and a
//! filter-descriptor list consumed by [`crate::filter::apply_filters`].

/// API visibility of a single field.
///
/// A field can be readable (present in responses), writable (accepted in
/// create/replace payloads), both, or neither. Derived fields such as
/// `short_description` are readable but never writable; raw stored fields
/// such as `description` are writable but never readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    pub name: &'static str,
    pub readable: bool,
    pub writable: bool,
}

/// How a query parameter is translated into a SQL condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Exact match on a boolean column (`?is_published=true`).
    BooleanExact,
    /// Substring match on a text column (`?title=brie`).
    PartialMatch,
    /// Inclusive numeric bounds (`?price[gte]=200&price[lte]=600`).
    Range,
}

/// Binds a wire-level filter parameter to a database column.
#[derive(Debug, Clone)]
pub struct FilterDescriptor<C> {
    pub field: &'static str,
    pub kind: FilterKind,
    pub column: C,
}

impl<C> FilterDescriptor<C> {
    pub const fn new(field: &'static str, kind: FilterKind, column: C) -> Self {
        Self {
            field,
            kind,
            column,
        }
    }
}
