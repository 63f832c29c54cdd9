//! Module: query
//! Responsibility: mutable per-query state (joins, filters, ordering,
//! projection, pagination) and the builders that append to it.
//! Does not own: text rendering or execution.
//! Boundary: metadata is write-append-only through the builders and read
//! only by the serializer.

mod boolean;
mod fluent;
mod join;
mod metadata;
mod mixin;
mod modifiers;
mod normalize;
mod order;


pub use boolean::{BooleanBuilder, Condition};
pub use fluent::Query;
pub use join::{JoinExpression, JoinFlag, JoinType};
pub use metadata::QueryMetadata;
pub use mixin::QueryMixin;
pub use modifiers::QueryModifiers;
pub use order::{NullHandling, Order, OrderSpecifier};
