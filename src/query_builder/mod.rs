//! # List-Query Builder
//!
//! Turns a raw query-parameter map into a SQL list query: equality
//! filters, allow-listed search and sort, and LIMIT/OFFSET pagination.
//!
//! ## Key Components
//!
//! - [`conditions`] - WHERE fragments with type coercion and safe column
//!   mapping
//! - [`features`] - the chainable [`ApiFeatures`] builder and its
//!   [`ListQuery`] output
//!
//! Column names go through an identifier check before they reach SQL and
//! every value is bound through [`sqlx::QueryBuilder::push_bind`]; client
//! input never lands in the query text itself.

pub mod conditions;
pub mod features;

pub use conditions::{Condition, FilterValue};
pub use features::{ApiFeatures, ListQuery, SortDirection};
