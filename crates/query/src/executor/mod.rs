//! Execution operators.
//!
//! Every operator follows the same shape: a `bind` constructor that
//! resolves column names against input schemas and fails on any schema
//! error, and an `execute` method that processes rows and cannot fail.
//! The [`Pipeline`] driver wires operators together left to right.

pub mod aggregate;
pub mod filter;
pub mod join;
pub mod junction;
pub mod limit;
pub mod pipeline;
pub mod project;
pub mod relation;
pub mod sort;

pub use aggregate::AggregateExecutor;
pub use filter::FilterExecutor;
pub use join::JoinExecutor;
pub use junction::{JunctionResolver, Side};
pub use limit::LimitExecutor;
pub use pipeline::Pipeline;
pub use project::ProjectExecutor;
pub use relation::Relation;
pub use sort::SortExecutor;
