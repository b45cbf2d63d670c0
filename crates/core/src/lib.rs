//! Relq Core - Core types for the Relq relational query engine.
//!
//! This crate provides the foundational types shared by every engine stage:
//!
//! - `DataType`: Supported column types (Boolean, Int32, Int64, Float64, String, DateTime)
//! - `Value`: Runtime cell values, including the null marker
//! - `Row`: A positional sequence of values conforming to a schema
//! - `Schema` / `Column`: Ordered, named, typed, nullability-aware schemas
//! - `Error`: Error types for plan building and junction mutation
//!
//! # Example
//!
//! ```rust
//! use relq_core::{Column, DataType, Row, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Column::new("id", DataType::Int64),
//!     Column::new("name", DataType::String).nullable(true),
//! ])
//! .unwrap();
//!
//! let row = Row::new(vec![Value::Int64(1), Value::String("Alice".into())]);
//! schema.check_row(&row).unwrap();
//!
//! assert_eq!(schema.index_of("name").unwrap(), 1);
//! assert_eq!(row.get(1), Some(&Value::String("Alice".into())));
//! ```

#![no_std]

extern crate alloc;

mod error;
mod row;
mod schema;
mod types;
mod value;

pub use error::{Error, Result};
pub use row::Row;
pub use schema::{Column, Schema};
pub use types::DataType;
pub use value::Value;
