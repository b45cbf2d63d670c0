//! Relq Query - the query evaluation engine for Relq.
//!
//! This crate executes already-structured query plans over in-memory
//! relations:
//!
//! - `ast`: Predicate trees and the comparison/sort/aggregate vocabulary
//! - `plan`: Declarative plan types (`JoinSpec`, `AggregateSpec`, `QueryPlan`)
//! - `executor`: Execution operators (join, junction, filter, aggregate,
//!   sort, limit, project) and the left-deep `Pipeline` driver
//!
//! There is no SQL parser and no storage layer here: plans arrive with
//! column references as names, every name is resolved against a concrete
//! schema before any row is processed, and the final relation is handed
//! back to the caller for serialization.

#![no_std]

extern crate alloc;

pub mod ast;
pub mod executor;
pub mod plan;
