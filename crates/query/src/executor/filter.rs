//! Row filtering.

use crate::ast::{BoundPredicate, Predicate};
use crate::executor::relation::Relation;
use alloc::vec::Vec;
use relq_core::{Result, Schema};

/// Keeps the rows matching a predicate, preserving input order.
pub struct FilterExecutor {
    predicate: BoundPredicate,
}

impl FilterExecutor {
    /// Binds the predicate against the input schema.
    pub fn bind(predicate: &Predicate, schema: &Schema) -> Result<Self> {
        Ok(Self {
            predicate: predicate.bind(schema)?,
        })
    }

    /// Filters the input relation.
    pub fn execute(&self, input: Relation) -> Relation {
        let schema = input.schema().clone();
        let rows: Vec<_> = input
            .into_rows()
            .into_iter()
            .filter(|row| self.predicate.eval(row))
            .collect();
        Relation::new_unchecked(schema, rows)
    }
}
