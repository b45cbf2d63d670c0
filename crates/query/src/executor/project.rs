//! Column projection.

use crate::executor::relation::Relation;
use alloc::string::String;
use alloc::vec::Vec;
use relq_core::{Result, Row, Schema, Value};

/// Narrows a relation to a subset of its columns, in the requested order.
///
/// Requesting the same column twice is rejected at bind time, since the
/// output schema would carry a duplicate name.
pub struct ProjectExecutor {
    indices: Vec<usize>,
    schema: Schema,
}

impl ProjectExecutor {
    /// Resolves the projection column names against the input schema.
    pub fn bind(columns: &[String], input: &Schema) -> Result<Self> {
        let indices = columns
            .iter()
            .map(|name| input.index_of(name))
            .collect::<Result<Vec<_>>>()?;
        let schema = Schema::new(
            indices
                .iter()
                .map(|&i| input.columns()[i].clone())
                .collect(),
        )?;
        Ok(Self { indices, schema })
    }

    /// Returns the output schema.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Projects the input relation.
    pub fn execute(&self, input: Relation) -> Relation {
        let rows: Vec<_> = input
            .into_rows()
            .into_iter()
            .map(|row| {
                Row::new(
                    self.indices
                        .iter()
                        .map(|&i| row.get(i).cloned().unwrap_or(Value::Null))
                        .collect(),
                )
            })
            .collect();
        Relation::new_unchecked(self.schema.clone(), rows)
    }
}
