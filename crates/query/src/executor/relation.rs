//! In-memory relations.

use alloc::vec::Vec;
use relq_core::{Result, Row, Schema};

/// A schema plus an ordered sequence of conforming rows.
///
/// Relations are immutable once built; operators consume them by value and
/// produce new ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    schema: Schema,
    rows: Vec<Row>,
}

impl Relation {
    /// Creates a relation, validating every row against the schema.
    pub fn new(schema: Schema, rows: Vec<Row>) -> Result<Self> {
        for row in &rows {
            schema.check_row(row)?;
        }
        Ok(Self { schema, rows })
    }

    /// Creates a relation from rows already known to conform. Operator
    /// output rows are constructed positionally from validated inputs, so
    /// re-checking them would be redundant.
    pub(crate) fn new_unchecked(schema: Schema, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    /// Creates an empty relation over a schema.
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Returns the schema.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the rows in order.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the relation has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consumes the relation, yielding its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}
