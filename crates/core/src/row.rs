//! Row structure for the Relq engine.
//!
//! A row is a fixed-length sequence of values aligned positionally to a
//! schema. Rows carry no identity of their own; joins and aggregation build
//! fresh rows from their inputs.

use crate::value::Value;
use alloc::vec::Vec;

/// A row in a relation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// Values stored in this row, indexed by column position.
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row from the given values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Creates a row of `len` null markers.
    pub fn nulls(len: usize) -> Self {
        let mut values = Vec::with_capacity(len);
        values.resize(len, Value::Null);
        Self { values }
    }

    /// Combines two rows into one, left values first.
    pub fn concat(left: &Row, right: &Row) -> Self {
        let mut values = Vec::with_capacity(left.len() + right.len());
        values.extend(left.values.iter().cloned());
        values.extend(right.values.iter().cloned());
        Self { values }
    }

    /// Combines a row with `pad` trailing nulls (unmatched outer-join side).
    pub fn null_padded(left: &Row, pad: usize) -> Self {
        let total = left.len() + pad;
        let mut values = Vec::with_capacity(total);
        values.extend(left.values.iter().cloned());
        values.resize(total, Value::Null);
        Self { values }
    }

    /// Combines `pad` leading nulls with a row (unmatched right-side row in
    /// a right or full outer join).
    pub fn null_prefixed(pad: usize, right: &Row) -> Self {
        let total = pad + right.len();
        let mut values = Vec::with_capacity(total);
        values.resize(pad, Value::Null);
        values.extend(right.values.iter().cloned());
        Self { values }
    }

    /// Returns a reference to the values.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the row, returning its values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Gets a value at the given column index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the number of values in this row.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}
