//! Multi-key stable sorting.

use crate::ast::SortOrder;
use crate::executor::relation::Relation;
use crate::plan::SortKey;
use alloc::vec::Vec;
use core::cmp::Ordering;
use relq_core::{Result, Row, Schema, Value};

/// Sorts rows by one or more keys.
///
/// Earlier keys are more significant. The sort is stable, so rows equal
/// under every key keep their input order. Nulls order before every
/// non-null value ascending, after every non-null value descending.
pub struct SortExecutor {
    keys: Vec<(usize, SortOrder)>,
}

impl SortExecutor {
    /// Resolves the sort keys against the input schema.
    pub fn bind(keys: &[SortKey], schema: &Schema) -> Result<Self> {
        let keys = keys
            .iter()
            .map(|key| Ok((schema.index_of(&key.column)?, key.order)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { keys })
    }

    /// Sorts the input relation.
    pub fn execute(&self, input: Relation) -> Relation {
        let schema = input.schema().clone();
        let mut rows = input.into_rows();
        rows.sort_by(|a, b| self.compare(a, b));
        Relation::new_unchecked(schema, rows)
    }

    fn compare(&self, a: &Row, b: &Row) -> Ordering {
        for (index, order) in &self.keys {
            let av = a.get(*index).unwrap_or(&Value::Null);
            let bv = b.get(*index).unwrap_or(&Value::Null);
            let ordering = match order {
                SortOrder::Asc => av.cmp(bv),
                SortOrder::Desc => bv.cmp(av),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
