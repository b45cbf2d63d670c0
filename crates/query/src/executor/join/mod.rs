//! Join execution.
//!
//! [`JoinExecutor::bind`] validates a join spec against the two input
//! schemas and computes the output schema; `execute` then picks a strategy.
//! Single-column equality predicates on left-driven kinds take the hash
//! path, everything else falls back to the nested loop. Both strategies
//! produce identical rows in identical order.

mod hash;
mod nested;

use crate::ast::BoundPredicate;
use crate::executor::relation::Relation;
use crate::plan::{JoinKind, JoinSpec};
use alloc::vec::Vec;
use relq_core::{Result, Row, Schema};

/// A bound join between two relations.
pub struct JoinExecutor {
    kind: JoinKind,
    on: Option<BoundPredicate>,
    hash_keys: Option<(usize, usize)>,
    schema: Schema,
}

impl JoinExecutor {
    /// Binds a join spec against the left and right input schemas.
    ///
    /// The ON predicate is resolved against the concatenation of the two
    /// schemas, so it may reference columns from either side. Column name
    /// collisions between the sides are rejected; callers alias before
    /// joining.
    pub fn bind(spec: &JoinSpec, left: &Schema, right: &Schema) -> Result<Self> {
        let combined = left.join(right)?;
        let on = match spec.on() {
            Some(predicate) => Some(predicate.bind(&combined)?),
            None => None,
        };

        let schema = match spec.kind() {
            JoinKind::Inner | JoinKind::Cross => combined,
            JoinKind::Left => left.join(&right.as_nullable())?,
            JoinKind::Right => left.as_nullable().join(right)?,
            JoinKind::Full => left.as_nullable().join(&right.as_nullable())?,
            JoinKind::Semi | JoinKind::Anti => left.clone(),
        };

        // The hash table compares keys with Value equality, which treats
        // an integer and a float as distinct even when the nested loop's
        // ordering calls them equal. Mixed-width integers hash alike, so
        // they keep the fast path; any other type mix falls back.
        let hash_keys = if hash::supports(spec.kind()) {
            on.as_ref()
                .and_then(|on| on.equi_keys(left.len()))
                .filter(|&(lk, rk)| {
                    let lt = left.columns()[lk].data_type();
                    let rt = right.columns()[rk].data_type();
                    lt == rt || (lt.is_integer() && rt.is_integer())
                })
        } else {
            None
        };

        Ok(Self {
            kind: spec.kind(),
            on,
            hash_keys,
            schema,
        })
    }

    /// Returns the output schema.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Executes the join. Cannot fail after a successful bind.
    pub fn execute(&self, left: &Relation, right: &Relation) -> Relation {
        let rows = match &self.on {
            None => cross_rows(left, right),
            Some(on) => match self.hash_keys {
                Some((lk, rk)) => hash::join(self.kind, lk, rk, left, right),
                None => nested::join(self.kind, on, left, right),
            },
        };
        Relation::new_unchecked(self.schema.clone(), rows)
    }
}

/// Cartesian product in left-major order.
fn cross_rows(left: &Relation, right: &Relation) -> Vec<Row> {
    let mut rows = Vec::with_capacity(left.len() * right.len());
    for l in left.rows() {
        for r in right.rows() {
            rows.push(Row::concat(l, r));
        }
    }
    rows
}
