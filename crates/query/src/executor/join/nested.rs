//! Nested loop join.
//!
//! The general strategy: evaluates the bound ON predicate over row pairs.
//! Handles every join kind and every predicate shape.

use crate::ast::BoundPredicate;
use crate::executor::relation::Relation;
use crate::plan::JoinKind;
use alloc::vec;
use alloc::vec::Vec;
use relq_core::Row;

pub(super) fn join(
    kind: JoinKind,
    on: &BoundPredicate,
    left: &Relation,
    right: &Relation,
) -> Vec<Row> {
    match kind {
        JoinKind::Inner => inner(on, left, right),
        JoinKind::Left => left_outer(on, left, right),
        JoinKind::Right => right_outer(on, left, right),
        JoinKind::Full => full_outer(on, left, right),
        JoinKind::Semi => semi(on, left, right, true),
        JoinKind::Anti => semi(on, left, right, false),
        // Cross joins carry no predicate and are dispatched earlier
        JoinKind::Cross => inner(on, left, right),
    }
}

fn inner(on: &BoundPredicate, left: &Relation, right: &Relation) -> Vec<Row> {
    let mut rows = Vec::new();
    for l in left.rows() {
        for r in right.rows() {
            if on.eval_pair(l, r) {
                rows.push(Row::concat(l, r));
            }
        }
    }
    rows
}

fn left_outer(on: &BoundPredicate, left: &Relation, right: &Relation) -> Vec<Row> {
    let right_width = right.schema().len();
    let mut rows = Vec::new();
    for l in left.rows() {
        let mut matched = false;
        for r in right.rows() {
            if on.eval_pair(l, r) {
                rows.push(Row::concat(l, r));
                matched = true;
            }
        }
        if !matched {
            rows.push(Row::null_padded(l, right_width));
        }
    }
    rows
}

fn right_outer(on: &BoundPredicate, left: &Relation, right: &Relation) -> Vec<Row> {
    let left_width = left.schema().len();
    let mut rows = Vec::new();
    for r in right.rows() {
        let mut matched = false;
        for l in left.rows() {
            if on.eval_pair(l, r) {
                rows.push(Row::concat(l, r));
                matched = true;
            }
        }
        if !matched {
            rows.push(Row::null_prefixed(left_width, r));
        }
    }
    rows
}

/// Left-driven pass, then never-matched right rows appended in right order.
fn full_outer(on: &BoundPredicate, left: &Relation, right: &Relation) -> Vec<Row> {
    let right_width = right.schema().len();
    let left_width = left.schema().len();
    let mut right_matched = vec![false; right.len()];
    let mut rows = Vec::new();

    for l in left.rows() {
        let mut matched = false;
        for (ri, r) in right.rows().iter().enumerate() {
            if on.eval_pair(l, r) {
                rows.push(Row::concat(l, r));
                matched = true;
                right_matched[ri] = true;
            }
        }
        if !matched {
            rows.push(Row::null_padded(l, right_width));
        }
    }

    for (ri, r) in right.rows().iter().enumerate() {
        if !right_matched[ri] {
            rows.push(Row::null_prefixed(left_width, r));
        }
    }

    rows
}

fn semi(on: &BoundPredicate, left: &Relation, right: &Relation, keep_matched: bool) -> Vec<Row> {
    left.rows()
        .iter()
        .filter(|l| right.rows().iter().any(|r| on.eval_pair(l, r)) == keep_matched)
        .cloned()
        .collect()
}
