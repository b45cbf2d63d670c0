//! Hash join.
//!
//! Fast path for single-column equality predicates. Builds a key table
//! over the right side, then probes with each left row in order; match
//! lists preserve right-side order, so output ordering is identical to
//! the nested loop.
//!
//! Only left-driven kinds are supported here. Right and full outer joins
//! interleave right-driven output and stay on the nested loop.

use crate::executor::relation::Relation;
use crate::plan::JoinKind;
use alloc::vec::Vec;
use hashbrown::HashMap;
use relq_core::{Row, Value};

pub(super) fn supports(kind: JoinKind) -> bool {
    matches!(
        kind,
        JoinKind::Inner | JoinKind::Left | JoinKind::Semi | JoinKind::Anti
    )
}

pub(super) fn join(
    kind: JoinKind,
    left_key: usize,
    right_key: usize,
    left: &Relation,
    right: &Relation,
) -> Vec<Row> {
    // Null keys never enter the table, so they can never match
    let mut table: HashMap<&Value, Vec<usize>> = HashMap::new();
    for (ri, r) in right.rows().iter().enumerate() {
        if let Some(key) = r.get(right_key).filter(|v| !v.is_null()) {
            table.entry(key).or_default().push(ri);
        }
    }

    let right_width = right.schema().len();
    let mut rows = Vec::new();

    for l in left.rows() {
        let matches = l
            .get(left_key)
            .filter(|v| !v.is_null())
            .and_then(|key| table.get(key))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        match kind {
            JoinKind::Inner => {
                for &ri in matches {
                    rows.push(Row::concat(l, &right.rows()[ri]));
                }
            }
            JoinKind::Left => {
                if matches.is_empty() {
                    rows.push(Row::null_padded(l, right_width));
                } else {
                    for &ri in matches {
                        rows.push(Row::concat(l, &right.rows()[ri]));
                    }
                }
            }
            JoinKind::Semi => {
                if !matches.is_empty() {
                    rows.push(l.clone());
                }
            }
            JoinKind::Anti => {
                if matches.is_empty() {
                    rows.push(l.clone());
                }
            }
            // Guarded by supports()
            JoinKind::Right | JoinKind::Full | JoinKind::Cross => unreachable!(),
        }
    }

    rows
}
