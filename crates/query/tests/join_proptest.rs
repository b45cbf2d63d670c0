//! Property-based tests for join semantics over randomly generated inputs.

use proptest::prelude::*;
use relq_core::{Column, DataType, Row, Schema, Value};
use relq_query::ast::{Operand, Predicate};
use relq_query::executor::{JoinExecutor, Relation};
use relq_query::plan::JoinSpec;
use std::collections::HashSet;

/// Keys land in a narrow range so collisions and misses both occur; None
/// becomes a null key.
fn key_strategy() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![
        3 => (0i64..20).prop_map(Some),
        1 => Just(None),
    ]
}

fn left_relation(keys: &[Option<i64>]) -> Relation {
    let schema = Schema::new(vec![
        Column::new("lid", DataType::Int64),
        Column::new("lkey", DataType::Int64).nullable(true),
    ])
    .unwrap();
    let rows = keys
        .iter()
        .enumerate()
        .map(|(i, k)| {
            Row::new(vec![
                Value::Int64(i as i64),
                k.map(Value::Int64).unwrap_or(Value::Null),
            ])
        })
        .collect();
    Relation::new(schema, rows).unwrap()
}

fn right_relation(keys: &[Option<i64>]) -> Relation {
    let schema = Schema::new(vec![
        Column::new("rid", DataType::Int64),
        Column::new("rkey", DataType::Int64).nullable(true),
    ])
    .unwrap();
    let rows = keys
        .iter()
        .enumerate()
        .map(|(i, k)| {
            Row::new(vec![
                Value::Int64(i as i64),
                k.map(Value::Int64).unwrap_or(Value::Null),
            ])
        })
        .collect();
    Relation::new(schema, rows).unwrap()
}

fn on_key() -> Predicate {
    Predicate::eq(Operand::column("lkey"), Operand::column("rkey"))
}

/// Same semantics, but shaped so the equality is not detected as a join
/// key and execution takes the nested loop.
fn on_key_nested() -> Predicate {
    Predicate::and(vec![on_key()])
}

fn run(spec: JoinSpec, left: &Relation, right: &Relation) -> Relation {
    JoinExecutor::bind(&spec, left.schema(), right.schema())
        .unwrap()
        .execute(left, right)
}

fn pair_set(relation: &Relation) -> HashSet<(i64, i64)> {
    relation
        .rows()
        .iter()
        .filter_map(|r| {
            let l = r.get(0).and_then(|v| v.as_i64())?;
            let rr = r.get(2).and_then(|v| v.as_i64())?;
            Some((l, rr))
        })
        .collect()
}

proptest! {
    /// Hash and nested loop strategies agree row for row, order included.
    #[test]
    fn strategies_agree(
        left_keys in prop::collection::vec(key_strategy(), 0..40),
        right_keys in prop::collection::vec(key_strategy(), 0..40),
    ) {
        let left = left_relation(&left_keys);
        let right = right_relation(&right_keys);

        for (fast, slow) in [
            (JoinSpec::inner(on_key()), JoinSpec::inner(on_key_nested())),
            (JoinSpec::left(on_key()), JoinSpec::left(on_key_nested())),
            (JoinSpec::semi(on_key()), JoinSpec::semi(on_key_nested())),
            (JoinSpec::anti(on_key()), JoinSpec::anti(on_key_nested())),
        ] {
            let a = run(fast, &left, &right);
            let b = run(slow, &left, &right);
            prop_assert_eq!(a.rows(), b.rows());
        }
    }

    /// Every inner pair appears in the left outer result.
    #[test]
    fn inner_is_subset_of_left_outer(
        left_keys in prop::collection::vec(key_strategy(), 0..30),
        right_keys in prop::collection::vec(key_strategy(), 0..30),
    ) {
        let left = left_relation(&left_keys);
        let right = right_relation(&right_keys);

        let inner = pair_set(&run(JoinSpec::inner(on_key()), &left, &right));
        let outer = pair_set(&run(JoinSpec::left(on_key()), &left, &right));
        prop_assert!(inner.is_subset(&outer));
    }

    /// |full| = |left outer| + |right outer| - |inner|.
    #[test]
    fn full_outer_size_identity(
        left_keys in prop::collection::vec(key_strategy(), 0..30),
        right_keys in prop::collection::vec(key_strategy(), 0..30),
    ) {
        let left = left_relation(&left_keys);
        let right = right_relation(&right_keys);

        let inner = run(JoinSpec::inner(on_key()), &left, &right).len();
        let lo = run(JoinSpec::left(on_key()), &left, &right).len();
        let ro = run(JoinSpec::right(on_key()), &left, &right).len();
        let full = run(JoinSpec::full(on_key()), &left, &right).len();
        prop_assert_eq!(full, lo + ro - inner);
    }

    /// Semi and anti joins partition the left relation.
    #[test]
    fn semi_anti_partition(
        left_keys in prop::collection::vec(key_strategy(), 0..30),
        right_keys in prop::collection::vec(key_strategy(), 0..30),
    ) {
        let left = left_relation(&left_keys);
        let right = right_relation(&right_keys);

        let semi = run(JoinSpec::semi(on_key()), &left, &right);
        let anti = run(JoinSpec::anti(on_key()), &left, &right);

        prop_assert_eq!(semi.len() + anti.len(), left.len());

        let semi_ids: HashSet<i64> = semi
            .rows()
            .iter()
            .filter_map(|r| r.get(0).and_then(|v| v.as_i64()))
            .collect();
        let anti_ids: HashSet<i64> = anti
            .rows()
            .iter()
            .filter_map(|r| r.get(0).and_then(|v| v.as_i64()))
            .collect();
        prop_assert!(semi_ids.is_disjoint(&anti_ids));
    }

    /// A left outer join always yields at least one row per left row, and
    /// exactly |left| rows when nothing matches.
    #[test]
    fn left_outer_covers_left(
        left_keys in prop::collection::vec(key_strategy(), 0..30),
    ) {
        let left = left_relation(&left_keys);
        // Right keys outside the generator range: no matches possible
        let right = right_relation(&[Some(500), Some(501)]);

        let outer = run(JoinSpec::left(on_key()), &left, &right);
        prop_assert_eq!(outer.len(), left.len());
        for row in outer.rows() {
            prop_assert_eq!(row.get(2), Some(&Value::Null));
            prop_assert_eq!(row.get(3), Some(&Value::Null));
        }
    }

    /// Null keys never appear in matched pairs.
    #[test]
    fn null_keys_never_match(
        left_keys in prop::collection::vec(key_strategy(), 0..30),
        right_keys in prop::collection::vec(key_strategy(), 0..30),
    ) {
        let left = left_relation(&left_keys);
        let right = right_relation(&right_keys);

        let inner = run(JoinSpec::inner(on_key()), &left, &right);
        for row in inner.rows() {
            prop_assert_ne!(row.get(1), Some(&Value::Null));
            prop_assert_ne!(row.get(3), Some(&Value::Null));
        }
    }

    /// Cross join size is the product of the input sizes.
    #[test]
    fn cross_size_is_product(
        left_keys in prop::collection::vec(key_strategy(), 0..15),
        right_keys in prop::collection::vec(key_strategy(), 0..15),
    ) {
        let left = left_relation(&left_keys);
        let right = right_relation(&right_keys);
        let cross = run(JoinSpec::cross(), &left, &right);
        prop_assert_eq!(cross.len(), left.len() * right.len());
    }
}
