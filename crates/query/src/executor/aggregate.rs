//! Grouped aggregation.
//!
//! Groups appear in the output in the order their keys are first seen in
//! the input. Aggregates follow the usual null rules: `count(*)` counts
//! rows, every column-taking function ignores null inputs, and the
//! value-producing functions yield null when a group has no non-null
//! inputs. A having predicate, if present, filters the grouped output and
//! is bound against the output schema, never the input.

use crate::ast::{AggregateFunc, BoundPredicate, Predicate};
use crate::executor::relation::Relation;
use crate::plan::AggregateSpec;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;
use relq_core::{Column, DataType, Error, Result, Row, Schema, Value};

struct BoundAggregate {
    func: AggregateFunc,
    /// Input column position, absent only for `count(*)`.
    column: Option<usize>,
    /// Input column type, used to pick integer or float summation.
    input_type: Option<DataType>,
}

/// Groups rows and computes aggregate columns.
pub struct AggregateExecutor {
    group_indices: Vec<usize>,
    aggregates: Vec<BoundAggregate>,
    having: Option<BoundPredicate>,
    schema: Schema,
}

impl AggregateExecutor {
    /// Binds the grouping stage against the input schema.
    ///
    /// The output schema is the group-by columns followed by one column
    /// per aggregate under its alias. `having` is resolved against that
    /// output schema.
    pub fn bind(
        input: &Schema,
        group_by: &[String],
        specs: &[AggregateSpec],
        having: Option<&Predicate>,
    ) -> Result<Self> {
        let group_indices = group_by
            .iter()
            .map(|name| input.index_of(name))
            .collect::<Result<Vec<_>>>()?;

        let mut columns: Vec<Column> = group_indices
            .iter()
            .map(|&i| input.columns()[i].clone())
            .collect();
        let mut aggregates = Vec::with_capacity(specs.len());

        for spec in specs {
            let column = spec.column().map(|name| input.index_of(name)).transpose()?;
            let input_type = column.map(|i| input.columns()[i].data_type());

            let output = match spec.func() {
                AggregateFunc::Count => Column::new(spec.alias(), DataType::Int64),
                AggregateFunc::Sum => {
                    let it = require_numeric(spec, input_type)?;
                    let dt = if it.is_integer() {
                        DataType::Int64
                    } else {
                        DataType::Float64
                    };
                    Column::new(spec.alias(), dt).nullable(true)
                }
                AggregateFunc::Avg => {
                    require_numeric(spec, input_type)?;
                    Column::new(spec.alias(), DataType::Float64).nullable(true)
                }
                AggregateFunc::Min | AggregateFunc::Max => {
                    let it = input_type.ok_or_else(|| Error::column_not_found(spec.alias()))?;
                    Column::new(spec.alias(), it).nullable(true)
                }
            };

            columns.push(output);
            aggregates.push(BoundAggregate {
                func: spec.func(),
                column,
                input_type,
            });
        }

        let schema = Schema::new(columns)?;
        let having = match having {
            Some(predicate) => Some(predicate.bind(&schema)?),
            None => None,
        };

        Ok(Self {
            group_indices,
            aggregates,
            having,
            schema,
        })
    }

    /// Returns the output schema.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Groups and aggregates the input relation.
    pub fn execute(&self, input: Relation) -> Relation {
        let mut slots: HashMap<Vec<Value>, usize> = HashMap::new();
        let mut keys: Vec<Vec<Value>> = Vec::new();
        let mut groups: Vec<Vec<Row>> = Vec::new();

        if self.group_indices.is_empty() {
            // Global aggregation: one group even over an empty input
            keys.push(Vec::new());
            groups.push(input.into_rows());
        } else {
            for row in input.into_rows() {
                let key: Vec<Value> = self
                    .group_indices
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or(Value::Null))
                    .collect();
                let slot = *slots.entry(key.clone()).or_insert_with(|| {
                    keys.push(key);
                    groups.push(Vec::new());
                    groups.len() - 1
                });
                groups[slot].push(row);
            }
        }

        let mut rows = Vec::with_capacity(groups.len());
        for (key, group) in keys.into_iter().zip(&groups) {
            let mut values = key;
            for aggregate in &self.aggregates {
                values.push(aggregate.compute(group));
            }
            let row = Row::new(values);
            let keep = self
                .having
                .as_ref()
                .map(|h| h.eval(&row))
                .unwrap_or(true);
            if keep {
                rows.push(row);
            }
        }

        Relation::new_unchecked(self.schema.clone(), rows)
    }
}

fn require_numeric(spec: &AggregateSpec, input_type: Option<DataType>) -> Result<DataType> {
    let it = input_type.ok_or_else(|| Error::column_not_found(spec.alias()))?;
    if !it.is_numeric() {
        return Err(Error::type_mismatch(
            spec.column().unwrap_or_default(),
            DataType::Float64,
            it,
        ));
    }
    Ok(it)
}

impl BoundAggregate {
    fn compute(&self, rows: &[Row]) -> Value {
        match (self.func, self.column) {
            (AggregateFunc::Count, None) => Value::Int64(rows.len() as i64),
            (AggregateFunc::Count, Some(idx)) => {
                let n = rows
                    .iter()
                    .filter(|r| r.get(idx).is_some_and(|v| !v.is_null()))
                    .count();
                Value::Int64(n as i64)
            }
            (AggregateFunc::Sum, Some(idx)) => self.sum(rows, idx),
            (AggregateFunc::Avg, Some(idx)) => {
                let mut total = 0.0;
                let mut count = 0usize;
                for row in rows {
                    if let Some(v) = row.get(idx).and_then(Value::as_f64_lossy) {
                        total += v;
                        count += 1;
                    }
                }
                if count == 0 {
                    Value::Null
                } else {
                    Value::Float64(total / count as f64)
                }
            }
            (AggregateFunc::Min, Some(idx)) => extremum(rows, idx, core::cmp::Ordering::Less),
            (AggregateFunc::Max, Some(idx)) => extremum(rows, idx, core::cmp::Ordering::Greater),
            // Constructors pair every other function with a column
            _ => Value::Null,
        }
    }

    fn sum(&self, rows: &[Row], idx: usize) -> Value {
        if self.input_type.is_some_and(|dt| dt.is_integer()) {
            let mut total = 0i64;
            let mut seen = false;
            for row in rows {
                if let Some(v) = row.get(idx).and_then(Value::as_i64_widened) {
                    // Integer sums saturate at the i64 bounds instead of
                    // wrapping or panicking
                    total = total.saturating_add(v);
                    seen = true;
                }
            }
            if seen {
                Value::Int64(total)
            } else {
                Value::Null
            }
        } else {
            let mut total = 0.0;
            let mut seen = false;
            for row in rows {
                if let Some(v) = row.get(idx).and_then(Value::as_f64_lossy) {
                    total += v;
                    seen = true;
                }
            }
            if seen {
                Value::Float64(total)
            } else {
                Value::Null
            }
        }
    }
}

fn extremum(rows: &[Row], idx: usize, keep: core::cmp::Ordering) -> Value {
    let mut best: Option<&Value> = None;
    for row in rows {
        if let Some(v) = row.get(idx).filter(|v| !v.is_null()) {
            match best {
                Some(b) if v.cmp(b) != keep => {}
                _ => best = Some(v),
            }
        }
    }
    best.cloned().unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sales() -> Relation {
        let schema = Schema::new(vec![
            Column::new("region", DataType::String),
            Column::new("amount", DataType::Int64).nullable(true),
        ])
        .unwrap();
        Relation::new(
            schema,
            vec![
                Row::new(vec![Value::from("west"), Value::Int64(100)]),
                Row::new(vec![Value::from("east"), Value::Int64(50)]),
                Row::new(vec![Value::from("west"), Value::Null]),
                Row::new(vec![Value::from("west"), Value::Int64(30)]),
                Row::new(vec![Value::from("east"), Value::Int64(75)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_group_discovery_order() {
        let input = sales();
        let executor = AggregateExecutor::bind(
            input.schema(),
            &["region".into()],
            &[AggregateSpec::count_star("n")],
            None,
        )
        .unwrap();
        let result = executor.execute(input);

        assert_eq!(result.len(), 2);
        assert_eq!(result.rows()[0].get(0), Some(&Value::from("west")));
        assert_eq!(result.rows()[0].get(1), Some(&Value::Int64(3)));
        assert_eq!(result.rows()[1].get(0), Some(&Value::from("east")));
        assert_eq!(result.rows()[1].get(1), Some(&Value::Int64(2)));
    }

    #[test]
    fn test_count_column_skips_nulls() {
        let input = sales();
        let executor = AggregateExecutor::bind(
            input.schema(),
            &["region".into()],
            &[AggregateSpec::count("amount", "n")],
            None,
        )
        .unwrap();
        let result = executor.execute(input);
        assert_eq!(result.rows()[0].get(1), Some(&Value::Int64(2)));
    }

    #[test]
    fn test_sum_avg_min_max() {
        let input = sales();
        let executor = AggregateExecutor::bind(
            input.schema(),
            &["region".into()],
            &[
                AggregateSpec::sum("amount", "total"),
                AggregateSpec::avg("amount", "mean"),
                AggregateSpec::min("amount", "low"),
                AggregateSpec::max("amount", "high"),
            ],
            None,
        )
        .unwrap();
        let result = executor.execute(input);

        let west = &result.rows()[0];
        assert_eq!(west.get(1), Some(&Value::Int64(130)));
        assert_eq!(west.get(2), Some(&Value::Float64(65.0)));
        assert_eq!(west.get(3), Some(&Value::Int64(30)));
        assert_eq!(west.get(4), Some(&Value::Int64(100)));
    }

    #[test]
    fn test_all_null_group_yields_null() {
        let schema = Schema::new(vec![
            Column::new("k", DataType::Int64),
            Column::new("v", DataType::Int64).nullable(true),
        ])
        .unwrap();
        let input = Relation::new(
            schema,
            vec![Row::new(vec![Value::Int64(1), Value::Null])],
        )
        .unwrap();

        let executor = AggregateExecutor::bind(
            input.schema(),
            &["k".into()],
            &[
                AggregateSpec::sum("v", "s"),
                AggregateSpec::avg("v", "a"),
                AggregateSpec::min("v", "lo"),
                AggregateSpec::count("v", "n"),
            ],
            None,
        )
        .unwrap();
        let result = executor.execute(input);

        let row = &result.rows()[0];
        assert_eq!(row.get(1), Some(&Value::Null));
        assert_eq!(row.get(2), Some(&Value::Null));
        assert_eq!(row.get(3), Some(&Value::Null));
        assert_eq!(row.get(4), Some(&Value::Int64(0)));
    }

    #[test]
    fn test_sum_saturates_at_i64_bounds() {
        let schema = Schema::new(vec![Column::new("v", DataType::Int64)]).unwrap();
        let input = Relation::new(
            schema,
            vec![
                Row::new(vec![Value::Int64(i64::MAX)]),
                Row::new(vec![Value::Int64(1)]),
            ],
        )
        .unwrap();

        let executor = AggregateExecutor::bind(
            input.schema(),
            &[],
            &[AggregateSpec::sum("v", "total")],
            None,
        )
        .unwrap();
        let result = executor.execute(input);
        assert_eq!(result.rows()[0].get(0), Some(&Value::Int64(i64::MAX)));
    }

    #[test]
    fn test_global_aggregation_on_empty_input() {
        let schema = Schema::new(vec![Column::new("v", DataType::Int64)]).unwrap();
        let input = Relation::empty(schema);

        let executor = AggregateExecutor::bind(
            input.schema(),
            &[],
            &[
                AggregateSpec::count_star("n"),
                AggregateSpec::sum("v", "total"),
            ],
            None,
        )
        .unwrap();
        let result = executor.execute(input);

        assert_eq!(result.len(), 1);
        assert_eq!(result.rows()[0].get(0), Some(&Value::Int64(0)));
        assert_eq!(result.rows()[0].get(1), Some(&Value::Null));
    }

    #[test]
    fn test_having_filters_groups() {
        let input = sales();
        let executor = AggregateExecutor::bind(
            input.schema(),
            &["region".into()],
            &[AggregateSpec::sum("amount", "total")],
            Some(&Predicate::gt("total", Value::Int64(126))),
        )
        .unwrap();
        let result = executor.execute(input);

        assert_eq!(result.len(), 1);
        assert_eq!(result.rows()[0].get(0), Some(&Value::from("west")));
    }

    #[test]
    fn test_having_binds_output_schema_only() {
        let input = sales();
        // "amount" exists on the input but not on the grouped output
        let result = AggregateExecutor::bind(
            input.schema(),
            &["region".into()],
            &[AggregateSpec::sum("amount", "total")],
            Some(&Predicate::gt("amount", Value::Int64(0))),
        );
        assert!(matches!(result, Err(Error::ColumnNotFound { .. })));
    }

    #[test]
    fn test_sum_rejects_non_numeric() {
        let input = sales();
        let result = AggregateExecutor::bind(
            input.schema(),
            &[],
            &[AggregateSpec::sum("region", "total")],
            None,
        );
        assert!(matches!(result, Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_signed_zero_keys_group_together() {
        let schema = Schema::new(vec![Column::new("k", DataType::Float64)]).unwrap();
        let input = Relation::new(
            schema,
            vec![
                Row::new(vec![Value::Float64(0.0)]),
                Row::new(vec![Value::Float64(-0.0)]),
            ],
        )
        .unwrap();

        let executor = AggregateExecutor::bind(
            input.schema(),
            &["k".into()],
            &[AggregateSpec::count_star("n")],
            None,
        )
        .unwrap();
        let result = executor.execute(input);

        assert_eq!(result.len(), 1);
        assert_eq!(result.rows()[0].get(1), Some(&Value::Int64(2)));
    }

    #[test]
    fn test_null_group_keys_group_together() {
        let schema = Schema::new(vec![
            Column::new("k", DataType::Int64).nullable(true),
            Column::new("v", DataType::Int64),
        ])
        .unwrap();
        let input = Relation::new(
            schema,
            vec![
                Row::new(vec![Value::Null, Value::Int64(1)]),
                Row::new(vec![Value::Int64(1), Value::Int64(2)]),
                Row::new(vec![Value::Null, Value::Int64(3)]),
            ],
        )
        .unwrap();

        let executor = AggregateExecutor::bind(
            input.schema(),
            &["k".into()],
            &[AggregateSpec::count_star("n")],
            None,
        )
        .unwrap();
        let result = executor.execute(input);

        assert_eq!(result.len(), 2);
        assert_eq!(result.rows()[0].get(1), Some(&Value::Int64(2)));
    }
}
