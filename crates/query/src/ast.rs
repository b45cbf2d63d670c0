//! Predicate trees and the comparison/sort/aggregate vocabulary.
//!
//! Predicates reference columns by name. `Predicate::bind` resolves every
//! name against a concrete schema and type-checks comparisons, so malformed
//! plans fail before any row is touched; the resulting `BoundPredicate`
//! evaluates by column position only.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use relq_core::{Error, Result, Row, Schema, Value};

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// All six operators share one numeric-aware ordering, so
    /// `v = 1.0` and `v <= 1.0` agree on an integer column.
    fn eval(&self, left: &Value, right: &Value) -> bool {
        let ordering = left.cmp(right);
        match self {
            CmpOp::Eq => ordering == Ordering::Equal,
            CmpOp::Ne => ordering != Ordering::Equal,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Le => ordering != Ordering::Greater,
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::Ge => ordering != Ordering::Less,
        }
    }
}

/// Sort order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Aggregate functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

/// One side of a comparison: a named column or a literal value.
#[derive(Clone, Debug)]
pub enum Operand {
    Column(String),
    Literal(Value),
}

impl Operand {
    /// Creates a column operand.
    pub fn column(name: impl Into<String>) -> Self {
        Operand::Column(name.into())
    }

    /// Creates a literal operand.
    pub fn lit(value: impl Into<Value>) -> Self {
        Operand::Literal(value.into())
    }
}

impl From<&str> for Operand {
    fn from(name: &str) -> Self {
        Operand::Column(name.into())
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Literal(value)
    }
}

/// A predicate over rows, built from comparisons, null tests, and logical
/// combinators.
///
/// Comparisons involving a null value are false unless the node is an
/// explicit null test; there is no implicit null-equals-null.
#[derive(Clone, Debug)]
pub enum Predicate {
    /// Comparison between two operands.
    Compare {
        left: Operand,
        op: CmpOp,
        right: Operand,
    },
    /// True iff the named column is null.
    IsNull(String),
    /// True iff the named column is not null.
    IsNotNull(String),
    /// True iff all children are true.
    And(Vec<Predicate>),
    /// True iff any child is true.
    Or(Vec<Predicate>),
    /// Logical negation.
    Not(Box<Predicate>),
}

impl Predicate {
    /// Creates a comparison predicate.
    pub fn compare(left: impl Into<Operand>, op: CmpOp, right: impl Into<Operand>) -> Self {
        Predicate::Compare {
            left: left.into(),
            op,
            right: right.into(),
        }
    }

    /// Creates an equality predicate.
    pub fn eq(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(left, CmpOp::Eq, right)
    }

    /// Creates a not-equal predicate.
    pub fn ne(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(left, CmpOp::Ne, right)
    }

    /// Creates a less-than predicate.
    pub fn lt(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(left, CmpOp::Lt, right)
    }

    /// Creates a less-than-or-equal predicate.
    pub fn le(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(left, CmpOp::Le, right)
    }

    /// Creates a greater-than predicate.
    pub fn gt(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(left, CmpOp::Gt, right)
    }

    /// Creates a greater-than-or-equal predicate.
    pub fn ge(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(left, CmpOp::Ge, right)
    }

    /// Creates an IS NULL predicate.
    pub fn is_null(column: impl Into<String>) -> Self {
        Predicate::IsNull(column.into())
    }

    /// Creates an IS NOT NULL predicate.
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Predicate::IsNotNull(column.into())
    }

    /// Creates an AND predicate.
    pub fn and(children: Vec<Predicate>) -> Self {
        Predicate::And(children)
    }

    /// Creates an OR predicate.
    pub fn or(children: Vec<Predicate>) -> Self {
        Predicate::Or(children)
    }

    /// Creates a NOT predicate.
    pub fn not(child: Predicate) -> Self {
        Predicate::Not(Box::new(child))
    }

    /// Binds column names to positions in `schema` and type-checks
    /// comparisons. All schema errors surface here, never during row
    /// evaluation.
    pub fn bind(&self, schema: &Schema) -> Result<BoundPredicate> {
        Ok(BoundPredicate {
            node: bind_node(self, schema)?,
        })
    }
}

/// A bound operand referencing columns by position.
#[derive(Clone, Debug)]
enum BoundOperand {
    Column(usize),
    Literal(Value),
}

impl BoundOperand {
    fn resolve<'a>(&'a self, get: &impl Fn(usize) -> Option<&'a Value>) -> Option<&'a Value> {
        match self {
            BoundOperand::Column(idx) => get(*idx),
            BoundOperand::Literal(v) => Some(v),
        }
    }
}

#[derive(Clone, Debug)]
enum BoundNode {
    Compare {
        left: BoundOperand,
        op: CmpOp,
        right: BoundOperand,
    },
    IsNull(usize),
    IsNotNull(usize),
    And(Vec<BoundNode>),
    Or(Vec<BoundNode>),
    Not(Box<BoundNode>),
}

/// A predicate with every column reference resolved to a position.
#[derive(Clone, Debug)]
pub struct BoundPredicate {
    node: BoundNode,
}

impl BoundPredicate {
    /// Evaluates the predicate against a single row.
    pub fn eval(&self, row: &Row) -> bool {
        eval_node(&self.node, &|idx| row.get(idx))
    }

    /// Evaluates the predicate against a (left, right) row pair, as if the
    /// two rows were concatenated. Positions below `left.len()` read the
    /// left row, the rest read the right row.
    pub fn eval_pair(&self, left: &Row, right: &Row) -> bool {
        let split = left.len();
        eval_node(&self.node, &|idx| {
            if idx < split {
                left.get(idx)
            } else {
                right.get(idx - split)
            }
        })
    }

    /// If this predicate is a single `left-column = right-column` equality
    /// across the `split` boundary, returns the (left index, right-relative
    /// index) pair. Join execution uses this to take the hash path; it is
    /// an optimization only.
    pub fn equi_keys(&self, split: usize) -> Option<(usize, usize)> {
        match &self.node {
            BoundNode::Compare {
                left: BoundOperand::Column(a),
                op: CmpOp::Eq,
                right: BoundOperand::Column(b),
            } => {
                if *a < split && *b >= split {
                    Some((*a, *b - split))
                } else if *b < split && *a >= split {
                    Some((*b, *a - split))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

fn bind_operand(operand: &Operand, schema: &Schema) -> Result<BoundOperand> {
    match operand {
        Operand::Column(name) => Ok(BoundOperand::Column(schema.index_of(name)?)),
        Operand::Literal(value) => Ok(BoundOperand::Literal(value.clone())),
    }
}

/// Returns the declared type of an operand, None for null literals.
fn operand_type(operand: &Operand, schema: &Schema) -> Result<Option<relq_core::DataType>> {
    match operand {
        Operand::Column(name) => {
            let idx = schema.index_of(name)?;
            Ok(schema.column_at(idx).map(|c| c.data_type()))
        }
        Operand::Literal(value) => Ok(value.data_type()),
    }
}

fn check_comparable(left: &Operand, right: &Operand, schema: &Schema) -> Result<()> {
    let lt = operand_type(left, schema)?;
    let rt = operand_type(right, schema)?;
    if let (Some(lt), Some(rt)) = (lt, rt) {
        let compatible = lt == rt || (lt.is_numeric() && rt.is_numeric());
        if !compatible {
            let column = match (left, right) {
                (Operand::Column(name), _) | (_, Operand::Column(name)) => name.clone(),
                _ => String::new(),
            };
            return Err(Error::type_mismatch(column, lt, rt));
        }
    }
    Ok(())
}

fn bind_node(predicate: &Predicate, schema: &Schema) -> Result<BoundNode> {
    match predicate {
        Predicate::Compare { left, op, right } => {
            check_comparable(left, right, schema)?;
            Ok(BoundNode::Compare {
                left: bind_operand(left, schema)?,
                op: *op,
                right: bind_operand(right, schema)?,
            })
        }
        Predicate::IsNull(name) => Ok(BoundNode::IsNull(schema.index_of(name)?)),
        Predicate::IsNotNull(name) => Ok(BoundNode::IsNotNull(schema.index_of(name)?)),
        Predicate::And(children) => Ok(BoundNode::And(
            children
                .iter()
                .map(|c| bind_node(c, schema))
                .collect::<Result<Vec<_>>>()?,
        )),
        Predicate::Or(children) => Ok(BoundNode::Or(
            children
                .iter()
                .map(|c| bind_node(c, schema))
                .collect::<Result<Vec<_>>>()?,
        )),
        Predicate::Not(child) => Ok(BoundNode::Not(Box::new(bind_node(child, schema)?))),
    }
}

fn eval_node<'a>(node: &'a BoundNode, get: &impl Fn(usize) -> Option<&'a Value>) -> bool {
    match node {
        BoundNode::Compare { left, op, right } => {
            let (lv, rv) = match (left.resolve(get), right.resolve(get)) {
                (Some(l), Some(r)) => (l, r),
                _ => return false,
            };
            // Null never matches a comparison, including null vs null
            if lv.is_null() || rv.is_null() {
                return false;
            }
            op.eval(lv, rv)
        }
        BoundNode::IsNull(idx) => get(*idx).map(|v| v.is_null()).unwrap_or(true),
        BoundNode::IsNotNull(idx) => get(*idx).map(|v| !v.is_null()).unwrap_or(false),
        BoundNode::And(children) => children.iter().all(|c| eval_node(c, get)),
        BoundNode::Or(children) => children.iter().any(|c| eval_node(c, get)),
        BoundNode::Not(child) => !eval_node(child, get),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use relq_core::{Column, DataType};

    fn schema() -> Schema {
        Schema::new(vec![
            Column::new("id", DataType::Int64),
            Column::new("name", DataType::String).nullable(true),
            Column::new("age", DataType::Int64).nullable(true),
        ])
        .unwrap()
    }

    #[test]
    fn test_compare_column_literal() {
        let pred = Predicate::gt("age", Value::Int64(18)).bind(&schema()).unwrap();

        let adult = Row::new(vec![Value::Int64(1), Value::Null, Value::Int64(30)]);
        let minor = Row::new(vec![Value::Int64(2), Value::Null, Value::Int64(10)]);

        assert!(pred.eval(&adult));
        assert!(!pred.eval(&minor));
    }

    #[test]
    fn test_null_never_matches() {
        let s = schema();
        let eq = Predicate::eq("age", Value::Int64(30)).bind(&s).unwrap();
        let ne = Predicate::ne("age", Value::Int64(30)).bind(&s).unwrap();
        let null_lit = Predicate::eq("age", Value::Null).bind(&s).unwrap();

        let row = Row::new(vec![Value::Int64(1), Value::Null, Value::Null]);
        assert!(!eq.eval(&row));
        assert!(!ne.eval(&row));
        assert!(!null_lit.eval(&row));
    }

    #[test]
    fn test_explicit_null_tests() {
        let s = schema();
        let is_null = Predicate::is_null("name").bind(&s).unwrap();
        let not_null = Predicate::is_not_null("name").bind(&s).unwrap();

        let anon = Row::new(vec![Value::Int64(1), Value::Null, Value::Null]);
        let named = Row::new(vec![Value::Int64(2), Value::String("Bo".into()), Value::Null]);

        assert!(is_null.eval(&anon));
        assert!(!is_null.eval(&named));
        assert!(not_null.eval(&named));
        assert!(!not_null.eval(&anon));
    }

    #[test]
    fn test_logical_combinators() {
        let s = schema();
        let pred = Predicate::and(vec![
            Predicate::ge("age", Value::Int64(18)),
            Predicate::not(Predicate::eq("id", Value::Int64(2))),
        ])
        .bind(&s)
        .unwrap();

        let keep = Row::new(vec![Value::Int64(1), Value::Null, Value::Int64(20)]);
        let drop = Row::new(vec![Value::Int64(2), Value::Null, Value::Int64(20)]);

        assert!(pred.eval(&keep));
        assert!(!pred.eval(&drop));
    }

    #[test]
    fn test_bind_unknown_column() {
        let result = Predicate::eq("missing", Value::Int64(1)).bind(&schema());
        assert!(matches!(result, Err(Error::ColumnNotFound { .. })));
    }

    #[test]
    fn test_bind_type_mismatch() {
        let result = Predicate::eq("age", Value::String("old".into())).bind(&schema());
        assert!(matches!(result, Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_numeric_widening_allowed() {
        let s = Schema::new(vec![Column::new("score", DataType::Float64)]).unwrap();
        let pred = Predicate::gt("score", Value::Int64(10)).bind(&s).unwrap();
        assert!(pred.eval(&Row::new(vec![Value::Float64(10.5)])));
    }

    #[test]
    fn test_mixed_numeric_operators_agree() {
        let s = Schema::new(vec![Column::new("v", DataType::Int64)]).unwrap();
        let row = Row::new(vec![Value::Int64(1)]);

        // An integer equal to a float literal satisfies eq, le, and ge alike
        let eq = Predicate::eq("v", Value::Float64(1.0)).bind(&s).unwrap();
        let le = Predicate::le("v", Value::Float64(1.0)).bind(&s).unwrap();
        let ge = Predicate::ge("v", Value::Float64(1.0)).bind(&s).unwrap();
        let ne = Predicate::ne("v", Value::Float64(1.0)).bind(&s).unwrap();
        assert!(eq.eval(&row));
        assert!(le.eval(&row));
        assert!(ge.eval(&row));
        assert!(!ne.eval(&row));

        let lt = Predicate::lt("v", Value::Float64(1.5)).bind(&s).unwrap();
        let gt = Predicate::gt("v", Value::Float64(0.5)).bind(&s).unwrap();
        assert!(lt.eval(&row));
        assert!(gt.eval(&row));
    }

    #[test]
    fn test_eval_pair() {
        let left_schema = Schema::new(vec![Column::new("id", DataType::Int64)]).unwrap();
        let right_schema = Schema::new(vec![Column::new("owner_id", DataType::Int64)]).unwrap();
        let combined = left_schema.join(&right_schema).unwrap();

        let pred = Predicate::eq(
            Operand::column("id"),
            Operand::column("owner_id"),
        )
        .bind(&combined)
        .unwrap();

        let l = Row::new(vec![Value::Int64(7)]);
        let r_match = Row::new(vec![Value::Int64(7)]);
        let r_miss = Row::new(vec![Value::Int64(8)]);

        assert!(pred.eval_pair(&l, &r_match));
        assert!(!pred.eval_pair(&l, &r_miss));
    }

    #[test]
    fn test_equi_keys_detection() {
        let left_schema = Schema::new(vec![
            Column::new("id", DataType::Int64),
            Column::new("name", DataType::String),
        ])
        .unwrap();
        let right_schema = Schema::new(vec![
            Column::new("owner_id", DataType::Int64),
            Column::new("group_id", DataType::Int64),
        ])
        .unwrap();
        let combined = left_schema.join(&right_schema).unwrap();

        let equi = Predicate::eq(Operand::column("id"), Operand::column("owner_id"))
            .bind(&combined)
            .unwrap();
        assert_eq!(equi.equi_keys(2), Some((0, 0)));

        // Reversed operand order resolves to the same key pair
        let reversed = Predicate::eq(Operand::column("owner_id"), Operand::column("id"))
            .bind(&combined)
            .unwrap();
        assert_eq!(reversed.equi_keys(2), Some((0, 0)));

        let range = Predicate::lt(Operand::column("id"), Operand::column("owner_id"))
            .bind(&combined)
            .unwrap();
        assert_eq!(range.equi_keys(2), None);

        // Same-side equality is not a join key
        let same_side = Predicate::eq(Operand::column("owner_id"), Operand::column("group_id"))
            .bind(&combined)
            .unwrap();
        assert_eq!(same_side.equi_keys(2), None);
    }
}
