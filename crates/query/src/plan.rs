//! Declarative plan types.
//!
//! A [`QueryPlan`] is a left-deep description of the work to do: a chain of
//! joins over a base relation, followed by filtering, grouping, having,
//! ordering, pagination, and projection. Plans carry column names; nothing
//! is resolved or validated until the executor binds the plan against
//! concrete schemas.

use crate::ast::{AggregateFunc, Predicate, SortOrder};
use alloc::string::String;
use alloc::vec::Vec;
use relq_core::{Error, Result};

/// The kind of a join.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    /// Matched pairs only.
    Inner,
    /// Every left row, null-padded when unmatched.
    Left,
    /// Every right row, null-prefixed when unmatched.
    Right,
    /// Every row from both sides.
    Full,
    /// Cartesian product, no predicate. Output cardinality is
    /// `|left| * |right|`, so cost is unconditionally quadratic.
    Cross,
    /// Left rows with at least one match, left columns only.
    Semi,
    /// Left rows with no match, left columns only.
    Anti,
}

impl JoinKind {
    /// Returns true if the output schema is the left schema alone.
    pub fn is_left_only(&self) -> bool {
        matches!(self, JoinKind::Semi | JoinKind::Anti)
    }
}

/// One join step in a plan: a kind plus an optional ON predicate.
///
/// Only [`JoinSpec::cross`] builds a spec without a predicate; every other
/// constructor requires one.
#[derive(Clone, Debug)]
pub struct JoinSpec {
    kind: JoinKind,
    on: Option<Predicate>,
}

impl JoinSpec {
    /// Creates an inner join spec.
    pub fn inner(on: Predicate) -> Self {
        Self { kind: JoinKind::Inner, on: Some(on) }
    }

    /// Creates a left outer join spec.
    pub fn left(on: Predicate) -> Self {
        Self { kind: JoinKind::Left, on: Some(on) }
    }

    /// Creates a right outer join spec.
    pub fn right(on: Predicate) -> Self {
        Self { kind: JoinKind::Right, on: Some(on) }
    }

    /// Creates a full outer join spec.
    pub fn full(on: Predicate) -> Self {
        Self { kind: JoinKind::Full, on: Some(on) }
    }

    /// Creates a cross join spec.
    pub fn cross() -> Self {
        Self { kind: JoinKind::Cross, on: None }
    }

    /// Creates a semi join spec.
    pub fn semi(on: Predicate) -> Self {
        Self { kind: JoinKind::Semi, on: Some(on) }
    }

    /// Creates an anti join spec.
    pub fn anti(on: Predicate) -> Self {
        Self { kind: JoinKind::Anti, on: Some(on) }
    }

    /// Returns the join kind.
    #[inline]
    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    /// Returns the ON predicate, absent only for cross joins.
    #[inline]
    pub fn on(&self) -> Option<&Predicate> {
        self.on.as_ref()
    }
}

/// One aggregate output column: a function, its input column (absent only
/// for `count(*)`), and the output alias.
#[derive(Clone, Debug)]
pub struct AggregateSpec {
    func: AggregateFunc,
    column: Option<String>,
    alias: String,
}

impl AggregateSpec {
    /// count(*) over all rows in the group, nulls included.
    pub fn count_star(alias: impl Into<String>) -> Self {
        Self {
            func: AggregateFunc::Count,
            column: None,
            alias: alias.into(),
        }
    }

    /// count(column), nulls excluded.
    pub fn count(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            func: AggregateFunc::Count,
            column: Some(column.into()),
            alias: alias.into(),
        }
    }

    /// sum(column) over non-null values.
    pub fn sum(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            func: AggregateFunc::Sum,
            column: Some(column.into()),
            alias: alias.into(),
        }
    }

    /// avg(column) over non-null values.
    pub fn avg(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            func: AggregateFunc::Avg,
            column: Some(column.into()),
            alias: alias.into(),
        }
    }

    /// min(column) over non-null values.
    pub fn min(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            func: AggregateFunc::Min,
            column: Some(column.into()),
            alias: alias.into(),
        }
    }

    /// max(column) over non-null values.
    pub fn max(column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            func: AggregateFunc::Max,
            column: Some(column.into()),
            alias: alias.into(),
        }
    }

    /// Returns the aggregate function.
    #[inline]
    pub fn func(&self) -> AggregateFunc {
        self.func
    }

    /// Returns the input column, absent only for `count(*)`.
    #[inline]
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Returns the output alias.
    #[inline]
    pub fn alias(&self) -> &str {
        &self.alias
    }
}

/// One sort key: a column name and a direction.
#[derive(Clone, Debug)]
pub struct SortKey {
    pub column: String,
    pub order: SortOrder,
}

impl SortKey {
    /// Ascending sort on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Asc,
        }
    }

    /// Descending sort on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Desc,
        }
    }
}

/// Validated pagination: a non-negative offset and an optional non-negative
/// limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Page {
    offset: usize,
    limit: Option<usize>,
}

impl Page {
    /// Builds a page from raw values, rejecting negative ones.
    pub fn new(offset: i64, limit: Option<i64>) -> Result<Self> {
        if offset < 0 || limit.is_some_and(|l| l < 0) {
            return Err(Error::invalid_pagination(limit, offset));
        }
        Ok(Self {
            offset: offset as usize,
            limit: limit.map(|l| l as usize),
        })
    }

    /// Returns the offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the limit, if any.
    #[inline]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns true if this page neither skips nor truncates.
    pub fn is_unbounded(&self) -> bool {
        self.offset == 0 && self.limit.is_none()
    }
}

/// Grouping stage: group-by columns plus aggregate output specs.
#[derive(Clone, Debug)]
pub struct GroupSpec {
    pub group_by: Vec<String>,
    pub aggregates: Vec<AggregateSpec>,
}

/// A left-deep query plan.
///
/// Stage order is fixed: joins, then filter, then grouping, then having,
/// then sort, then pagination, then projection. Stages left unset are
/// skipped.
///
/// # Examples
///
/// ```
/// use relq_query::ast::Predicate;
/// use relq_query::plan::{AggregateSpec, JoinSpec, QueryPlan, SortKey};
///
/// let plan = QueryPlan::new()
///     .join(JoinSpec::left(Predicate::eq("id", "user_id")))
///     .filter(Predicate::is_not_null("amount"))
///     .group_by(vec!["name".into()], vec![AggregateSpec::sum("amount", "total")])
///     .having(Predicate::gt("total", relq_core::Value::Int64(100)))
///     .order_by(vec![SortKey::desc("total")])
///     .limit(10);
/// ```
#[derive(Clone, Debug, Default)]
pub struct QueryPlan {
    pub joins: Vec<JoinSpec>,
    pub filter: Option<Predicate>,
    pub group: Option<GroupSpec>,
    pub having: Option<Predicate>,
    pub sort: Vec<SortKey>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub projection: Option<Vec<String>>,
}

impl QueryPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a join step. Joins apply left to right against the
    /// accumulated relation.
    pub fn join(mut self, spec: JoinSpec) -> Self {
        self.joins.push(spec);
        self
    }

    /// Sets the post-join filter predicate.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(predicate);
        self
    }

    /// Sets the grouping stage. An empty `group_by` collapses the input to
    /// a single group.
    pub fn group_by(mut self, group_by: Vec<String>, aggregates: Vec<AggregateSpec>) -> Self {
        self.group = Some(GroupSpec {
            group_by,
            aggregates,
        });
        self
    }

    /// Sets the having predicate, evaluated over the grouped output schema.
    pub fn having(mut self, predicate: Predicate) -> Self {
        self.having = Some(predicate);
        self
    }

    /// Sets the sort keys. Earlier keys are more significant; the sort is
    /// stable.
    pub fn order_by(mut self, keys: Vec<SortKey>) -> Self {
        self.sort = keys;
        self
    }

    /// Sets the pagination offset. Validated at bind time.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the pagination limit. Validated at bind time.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the final projection column list.
    pub fn project(mut self, columns: Vec<String>) -> Self {
        self.projection = Some(columns);
        self
    }

    /// Validates and materializes the pagination stage.
    pub fn page(&self) -> Result<Page> {
        Page::new(self.offset.unwrap_or(0), self.limit)
    }
}
