//! The left-deep plan driver.
//!
//! [`Pipeline::bind`] resolves every stage of a [`QueryPlan`] against the
//! chain of input schemas up front, so all schema errors surface before a
//! single row is processed. Execution then runs the stages in fixed order:
//! joins, filter, grouping, having, sort, pagination, projection.

use crate::executor::aggregate::AggregateExecutor;
use crate::executor::filter::FilterExecutor;
use crate::executor::join::JoinExecutor;
use crate::executor::limit::LimitExecutor;
use crate::executor::project::ProjectExecutor;
use crate::executor::relation::Relation;
use crate::executor::sort::SortExecutor;
use crate::plan::QueryPlan;
use alloc::vec::Vec;
use relq_core::{Error, Result, Schema};

/// A fully bound query plan, ready to execute.
pub struct Pipeline {
    joins: Vec<JoinExecutor>,
    filter: Option<FilterExecutor>,
    aggregate: Option<AggregateExecutor>,
    /// Having bound as a plain filter when no grouping stage exists.
    having: Option<FilterExecutor>,
    sort: Option<SortExecutor>,
    limit: LimitExecutor,
    project: Option<ProjectExecutor>,
    schema: Schema,
}

impl Pipeline {
    /// Binds a plan against the base schema and one schema per join step.
    pub fn bind(plan: &QueryPlan, base: &Schema, inputs: &[&Schema]) -> Result<Self> {
        if inputs.len() != plan.joins.len() {
            return Err(Error::arity_mismatch(plan.joins.len(), inputs.len()));
        }

        let mut schema = base.clone();
        let mut joins = Vec::with_capacity(plan.joins.len());
        for (spec, input) in plan.joins.iter().zip(inputs) {
            let executor = JoinExecutor::bind(spec, &schema, input)?;
            schema = executor.schema().clone();
            joins.push(executor);
        }

        let filter = match &plan.filter {
            Some(predicate) => Some(FilterExecutor::bind(predicate, &schema)?),
            None => None,
        };

        let (aggregate, having) = match &plan.group {
            Some(group) => {
                let executor = AggregateExecutor::bind(
                    &schema,
                    &group.group_by,
                    &group.aggregates,
                    plan.having.as_ref(),
                )?;
                schema = executor.schema().clone();
                (Some(executor), None)
            }
            None => {
                let having = match &plan.having {
                    Some(predicate) => Some(FilterExecutor::bind(predicate, &schema)?),
                    None => None,
                };
                (None, having)
            }
        };

        let sort = if plan.sort.is_empty() {
            None
        } else {
            Some(SortExecutor::bind(&plan.sort, &schema)?)
        };

        let limit = LimitExecutor::new(plan.page()?);

        let project = match &plan.projection {
            Some(columns) => {
                let executor = ProjectExecutor::bind(columns, &schema)?;
                schema = executor.schema().clone();
                Some(executor)
            }
            None => None,
        };

        Ok(Self {
            joins,
            filter,
            aggregate,
            having,
            sort,
            limit,
            project,
            schema,
        })
    }

    /// Returns the final output schema.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Executes the bound pipeline over the base relation and one relation
    /// per join step.
    pub fn execute(&self, base: Relation, inputs: &[Relation]) -> Result<Relation> {
        if inputs.len() != self.joins.len() {
            return Err(Error::arity_mismatch(self.joins.len(), inputs.len()));
        }

        let mut current = base;
        for (executor, input) in self.joins.iter().zip(inputs) {
            current = executor.execute(&current, input);
        }
        if let Some(filter) = &self.filter {
            current = filter.execute(current);
        }
        if let Some(aggregate) = &self.aggregate {
            current = aggregate.execute(current);
        }
        if let Some(having) = &self.having {
            current = having.execute(current);
        }
        if let Some(sort) = &self.sort {
            current = sort.execute(current);
        }
        current = self.limit.execute(current);
        if let Some(project) = &self.project {
            current = project.execute(current);
        }
        Ok(current)
    }

    /// Binds and executes a plan in one step.
    pub fn run(plan: &QueryPlan, base: Relation, inputs: &[Relation]) -> Result<Relation> {
        let schemas: Vec<&Schema> = inputs.iter().map(Relation::schema).collect();
        let pipeline = Self::bind(plan, base.schema(), &schemas)?;
        pipeline.execute(base, inputs)
    }
}
