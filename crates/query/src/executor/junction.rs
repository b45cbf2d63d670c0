//! Many-to-many resolution through a junction relation.
//!
//! A junction holds (left key, right key) pairs referencing two parent
//! relations. The resolver owns the junction rows and is the only mutable
//! surface in the engine: `associate` and `dissociate` edit pairs under
//! foreign key and uniqueness checks, and `related_to` answers traversal
//! queries by composing the filter, join, and project operators over the
//! junction and the opposite parent.

use crate::ast::{Operand, Predicate};
use crate::executor::filter::FilterExecutor;
use crate::executor::join::JoinExecutor;
use crate::executor::project::ProjectExecutor;
use crate::executor::relation::Relation;
use crate::plan::JoinSpec;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use relq_core::{Error, Result, Row, Schema, Value};

/// Which side of the junction a key belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

struct ParentBinding<'a> {
    relation: &'a Relation,
    /// Primary key position in the parent schema.
    key: usize,
    /// Role name used in foreign key violation messages.
    role: &'static str,
}

impl ParentBinding<'_> {
    fn contains(&self, key: &Value) -> bool {
        if key.is_null() {
            return false;
        }
        self.relation
            .rows()
            .iter()
            .any(|row| row.get(self.key) == Some(key))
    }
}

/// A bound junction between two parent relations.
pub struct JunctionResolver<'a> {
    schema: Schema,
    rows: Vec<Row>,
    left_fk: usize,
    right_fk: usize,
    left: ParentBinding<'a>,
    right: ParentBinding<'a>,
}

impl<'a> JunctionResolver<'a> {
    /// Binds a junction relation to its two parents.
    ///
    /// The junction schema must consist of exactly the two foreign key
    /// columns, each matching the type of its parent's key column. Any
    /// pre-existing junction rows are checked for foreign key integrity
    /// and pair uniqueness.
    pub fn bind(
        junction: Relation,
        left_fk: &str,
        left_parent: &'a Relation,
        left_key: &str,
        right_fk: &str,
        right_parent: &'a Relation,
        right_key: &str,
    ) -> Result<Self> {
        let schema = junction.schema().clone();
        if schema.len() != 2 {
            return Err(Error::arity_mismatch(2, schema.len()));
        }

        let left_fk = schema.index_of(left_fk)?;
        let right_fk = schema.index_of(right_fk)?;
        if left_fk == right_fk {
            return Err(Error::duplicate_column(schema.columns()[left_fk].name()));
        }
        let left = ParentBinding {
            relation: left_parent,
            key: left_parent.schema().index_of(left_key)?,
            role: "left parent",
        };
        let right = ParentBinding {
            relation: right_parent,
            key: right_parent.schema().index_of(right_key)?,
            role: "right parent",
        };

        check_key_type(&schema, left_fk, left_parent.schema(), left.key)?;
        check_key_type(&schema, right_fk, right_parent.schema(), right.key)?;

        let mut resolver = Self {
            schema,
            rows: Vec::new(),
            left_fk,
            right_fk,
            left,
            right,
        };
        for row in junction.into_rows() {
            let left_key = row.get(left_fk).cloned().unwrap_or(Value::Null);
            let right_key = row.get(right_fk).cloned().unwrap_or(Value::Null);
            resolver.associate(left_key, right_key)?;
        }
        Ok(resolver)
    }

    /// Returns the junction schema.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the association pairs in insertion order.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of associations.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no associations exist.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Adds an association pair.
    ///
    /// Fails if either key is absent from its parent, or if the pair
    /// already exists. A null key never matches a parent row.
    pub fn associate(&mut self, left_key: Value, right_key: Value) -> Result<()> {
        if !self.left.contains(&left_key) {
            return Err(Error::foreign_key_violation(self.left.role, left_key));
        }
        if !self.right.contains(&right_key) {
            return Err(Error::foreign_key_violation(self.right.role, right_key));
        }
        if self.find(&left_key, &right_key).is_some() {
            return Err(Error::duplicate_association(left_key, right_key));
        }

        let mut values = vec![Value::Null; 2];
        values[self.left_fk] = left_key;
        values[self.right_fk] = right_key;
        self.rows.push(Row::new(values));
        Ok(())
    }

    /// Removes an association pair. Returns whether a pair was removed;
    /// removing an absent pair is a no-op.
    pub fn dissociate(&mut self, left_key: &Value, right_key: &Value) -> bool {
        match self.find(left_key, right_key) {
            Some(index) => {
                self.rows.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns the rows of the opposite parent associated with `key`, in
    /// association insertion order, carrying the parent's schema.
    pub fn related_to(&self, side: Side, key: &Value) -> Result<Relation> {
        let (anchor_fk, other_fk, parent) = match side {
            Side::Left => (self.left_fk, self.right_fk, &self.right),
            Side::Right => (self.right_fk, self.left_fk, &self.left),
        };

        let anchor_name = self.schema.columns()[anchor_fk].name();
        let filter = FilterExecutor::bind(
            &Predicate::eq(Operand::column(anchor_name), Operand::lit(key.clone())),
            &self.schema,
        )?;
        let junction = Relation::new_unchecked(self.schema.clone(), self.rows.clone());
        let anchored = filter.execute(junction);

        let other_name = self.schema.columns()[other_fk].name();
        let parent_key_name = parent.relation.schema().columns()[parent.key].name();
        let spec = JoinSpec::inner(Predicate::eq(
            Operand::column(other_name),
            Operand::column(parent_key_name),
        ));
        let join = JoinExecutor::bind(&spec, &self.schema, parent.relation.schema())?;
        let joined = join.execute(&anchored, parent.relation);

        let parent_columns: Vec<String> = parent
            .relation
            .schema()
            .columns()
            .iter()
            .map(|c| c.name().into())
            .collect();
        let project = ProjectExecutor::bind(&parent_columns, joined.schema())?;
        Ok(project.execute(joined))
    }

    fn find(&self, left_key: &Value, right_key: &Value) -> Option<usize> {
        self.rows.iter().position(|row| {
            row.get(self.left_fk) == Some(left_key) && row.get(self.right_fk) == Some(right_key)
        })
    }
}

fn check_key_type(
    junction: &Schema,
    fk: usize,
    parent: &Schema,
    key: usize,
) -> Result<()> {
    let fk_col = &junction.columns()[fk];
    let key_col = &parent.columns()[key];
    if fk_col.data_type() != key_col.data_type() {
        return Err(Error::type_mismatch(
            fk_col.name(),
            key_col.data_type(),
            fk_col.data_type(),
        ));
    }
    Ok(())
}
