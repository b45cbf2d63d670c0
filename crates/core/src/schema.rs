//! Schema definitions for the Relq engine.
//!
//! A schema is an ordered sequence of named, typed, nullability-aware
//! columns. Column names are unique within a schema; every row of a relation
//! conforms positionally to its schema.

use crate::error::{Error, Result};
use crate::row::Row;
use crate::types::DataType;
use alloc::string::String;
use alloc::vec::Vec;

/// A column definition in a schema.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    /// Column name.
    name: String,
    /// Data type of the column.
    data_type: DataType,
    /// Whether this column allows null values.
    nullable: bool,
}

impl Column {
    /// Creates a new non-nullable column definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
        }
    }

    /// Sets whether this column is nullable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Returns a copy of this column under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: self.data_type,
            nullable: self.nullable,
        }
    }

    /// Returns a copy of this column with nullability relaxed.
    /// Outer joins produce null cells even for non-nullable inputs.
    pub fn as_nullable(&self) -> Self {
        self.clone().nullable(true)
    }

    /// Returns the column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the data type.
    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns whether this column is nullable.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// An ordered sequence of columns with unique names.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Creates a new schema, rejecting duplicate column names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name() == col.name()) {
                return Err(Error::duplicate_column(col.name()));
            }
        }
        Ok(Self { columns })
    }

    /// Creates an empty schema.
    pub fn empty() -> Self {
        Self { columns: Vec::new() }
    }

    /// Returns the columns.
    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Gets a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Gets a column by position.
    pub fn column_at(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Resolves a column name to its position.
    ///
    /// This is the single point where unknown column references fail, so
    /// every plan-level name is validated before any row is processed.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| Error::column_not_found(name))
    }

    /// Concatenates two schemas into a join output schema.
    ///
    /// Column collisions are rejected; the caller aliases columns before
    /// joining (e.g. via [`Column::renamed`]).
    pub fn join(&self, other: &Schema) -> Result<Schema> {
        let mut columns = Vec::with_capacity(self.len() + other.len());
        columns.extend(self.columns.iter().cloned());
        columns.extend(other.columns.iter().cloned());
        Schema::new(columns)
    }

    /// Returns a copy of this schema with every column nullable.
    /// Used for the null-filled side of outer joins.
    pub fn as_nullable(&self) -> Schema {
        Schema {
            columns: self.columns.iter().map(|c| c.as_nullable()).collect(),
        }
    }

    /// Validates that a row conforms to this schema.
    ///
    /// Checks arity, per-column value type, and non-null constraints.
    pub fn check_row(&self, row: &Row) -> Result<()> {
        if row.len() != self.len() {
            return Err(Error::arity_mismatch(self.len(), row.len()));
        }

        for (col, value) in self.columns.iter().zip(row.values()) {
            match value.data_type() {
                None => {
                    if !col.is_nullable() {
                        return Err(Error::null_constraint(col.name()));
                    }
                }
                Some(dt) => {
                    if dt != col.data_type() {
                        return Err(Error::type_mismatch(col.name(), col.data_type(), dt));
                    }
                }
            }
        }

        Ok(())
    }
}
