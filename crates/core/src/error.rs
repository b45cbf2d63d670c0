//! Error types for the Relq engine.

use crate::types::DataType;
use crate::value::Value;
use alloc::string::String;
use core::fmt;

/// Result type alias for Relq operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for plan building and junction mutation.
///
/// The first five variants are schema errors: they are raised while binding
/// a plan against concrete schemas, before any row is processed. The
/// remaining variants come from junction mutation and pagination validation.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A referenced column does not exist.
    ColumnNotFound {
        column: String,
    },
    /// A schema would contain two columns with the same name.
    DuplicateColumn {
        column: String,
    },
    /// A value's type does not match its column.
    TypeMismatch {
        column: String,
        expected: DataType,
        got: DataType,
    },
    /// A null value in a non-nullable column.
    NullConstraint {
        column: String,
    },
    /// A row's length does not match its schema.
    ArityMismatch {
        expected: usize,
        got: usize,
    },
    /// An association references a key absent from a parent relation.
    ForeignKeyViolation {
        parent: String,
        key: Value,
    },
    /// An association pair already exists in the junction.
    DuplicateAssociation {
        left_key: Value,
        right_key: Value,
    },
    /// Negative limit or offset. `limit` is absent for unbounded plans.
    InvalidPagination {
        limit: Option<i64>,
        offset: i64,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ColumnNotFound { column } => {
                write!(f, "Column not found: {}", column)
            }
            Error::DuplicateColumn { column } => {
                write!(f, "Duplicate column name: {}", column)
            }
            Error::TypeMismatch {
                column,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Type mismatch on column {}: expected {:?}, got {:?}",
                    column, expected, got
                )
            }
            Error::NullConstraint { column } => {
                write!(f, "Null constraint violation on column: {}", column)
            }
            Error::ArityMismatch { expected, got } => {
                write!(f, "Row arity mismatch: expected {}, got {}", expected, got)
            }
            Error::ForeignKeyViolation { parent, key } => {
                write!(
                    f,
                    "Foreign key violation: key {:?} does not exist in {}",
                    key, parent
                )
            }
            Error::DuplicateAssociation { left_key, right_key } => {
                write!(
                    f,
                    "Association ({:?}, {:?}) already exists",
                    left_key, right_key
                )
            }
            Error::InvalidPagination { limit, offset } => match limit {
                Some(limit) => write!(
                    f,
                    "Invalid pagination: limit {} / offset {} must be non-negative",
                    limit, offset
                ),
                None => write!(
                    f,
                    "Invalid pagination: offset {} must be non-negative",
                    offset
                ),
            },
        }
    }
}

impl Error {
    /// Creates a column not found error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Error::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Creates a duplicate column error.
    pub fn duplicate_column(column: impl Into<String>) -> Self {
        Error::DuplicateColumn {
            column: column.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(column: impl Into<String>, expected: DataType, got: DataType) -> Self {
        Error::TypeMismatch {
            column: column.into(),
            expected,
            got,
        }
    }

    /// Creates a null constraint error.
    pub fn null_constraint(column: impl Into<String>) -> Self {
        Error::NullConstraint {
            column: column.into(),
        }
    }

    /// Creates an arity mismatch error.
    pub fn arity_mismatch(expected: usize, got: usize) -> Self {
        Error::ArityMismatch { expected, got }
    }

    /// Creates a foreign key violation error.
    pub fn foreign_key_violation(parent: impl Into<String>, key: Value) -> Self {
        Error::ForeignKeyViolation {
            parent: parent.into(),
            key,
        }
    }

    /// Creates a duplicate association error.
    pub fn duplicate_association(left_key: Value, right_key: Value) -> Self {
        Error::DuplicateAssociation {
            left_key,
            right_key,
        }
    }

    /// Creates an invalid pagination error.
    pub fn invalid_pagination(limit: Option<i64>, offset: i64) -> Self {
        Error::InvalidPagination { limit, offset }
    }

    /// Returns true if this is a schema error (plan-build failure).
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Error::ColumnNotFound { .. }
                | Error::DuplicateColumn { .. }
                | Error::TypeMismatch { .. }
                | Error::NullConstraint { .. }
                | Error::ArityMismatch { .. }
        )
    }
}
