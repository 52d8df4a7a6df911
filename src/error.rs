//! Error types for varbase.
//!
//! All errors are strongly typed using thiserror. Absence of a variable,
//! wrong-type access, and malformed expression text are distinct kinds so
//! that callers can decide between supplying a default and aborting the
//! whole model-build pass.

use thiserror::Error;

/// Errors raised while parsing arithmetic expression text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ParseError {
    #[error("Expression is empty")]
    Empty,

    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedChar {
        position: usize,
        found: char,
    },

    #[error("Unexpected token '{found}' at position {position}")]
    UnexpectedToken {
        position: usize,
        found: String,
    },

    #[error("Expression ended unexpectedly")]
    UnexpectedEnd,

    #[error("Malformed number '{text}' at position {position}")]
    InvalidNumber {
        position: usize,
        text: String,
    },

    #[error("Unknown function '{name}'")]
    UnknownFunction {
        name: String,
    },

    #[error("Function '{function}' takes {expected} argument(s), got {actual}")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("Trailing input at position {position}")]
    TrailingInput {
        position: usize,
    },
}

/// Top-level error type for variable-store operations.
///
/// # Examples
///
/// ```
/// use varbase::{VarError, VarStore};
///
/// let store = VarStore::new();
/// let err = store.eval::<f64>("missing").unwrap_err();
/// assert!(matches!(err, VarError::NotFound { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VarError {
    /// The named variable is not in the store. Raised by direct lookups and
    /// by expression evaluation when a referenced name is absent.
    #[error("Variable not found: {name}")]
    NotFound {
        /// The missing name.
        name: String,
    },

    /// The variable exists but holds a different type than requested.
    #[error("Wrong type for variable '{name}': expected {expected}, found {actual}")]
    TypeMismatch {
        /// The variable name.
        name: String,
        /// Type the caller asked for.
        expected: &'static str,
        /// Type actually stored.
        actual: &'static str,
    },

    /// No variable carries the given integer index.
    #[error("No variable with index {index}")]
    IndexNotFound {
        /// The unknown index.
        index: u64,
    },

    /// Expression evaluation walked back into a variable still being
    /// evaluated (direct or mutual self-reference).
    #[error("Circular reference while evaluating '{name}'")]
    CircularReference {
        /// The variable whose evaluation started the walk.
        name: String,
    },

    /// Expression text failed to parse.
    #[error("Expression parse error: {0}")]
    Parse(#[from] ParseError),
}

impl VarError {
    /// Creates a not-found error for `name`.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Creates a type-mismatch error.
    #[must_use]
    pub fn type_mismatch(
        name: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a type-mismatch error.
    #[must_use]
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    /// Returns true if this is an expression parse error.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Result type alias for variable-store operations.
pub type VarResult<T> = Result<T, VarError>;
