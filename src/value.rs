//! Value types a variable can hold.
//!
//! The store is homogeneous over [`Value`], a closed sum of the payload
//! types model parameters come in: doubles, integers, counts, strings,
//! 3-vectors, and deferred arithmetic expressions. Typed reads go through
//! the [`FromValue`] trait, which is strict per type except for the one
//! documented widening rule: integer and count cells may be read as
//! doubles, never the reverse.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expr::Expression;
use crate::vec3::Vec3;

/// Possible values a variable can hold.
///
/// # Examples
///
/// ```
/// use varbase::Value;
///
/// let length = Value::Double(41.85);
/// let segments = Value::Int(8);
/// let material = Value::Str("Stainless304".to_string());
///
/// assert!(length.is_double());
/// assert_eq!(segments.as_double(), Some(8.0)); // widening read
/// assert!(material.as_double().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Double-precision number.
    Double(f64),
    /// Signed integer.
    Int(i64),
    /// Unsigned count (array sizes, segment counts).
    Size(u64),
    /// String (material names, mode flags).
    Str(String),
    /// (x, y, z) triple.
    Vec3(Vec3),
    /// Deferred arithmetic expression over other variables.
    Expr(Expression),
}

impl Value {
    /// Returns true for a double cell.
    pub const fn is_double(&self) -> bool {
        matches!(self, Self::Double(_))
    }

    /// Returns true for an integer cell.
    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Returns true for a count cell.
    pub const fn is_size(&self) -> bool {
        matches!(self, Self::Size(_))
    }

    /// Returns true for a string cell.
    pub const fn is_str(&self) -> bool {
        matches!(self, Self::Str(_))
    }

    /// Returns true for a vector cell.
    pub const fn is_vec3(&self) -> bool {
        matches!(self, Self::Vec3(_))
    }

    /// Returns true for an expression cell.
    pub const fn is_expr(&self) -> bool {
        matches!(self, Self::Expr(_))
    }

    /// Reads the value as a double. Integer and count cells widen;
    /// everything else (including expression cells, which only the owning
    /// store can evaluate) is `None`.
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            #[allow(clippy::cast_precision_loss)]
            Self::Size(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Reads an integer cell; no conversion from any other type.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Reads a count cell; no conversion from any other type.
    #[must_use]
    pub const fn as_size(&self) -> Option<u64> {
        match self {
            Self::Size(v) => Some(*v),
            _ => None,
        }
    }

    /// Reads a string cell.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Reads a vector cell.
    #[must_use]
    pub const fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Self::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    /// Reads an expression cell without evaluating it.
    #[must_use]
    pub const fn as_expr(&self) -> Option<&Expression> {
        match self {
            Self::Expr(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a human-readable type name, used in mismatch errors and
    /// diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Double(_) => "double",
            Self::Int(_) => "int",
            Self::Size(_) => "size",
            Self::Str(_) => "string",
            Self::Vec3(_) => "vec3",
            Self::Expr(_) => "expression",
        }
    }
}

impl fmt::Display for Value {
    /// Renders the dump form: plain number, bare string, `x y z` triple,
    /// or the expression source text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Double(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Size(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Vec3(v) => write!(f, "{v}"),
            Self::Expr(v) => write!(f, "{v}"),
        }
    }
}

// Convenient From implementations
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Double(f64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Size(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Size(v as u64)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<(f64, f64, f64)> for Value {
    fn from(v: (f64, f64, f64)) -> Self {
        Self::Vec3(Vec3::from(v))
    }
}

impl From<Expression> for Value {
    fn from(v: Expression) -> Self {
        Self::Expr(v)
    }
}

/// Typed extraction from a [`Value`], used by the store's `eval` methods.
///
/// Implementations are strict: a mismatching cell yields `None`, which the
/// store turns into a `TypeMismatch` error naming both types. The only
/// conversion is the widening read of integer/count cells as `f64`.
pub trait FromValue: Sized {
    /// Type name reported in mismatch errors.
    const EXPECTED: &'static str;

    /// Extracts `Self` if the value's type allows it.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "double";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_double()
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for u64 {
    const EXPECTED: &'static str = "size";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_size()
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(ToString::to_string)
    }
}

impl FromValue for Vec3 {
    const EXPECTED: &'static str = "vec3";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_vec3()
    }
}

impl FromValue for Expression {
    const EXPECTED: &'static str = "expression";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_expr().cloned()
    }
}
