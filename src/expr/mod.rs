//! Arithmetic expression cells.
//!
//! An [`Expression`] is parsed once when stored and evaluated on every
//! read against the current values of the variables it references. There
//! is deliberately no result caching: dependency variables are set in
//! arbitrary order during model configuration, and re-evaluating a short
//! formula is cheaper than getting invalidation right.

mod lexer;
mod parser;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, VarResult};

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
}

/// Binary operators, standard arithmetic precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Pow => lhs.powf(rhs),
        }
    }
}

/// Built-in functions available in expression text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sqrt,
    Exp,
    Log,
    Log10,
    Abs,
    Floor,
    Ceil,
    Min,
    Max,
    Pow,
}

impl Function {
    /// Looks a function up by its name in expression text.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "asin" => Some(Self::Asin),
            "acos" => Some(Self::Acos),
            "atan" => Some(Self::Atan),
            "atan2" => Some(Self::Atan2),
            "sqrt" => Some(Self::Sqrt),
            "exp" => Some(Self::Exp),
            "log" => Some(Self::Log),
            "log10" => Some(Self::Log10),
            "abs" => Some(Self::Abs),
            "floor" => Some(Self::Floor),
            "ceil" => Some(Self::Ceil),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "pow" => Some(Self::Pow),
            _ => None,
        }
    }

    /// Number of arguments the function takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Atan2 | Self::Min | Self::Max | Self::Pow => 2,
            _ => 1,
        }
    }

    fn apply(self, args: &[f64]) -> f64 {
        match self {
            Self::Sin => args[0].sin(),
            Self::Cos => args[0].cos(),
            Self::Tan => args[0].tan(),
            Self::Asin => args[0].asin(),
            Self::Acos => args[0].acos(),
            Self::Atan => args[0].atan(),
            Self::Atan2 => args[0].atan2(args[1]),
            Self::Sqrt => args[0].sqrt(),
            Self::Exp => args[0].exp(),
            Self::Log => args[0].ln(),
            Self::Log10 => args[0].log10(),
            Self::Abs => args[0].abs(),
            Self::Floor => args[0].floor(),
            Self::Ceil => args[0].ceil(),
            Self::Min => args[0].min(args[1]),
            Self::Max => args[0].max(args[1]),
            Self::Pow => args[0].powf(args[1]),
        }
    }
}

/// A node of a parsed expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "node", rename_all = "snake_case")]
pub enum ExprNode {
    /// Numeric literal.
    Number(f64),
    /// Reference to a named variable, resolved at evaluation time.
    Variable(String),
    /// Unary operator application.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<ExprNode>,
    },
    /// Binary operator application.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<ExprNode>,
        /// Right operand.
        rhs: Box<ExprNode>,
    },
    /// Built-in function call.
    Call {
        /// The function.
        function: Function,
        /// Arguments, length matching [`Function::arity`].
        args: Vec<ExprNode>,
    },
}

impl ExprNode {
    pub(crate) fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub(crate) fn binary(op: BinaryOp, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Evaluates the node, resolving variable references through
    /// `resolver`. Resolution errors propagate unchanged.
    pub fn eval(&self, resolver: &mut dyn FnMut(&str) -> VarResult<f64>) -> VarResult<f64> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Variable(name) => resolver(name),
            Self::Unary { op, operand } => {
                let v = operand.eval(resolver)?;
                Ok(match op {
                    UnaryOp::Neg => -v,
                })
            }
            Self::Binary { op, lhs, rhs } => {
                let l = lhs.eval(resolver)?;
                let r = rhs.eval(resolver)?;
                Ok(op.apply(l, r))
            }
            Self::Call { function, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(arg.eval(resolver)?);
                }
                Ok(function.apply(&values))
            }
        }
    }

    fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            Self::Number(_) => {}
            Self::Variable(name) => {
                if !out.iter().any(|n| n == name) {
                    out.push(name.clone());
                }
            }
            Self::Unary { operand, .. } => operand.collect_variables(out),
            Self::Binary { lhs, rhs, .. } => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
            Self::Call { args, .. } => {
                for arg in args {
                    arg.collect_variables(out);
                }
            }
        }
    }
}

/// A parsed arithmetic expression together with its source text.
///
/// Parsing happens exactly once, in [`Expression::parse`]; malformed text
/// never makes it into a store. The source text is kept for display and for
/// the textual variable dump, and is also the serde representation (the
/// tree is rebuilt on deserialization).
///
/// # Examples
///
/// ```
/// use varbase::Expression;
///
/// let expr = Expression::parse("2 * halfLength + wallThick").unwrap();
/// assert_eq!(expr.source(), "2 * halfLength + wallThick");
/// assert_eq!(expr.references(), vec!["halfLength", "wallThick"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Expression {
    source: String,
    root: ExprNode,
}

impl Expression {
    /// Parses expression text.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing the first problem found:
    /// empty input, a stray character, an unknown function, a wrong
    /// argument count, or trailing input.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let root = parser::parse(text)?;
        Ok(Self {
            source: text.trim().to_string(),
            root,
        })
    }

    /// The original source text (trimmed).
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed tree.
    #[must_use]
    pub const fn root(&self) -> &ExprNode {
        &self.root
    }

    /// Names of the variables the expression references, in first-use
    /// order, without duplicates.
    #[must_use]
    pub fn references(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.root.collect_variables(&mut out);
        out
    }

    /// Evaluates the expression, resolving variable references through
    /// `resolver`.
    pub fn eval(&self, resolver: &mut dyn FnMut(&str) -> VarResult<f64>) -> VarResult<f64> {
        self.root.eval(resolver)
    }
}

impl TryFrom<String> for Expression {
    type Error = ParseError;

    fn try_from(text: String) -> Result<Self, ParseError> {
        Self::parse(&text)
    }
}

impl From<Expression> for String {
    fn from(expr: Expression) -> Self {
        expr.source
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
