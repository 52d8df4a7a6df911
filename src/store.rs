//! The variable store.
//!
//! [`VarStore`] is the name-keyed dictionary a model-build pass populates
//! (through generators) and downstream construction code reads. One store
//! per model; it is passed around by explicit mutable reference, never held
//! globally. Cloning a store is a deep copy with value semantics: two
//! stores never alias mutable state.

use std::collections::{BTreeMap, HashMap};
use std::io;

use serde::{Deserialize, Serialize};

use crate::error::{VarError, VarResult};
use crate::expr::Expression;
use crate::value::{FromValue, Value};
use crate::variable::Variable;

/// Upper bound on nested expression-cell resolution. Expressions chain a
/// few levels deep in practice; hitting the bound means a reference cycle.
const MAX_EVAL_DEPTH: usize = 64;

/// A typed variable store with deferred expression evaluation.
///
/// Variables are created with [`VarStore::add`] (create-or-replace) or the
/// strict [`VarStore::set`], and read back with the typed
/// [`VarStore::eval`] / [`VarStore::eval_def`]. Each variable keeps a
/// stable integer index for its lifetime, even across type-changing
/// replacement. Iteration order is alphabetical by name.
///
/// # Examples
///
/// ```
/// use varbase::VarStore;
///
/// let mut store = VarStore::new();
/// store.add("pressYStep", 1.85);
/// store.parse("pressLength", "41.85 - pressYStep").unwrap();
///
/// assert_eq!(store.eval::<f64>("pressLength").unwrap(), 40.0);
///
/// // Expression cells are re-evaluated on every read.
/// store.add("pressYStep", 11.85);
/// assert_eq!(store.eval::<f64>("pressLength").unwrap(), 30.0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VarStore {
    vars: BTreeMap<String, Variable>,
    index_names: HashMap<u64, String>,
    next_index: u64,
}

impl VarStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true if the store holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Returns true if `name` is in the store.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Looks a variable cell up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    /// The stable index assigned to `name`, if present.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<u64> {
        self.vars.get(name).map(Variable::index)
    }

    /// Looks a variable up by its stable index.
    ///
    /// # Errors
    ///
    /// `IndexNotFound` if no live variable carries `index`.
    pub fn get_by_index(&self, index: u64) -> VarResult<&Variable> {
        let name = self
            .index_names
            .get(&index)
            .ok_or(VarError::IndexNotFound { index })?;
        // The two maps are kept in lockstep by every mutation path.
        self.vars
            .get(name)
            .ok_or(VarError::IndexNotFound { index })
    }

    /// The name carrying `index`.
    ///
    /// # Errors
    ///
    /// `IndexNotFound` if no live variable carries `index`.
    pub fn name_of(&self, index: u64) -> VarResult<&str> {
        self.index_names
            .get(&index)
            .map(String::as_str)
            .ok_or(VarError::IndexNotFound { index })
    }

    /// Variable names in iteration (alphabetical) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Iterates `(name, cell)` pairs in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.vars.iter().map(|(name, var)| (name.as_str(), var))
    }

    /// Creates or replaces a variable, returning its stable index.
    ///
    /// If `name` already exists the value is replaced whatever its previous
    /// type; the index and active flag carry over. Otherwise a fresh index
    /// is assigned.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) -> u64 {
        let name = name.into();
        let value = value.into();
        if let Some(var) = self.vars.get_mut(&name) {
            var.replace_value(value);
            return var.index();
        }

        let index = self.next_index;
        self.next_index += 1;
        self.index_names.insert(index, name.clone());
        self.vars.insert(name, Variable::new(index, value));
        index
    }

    /// Strictly updates an existing variable in place.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `name` is absent (use [`VarStore::add`] to create).
    /// - `TypeMismatch` if the stored type differs from the incoming one.
    ///   Callers that want the replace-on-mismatch behavior must opt in via
    ///   [`VarStore::set_or_replace`].
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> VarResult<()> {
        let value = value.into();
        let var = self
            .vars
            .get_mut(name)
            .ok_or_else(|| VarError::not_found(name))?;
        if var.type_name() != value.type_name() {
            return Err(VarError::type_mismatch(
                name,
                var.type_name(),
                value.type_name(),
            ));
        }
        var.replace_value(value);
        Ok(())
    }

    /// Updates `name`, replacing the whole cell (index preserved) when the
    /// incoming type differs, and creating the variable when absent.
    ///
    /// This is the explicit opt-in form of the recovery that a strict
    /// [`VarStore::set`] refuses; it cannot fail.
    pub fn set_or_replace(&mut self, name: impl Into<String>, value: impl Into<Value>) -> u64 {
        self.add(name, value)
    }

    /// Removes a variable, retiring its index, and returns the cell.
    ///
    /// # Errors
    ///
    /// `NotFound` if `name` is absent.
    pub fn remove(&mut self, name: &str) -> VarResult<Variable> {
        let var = self
            .vars
            .remove(name)
            .ok_or_else(|| VarError::not_found(name))?;
        self.index_names.remove(&var.index());
        Ok(var)
    }

    /// Parses arithmetic expression text and stores it under `name` as a
    /// deferred expression cell (create-or-replace, like [`VarStore::add`]).
    /// Referenced variables need not exist yet; they are resolved on read.
    ///
    /// # Errors
    ///
    /// `Parse` if the text is malformed.
    pub fn parse(&mut self, name: impl Into<String>, text: &str) -> VarResult<u64> {
        let expr = Expression::parse(text)?;
        Ok(self.add(name, Value::Expr(expr)))
    }

    /// Typed read of a variable.
    ///
    /// Expression cells are evaluated afresh (no caching) when read as
    /// `f64`; reading one as any other type is a mismatch. Integer and
    /// count cells widen to `f64`; no other conversion exists.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `name` is absent.
    /// - `TypeMismatch` if the stored type does not satisfy `T`.
    /// - `NotFound`/`CircularReference` surfaced from expression
    ///   evaluation when a dependency is absent or cyclic.
    pub fn eval<T: FromValue>(&self, name: &str) -> VarResult<T> {
        let var = self
            .vars
            .get(name)
            .ok_or_else(|| VarError::not_found(name))?;
        self.extract(name, var.value())
    }

    /// Like [`VarStore::eval`], but an absent variable yields `default`
    /// instead of `NotFound`. Wrong-type access still fails: a present
    /// variable of the wrong type is a programming error, not a gap.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` (and expression-evaluation errors) as for
    /// [`VarStore::eval`].
    pub fn eval_def<T: FromValue>(&self, name: &str, default: T) -> VarResult<T> {
        match self.vars.get(name) {
            None => Ok(default),
            Some(var) => self.extract(name, var.value()),
        }
    }

    /// Marks `name` as consumed, so `write_active` includes it.
    ///
    /// # Errors
    ///
    /// `NotFound` if `name` is absent.
    pub fn activate(&mut self, name: &str) -> VarResult<()> {
        self.vars
            .get_mut(name)
            .ok_or_else(|| VarError::not_found(name))?
            .activate();
        Ok(())
    }

    /// Clears the consumed mark on `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` if `name` is absent.
    pub fn deactivate(&mut self, name: &str) -> VarResult<()> {
        self.vars
            .get_mut(name)
            .ok_or_else(|| VarError::not_found(name))?
            .deactivate();
        Ok(())
    }

    /// Writes every variable as a `name value` line, alphabetically.
    ///
    /// This is a debugging/logging artifact, not a round-trip format; use
    /// serde for snapshots.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from `writer`.
    pub fn write_all<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        for (name, var) in &self.vars {
            writeln!(writer, "{name} {var}")?;
        }
        Ok(())
    }

    /// Like [`VarStore::write_all`], restricted to active variables.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from `writer`.
    pub fn write_active<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        for (name, var) in &self.vars {
            if var.is_active() {
                writeln!(writer, "{name} {var}")?;
            }
        }
        Ok(())
    }

    fn extract<T: FromValue>(&self, name: &str, value: &Value) -> VarResult<T> {
        if let Some(out) = T::from_value(value) {
            return Ok(out);
        }
        if let Value::Expr(expr) = value {
            if T::EXPECTED == "double" {
                let num = self.eval_expr_guarded(name, expr, 0)?;
                if let Some(out) = T::from_value(&Value::Double(num)) {
                    return Ok(out);
                }
            }
        }
        Err(VarError::type_mismatch(name, T::EXPECTED, value.type_name()))
    }

    fn eval_expr_guarded(&self, origin: &str, expr: &Expression, depth: usize) -> VarResult<f64> {
        if depth >= MAX_EVAL_DEPTH {
            return Err(VarError::CircularReference {
                name: origin.to_string(),
            });
        }
        expr.eval(&mut |name| {
            let var = self
                .vars
                .get(name)
                .ok_or_else(|| VarError::not_found(name))?;
            match var.value() {
                Value::Expr(nested) => self.eval_expr_guarded(origin, nested, depth + 1),
                other => other
                    .as_double()
                    .ok_or_else(|| VarError::type_mismatch(name, "double", other.type_name())),
            }
        })
    }
}
