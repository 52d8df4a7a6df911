//! The variable cell: one named, typed entry of a store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A single variable cell.
///
/// The cell pairs a [`Value`] with the stable integer index the owning
/// store assigned at creation, plus the `active` flag used to filter the
/// textual dump. The index survives value replacement, including
/// replacement with a different type; only removal retires it.
///
/// Cells do not know their own name: the store's name map is the single
/// source of naming truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    index: u64,
    value: Value,
    active: bool,
}

impl Variable {
    /// Creates a cell with the given index. New cells start inactive;
    /// downstream readers mark consumption via [`Variable::activate`].
    #[must_use]
    pub fn new(index: u64, value: Value) -> Self {
        Self {
            index,
            value,
            active: false,
        }
    }

    /// The stable integer index.
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }

    /// The held value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// The held value's type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.value.type_name()
    }

    /// Whether the variable has been marked as consumed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Marks the variable as consumed by downstream code.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Clears the consumed mark.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Overwrites the value in place, keeping index and active flag.
    /// Type agreement is the store's concern, not the cell's.
    pub fn replace_value(&mut self, value: Value) {
        self.value = value;
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
