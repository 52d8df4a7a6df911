//! # varbase - typed variables for parametric model construction
//!
//! varbase is the parameter dictionary of a model-build pass: producers
//! ("generators") write named, typed engineering parameters into a
//! [`VarStore`], and downstream construction code reads them back with
//! typed accessors. Variables hold doubles, integers, counts, strings,
//! (x, y, z) triples, or deferred arithmetic expressions over other
//! variables, evaluated fresh on every read.
//!
//! ## Core Concepts
//!
//! - **Variable**: a named cell with a stable integer index and one typed
//!   value
//! - **Expression cell**: a stored formula (`"41.85 - pressYStep"`)
//!   re-evaluated against the current store on each read
//! - **Generator**: a producer that writes a fixed `key + Field` schema
//!   into the store
//!
//! ## Usage
//!
//! ```rust
//! use varbase::{Generator, PipeGenerator, VarStore};
//!
//! let mut store = VarStore::new();
//!
//! // Producers populate the store under key prefixes.
//! PipeGenerator::new()
//!     .with_radius(8.0)
//!     .with_length(120.0)
//!     .generate(&mut store, "BeamPipe")
//!     .unwrap();
//!
//! // Derived parameters stay in sync with what they reference.
//! store.parse("WindowOffset", "BeamPipeLength / 2 - 1.5").unwrap();
//! assert_eq!(store.eval::<f64>("WindowOffset").unwrap(), 58.5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod expr;
pub mod generator;
pub mod store;
pub mod value;
pub mod variable;
pub mod vec3;

// Re-export primary types at crate root for convenience
pub use error::{ParseError, VarError, VarResult};
pub use expr::Expression;
pub use generator::{CollimatorGenerator, Generator, PipeGenerator};
pub use store::VarStore;
pub use value::{FromValue, Value};
pub use variable::Variable;
pub use vec3::Vec3;
