//! Function catalog wiring.
//!
//! This module wraps the function-group documents on disk (for example
//! `functions/open_connect.json`) so renderers can consume one validated,
//! frozen snapshot. Types here mirror the document fields; callers use
//! `Catalog` for lookups by function name.

pub mod index;
pub mod model;

pub use index::{Catalog, LoadedGroup};
pub use model::{DocComment, FunctionDef, FunctionGroup, FunctionParam};
