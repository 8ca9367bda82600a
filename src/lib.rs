//! Declare how an entity maps to a table once, then add, update, remove, look it
//! up and query it through a generic [`Repository`].
//!
//! Backends live in their own crates (`rowmap-sqlite`), this crate re-exports the
//! core the drivers are written against.

pub use rowmap_core::*;
