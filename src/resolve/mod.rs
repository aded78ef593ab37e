//! Document resolution - inline related resources into a nested tree
//!
//! A JSON:API style document keeps related resources in a flat `included`
//! pool and references them by `(type, id)`. Resolution replaces every
//! relationship with the resource it points at, recursively, so callers get a
//! plain object tree.
//!
//! Dangling identifiers never fail: a to-many relationship drops them and a
//! to-one relationship becomes `{}`.

pub mod resolver;
pub mod side_table;

pub use resolver::{clone, parse, Resolver};
pub use side_table::SideTable;
