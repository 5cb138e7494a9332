//! Query composition
//!
//! Structured search specification, its tag sets, the compiler that turns it
//! into an operator-annotated query string, and the parser for raw operator
//! strings carried by shortcuts.

mod compiler;
mod operators;
mod spec;
mod tags;

pub use compiler::compile;
pub use operators::parse_operator;
pub use spec::{AdvancedSearch, SearchSpecification, TagLists};
pub use tags::{Dimension, Tag, TagSet};
