//! Search engine module
//!
//! Defines the engines a compiled query can be launched on and builds their
//! search URLs.

mod launch;

pub use launch::{launch_url, EngineError, SearchEngine};
