//! HTTP networking module
//!
//! Provides the HTTP client used to reach AI completion providers.

mod client;

pub use client::{HttpClient, HttpResponse};
