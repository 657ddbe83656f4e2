//! Tabtrace - In-memory HTTP traffic snapshot cache for browser-tab automation
//!
//! Captures a browser tab's completed HTTP exchanges from an external traffic
//! source, retains them as an in-memory snapshot, and answers URL-pattern
//! lookups against it, optionally polling with refresh until a match appears
//! or a deadline expires.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_panics_doc,
    clippy::multiple_crate_versions
)]

pub mod cache;
pub mod config;
pub mod error;
pub mod exchange;
pub mod headers;
pub mod source;

pub use cache::{RetryPolicy, TrafficCache};
pub use error::{Result, TabtraceError};
pub use exchange::{Exchange, RawExchange, UrlMatch};
pub use headers::HeaderSide;
pub use source::TrafficSource;
