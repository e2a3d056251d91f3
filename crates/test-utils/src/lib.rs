//! Shared test utilities for the retrieval-chunks workspace.
//!
//! Provides generators for synthetic sounding sets with predictable,
//! verifiable payloads, used by the store and chunking test suites.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod generators;

// Re-export commonly used items at the crate root
pub use generators::*;
