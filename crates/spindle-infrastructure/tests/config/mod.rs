//! Configuration Tests
//!
//! Tests for path resolution, loading, and import merging against a real
//! filesystem.

mod loader_test;
mod path_resolver_test;
