//! Shared benchmark utilities for the edge event filter workspace.

pub mod bench_support;

pub use edge_field_filter;
