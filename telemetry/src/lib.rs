//! Tracing setup shared by the updater binary and its tests.

pub mod tracing;
