//! MySQL connection utilities for the record store.
//!
//! Provides the single-connection setup used by the updater and, behind the
//! `test-utils` feature, helpers to create and drop throwaway test databases.

pub mod connection;
#[cfg(feature = "test-utils")]
pub mod sqlx;
