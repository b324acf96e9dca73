//! Batch update of handle URL records from a two-column CSV file.
//!
//! Rows flow strictly one at a time through four stages:
//!
//! 1. [`source::RowSource`] reads raw records with their physical line numbers.
//! 2. [`normalize::normalize_row`] checks the shape and strips resolver prefixes.
//! 3. [`executor::UpdateExecutor`] applies the update in its own transaction.
//! 4. [`aggregator::OutcomeAggregator`] reports each [`outcome::UpdateOutcome`] and
//!    prints the run summary.
//!
//! [`pipeline::run`] wires the stages to a MySQL record store.

pub mod aggregator;
pub mod configuration;
pub mod error;
pub mod error_log;
pub mod executor;
pub mod normalize;
pub mod outcome;
pub mod pipeline;
pub mod source;
pub mod store;
