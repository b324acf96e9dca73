use std::fmt;

/// Why a row was rejected before reaching the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRow {
    /// The record did not have exactly two fields.
    ColumnCount(usize),
    /// The URL or the handle was empty once the prefix was stripped.
    EmptyField,
}

impl fmt::Display for InvalidRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidRow::ColumnCount(found) => {
                write!(f, "Invalid format (expected 2 columns, found {found})")
            }
            InvalidRow::EmptyField => f.write_str("Empty URL or handle found."),
        }
    }
}

/// Terminal classification of one input row.
///
/// Every row read from the input produces exactly one outcome. Only
/// [`UpdateOutcome::Updated`] counts as a success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The URL record was found and its data committed.
    Updated { line: u64, handle: String },
    /// No URL record exists for the handle; nothing was changed.
    NotFound { line: u64, handle: String },
    /// The row was rejected before any store access.
    Invalid { line: u64, reason: InvalidRow },
    /// The store failed while applying the row; its transaction was rolled back.
    DatabaseError {
        line: u64,
        handle: String,
        message: String,
    },
}

impl UpdateOutcome {
    /// Returns `true` only for [`UpdateOutcome::Updated`].
    pub fn is_success(&self) -> bool {
        matches!(self, UpdateOutcome::Updated { .. })
    }
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOutcome::Updated { line, handle } => {
                write!(f, "Successfully updated handle '{handle}' (from line {line})")
            }
            UpdateOutcome::NotFound { line, handle } => write!(
                f,
                "No row found or updated for handle '{handle}' (from line {line})"
            ),
            UpdateOutcome::Invalid { line, reason } => {
                write!(f, "Skipping line {line}: {reason}")
            }
            UpdateOutcome::DatabaseError {
                line,
                handle,
                message,
            } => write!(
                f,
                "Database error updating handle '{handle}' (from line {line}): {message}"
            ),
        }
    }
}
