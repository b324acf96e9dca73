use crate::outcome::InvalidRow;
use crate::source::RawRow;

/// Resolver prefixes stripped from handles, longest first.
pub const HANDLE_PREFIXES: [&str; 2] = ["https://hdl.handle.net/", "http://hdl.handle.net/"];

/// Number of fields every input record must have.
const EXPECTED_COLUMNS: usize = 2;

/// A validated row ready to be applied to the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    /// New value for the URL record's data.
    pub url: String,
    /// Bare handle identifying the record.
    pub handle: String,
}

/// Removes at most one known resolver prefix from the start of `raw`.
pub fn strip_handle_prefix(raw: &str) -> &str {
    HANDLE_PREFIXES
        .iter()
        .find_map(|prefix| raw.strip_prefix(prefix))
        .unwrap_or(raw)
}

/// Validates the shape of a raw row and normalizes its handle.
///
/// Checks run in order: field count, prefix stripping, then literal emptiness
/// of both fields. Whitespace is preserved as-is.
pub fn normalize_row(row: RawRow) -> Result<NormalizedRow, InvalidRow> {
    let RawRow { fields, .. } = row;
    let [url, raw_handle]: [String; EXPECTED_COLUMNS] = fields
        .try_into()
        .map_err(|fields: Vec<String>| InvalidRow::ColumnCount(fields.len()))?;

    let handle = strip_handle_prefix(&raw_handle);
    if url.is_empty() || handle.is_empty() {
        return Err(InvalidRow::EmptyField);
    }

    Ok(NormalizedRow {
        handle: handle.to_owned(),
        url,
    })
}
