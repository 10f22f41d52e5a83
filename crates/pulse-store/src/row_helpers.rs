use crate::error::StoreError;

/// Get a required column value from a row, returning CorruptRow on failure.
pub fn get<T: rusqlite::types::FromSql>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    row.get(idx).map_err(|e| StoreError::CorruptRow {
        table,
        column,
        detail: e.to_string(),
    })
}

/// Get a u8 column, rejecting values outside 0..=255 as CorruptRow
/// instead of truncating.
pub fn get_u8(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<u8, StoreError> {
    let value: i64 = get(row, idx, table, column)?;
    u8::try_from(value).map_err(|_| StoreError::CorruptRow {
        table,
        column,
        detail: format!("{value} outside 0..=255"),
    })
}

/// Parse a string into an enum, returning CorruptRow on failure.
pub fn parse_enum<T: std::str::FromStr>(
    raw: &str,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    raw.parse().map_err(|_| StoreError::CorruptRow {
        table,
        column,
        detail: format!("unknown variant: {raw}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::lead::LeadStatus;

    #[test]
    fn parse_enum_success() {
        let result: Result<LeadStatus, _> = parse_enum("new", "leads", "status");
        assert!(result.is_ok());
    }

    #[test]
    fn parse_enum_failure() {
        let result: Result<LeadStatus, _> = parse_enum("INVALID", "leads", "status");
        assert!(matches!(
            result,
            Err(StoreError::CorruptRow { table: "leads", column: "status", .. })
        ));
    }
}
