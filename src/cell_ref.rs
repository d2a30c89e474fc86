//! Sheet bounds plus A1-style names for columns, cells and ranges.
//!
//! Rows and columns are 1-based everywhere in the grid engine.

use crate::error::{GridError, Result};

/// Last addressable row.
pub const LAST_ROW: u32 = 1_048_576;
/// Last addressable column (`XFD`).
pub const LAST_COLUMN: u32 = 16_384;

/// Clamp a row into `[1, LAST_ROW]`.
pub fn clamp_row(row: u32) -> u32 {
    row.clamp(1, LAST_ROW)
}

/// Clamp a column into `[1, LAST_COLUMN]`.
pub fn clamp_column(column: u32) -> u32 {
    column.clamp(1, LAST_COLUMN)
}

/// Convert a 1-based column number to letters (1 -> A, 27 -> AA).
pub fn column_name(column: u32) -> String {
    let mut result = String::new();
    let mut n = column;
    while n > 0 {
        n -= 1;
        result.insert(0, char::from_u32(u32::from('A') + n % 26).unwrap_or('A'));
        n /= 26;
    }
    result
}

/// Parse column letters back into a 1-based column number.
pub fn column_number(name: &str) -> Option<u32> {
    if name.is_empty() {
        return None;
    }
    let mut column: u32 = 0;
    for ch in name.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = u32::from(ch.to_ascii_uppercase()) - u32::from('A') + 1;
        column = column.checked_mul(26)?.checked_add(digit)?;
    }
    (column <= LAST_COLUMN).then_some(column)
}

/// Parse a cell reference like `"B3"` or `"$B$3"` into 1-based `(row, column)`.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let cleaned: String = cell_ref.trim().chars().filter(|&c| c != '$').collect();
    let split = cleaned.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cleaned.split_at(split);
    let column = column_number(letters)?;
    let row: u32 = digits.parse().ok()?;
    (1..=LAST_ROW).contains(&row).then_some((row, column))
}

/// Parse `"A1:B10"` or `"A1"` into `(row_start, column_start, row_end, column_end)`.
pub fn parse_range(range: &str) -> Result<(u32, u32, u32, u32)> {
    let invalid = || GridError::InvalidReference(range.to_string());
    if let Some((start, end)) = range.split_once(':') {
        let (row_start, column_start) = parse_cell_ref(start).ok_or_else(invalid)?;
        let (row_end, column_end) = parse_cell_ref(end).ok_or_else(invalid)?;
        Ok((row_start, column_start, row_end, column_end))
    } else {
        let (row, column) = parse_cell_ref(range).ok_or_else(invalid)?;
        Ok((row, column, row, column))
    }
}

/// Format a cell as `"B3"`.
pub fn cell_name(row: u32, column: u32) -> String {
    format!("{}{}", column_name(column), row)
}

/// Format a range as `"A1:B3"`, collapsing a single cell to `"A1"`.
pub fn range_name(row_start: u32, column_start: u32, row_end: u32, column_end: u32) -> String {
    let (r1, r2) = (row_start.min(row_end), row_start.max(row_end));
    let (c1, c2) = (column_start.min(column_end), column_start.max(column_end));
    if r1 == r2 && c1 == c2 {
        cell_name(r1, c1)
    } else {
        format!("{}:{}", cell_name(r1, c1), cell_name(r2, c2))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1, "A")]
    #[test_case(26, "Z")]
    #[test_case(27, "AA")]
    #[test_case(702, "ZZ")]
    #[test_case(703, "AAA")]
    #[test_case(LAST_COLUMN, "XFD")]
    fn column_names(column: u32, name: &str) {
        assert_eq!(column_name(column), name);
        assert_eq!(column_number(name), Some(column));
    }

    #[test]
    fn column_number_rejects_out_of_sheet() {
        assert_eq!(column_number("XFE"), None);
        assert_eq!(column_number(""), None);
        assert_eq!(column_number("A1"), None);
    }

    #[test]
    fn parse_refs() {
        assert_eq!(parse_cell_ref("B3"), Some((3, 2)));
        assert_eq!(parse_cell_ref("$c$10"), Some((10, 3)));
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("A1048577"), None);
        assert_eq!(parse_range("A1:B2").unwrap(), (1, 1, 2, 2));
        assert_eq!(parse_range("D4").unwrap(), (4, 4, 4, 4));
        assert!(matches!(
            parse_range("nope"),
            Err(GridError::InvalidReference(_))
        ));
    }

    #[test]
    fn range_names_normalize() {
        assert_eq!(range_name(3, 2, 1, 1), "A1:B3");
        assert_eq!(range_name(5, 5, 5, 5), "E5");
    }

    #[test]
    fn clamps() {
        assert_eq!(clamp_row(0), 1);
        assert_eq!(clamp_row(LAST_ROW + 10), LAST_ROW);
        assert_eq!(clamp_column(0), 1);
        assert_eq!(clamp_column(20_000), LAST_COLUMN);
    }
}
