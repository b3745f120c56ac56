//! Parsing of the human move notation.

use crate::board::BoardError;

/// Parse a move written as `<row-number> <column-letter>`, e.g. `3 a`.
///
/// Rows are 1-indexed numbers, columns are lowercase letters starting at
/// `a`. The result is a zero-indexed `(row, col)` pair; whether it lands on
/// the board is for [`crate::Board::is_valid_move`] to decide.
pub fn parse_coord(input: &str) -> Result<(usize, usize), BoardError> {
    let invalid = || BoardError::InvalidCoord {
        input: input.to_string(),
    };

    let mut parts = input.split_whitespace();
    let (row_part, col_part) = match (parts.next(), parts.next(), parts.next()) {
        (Some(row), Some(col), None) => (row, col),
        _ => return Err(invalid()),
    };

    let row: usize = row_part.parse().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }

    let mut col_chars = col_part.chars();
    let col = match (col_chars.next(), col_chars.next()) {
        (Some(letter @ 'a'..='z'), None) => letter as usize - 'a' as usize,
        _ => return Err(invalid()),
    };

    Ok((row - 1, col))
}
