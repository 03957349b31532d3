//! Grid coordinates as typed by players: one letter for the row, one digit for the column.

use std::fmt;

use thiserror::Error;

/// Position typed by a player that is not a letter and a digit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed coordinate `{0}`: expected one letter and one digit")]
pub struct MalformedCoordinate(pub String);

/// 0-based cell position inside a puzzle grid.
///
/// Rows are labelled with letters (`A` is row 0) and columns with digits (`1` is column 0).
/// Parsed coordinates are not bounds-checked against any grid, so the column of a `0` digit
/// is `-1` and simply never matches a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// Row index, `A` is 0.
    pub row: i32,
    /// Column index, `1` is 0.
    pub col: i32,
}

impl Coordinate {
    /// Build a coordinate from grid indices.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row: row as i32,
            col: col as i32,
        }
    }

    /// Parse a player position such as `B3`, `3b` or `b3`.
    ///
    /// Exactly two characters are accepted, one ASCII letter and one ASCII digit in either
    /// order, case-insensitively.
    pub fn parse(position: &str) -> Result<Self, MalformedCoordinate> {
        let malformed = || MalformedCoordinate(position.to_owned());

        let mut chars = position.chars();
        let (Some(first), Some(second), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(malformed());
        };

        let (letter, digit) = if first.is_ascii_alphabetic() && second.is_ascii_digit() {
            (first, second)
        } else if first.is_ascii_digit() && second.is_ascii_alphabetic() {
            (second, first)
        } else {
            return Err(malformed());
        };

        let row = i32::from(letter.to_ascii_lowercase() as u8 - b'a');
        let col = i32::from(digit as u8 - b'0') - 1;
        Ok(Self { row, col })
    }

    /// Return the grid indices when both are non-negative.
    pub fn indices(self) -> Option<(usize, usize)> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        Some((row, col))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = u8::try_from(self.row)
            .ok()
            .filter(|row| *row < 26)
            .map(|row| char::from(b'A' + row));
        match letter {
            Some(letter) => write!(f, "{letter}{}", self.col + 1),
            None => write!(f, "?{}", self.col + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_and_digit_in_any_order_and_case() {
        let expected = Coordinate { row: 1, col: 2 };
        assert_eq!(Coordinate::parse("B3"), Ok(expected));
        assert_eq!(Coordinate::parse("3B"), Ok(expected));
        assert_eq!(Coordinate::parse("b3"), Ok(expected));
        assert_eq!(Coordinate::parse("3b"), Ok(expected));
    }

    #[test]
    fn first_cell_is_a1() {
        assert_eq!(Coordinate::parse("a1"), Ok(Coordinate::new(0, 0)));
        assert_eq!(Coordinate::new(0, 0).to_string(), "A1");
        assert_eq!(Coordinate::new(2, 1).to_string(), "C2");
    }

    #[test]
    fn rejects_malformed_positions() {
        for input in ["33", "BB", "B", "", "B33", "B 3", " B3", "é3", "B٣", "-1"] {
            assert!(Coordinate::parse(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn out_of_grid_positions_still_parse() {
        let far = Coordinate::parse("z9").unwrap();
        assert_eq!(far, Coordinate { row: 25, col: 8 });

        let zero = Coordinate::parse("a0").unwrap();
        assert_eq!(zero.col, -1);
        assert_eq!(zero.indices(), None);
    }
}
