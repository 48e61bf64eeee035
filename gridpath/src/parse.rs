//! Strict text parsers for coordinates such as `(2,3)` and grids such as `[[1,0],[0,1]]`.
//!
//! Neither parser strips whitespace; run the input through
//! [`remove_all_spaces`](crate::util::remove_all_spaces) first if needed.

use std::str::FromStr;

use log::trace;

use crate::error::{CoordinateError, GridError, Rejected};
use crate::grid::{GridMap, Point};

/// Parse `(row,col)` into a [`Point`]
pub fn parse_coordinate(text: &str) -> Result<Point, Rejected> {
    scan_coordinate(text).map_err(|err| {
        trace!("rejected coordinate {:?}: {}", text, err);
        Rejected::from(err)
    })
}

fn scan_coordinate(text: &str) -> Result<Point, CoordinateError> {
    let inner = text
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or(CoordinateError::MissingParens)?;

    // only the first comma separates, anything after it belongs to the second number
    let (row, col) = inner
        .split_once(',')
        .ok_or(CoordinateError::MissingSeparator)?;

    Ok(Point {
        row: parse_index(row)?,
        col: parse_index(col)?,
    })
}

/// 2^53, from here on a float may be a rounded neighbour of the written integer
const MAX_EXACT_FLOAT_INDEX: f64 = 9_007_199_254_740_992.0;

/// Plain decimal integers are taken exactly. Anything else is read as a float,
/// so `1e1` and `2.0` are fine, but the value must be a whole number.
/// Hexadecimal such as `0x1f` is not a number here.
fn parse_index(text: &str) -> Result<usize, CoordinateError> {
    if let Ok(index) = text.parse::<usize>() {
        return Ok(index);
    }

    let value: f64 = text
        .parse()
        .map_err(|_| CoordinateError::InvalidNumber(text.to_owned()))?;

    if value.is_nan() {
        return Err(CoordinateError::InvalidNumber(text.to_owned()));
    }
    if value < 0.0 {
        return Err(CoordinateError::Negative(text.to_owned()));
    }
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(CoordinateError::NotAnInteger(text.to_owned()));
    }
    if value >= MAX_EXACT_FLOAT_INDEX || value >= usize::MAX as f64 {
        return Err(CoordinateError::TooLarge(text.to_owned()));
    }

    Ok(value as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Expecting the `[` that opens a row
    RowOpen,
    /// Inside a row. `run_start` is the offset of the row's `[` or of the last `,`
    InRow { run_start: usize },
    /// After a row's `]`, expecting `,` before the next row or the final `]`
    RowSeparatorOrEnd,
    /// The final `]` has been read
    End,
}

const EXPECT_ROW_OPEN: &str = "'[' to open a row";
const EXPECT_VALUE: &str = "'0' or '1'";
const EXPECT_VALUE_END: &str = "',' or ']' after a value";
const EXPECT_ROW_END: &str = "',' or ']' after a row";
const EXPECT_NOTHING: &str = "end of input";

fn unexpected(offset: usize, found: char, expected: &'static str) -> GridError {
    GridError::UnexpectedChar {
        offset,
        found,
        expected,
    }
}

/// Check the grid grammar `[ row (, row)* ]` with `row = [ bit (, bit)* ]`.
///
/// Inside a row every character one past the last `[` or `,` must be a bit,
/// and every character two past it must be `,` or `]`.
fn scan_grid(text: &str) -> Result<(), GridError> {
    if !text.starts_with('[') || !text.ends_with(']') {
        return Err(GridError::MissingOuterBrackets);
    }

    let mut state = ScanState::RowOpen;

    for (offset, found) in text.char_indices().skip(1) {
        state = match state {
            ScanState::RowOpen => match found {
                '[' => ScanState::InRow { run_start: offset },
                _ => return Err(unexpected(offset, found, EXPECT_ROW_OPEN)),
            },
            ScanState::InRow { run_start } if offset - run_start == 1 => match found {
                '0' | '1' => ScanState::InRow { run_start },
                _ => return Err(unexpected(offset, found, EXPECT_VALUE)),
            },
            ScanState::InRow { .. } => match found {
                ',' => ScanState::InRow { run_start: offset },
                ']' => ScanState::RowSeparatorOrEnd,
                _ => return Err(unexpected(offset, found, EXPECT_VALUE_END)),
            },
            ScanState::RowSeparatorOrEnd => match found {
                ',' => ScanState::RowOpen,
                ']' => ScanState::End,
                _ => return Err(unexpected(offset, found, EXPECT_ROW_END)),
            },
            ScanState::End => return Err(unexpected(offset, found, EXPECT_NOTHING)),
        };
    }

    let expected = match state {
        ScanState::End => return Ok(()),
        ScanState::RowOpen => EXPECT_ROW_OPEN,
        ScanState::InRow { .. } => EXPECT_VALUE_END,
        ScanState::RowSeparatorOrEnd => EXPECT_ROW_END,
    };
    Err(GridError::UnexpectedEnd { expected })
}

/// Cheap grammar check without building the grid
pub fn is_well_formed(text: &str) -> bool {
    scan_grid(text).is_ok()
}

/// Check the grid grammar and decode the text into a [`GridMap`].
///
/// Rows of different lengths are accepted.
pub fn validate_grid(text: &str) -> Result<GridMap, Rejected> {
    if let Err(err) = scan_grid(text) {
        trace!("rejected grid {:?}: {}", text, err);
        return Err(err.into());
    }

    match serde_json::from_str::<GridMap>(text) {
        Ok(map) => Ok(map),
        Err(err) => panic!("grid {:?} passed the grammar check but failed to decode: {}", text, err),
    }
}

impl FromStr for Point {
    type Err = Rejected;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coordinate(s)
    }
}

impl FromStr for GridMap {
    type Err = Rejected;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_grid(s)
    }
}
