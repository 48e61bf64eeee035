use thiserror::Error;

/// A textual input that does not conform to its grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("invalid coordinate: {0}")]
    Coordinate(#[from] CoordinateError),
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
}

impl Rejected {
    /// The message shown next to the input field that produced this error
    pub fn user_message(&self) -> &'static str {
        match self {
            Rejected::Coordinate(_) => "Invalid coordinates.",
            Rejected::Grid(_) => "Invalid matrix representation.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("expected the coordinate to be wrapped in '(' and ')'")]
    MissingParens,
    #[error("expected a ',' between the two numbers")]
    MissingSeparator,
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("'{0}' is negative")]
    Negative(String),
    #[error("'{0}' is not a whole number")]
    NotAnInteger(String),
    #[error("'{0}' is too large to index a grid")]
    TooLarge(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("expected the grid to be wrapped in '[' and ']'")]
    MissingOuterBrackets,
    #[error("unexpected '{found}' at offset {offset}, expected {expected}")]
    UnexpectedChar {
        offset: usize,
        found: char,
        expected: &'static str,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
}

/// Why a search could not produce a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPathReason {
    /// The source is out of bounds or sits on an obstacle
    SourceInvalid,
    /// The destination is out of bounds or sits on an obstacle
    DestinationInvalid,
    /// Every walk from the source is blocked before reaching the destination
    Unreachable,
}

/// The normal "no walk exists" outcome of a search. Not an input error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no path: {reason:?}")]
pub struct NoPath {
    pub reason: NoPathReason,
}

impl NoPath {
    pub fn user_message(&self) -> &'static str {
        "Invalid source or destination."
    }
}
