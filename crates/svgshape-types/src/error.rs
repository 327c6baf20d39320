use std::fmt;

/// A value parsing error.
///
/// Positions are 1-based and counted in chars, not bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The value ended in the middle of a token.
    UnexpectedEndOfStream,

    /// Leftover or unrecognized data at the specified position.
    UnexpectedData(usize),

    /// The value is well-formed, but not acceptable.
    ///
    /// Like a missing link id, or a transform function
    /// with a wrong number of arguments.
    InvalidValue,

    /// A specific char was required.
    InvalidChar {
        /// The required char.
        expected: u8,
        /// The char that was found instead.
        actual: u8,
        /// Position of the found char.
        pos: usize,
    },

    /// A keyword or a prefix was required.
    InvalidString {
        /// A description of what was required.
        expected: String,
        /// The text that was found instead.
        actual: String,
        /// Position of the found text.
        pos: usize,
    },

    /// Not a number, including a bare sign or a dot without digits.
    InvalidNumber(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnexpectedEndOfStream => f.write_str("unexpected end of stream"),
            Error::UnexpectedData(pos) => write!(f, "unexpected data at position {}", pos),
            Error::InvalidValue => f.write_str("invalid value"),
            Error::InvalidChar { expected, actual, pos } => write!(
                f,
                "expected '{}' not '{}' at position {}",
                *expected as char, *actual as char, pos
            ),
            Error::InvalidString { expected, actual, pos } => {
                write!(f, "expected '{}' not '{}' at position {}", expected, actual, pos)
            }
            Error::InvalidNumber(pos) => write!(f, "invalid number at position {}", pos),
        }
    }
}

impl std::error::Error for Error {}
