// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// List of all errors.
///
/// Everything else is recovered locally and counted in [`Diagnostics`](crate::Diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The input contains no data or only whitespaces.
    EmptyInput,

    /// Only UTF-8 content are supported.
    NotAnUtf8Str,

    /// The document has more elements than [`Options::max_elements`](crate::Options::max_elements) allows.
    ElementsLimitReached,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::EmptyInput => {
                write!(f, "provided data is empty")
            }
            Error::NotAnUtf8Str => {
                write!(f, "provided data has not an UTF-8 encoding")
            }
            Error::ElementsLimitReached => {
                write!(f, "the maximum number of SVG elements has been reached")
            }
        }
    }
}

impl std::error::Error for Error {}
