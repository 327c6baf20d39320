use std::fmt;

use crate::NumberListParser;

/// A [`ViewBox`] parsing error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ViewBoxError {
    /// Less than four numbers, or a malformed one.
    InvalidNumber,

    /// The width or the height is not positive.
    InvalidSize,
}

impl fmt::Display for ViewBoxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ViewBoxError::InvalidNumber => "viewBox contains an invalid number",
            ViewBoxError::InvalidSize => "viewBox has a negative or zero size",
        })
    }
}

impl std::error::Error for ViewBoxError {}

/// The `viewBox` attribute: the user-space rectangle mapped onto the viewport.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl ViewBox {
    /// Creates a new `ViewBox`.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        ViewBox { x, y, w, h }
    }
}

impl std::str::FromStr for ViewBox {
    type Err = ViewBoxError;

    /// Parses `min-x min-y width height`.
    ///
    /// Anything after the fourth number is ignored.
    fn from_str(text: &str) -> Result<Self, ViewBoxError> {
        let mut numbers = NumberListParser::from(text);
        let mut next = || match numbers.next() {
            Some(Ok(n)) => Ok(n),
            _ => Err(ViewBoxError::InvalidNumber),
        };

        let vb = ViewBox::new(next()?, next()?, next()?, next()?);
        if !(vb.w > 0.0 && vb.h > 0.0) {
            return Err(ViewBoxError::InvalidSize);
        }

        Ok(vb)
    }
}
