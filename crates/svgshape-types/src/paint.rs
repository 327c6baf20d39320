use std::str::FromStr;

use crate::{Color, Error, Stream};

/// Representation of the fallback part of the [`<paint>`] type.
///
/// Used by the [`Paint`](enum.Paint.html) type.
///
/// [`<paint>`]: https://www.w3.org/TR/SVG11/painting.html#SpecifyingPaint
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PaintFallback {
    /// The `none` value.
    None,
    /// The `currentColor` value.
    CurrentColor,
    /// [`<color>`] value.
    ///
    /// [`<color>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeColor
    Color(Color),
}

/// Representation of the [`<paint>`] type.
///
/// Doesn't own the data. Use only for parsing.
///
/// [`<paint>`]: https://www.w3.org/TR/SVG11/painting.html#SpecifyingPaint
///
/// # Examples
///
/// ```
/// use svgshape_types::{Paint, PaintFallback, Color};
///
/// let paint = Paint::from_str("url(#gradient) red").unwrap();
/// assert_eq!(paint, Paint::FuncIRI("gradient",
///                                  Some(PaintFallback::Color(Color::new_rgb(255, 0, 0)))));
///
/// let paint = Paint::from_str("inherit").unwrap();
/// assert_eq!(paint, Paint::Inherit);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Paint<'a> {
    /// The `none` value.
    None,
    /// The `inherit` value.
    Inherit,
    /// The `currentColor` value.
    CurrentColor,
    /// [`<color>`] value.
    ///
    /// [`<color>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeColor
    Color(Color),
    /// [`<FuncIRI>`] value with an optional fallback.
    ///
    /// [`<FuncIRI>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeFuncIRI
    FuncIRI(&'a str, Option<PaintFallback>),
}

impl<'a> Paint<'a> {
    /// Parses a `Paint` from a string.
    ///
    /// A malformed color is reported as is, so the caller can tell
    /// `rgb(` garbage apart from an unknown color name.
    ///
    /// We can't use the `FromStr` trait because it requires
    /// an owned value as a return type.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &'a str) -> Result<Self, Error> {
        let text = text.trim();
        match text {
            "none" => return Ok(Paint::None),
            "inherit" => return Ok(Paint::Inherit),
            "currentColor" => return Ok(Paint::CurrentColor),
            _ => {}
        }

        let mut s = Stream::from(text);
        if !s.starts_with(b"url(") {
            return Color::from_str(text).map(Paint::Color);
        }

        let link = s.parse_func_iri()?;
        s.skip_spaces();
        let fallback = match s.slice_tail() {
            "" => None,
            "none" => Some(PaintFallback::None),
            "currentColor" => Some(PaintFallback::CurrentColor),
            tail => Some(PaintFallback::Color(Color::from_str(tail)?)),
        };

        Ok(Paint::FuncIRI(link, fallback))
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(Paint::from_str($text).unwrap(), $result);
            }
        )
    }

    test!(none,                "none",          Paint::None);
    test!(none_spaced,         "  none   ",     Paint::None);
    test!(inherit,             " inherit ",     Paint::Inherit);
    test!(current_color,       " currentColor ", Paint::CurrentColor);
    test!(color,               " red ",         Paint::Color(Color::new_rgb(255, 0, 0)));
    test!(func_iri,            " url(#qwe) ",   Paint::FuncIRI("qwe", None));
    test!(func_iri_none,       " url(#qwe) none ", Paint::FuncIRI("qwe", Some(PaintFallback::None)));
    test!(func_iri_current,    " url(#qwe) currentColor ",
          Paint::FuncIRI("qwe", Some(PaintFallback::CurrentColor)));
    test!(func_iri_color,      " url(#qwe) #00f ",
          Paint::FuncIRI("qwe", Some(PaintFallback::Color(Color::new_rgb(0, 0, 255)))));

    macro_rules! test_err {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(Paint::from_str($text).unwrap_err().to_string(), $result);
            }
        )
    }

    test_err!(unknown_name,    "qwe",           "expected 'a color name' not 'qwe' at position 1");
    test_err!(bad_rgb,         "rgb(1, 2",      "invalid number at position 9");
    test_err!(bad_fallback,    "url(#qwe) qwe", "expected 'a color name' not 'qwe' at position 1");
    test_err!(bad_iri,         "url(qwe)",      "invalid value");
}
