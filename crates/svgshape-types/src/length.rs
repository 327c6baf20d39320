use crate::{Error, Stream};

/// List of all supported length units.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum LengthUnit {
    /// A plain number, i.e. user units.
    None,
    Px,
    Pt,
    Pc,
    Mm,
    Cm,
    In,
    Percent,
    Em,
    Ex,
}

impl LengthUnit {
    // Recognizes a unit by at most two leading bytes.
    fn from_suffix(suffix: &[u8]) -> Option<(LengthUnit, usize)> {
        if suffix.first() == Some(&b'%') {
            return Some((LengthUnit::Percent, 1));
        }

        let unit = match suffix.get(..2)? {
            b"px" => LengthUnit::Px,
            b"pt" => LengthUnit::Pt,
            b"pc" => LengthUnit::Pc,
            b"mm" => LengthUnit::Mm,
            b"cm" => LengthUnit::Cm,
            b"in" => LengthUnit::In,
            b"em" => LengthUnit::Em,
            b"ex" => LengthUnit::Ex,
            _ => return None,
        };

        Some((unit, 2))
    }
}

/// Representation of the [`<length>`] type.
///
/// [`<length>`]: https://www.w3.org/TR/SVG2/types.html#InterfaceSVGLength
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Length {
    pub number: f64,
    pub unit: LengthUnit,
}

impl Length {
    /// Constructs a new length.
    #[inline]
    pub fn new(number: f64, unit: LengthUnit) -> Length {
        Length { number, unit }
    }

    /// Constructs a new length in user units.
    #[inline]
    pub fn new_number(number: f64) -> Length {
        Length::new(number, LengthUnit::None)
    }

    /// Constructs a zero length in user units.
    #[inline]
    pub fn zero() -> Length {
        Length::new_number(0.0)
    }
}

impl Default for Length {
    #[inline]
    fn default() -> Self {
        Length::zero()
    }
}

impl std::str::FromStr for Length {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Error> {
        let mut s = Stream::from(text);
        let length = s.parse_length()?;
        s.skip_spaces();

        if !s.at_end() {
            return Err(Error::UnexpectedData(s.calc_char_pos()));
        }

        Ok(length)
    }
}

impl<'a> Stream<'a> {
    /// Parses length from the stream.
    ///
    /// An unknown suffix is left in the stream and the length is returned in user units.
    ///
    /// <https://www.w3.org/TR/SVG2/types.html#InterfaceSVGLength>
    ///
    /// # Notes
    ///
    /// - Suffix must be lowercase.
    pub fn parse_length(&mut self) -> Result<Length, Error> {
        self.skip_spaces();

        let number = self.parse_number()?;
        match LengthUnit::from_suffix(self.slice_tail().as_bytes()) {
            Some((unit, len)) => {
                self.advance(len);
                Ok(Length::new(number, unit))
            }
            None => Ok(Length::new_number(number)),
        }
    }

    /// Parses length from a list of lengths.
    pub fn parse_list_length(&mut self) -> Result<Length, Error> {
        if self.at_end() {
            return Err(Error::UnexpectedEndOfStream);
        }

        let l = self.parse_length()?;
        self.skip_spaces();
        self.parse_list_separator();
        Ok(l)
    }
}

/// A pull-based [`<list-of-length>`] parser.
///
/// # Examples
///
/// ```
/// use svgshape_types::{Length, LengthUnit, LengthListParser};
///
/// let mut p = LengthListParser::from("10px 20% 50mm");
/// assert_eq!(p.next().unwrap().unwrap(), Length::new(10.0, LengthUnit::Px));
/// assert_eq!(p.next().unwrap().unwrap(), Length::new(20.0, LengthUnit::Percent));
/// assert_eq!(p.next().unwrap().unwrap(), Length::new(50.0, LengthUnit::Mm));
/// assert_eq!(p.next().is_none(), true);
/// ```
///
/// [`<list-of-length>`]: https://www.w3.org/TR/SVG2/types.html#InterfaceSVGLengthList
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LengthListParser<'a>(Stream<'a>);

impl<'a> From<&'a str> for LengthListParser<'a> {
    #[inline]
    fn from(v: &'a str) -> Self {
        LengthListParser(Stream::from(v))
    }
}

impl<'a> Iterator for LengthListParser<'a> {
    type Item = Result<Length, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.skip_spaces();
        if self.0.at_end() {
            return None;
        }

        let v = self.0.parse_list_length();
        if v.is_err() {
            self.0.jump_to_end();
        }

        Some(v)
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    macro_rules! test {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(Length::from_str($text).unwrap(), $result);
            }
        )
    }

    test!(plain,        "1",     Length::new(1.0, LengthUnit::None));
    test!(em,           "1em",   Length::new(1.0, LengthUnit::Em));
    test!(ex,           "1ex",   Length::new(1.0, LengthUnit::Ex));
    test!(px,           "1px",   Length::new(1.0, LengthUnit::Px));
    test!(inch,         "1in",   Length::new(1.0, LengthUnit::In));
    test!(cm,           "1cm",   Length::new(1.0, LengthUnit::Cm));
    test!(mm,           "1mm",   Length::new(1.0, LengthUnit::Mm));
    test!(pt,           "1pt",   Length::new(1.0, LengthUnit::Pt));
    test!(pc,           "1pc",   Length::new(1.0, LengthUnit::Pc));
    test!(percent,      "1%",    Length::new(1.0, LengthUnit::Percent));
    test!(exp,          "1e0",   Length::new(1.0, LengthUnit::None));
    test!(exp_and_unit, "1.0e1em", Length::new(10.0, LengthUnit::Em));
    test!(padded,       " 5mm ", Length::new(5.0, LengthUnit::Mm));

    #[test]
    fn unknown_suffix_is_kept() {
        let mut s = Stream::from("10q");
        assert_eq!(s.parse_length().unwrap(), Length::new(10.0, LengthUnit::None));
        assert_eq!(s.slice_tail(), "q");
    }

    #[test]
    fn uppercase_suffix_is_data() {
        assert_eq!(Length::from_str("1PX").unwrap_err().to_string(),
                   "unexpected data at position 2");
    }

    #[test]
    fn list() {
        let list: Vec<_> = LengthListParser::from("1, 2mm,3%").map(|v| v.unwrap()).collect();
        assert_eq!(list, vec![
            Length::new(1.0, LengthUnit::None),
            Length::new(2.0, LengthUnit::Mm),
            Length::new(3.0, LengthUnit::Percent),
        ]);
    }
}
