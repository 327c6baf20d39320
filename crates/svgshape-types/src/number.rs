use std::str::FromStr;

use crate::{ByteExt, Error, Stream};

/// An [SVG number](https://www.w3.org/TR/SVG2/types.html#InterfaceSVGNumber).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Number(pub f64);

impl std::str::FromStr for Number {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut s = Stream::from(text);
        let n = s.parse_number()?;
        s.skip_spaces();
        if !s.at_end() {
            return Err(Error::UnexpectedData(s.calc_char_pos()));
        }

        Ok(Self(n))
    }
}

impl<'a> Stream<'a> {
    /// Parses number from the stream.
    ///
    /// Grammar: an optional sign, an integer digit run, an optional `.` followed by
    /// a fraction digit run and an optional exponent. At least one digit must be
    /// present in the integer or the fraction part.
    ///
    /// The parser stops right before any non-numeric suffix, so a unit can be read
    /// afterwards. An `e` is treated as an exponent only when it is followed by
    /// a digit (optionally signed), which keeps `1em` and `1ex` intact.
    ///
    /// <https://www.w3.org/TR/SVG2/types.html#InterfaceSVGNumber>
    ///
    /// # Errors
    ///
    /// - `InvalidNumber` when no digits are present
    pub fn parse_number(&mut self) -> Result<f64, Error> {
        // Strip off leading whitespaces.
        self.skip_spaces();

        let start = self.pos();

        if self.at_end() {
            return Err(Error::InvalidNumber(self.calc_char_pos_at(start)));
        }

        self.parse_number_impl()
            .map_err(|_| Error::InvalidNumber(self.calc_char_pos_at(start)))
    }

    fn parse_number_impl(&mut self) -> Result<f64, Error> {
        let start = self.pos();

        if self.curr_byte()?.is_sign() {
            self.advance(1);
        }

        let int_start = self.pos();
        self.skip_digits();
        let mut has_digits = self.pos() > int_start;

        if self.peek() == Some(b'.') {
            self.advance(1);
            let frac_start = self.pos();
            self.skip_digits();
            has_digits |= self.pos() > frac_start;
        }

        if !has_digits {
            return Err(Error::InvalidValue);
        }

        if let Ok(c) = self.curr_byte() {
            if matches!(c, b'e' | b'E') && self.is_exponent_ahead() {
                self.advance(1);
                if self.curr_byte()?.is_sign() {
                    self.advance(1);
                }

                self.skip_digits();
            }
        }

        let s = self.slice_back(start);
        f64::from_str(s).map_err(|_| Error::InvalidValue)
    }

    // Checks `e[+-]?[0-9]` starting at the current `e`.
    fn is_exponent_ahead(&self) -> bool {
        match self.peek_at(1) {
            Some(c) if c.is_digit() => true,
            Some(c) if c.is_sign() => self.peek_at(2).map_or(false, |c| c.is_digit()),
            _ => false,
        }
    }

    /// Parses number from a list of numbers.
    pub fn parse_list_number(&mut self) -> Result<f64, Error> {
        if self.at_end() {
            return Err(Error::UnexpectedEndOfStream);
        }

        let n = self.parse_number()?;
        self.skip_spaces();
        self.parse_list_separator();
        Ok(n)
    }
}

/// A pull-based [`<list-of-numbers>`] parser.
///
/// # Examples
///
/// ```
/// use svgshape_types::NumberListParser;
///
/// let mut p = NumberListParser::from("10, 20 -50");
/// assert_eq!(p.next().unwrap().unwrap(), 10.0);
/// assert_eq!(p.next().unwrap().unwrap(), 20.0);
/// assert_eq!(p.next().unwrap().unwrap(), -50.0);
/// assert_eq!(p.next().is_none(), true);
/// ```
///
/// [`<list-of-numbers>`]: https://www.w3.org/TR/SVG2/types.html#InterfaceSVGNumberList
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NumberListParser<'a>(Stream<'a>);

impl<'a> From<&'a str> for NumberListParser<'a> {
    #[inline]
    fn from(v: &'a str) -> Self {
        NumberListParser(Stream::from(v))
    }
}

impl<'a> Iterator for NumberListParser<'a> {
    type Item = Result<f64, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.skip_spaces();
        if self.0.at_end() {
            None
        } else {
            let v = self.0.parse_list_number();
            if v.is_err() {
                self.0.jump_to_end();
            }

            Some(v)
        }
    }
}
