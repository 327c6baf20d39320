use crate::{colors, ByteExt, Error, Stream};

/// Representation of the [`<color>`] type.
///
/// [`<color>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeColor
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    /// Constructs a new opaque `Color` from RGB values.
    #[inline]
    pub fn new_rgb(red: u8, green: u8, blue: u8) -> Color {
        Color::new_rgba(red, green, blue, 255)
    }

    /// Constructs a new `Color` from RGBA values.
    #[inline]
    pub fn new_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Color {
        Color {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Constructs a new `Color` set to black.
    #[inline]
    pub fn black() -> Color {
        Color::new_rgb(0, 0, 0)
    }

    /// Constructs a new `Color` set to white.
    #[inline]
    pub fn white() -> Color {
        Color::new_rgb(255, 255, 255)
    }

    /// Constructs a new `Color` set to the mid gray used for malformed `rgb()` values.
    #[inline]
    pub fn gray() -> Color {
        Color::new_rgb(128, 128, 128)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl std::str::FromStr for Color {
    type Err = Error;

    /// Parses `Color` from a string.
    ///
    /// # Errors
    ///
    ///  - Returns error if a color has an invalid format.
    ///  - Returns error if a color is followed by anything except spaces.
    fn from_str(text: &str) -> Result<Self, Error> {
        let mut s = Stream::from(text);
        let color = s.parse_color()?;

        s.skip_spaces();
        if !s.at_end() {
            return Err(Error::UnexpectedData(s.calc_char_pos()));
        }

        Ok(color)
    }
}

impl<'a> Stream<'a> {
    /// Tries to parse a color, but doesn't advance on error.
    pub fn try_parse_color(&mut self) -> Option<Color> {
        let mut s = *self;
        let color = s.parse_color().ok()?;
        *self = s;
        Some(color)
    }

    /// Parses a color.
    ///
    /// Supported forms are `#rgb`, `#rrggbb`, `rgb(r, g, b)` with integer or
    /// percent channels and the SVG named colors.
    ///
    /// # Notes
    ///
    /// - Named colors are case-insensitive.
    /// - Percent channels are converted as `round(pct * 255 / 100)`.
    /// - All channels are clipped to the 0..255 range.
    pub fn parse_color(&mut self) -> Result<Color, Error> {
        self.skip_spaces();

        if self.curr_byte()? == b'#' {
            self.advance(1);
            let start = self.pos();
            let digits = self.consume_bytes(|c| c.is_hex_digit()).as_bytes();
            return match *digits {
                [r, g, b] => Ok(Color::new_rgb(short_hex(r), short_hex(g), short_hex(b))),
                [r1, r2, g1, g2, b1, b2] => Ok(Color::new_rgb(
                    hex_pair(r1, r2),
                    hex_pair(g1, g2),
                    hex_pair(b1, b2),
                )),
                _ => Err(Error::InvalidNumber(self.calc_char_pos_at(start))),
            };
        }

        let start = self.pos();
        let name = self.consume_ascii_ident();
        if name.eq_ignore_ascii_case("rgb") {
            self.skip_spaces();
            self.consume_byte(b'(')?;

            let red = self.parse_color_channel()?;
            let green = self.parse_color_channel()?;
            let blue = self.parse_color_channel()?;

            self.skip_spaces();
            self.consume_byte(b')')?;

            Ok(Color::new_rgb(red, green, blue))
        } else {
            match colors::from_str(&name.to_ascii_lowercase()) {
                Some(c) => Ok(c),
                None => Err(Error::InvalidString {
                    expected: "a color name".to_string(),
                    actual: name.to_string(),
                    pos: self.calc_char_pos_at(start),
                }),
            }
        }
    }

    // Parses a single `rgb()` channel, integer or percent.
    fn parse_color_channel(&mut self) -> Result<u8, Error> {
        self.skip_spaces();
        let value = self.parse_number()?;
        let value = if self.starts_with(b"%") {
            self.advance(1);
            (value * 255.0 / 100.0).round()
        } else {
            value.round()
        };

        self.skip_spaces();
        self.parse_list_separator();

        Ok(value.max(0.0).min(255.0) as u8)
    }
}

#[inline]
fn from_hex(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

#[inline]
fn short_hex(c: u8) -> u8 {
    let h = from_hex(c);
    (h << 4) | h
}

#[inline]
fn hex_pair(c1: u8, c2: u8) -> u8 {
    (from_hex(c1) << 4) | from_hex(c2)
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $color:expr) => {
            #[test]
            fn $name() {
                assert_eq!(Color::from_str($text).unwrap(), $color);
            }
        };
    }

    test!(rrggbb,           "#ff0000",                   Color::new_rgb(255, 0, 0));
    test!(rrggbb_upper,     "#FF0000",                   Color::new_rgb(255, 0, 0));
    test!(rgb_hex,          "#abc",                      Color::new_rgb(170, 187, 204));
    test!(spaced,           "  #ff0000  ",               Color::new_rgb(255, 0, 0));
    test!(rgb_numeric,      "rgb(254, 203, 231)",        Color::new_rgb(254, 203, 231));
    test!(rgb_no_commas,    "rgb(1 2 3)",                Color::new_rgb(1, 2, 3));
    test!(rgb_percent,      "rgb(50%,0%,100%)",          Color::new_rgb(128, 0, 255));
    test!(rgb_clipped,      "rgb(-10, 300, 20%)",        Color::new_rgb(0, 255, 51));
    test!(rgb_upper,        "RGB(1, 2, 3)",              Color::new_rgb(1, 2, 3));
    test!(rgb_fractional,   "rgb(10.6, 0, 0)",           Color::new_rgb(11, 0, 0));
    test!(name_red,         "red",                       Color::new_rgb(255, 0, 0));
    test!(name_mixed_case,  "LightGoldenRodYellow",      Color::new_rgb(250, 250, 210));
    test!(name_spaced,      " blue ",                    Color::new_rgb(0, 0, 255));

    macro_rules! test_err {
        ($name:ident, $text:expr, $err:expr) => {
            #[test]
            fn $name() {
                assert_eq!(Color::from_str($text).unwrap_err().to_string(), $err);
            }
        };
    }

    test_err!(icc_color,      "#CD853F icc-color(acmecmyk, 0.11, 0.48, 0.83, 0.00)",
              "unexpected data at position 9");
    test_err!(unknown_name,   "text",           "expected 'a color name' not 'text' at position 1");
    test_err!(empty,          "",               "unexpected end of stream");
    test_err!(hex_4,          "#1234",          "invalid number at position 2");
    test_err!(hex_8,          "#12345678",      "invalid number at position 2");
    test_err!(rgb_unclosed,   "rgb(1, 2, 3",    "unexpected end of stream");
    test_err!(rgb_short,      "rgb(1, 2)",      "invalid number at position 9");
    test_err!(rgb_truncated,  "rgb(1, 2",       "invalid number at position 9");

    #[test]
    fn try_parse_keeps_position() {
        let mut s = Stream::from("url(#a)");
        assert_eq!(s.try_parse_color(), None);
        assert_eq!(s.pos(), 0);
    }

    #[test]
    fn display() {
        assert_eq!(Color::new_rgb(255, 0, 16).to_string(), "#ff0010");
    }
}
