use crate::{Error, Stream};

/// How a viewBox is placed inside the viewport.
#[allow(missing_docs)]
#[derive(Clone, Hash, Copy, PartialEq, Eq, Debug)]
pub enum Align {
    None,
    XMinYMin,
    XMidYMin,
    XMaxYMin,
    XMinYMid,
    XMidYMid,
    XMaxYMid,
    XMinYMax,
    XMidYMax,
    XMaxYMax,
}

impl Align {
    fn from_keyword(text: &str) -> Option<Self> {
        let align = match text {
            "none" => Align::None,
            "xMinYMin" => Align::XMinYMin,
            "xMidYMin" => Align::XMidYMin,
            "xMaxYMin" => Align::XMaxYMin,
            "xMinYMid" => Align::XMinYMid,
            "xMidYMid" => Align::XMidYMid,
            "xMaxYMid" => Align::XMaxYMid,
            "xMinYMax" => Align::XMinYMax,
            "xMidYMax" => Align::XMidYMax,
            "xMaxYMax" => Align::XMaxYMax,
            _ => return None,
        };

        Some(align)
    }
}

/// The `preserveAspectRatio` attribute.
///
/// The default is `xMidYMid meet`.
#[derive(Clone, Hash, Copy, PartialEq, Eq, Debug)]
pub struct AspectRatio {
    /// Alignment of the viewBox inside the viewport.
    pub align: Align,
    /// `slice` scales the viewBox to cover the viewport, `meet` to fit into it.
    pub slice: bool,
}

impl Default for AspectRatio {
    #[inline]
    fn default() -> Self {
        AspectRatio {
            align: Align::XMidYMid,
            slice: false,
        }
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = Error;

    /// Parses `[defer] <align> [meet | slice]`.
    ///
    /// `defer` only matters for referenced images, so it is accepted and dropped.
    fn from_str(text: &str) -> Result<Self, Error> {
        let mut s = Stream::from(text);

        let mut keyword = next_keyword(&mut s);
        if keyword.1 == "defer" {
            keyword = next_keyword(&mut s);
        }

        let (pos, word) = keyword;
        let align = Align::from_keyword(word)
            .ok_or_else(|| Error::UnexpectedData(s.calc_char_pos_at(pos)))?;

        let (pos, word) = next_keyword(&mut s);
        let slice = match word {
            "slice" => true,
            "meet" | "" => false,
            _ => return Err(Error::UnexpectedData(s.calc_char_pos_at(pos))),
        };

        s.skip_spaces();
        if !s.at_end() {
            return Err(Error::UnexpectedData(s.calc_char_pos()));
        }

        Ok(AspectRatio { align, slice })
    }
}

// Returns the byte offset and the text of the next keyword.
fn next_keyword<'a>(s: &mut Stream<'a>) -> (usize, &'a str) {
    s.skip_spaces();
    (s.pos(), s.consume_ascii_ident())
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    macro_rules! test {
        ($name:ident, $text:expr, $align:expr, $slice:expr) => (
            #[test]
            fn $name() {
                let v = AspectRatio::from_str($text).unwrap();
                assert_eq!(v, AspectRatio { align: $align, slice: $slice });
            }
        )
    }

    test!(plain,           "xMaxYMin",               Align::XMaxYMin, false);
    test!(none_slice,      "none slice",             Align::None,     true);
    test!(deferred,        "defer xMinYMax meet",    Align::XMinYMax, false);
    test!(padded,          "\txMidYMax\n slice ",    Align::XMidYMax, true);

    macro_rules! test_err {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(AspectRatio::from_str($text).unwrap_err().to_string(), $result);
            }
        )
    }

    test_err!(empty,           "",                       "unexpected data at position 1");
    test_err!(wrong_case,      "xminymin",               "unexpected data at position 1");
    test_err!(defer_only,      "defer",                  "unexpected data at position 6");
    test_err!(bad_mode,        "xMinYMin fit",           "unexpected data at position 10");
    test_err!(separator,       "xMinYMin;slice",         "unexpected data at position 9");
    test_err!(too_many,        "none meet slice",        "unexpected data at position 11");
}
