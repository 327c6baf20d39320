use crate::{ByteExt, Error, Stream};

/// Representation of the path segment.
///
/// Coordinates are kept exactly as written: relative segments are not resolved here.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathSegment {
    MoveTo {
        abs: bool,
        x: f64,
        y: f64,
    },
    LineTo {
        abs: bool,
        x: f64,
        y: f64,
    },
    HorizontalLineTo {
        abs: bool,
        x: f64,
    },
    VerticalLineTo {
        abs: bool,
        y: f64,
    },
    CurveTo {
        abs: bool,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    SmoothCurveTo {
        abs: bool,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    Quadratic {
        abs: bool,
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    SmoothQuadratic {
        abs: bool,
        x: f64,
        y: f64,
    },
    EllipticalArc {
        abs: bool,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    ClosePath {
        abs: bool,
    },
}

impl PathSegment {
    /// Checks that the segment uses absolute coordinates.
    pub fn is_absolute(&self) -> bool {
        match *self {
            PathSegment::MoveTo { abs, .. }
            | PathSegment::LineTo { abs, .. }
            | PathSegment::HorizontalLineTo { abs, .. }
            | PathSegment::VerticalLineTo { abs, .. }
            | PathSegment::CurveTo { abs, .. }
            | PathSegment::SmoothCurveTo { abs, .. }
            | PathSegment::Quadratic { abs, .. }
            | PathSegment::SmoothQuadratic { abs, .. }
            | PathSegment::EllipticalArc { abs, .. }
            | PathSegment::ClosePath { abs } => abs,
        }
    }

    /// Returns the command letter of the segment.
    pub fn command(&self) -> char {
        let c = match *self {
            PathSegment::MoveTo { .. } => 'm',
            PathSegment::LineTo { .. } => 'l',
            PathSegment::HorizontalLineTo { .. } => 'h',
            PathSegment::VerticalLineTo { .. } => 'v',
            PathSegment::CurveTo { .. } => 'c',
            PathSegment::SmoothCurveTo { .. } => 's',
            PathSegment::Quadratic { .. } => 'q',
            PathSegment::SmoothQuadratic { .. } => 't',
            PathSegment::EllipticalArc { .. } => 'a',
            PathSegment::ClosePath { .. } => 'z',
        };

        if self.is_absolute() {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

/// A pull-based [path data] parser.
///
/// Segments are returned as written: relative coordinates are not resolved
/// and implicit commands are made explicit.
///
/// - The data must start with a MoveTo.
/// - Extra numbers repeat the previous command. After a MoveTo they are LineTo
///   pairs of the same absoluteness, so `m 1 2 3 4` is `m 1 2 l 3 4`.
/// - Arc flags are a single `0` or `1` and need no separator: `a5 5 0 1130 40`.
/// - After the first error the parser yields nothing else.
///
/// # Examples
///
/// ```
/// use svgshape_types::{PathParser, PathSegment};
///
/// let mut p = PathParser::from("M1 2 3 4z");
/// assert_eq!(p.next().unwrap().unwrap(), PathSegment::MoveTo { abs: true, x: 1.0, y: 2.0 });
/// assert_eq!(p.next().unwrap().unwrap(), PathSegment::LineTo { abs: true, x: 3.0, y: 4.0 });
/// assert_eq!(p.next().unwrap().unwrap(), PathSegment::ClosePath { abs: false });
/// assert!(p.next().is_none());
/// ```
///
/// [path data]: https://www.w3.org/TR/SVG11/paths.html#PathData
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PathParser<'a> {
    stream: Stream<'a>,
    prev: Option<Command>,
}

impl<'a> From<&'a str> for PathParser<'a> {
    #[inline]
    fn from(text: &'a str) -> Self {
        PathParser {
            stream: Stream::from(text),
            prev: None,
        }
    }
}

impl<'a> Iterator for PathParser<'a> {
    type Item = Result<PathSegment, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stream.skip_spaces();
        if self.stream.at_end() {
            return None;
        }

        let res = self.next_command().and_then(|cmd| {
            let segment = parse_arguments(&mut self.stream, cmd)?;
            self.prev = Some(cmd);
            Ok(segment)
        });

        if res.is_err() {
            self.stream.jump_to_end();
        }

        Some(res)
    }
}

impl<'a> PathParser<'a> {
    // Reads an explicit command letter or derives an implicit one.
    fn next_command(&mut self) -> Result<Command, Error> {
        let s = &mut self.stream;
        let pos = s.calc_char_pos();
        let c = s.curr_byte()?;

        if let Some(cmd) = Command::from_letter(c) {
            if self.prev.is_none() && cmd.kind != b'm' {
                return Err(Error::UnexpectedData(pos));
            }

            s.advance(1);
            return Ok(cmd);
        }

        if c.is_number_start() {
            if let Some(cmd) = self.prev.and_then(Command::repeated) {
                return Ok(cmd);
            }
        }

        Err(Error::UnexpectedData(pos))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Command {
    // A lowercase command letter.
    kind: u8,
    abs: bool,
}

impl Command {
    fn from_letter(c: u8) -> Option<Self> {
        let kind = c.to_ascii_lowercase();
        if !c.is_ascii_alphabetic() || !b"mlhvcsqtaz".contains(&kind) {
            return None;
        }

        Some(Command {
            kind,
            abs: c.is_ascii_uppercase(),
        })
    }

    // The command implied by a number that follows this one.
    fn repeated(self) -> Option<Self> {
        match self.kind {
            b'z' => None,
            b'm' => Some(Command { kind: b'l', ..self }),
            _ => Some(self),
        }
    }
}

fn parse_arguments(s: &mut Stream, cmd: Command) -> Result<PathSegment, Error> {
    let abs = cmd.abs;
    let segment = match cmd.kind {
        b'm' => {
            let [x, y] = numbers(s)?;
            PathSegment::MoveTo { abs, x, y }
        }
        b'l' => {
            let [x, y] = numbers(s)?;
            PathSegment::LineTo { abs, x, y }
        }
        b'h' => {
            let [x] = numbers(s)?;
            PathSegment::HorizontalLineTo { abs, x }
        }
        b'v' => {
            let [y] = numbers(s)?;
            PathSegment::VerticalLineTo { abs, y }
        }
        b'c' => {
            let [x1, y1, x2, y2, x, y] = numbers(s)?;
            PathSegment::CurveTo { abs, x1, y1, x2, y2, x, y }
        }
        b's' => {
            let [x2, y2, x, y] = numbers(s)?;
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y }
        }
        b'q' => {
            let [x1, y1, x, y] = numbers(s)?;
            PathSegment::Quadratic { abs, x1, y1, x, y }
        }
        b't' => {
            let [x, y] = numbers(s)?;
            PathSegment::SmoothQuadratic { abs, x, y }
        }
        b'a' => {
            let [rx, ry, x_axis_rotation] = numbers(s)?;
            let large_arc = flag(s)?;
            let sweep = flag(s)?;
            let [x, y] = numbers(s)?;
            PathSegment::EllipticalArc { abs, rx, ry, x_axis_rotation, large_arc, sweep, x, y }
        }
        _ => PathSegment::ClosePath { abs },
    };

    Ok(segment)
}

fn numbers<const N: usize>(s: &mut Stream) -> Result<[f64; N], Error> {
    let mut list = [0.0; N];
    for n in &mut list {
        *n = s.parse_list_number()?;
    }

    Ok(list)
}

// A single `0` or `1`, optionally followed by a separator.
fn flag(s: &mut Stream) -> Result<bool, Error> {
    s.skip_spaces();
    let value = match s.curr_byte()? {
        b'0' => false,
        b'1' => true,
        _ => return Err(Error::UnexpectedData(s.calc_char_pos())),
    };

    s.advance(1);
    s.skip_spaces();
    s.parse_list_separator();
    Ok(value)
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    use super::PathSegment::*;

    // Checks the parsed prefix, then that parsing stopped with an error or at the end.
    macro_rules! test {
        ($name:ident, $text:expr, $( $seg:expr ),*) => (
            #[test]
            fn $name() {
                let mut p = PathParser::from($text);
                $(
                    assert_eq!(p.next().unwrap().unwrap(), $seg);
                )*

                if let Some(res) = p.next() {
                    assert!(res.is_err());
                    assert!(p.next().is_none());
                }
            }
        )
    }

    test!(blank, " \n\t", );
    test!(starts_with_line, "l 1 1", );
    test!(starts_with_number, "10 20", );
    test!(lone_move_letter, "m", );

    test!(implicit_after_relative_move, "m1 1 2 2 3 3",
        MoveTo { abs: false, x: 1.0, y: 1.0 },
        LineTo { abs: false, x: 2.0, y: 2.0 },
        LineTo { abs: false, x: 3.0, y: 3.0 }
    );

    test!(implicit_quadratic, "M0,0Q1,1,2,0 3,-1,4,0",
        MoveTo { abs: true, x: 0.0, y: 0.0 },
        Quadratic { abs: true, x1: 1.0, y1: 1.0, x: 2.0, y: 0.0 },
        Quadratic { abs: true, x1: 3.0, y1: -1.0, x: 4.0, y: 0.0 }
    );

    test!(implicit_smooth, "M0 0T1 1 2 2S3 3 4 4",
        MoveTo { abs: true, x: 0.0, y: 0.0 },
        SmoothQuadratic { abs: true, x: 1.0, y: 1.0 },
        SmoothQuadratic { abs: true, x: 2.0, y: 2.0 },
        SmoothCurveTo { abs: true, x2: 3.0, y2: 3.0, x: 4.0, y: 4.0 }
    );

    test!(dense_numbers, "M.5.5-1-1v.25e1",
        MoveTo { abs: true, x: 0.5, y: 0.5 },
        LineTo { abs: true, x: -1.0, y: -1.0 },
        VerticalLineTo { abs: false, y: 2.5 }
    );

    test!(curve_then_close, "M0 0c0 5 10 5 10 0Zm0 0",
        MoveTo { abs: true, x: 0.0, y: 0.0 },
        CurveTo { abs: false, x1: 0.0, y1: 5.0, x2: 10.0, y2: 5.0, x: 10.0, y: 0.0 },
        ClosePath { abs: true },
        MoveTo { abs: false, x: 0.0, y: 0.0 }
    );

    test!(packed_arc_flags, "M0 0a5 5 0 1130 40",
        MoveTo { abs: true, x: 0.0, y: 0.0 },
        EllipticalArc {
            abs: false, rx: 5.0, ry: 5.0, x_axis_rotation: 0.0,
            large_arc: true, sweep: true, x: 30.0, y: 40.0,
        }
    );

    test!(arc_flags_with_separators, "M0 0A10,20,45,0 , 1,5,5",
        MoveTo { abs: true, x: 0.0, y: 0.0 },
        EllipticalArc {
            abs: true, rx: 10.0, ry: 20.0, x_axis_rotation: 45.0,
            large_arc: false, sweep: true, x: 5.0, y: 5.0,
        }
    );

    test!(arc_flag_is_a_single_char, "M0 0a1 1 0 10 1 1",
        MoveTo { abs: true, x: 0.0, y: 0.0 },
        EllipticalArc {
            abs: false, rx: 1.0, ry: 1.0, x_axis_rotation: 0.0,
            large_arc: true, sweep: false, x: 1.0, y: 1.0,
        }
    );

    test!(arc_flag_out_of_range, "M0 0a1 1 0 0 .5 1 1",
        MoveTo { abs: true, x: 0.0, y: 0.0 }
    );

    test!(truncated_curve, "M0 0C1 2 3 4 5",
        MoveTo { abs: true, x: 0.0, y: 0.0 }
    );

    test!(number_after_close, "M1 1z 2 2",
        MoveTo { abs: true, x: 1.0, y: 1.0 },
        ClosePath { abs: false }
    );

    test!(unknown_letter, "M1 1 L2 2 X3 3",
        MoveTo { abs: true, x: 1.0, y: 1.0 },
        LineTo { abs: true, x: 2.0, y: 2.0 }
    );

    test!(legacy_exponent, "M1e 2",
    );

    #[test]
    fn error_positions() {
        let mut p = PathParser::from("M 0 0 H 5 K");
        assert!(p.next().unwrap().is_ok());
        assert!(p.next().unwrap().is_ok());
        assert_eq!(p.next().unwrap().unwrap_err().to_string(), "unexpected data at position 11");

        let mut p = PathParser::from("M 0 0 a 1 1 0 2");
        assert!(p.next().unwrap().is_ok());
        assert_eq!(p.next().unwrap().unwrap_err().to_string(), "unexpected data at position 15");
    }

    #[test]
    fn command_letters() {
        assert_eq!(MoveTo { abs: true, x: 0.0, y: 0.0 }.command(), 'M');
        assert_eq!(VerticalLineTo { abs: false, y: 0.0 }.command(), 'v');
        assert!(!ClosePath { abs: false }.is_absolute());
    }
}
