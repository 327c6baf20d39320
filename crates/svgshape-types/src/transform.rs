use crate::{ByteExt, Error, Stream};

/// Representation of the [`<transform>`] type.
///
/// A 2×3 affine matrix. A point `(x, y)` is mapped to
/// `(a*x + c*y + e, b*x + d*y + f)`.
///
/// [`<transform>`]: https://www.w3.org/TR/SVG11/coords.html#TransformAttribute
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    /// Constructs a new transform.
    #[inline]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Transform { a, b, c, d, e, f }
    }

    /// Constructs a new translate transform.
    #[inline]
    pub fn from_translate(tx: f64, ty: f64) -> Self {
        Transform::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Constructs a new scale transform.
    #[inline]
    pub fn from_scale(sx: f64, sy: f64) -> Self {
        Transform::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Constructs a new rotate transform. The angle is in degrees.
    pub fn from_rotate(angle: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Transform::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Checks that transform is an identity.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Transform::default()
    }

    /// Returns `self × other`.
    ///
    /// The resulting transform applies `other` first and `self` second.
    #[inline(never)]
    pub fn pre_concat(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Maps a point.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Returns the average of the horizontal and vertical scale factors.
    ///
    /// Used to bring a user-space length, like a stroke width, into device space.
    pub fn average_scale(&self) -> f64 {
        let sx = (self.a * self.a + self.b * self.b).sqrt();
        let sy = (self.c * self.c + self.d * self.d).sqrt();
        (sx + sy) * 0.5
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Transform {
        Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }
}

/// Transform list token.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum TransformListToken {
    Matrix {
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    },
    Translate {
        tx: f64,
        ty: f64,
    },
    Scale {
        sx: f64,
        sy: f64,
    },
    Rotate {
        angle: f64,
    },
    SkewX {
        angle: f64,
    },
    SkewY {
        angle: f64,
    },
}

impl TransformListToken {
    /// Converts a token into an elementary matrix.
    pub fn to_transform(&self) -> Transform {
        match *self {
            TransformListToken::Matrix { a, b, c, d, e, f } => Transform::new(a, b, c, d, e, f),
            TransformListToken::Translate { tx, ty } => Transform::from_translate(tx, ty),
            TransformListToken::Scale { sx, sy } => Transform::from_scale(sx, sy),
            TransformListToken::Rotate { angle } => Transform::from_rotate(angle),
            TransformListToken::SkewX { angle } => {
                Transform::new(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0)
            }
            TransformListToken::SkewY { angle } => {
                Transform::new(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Function {
    Matrix,
    Translate,
    Scale,
    Rotate,
    SkewX,
    SkewY,
}

impl Function {
    fn from_prefix(text: &str) -> Option<(Self, usize)> {
        const NAMES: &[(&str, Function)] = &[
            ("matrix", Function::Matrix),
            ("translate", Function::Translate),
            ("scale", Function::Scale),
            ("rotate", Function::Rotate),
            ("skewX", Function::SkewX),
            ("skewY", Function::SkewY),
        ];

        NAMES
            .iter()
            .find(|(name, _)| text.starts_with(name))
            .map(|&(name, f)| (f, name.len()))
    }
}

const MAX_ARGS: usize = 6;

/// A pull-based [`<transform-list>`] parser.
///
/// Arguments are scanned generically: any number-looking run is an argument
/// and everything else up to the closing `)` is a separator.
/// Unknown function names are skipped one character at a time.
///
/// # Errors
///
/// - `UnexpectedEndOfStream` when an argument list is not closed.
/// - `InvalidValue` when a function got a wrong number of arguments.
///
/// # Notes
///
/// - There are no separate `rotate(<rotate-angle> <cx> <cy>)` type.
///   It will be automatically split into three `Transform` tokens:
///   `translate(<cx> <cy>) rotate(<rotate-angle>) translate(-<cx> -<cy>)`.
///
/// # Examples
///
/// ```
/// use svgshape_types::{TransformListParser, TransformListToken};
///
/// let mut p = TransformListParser::from("scale(2) translate(10, -20)");
/// assert_eq!(p.next().unwrap().unwrap(), TransformListToken::Scale { sx: 2.0, sy: 2.0 } );
/// assert_eq!(p.next().unwrap().unwrap(), TransformListToken::Translate { tx: 10.0, ty: -20.0 } );
/// assert_eq!(p.next().is_none(), true);
/// ```
///
/// [`<transform-list>`]: https://www.w3.org/TR/SVG11/coords.html#TransformAttribute
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TransformListParser<'a> {
    stream: Stream<'a>,
    rotate_ts: Option<(f64, f64)>,
    last_angle: Option<f64>,
}

impl<'a> From<&'a str> for TransformListParser<'a> {
    fn from(text: &'a str) -> Self {
        TransformListParser {
            stream: Stream::from(text),
            rotate_ts: None,
            last_angle: None,
        }
    }
}

impl<'a> Iterator for TransformListParser<'a> {
    type Item = Result<TransformListToken, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(a) = self.last_angle.take() {
            return Some(Ok(TransformListToken::Rotate { angle: a }));
        }

        if let Some((x, y)) = self.rotate_ts.take() {
            return Some(Ok(TransformListToken::Translate { tx: -x, ty: -y }));
        }

        loop {
            self.stream.skip_bytes(|c| c.is_space() || c == b',');

            let tail = self.stream.slice_tail();
            let c = tail.chars().next()?;

            if let Some((func, len)) = Function::from_prefix(tail) {
                self.stream.advance(len);
                let res = self.parse_function(func);
                if res.is_err() {
                    self.stream.jump_to_end();
                }

                return Some(res);
            }

            self.stream.advance(c.len_utf8());
        }
    }
}

impl<'a> TransformListParser<'a> {
    fn parse_function(&mut self, func: Function) -> Result<TransformListToken, Error> {
        let mut args = [0.0; MAX_ARGS];
        let n = parse_args(&mut self.stream, &mut args)?;

        let t = match (func, n) {
            (Function::Matrix, 6) => TransformListToken::Matrix {
                a: args[0],
                b: args[1],
                c: args[2],
                d: args[3],
                e: args[4],
                f: args[5],
            },
            (Function::Translate, 1) => TransformListToken::Translate {
                tx: args[0],
                ty: 0.0,
            },
            (Function::Translate, _) if n > 1 => TransformListToken::Translate {
                tx: args[0],
                ty: args[1],
            },
            (Function::Scale, 1) => TransformListToken::Scale {
                sx: args[0],
                sy: args[0],
            },
            (Function::Scale, _) if n > 1 => TransformListToken::Scale {
                sx: args[0],
                sy: args[1],
            },
            (Function::Rotate, 1) => TransformListToken::Rotate { angle: args[0] },
            (Function::Rotate, _) if n >= 3 => {
                self.rotate_ts = Some((args[1], args[2]));
                self.last_angle = Some(args[0]);
                TransformListToken::Translate {
                    tx: args[1],
                    ty: args[2],
                }
            }
            (Function::SkewX, _) if n > 0 => TransformListToken::SkewX { angle: args[0] },
            (Function::SkewY, _) if n > 0 => TransformListToken::SkewY { angle: args[0] },
            _ => return Err(Error::InvalidValue),
        };

        Ok(t)
    }
}

// Scans `( ... )` and collects up to `MAX_ARGS` numbers.
fn parse_args(s: &mut Stream, args: &mut [f64; MAX_ARGS]) -> Result<usize, Error> {
    s.skip_spaces();
    s.consume_byte(b'(')?;

    let mut count = 0;
    loop {
        let c = s.curr_byte()?;
        if c == b')' {
            s.advance(1);
            break;
        }

        if c.is_number_start() {
            let mut tail = *s;
            if let Ok(n) = tail.parse_number() {
                *s = tail;
                if count < MAX_ARGS {
                    args[count] = n;
                    count += 1;
                }

                continue;
            }
        }

        s.advance(1);
    }

    Ok(count)
}

impl std::str::FromStr for Transform {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Error> {
        let mut ts = Transform::default();
        for token in TransformListParser::from(text) {
            ts = ts.pre_concat(&token?.to_transform());
        }

        Ok(ts)
    }
}
