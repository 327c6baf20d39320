use crate::{ByteExt, Error, Stream};

/// A same-document reference, like `#id`.
///
/// External references are rejected. The wrapped value is the id without the `#`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct IRI<'a>(pub &'a str);

impl<'a> IRI<'a> {
    /// Parses a reference from an `href` value.
    ///
    /// Surrounding whitespace is allowed.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &'a str) -> Result<Self, Error> {
        local_id(trim_spaces(text)).map(IRI)
    }
}

impl<'a> Stream<'a> {
    /// Parses `url(#id)` and returns the id.
    ///
    /// The link may be padded with whitespace and wrapped in matching
    /// single or double quotes.
    pub fn parse_func_iri(&mut self) -> Result<&'a str, Error> {
        self.skip_spaces();
        self.consume_string(b"url(")?;
        let inner = self.consume_bytes(|c| c != b')');
        self.consume_byte(b')')?;

        let inner = trim_spaces(inner);
        let inner = match inner.as_bytes().first() {
            Some(&q) if q == b'\'' || q == b'"' => {
                let unquoted = inner[1..].strip_suffix(q as char).ok_or(Error::InvalidValue)?;
                trim_spaces(unquoted)
            }
            _ => inner,
        };

        local_id(inner)
    }
}

fn trim_spaces(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_ascii() && (c as u8).is_space())
}

// `#` followed by a non-empty id without whitespace.
fn local_id(text: &str) -> Result<&str, Error> {
    match text.strip_prefix('#') {
        Some(id) if !id.is_empty() && !id.bytes().any(|c| c.is_space()) => Ok(id),
        _ => Err(Error::InvalidValue),
    }
}
