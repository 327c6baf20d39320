use crate::Error;

/// ASCII character classes used by the value grammars.
///
/// Bytes of multi-byte UTF-8 sequences never belong to any class.
pub trait ByteExt {
    /// `+` or `-`.
    fn is_sign(&self) -> bool;

    /// `[0-9]`
    fn is_digit(&self) -> bool;

    /// `[0-9A-Fa-f]`
    fn is_hex_digit(&self) -> bool;

    /// XML whitespace: space, tab, CR and LF.
    fn is_space(&self) -> bool;

    /// A byte that can begin a number: a digit, a sign or a dot.
    fn is_number_start(&self) -> bool;
}

impl ByteExt for u8 {
    #[inline]
    fn is_sign(&self) -> bool {
        *self == b'+' || *self == b'-'
    }

    #[inline]
    fn is_digit(&self) -> bool {
        self.is_ascii_digit()
    }

    #[inline]
    fn is_hex_digit(&self) -> bool {
        self.is_ascii_hexdigit()
    }

    #[inline]
    fn is_space(&self) -> bool {
        matches!(*self, b' ' | b'\t' | b'\r' | b'\n')
    }

    #[inline]
    fn is_number_start(&self) -> bool {
        self.is_digit() || self.is_sign() || *self == b'.'
    }
}

/// A cursor over an attribute value.
///
/// The cursor only moves forward. Parsers copy it when they need to backtrack.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Stream<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> From<&'a str> for Stream<'a> {
    #[inline]
    fn from(text: &'a str) -> Self {
        Stream { text, pos: 0 }
    }
}

impl<'a> Stream<'a> {
    /// The current byte offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Whether all the input was consumed.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Moves the cursor past the input, so nothing else is parsed.
    #[inline]
    pub fn jump_to_end(&mut self) {
        self.pos = self.text.len();
    }

    /// Moves the cursor forward by `n` bytes.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.text.len());
        self.pos += n;
    }

    /// The 1-based char position of the cursor, for error messages.
    pub fn calc_char_pos(&self) -> usize {
        self.calc_char_pos_at(self.pos)
    }

    /// The 1-based char position of a byte offset, for error messages.
    pub fn calc_char_pos_at(&self, byte_pos: usize) -> usize {
        self.text.char_indices().take_while(|(idx, _)| *idx < byte_pos).count() + 1
    }

    /// Returns the byte `n` bytes after the cursor.
    #[inline]
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + n).copied()
    }

    /// Returns the byte under the cursor.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// Returns the byte under the cursor or `UnexpectedEndOfStream`.
    #[inline]
    pub fn curr_byte(&self) -> Result<u8, Error> {
        self.peek().ok_or(Error::UnexpectedEndOfStream)
    }

    /// Checks that the rest of the input begins with `prefix`.
    #[inline]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.text.as_bytes()[self.pos..].starts_with(prefix)
    }

    /// Skips XML whitespace.
    pub fn skip_spaces(&mut self) {
        self.skip_bytes(|c| c.is_space());
    }

    /// Skips ASCII digits.
    pub fn skip_digits(&mut self) {
        self.skip_bytes(|c| c.is_digit());
    }

    /// Skips bytes while `f` holds.
    pub fn skip_bytes<F: Fn(u8) -> bool>(&mut self, f: F) {
        while let Some(c) = self.peek() {
            if !f(c) {
                break;
            }

            self.pos += 1;
        }
    }

    /// Skips bytes while `f` holds and returns them. Can be empty.
    pub fn consume_bytes<F: Fn(u8) -> bool>(&mut self, f: F) -> &'a str {
        let start = self.pos;
        self.skip_bytes(f);
        self.slice_back(start)
    }

    /// Consumes a keyword made of ASCII letters, digits, `-` and `_`. Can be empty.
    pub fn consume_ascii_ident(&mut self) -> &'a str {
        self.consume_bytes(|c| c.is_ascii_alphanumeric() || c == b'-' || c == b'_')
    }

    /// Consumes the byte `c`.
    pub fn consume_byte(&mut self, c: u8) -> Result<(), Error> {
        let actual = self.curr_byte()?;
        if actual != c {
            return Err(Error::InvalidChar {
                expected: c,
                actual,
                pos: self.calc_char_pos(),
            });
        }

        self.pos += 1;
        Ok(())
    }

    /// Consumes the ASCII `prefix`.
    pub fn consume_string(&mut self, prefix: &[u8]) -> Result<(), Error> {
        if self.at_end() {
            return Err(Error::UnexpectedEndOfStream);
        }

        if !self.starts_with(prefix) {
            // Counted in chars, so a multi-byte char is never split.
            let actual = self.slice_tail().chars().take(prefix.len()).collect();
            return Err(Error::InvalidString {
                expected: String::from_utf8_lossy(prefix).into_owned(),
                actual,
                pos: self.calc_char_pos(),
            });
        }

        self.pos += prefix.len();
        Ok(())
    }

    /// The text between `start` and the cursor.
    #[inline]
    pub fn slice_back(&self, start: usize) -> &'a str {
        &self.text[start..self.pos]
    }

    /// The text after the cursor.
    #[inline]
    pub fn slice_tail(&self) -> &'a str {
        &self.text[self.pos..]
    }

    // List items are separated by whitespace and at most one comma.
    #[inline]
    pub(crate) fn parse_list_separator(&mut self) {
        if self.peek() == Some(b',') {
            self.pos += 1;
        }
    }
}
