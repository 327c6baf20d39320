// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
A streaming tag scanner.

The scanner does not build a tree. It reports start tags, end tags and text
content to a [`TagHandler`] while walking the input once. All reported strings
are borrowed from the input.
*/

use std::ops::ControlFlow;

/// Receives events from [`tokenize`].
pub trait TagHandler<'a> {
    /// Called for each start tag, including self-closing ones.
    ///
    /// Attributes are in document order. Returning `ControlFlow::Break`
    /// stops the scanning.
    fn start_element(&mut self, name: &'a str, attrs: &[(&'a str, &'a str)]) -> ControlFlow<()>;

    /// Called for each end tag.
    ///
    /// A self-closing tag fires it right after [`start_element`](TagHandler::start_element).
    fn end_element(&mut self, name: &'a str);

    /// Called for each non-empty text span between tags. The text is trimmed.
    fn content(&mut self, _text: &'a str) {}
}

/// Scans `text` and reports everything to `handler`.
///
/// Returns the number of malformed tags. A malformed tag is skipped and
/// the scanning resumes at the next `<`.
pub fn tokenize<'a, H: TagHandler<'a>>(text: &'a str, handler: &mut H) -> usize {
    let mut tokenizer = Tokenizer {
        text,
        attrs: Vec::new(),
        malformed: 0,
    };

    tokenizer.run(handler);
    tokenizer.malformed
}

enum TagEnd {
    /// Position of the closing `>`.
    Closed(usize),
    /// Position of an unexpected `<`.
    Abandoned(usize),
    Eof,
}

struct Tokenizer<'a> {
    text: &'a str,
    attrs: Vec<(&'a str, &'a str)>,
    malformed: usize,
}

impl<'a> Tokenizer<'a> {
    fn run<H: TagHandler<'a>>(&mut self, handler: &mut H) {
        let text = self.text;
        let mut pos = 0;

        loop {
            let lt = match find_byte(text, pos, b'<') {
                Some(lt) => lt,
                None => {
                    emit_content(&text[pos..], handler);
                    return;
                }
            };

            emit_content(&text[pos..lt], handler);

            let tail = &text[lt..];
            if tail.starts_with("<!--") {
                match find_str(text, lt + 4, "-->") {
                    Some(end) => {
                        pos = end + 3;
                        continue;
                    }
                    None => {
                        log::warn!("Unterminated comment.");
                        self.malformed += 1;
                        return;
                    }
                }
            }

            if tail.starts_with("<![CDATA[") {
                match find_str(text, lt + 9, "]]>") {
                    Some(end) => {
                        emit_content(&text[lt + 9..end], handler);
                        pos = end + 3;
                        continue;
                    }
                    None => {
                        log::warn!("Unterminated CDATA section.");
                        self.malformed += 1;
                        return;
                    }
                }
            }

            if tail.starts_with("<!DOCTYPE") {
                if let Some(end) = doctype_end(text, lt) {
                    pos = end;
                    continue;
                }
            }

            match scan_tag(text, lt + 1) {
                TagEnd::Closed(gt) => {
                    if self.parse_tag(&text[lt + 1..gt], handler).is_break() {
                        return;
                    }

                    pos = gt + 1;
                }
                TagEnd::Abandoned(next) => {
                    log::warn!("Malformed tag at byte {}. Skipped.", lt);
                    self.malformed += 1;
                    pos = next;
                }
                TagEnd::Eof => {
                    log::warn!("Unterminated tag at byte {}. Skipped.", lt);
                    self.malformed += 1;
                    return;
                }
            }
        }
    }

    fn parse_tag<H: TagHandler<'a>>(&mut self, span: &'a str, handler: &mut H) -> ControlFlow<()> {
        let span = span.trim_start();

        if let Some(end) = span.strip_prefix('/') {
            let name = end.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                log::warn!("Malformed end tag: '</{}>'. Skipped.", end);
                self.malformed += 1;
            } else {
                handler.end_element(name);
            }

            return ControlFlow::Continue(());
        }

        // Processing instructions and directives.
        if span.starts_with('?') || span.starts_with('!') {
            return ControlFlow::Continue(());
        }

        let span = span.trim_end();
        let (span, self_closing) = match span.strip_suffix('/') {
            Some(span) => (span, true),
            None => (span, false),
        };

        let name_len = span
            .find(|c: char| c.is_whitespace() || c == '/')
            .unwrap_or(span.len());
        let name = &span[..name_len];
        if name.is_empty() {
            log::warn!("A tag without a name. Skipped.");
            self.malformed += 1;
            return ControlFlow::Continue(());
        }

        self.attrs.clear();
        if !self.parse_attributes(&span[name_len..]) {
            log::warn!("Malformed attributes in the '{}' tag. Skipped.", name);
            self.malformed += 1;
            return ControlFlow::Continue(());
        }

        if handler.start_element(name, &self.attrs).is_break() {
            return ControlFlow::Break(());
        }

        if self_closing {
            handler.end_element(name);
        }

        ControlFlow::Continue(())
    }

    // Returns `false` when a value has no closing quote.
    fn parse_attributes(&mut self, mut s: &'a str) -> bool {
        loop {
            s = s.trim_start();
            if s.is_empty() {
                return true;
            }

            let name_len = s
                .find(|c: char| c.is_whitespace() || c == '=')
                .unwrap_or(s.len());
            let name = &s[..name_len];
            s = s[name_len..].trim_start();

            let rest = match s.strip_prefix('=') {
                Some(rest) => rest.trim_start(),
                None => {
                    if !name.is_empty() {
                        log::warn!("Attribute '{}' has no value. Skipped.", name);
                    } else {
                        // A stray `=` or another unexpected character.
                        s = &s[s.chars().next().map_or(0, char::len_utf8)..];
                    }

                    continue;
                }
            };

            let quote = match rest.chars().next() {
                Some(c @ '"') | Some(c @ '\'') => c,
                _ => {
                    let value_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
                    log::warn!("Attribute '{}' has an unquoted value. Skipped.", name);
                    s = &rest[value_len..];
                    continue;
                }
            };

            let value = &rest[1..];
            let value_len = match value.find(quote) {
                Some(n) => n,
                None => return false,
            };

            if !name.is_empty() {
                self.attrs.push((name, &value[..value_len]));
            }

            s = &value[value_len + 1..];
        }
    }
}

fn emit_content<'a, H: TagHandler<'a>>(text: &'a str, handler: &mut H) {
    let text = text.trim();
    if !text.is_empty() {
        handler.content(text);
    }
}

// Looks for the `>` that closes a tag, honoring quoted values.
fn scan_tag(text: &str, from: usize) -> TagEnd {
    let mut quote = None;
    for (i, &c) in text.as_bytes()[from..].iter().enumerate() {
        let i = from + i;
        match quote {
            Some(q) if c == q => quote = None,
            _ if c == b'<' => return TagEnd::Abandoned(i),
            Some(_) => {}
            None => match c {
                b'"' | b'\'' => quote = Some(c),
                b'>' => return TagEnd::Closed(i),
                _ => {}
            },
        }
    }

    TagEnd::Eof
}

// A doctype may have an internal subset with nested tags.
fn doctype_end(text: &str, from: usize) -> Option<usize> {
    let gt = find_byte(text, from, b'>')?;
    match find_byte(text, from, b'[') {
        Some(bracket) if bracket < gt => find_str(text, bracket, "]>").map(|n| n + 2),
        _ => Some(gt + 1),
    }
}

#[inline]
fn find_byte(text: &str, from: usize, c: u8) -> Option<usize> {
    text.as_bytes()[from..].iter().position(|&b| b == c).map(|n| n + from)
}

#[inline]
fn find_str(text: &str, from: usize, pat: &str) -> Option<usize> {
    text[from..].find(pat).map(|n| n + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        stop_at: Option<&'static str>,
    }

    impl<'a> TagHandler<'a> for Recorder {
        fn start_element(&mut self, name: &'a str, attrs: &[(&'a str, &'a str)]) -> ControlFlow<()> {
            let attrs: Vec<_> = attrs.iter().map(|(n, v)| format!("{}={}", n, v)).collect();
            self.events.push(format!("<{} {}>", name, attrs.join(" ")));
            if self.stop_at.map_or(false, |s| s == name) {
                return ControlFlow::Break(());
            }

            ControlFlow::Continue(())
        }

        fn end_element(&mut self, name: &'a str) {
            self.events.push(format!("</{}>", name));
        }

        fn content(&mut self, text: &'a str) {
            self.events.push(format!("'{}'", text));
        }
    }

    fn scan(text: &str) -> (Vec<String>, usize) {
        let mut rec = Recorder::default();
        let malformed = tokenize(text, &mut rec);
        (rec.events, malformed)
    }

    #[test]
    fn simple() {
        let (events, malformed) = scan("<svg width='10' height=\"20\"><g/></svg>");
        assert_eq!(events, vec!["<svg width=10 height=20>", "<g >", "</g>", "</svg>"]);
        assert_eq!(malformed, 0);
    }

    #[test]
    fn content_is_trimmed() {
        let (events, _) = scan("<title>\n  Hello  </title>  \n ");
        assert_eq!(events, vec!["<title >", "'Hello'", "</title>"]);
    }

    #[test]
    fn comments_and_directives() {
        let text = "<?xml version='1.0'?><!DOCTYPE svg [<!ENTITY a 'b'>]>\
                    <!-- <rect/> --><svg/>";
        let (events, malformed) = scan(text);
        assert_eq!(events, vec!["<svg >", "</svg>"]);
        assert_eq!(malformed, 0);
    }

    #[test]
    fn cdata() {
        let (events, _) = scan("<title><![CDATA[a < b]]></title>");
        assert_eq!(events, vec!["<title >", "'a < b'", "</title>"]);
    }

    #[test]
    fn quoted_gt() {
        let (events, _) = scan("<path d='M 0 0 > 1'/>");
        assert_eq!(events, vec!["<path d=M 0 0 > 1>", "</path>"]);
    }

    #[test]
    fn self_closing_with_spaces() {
        let (events, _) = scan("<rect x='1' / >");
        assert_eq!(events, vec!["<rect x=1>", "</rect>"]);
    }

    #[test]
    fn truncated() {
        let (events, malformed) = scan("<svg><rect x=\"10\" width=\"2");
        assert_eq!(events, vec!["<svg >"]);
        assert_eq!(malformed, 1);
    }

    #[test]
    fn unterminated_quote_resumes_at_next_tag() {
        let (events, malformed) = scan("<svg><rect x=\"10 width='2'/><circle r='5'/></svg>");
        assert_eq!(events, vec!["<svg >", "<circle r=5>", "</circle>", "</svg>"]);
        assert_eq!(malformed, 1);
    }

    #[test]
    fn missing_gt_resumes_at_next_tag() {
        let (events, malformed) = scan("<svg><rect x='1' <circle/></svg>");
        assert_eq!(events, vec!["<svg >", "<circle >", "</circle>", "</svg>"]);
        assert_eq!(malformed, 1);
    }

    #[test]
    fn attributes_without_values_are_skipped() {
        let (events, malformed) = scan("<rect hidden x=5 y='6'/>");
        assert_eq!(events, vec!["<rect y=6>", "</rect>"]);
        assert_eq!(malformed, 0);
    }

    #[test]
    fn break_stops_scanning() {
        let mut rec = Recorder {
            stop_at: Some("g"),
            ..Recorder::default()
        };
        tokenize("<svg><g><rect/></g></svg>", &mut rec);
        assert_eq!(rec.events, vec!["<svg >", "<g >"]);
    }

    #[test]
    fn utf8_content() {
        let (events, _) = scan("<title>Привет</title><g id='ü'/>");
        assert_eq!(events, vec!["<title >", "'Привет'", "</title>", "<g id=ü>", "</g>"]);
    }
}
