//! Character-level scanning primitives shared by the OBJ and MTL grammars
//!
//! A [`LineScanner`] walks a single line with a byte cursor. Every scanner is
//! greedy and fails when it matches nothing, leaving the cursor where the
//! failed lexeme started.

use crate::error::{ParseError, ParseErrorKind, Result};
use std::path::{Path, PathBuf};

fn is_space(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\r' | b'\n')
}

fn is_identifier_char(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, b'.' | b'_' | b'-' | b'(' | b')')
}

/// Cursor over one line of input
#[derive(Debug, Clone)]
pub struct LineScanner<'a> {
    line: &'a [u8],
    pos: usize,
}

impl<'a> LineScanner<'a> {
    pub fn new(line: &'a [u8]) -> Self {
        Self { line, pos: 0 }
    }

    /// Current 0-based column
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Next unconsumed byte, if any.
    pub fn peek(&self) -> Option<u8> {
        self.line.get(self.pos).copied()
    }

    /// Unconsumed remainder of the line, lossily decoded.
    pub fn rest(&self) -> String {
        String::from_utf8_lossy(&self.line[self.pos..]).into_owned()
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// True at end of line or at the start of a `#` comment.
    pub fn at_end_or_comment(&self) -> bool {
        matches!(self.peek(), None | Some(b'#'))
    }

    /// Consume the rest of the line.
    pub fn skip_to_end(&mut self) {
        self.pos = self.line.len();
    }

    fn advance_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += 1;
        }
        self.pos - start
    }

    fn slice(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.line[start..self.pos]).into_owned()
    }

    /// Consume a run of bytes matching `pred` and return it; may be empty.
    pub fn token(&mut self, pred: impl Fn(u8) -> bool) -> String {
        let start = self.pos;
        self.advance_while(pred);
        self.slice(start)
    }

    /// Skip whitespace. When `required`, at least one whitespace byte must be present.
    pub fn eat_space(&mut self, required: bool) -> Result<()> {
        if required && !self.peek().is_some_and(is_space) {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedWhitespace,
                format!("Expected whitespace but got \"{}\"", self.rest()),
            ));
        }
        self.advance_while(is_space);
        Ok(())
    }

    /// Consume exactly `expected`.
    pub fn eat_char(&mut self, expected: u8) -> Result<()> {
        match self.peek() {
            Some(ch) if ch == expected => {
                self.pos += 1;
                Ok(())
            }
            other => Err(ParseError::new(
                ParseErrorKind::UnexpectedCharacter,
                format!(
                    "Expected '{}' but got {}",
                    expected as char,
                    other.map_or("end of line".to_string(), |c| format!("'{}'", c as char))
                ),
            )),
        }
    }

    fn eat_sign(&mut self) {
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
    }

    /// Scan `[+-]digits[.digits][(e|E)[+-]digits]` and convert it.
    ///
    /// An exponent marker without digits is left unconsumed.
    pub fn parse_float(&mut self) -> Result<f32> {
        let start = self.pos;
        self.eat_sign();
        self.advance_while(|c| c.is_ascii_digit());
        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.advance_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mantissa_end = self.pos;
            self.pos += 1;
            self.eat_sign();
            if self.advance_while(|c| c.is_ascii_digit()) == 0 {
                self.pos = mantissa_end;
            }
        }

        let lexeme = self.slice(start);
        match lexeme.parse::<f32>() {
            Ok(value) if !lexeme.is_empty() => Ok(value),
            _ => {
                self.pos = start;
                Err(ParseError::new(
                    ParseErrorKind::MalformedNumber,
                    format!("Expected a float value but got \"{}\"", self.rest()),
                ))
            }
        }
    }

    /// Scan `[+-]digits` and convert it.
    pub fn parse_int(&mut self) -> Result<i64> {
        let start = self.pos;
        self.eat_sign();
        self.advance_while(|c| c.is_ascii_digit());

        let lexeme = self.slice(start);
        match lexeme.parse::<i64>() {
            Ok(value) => Ok(value),
            Err(_) => {
                self.pos = start;
                Err(ParseError::new(
                    ParseErrorKind::MalformedNumber,
                    format!("Expected an int value but got \"{}\"", self.rest()),
                ))
            }
        }
    }

    /// Scan a run of letters, digits and `. _ - ( )`.
    pub fn parse_identifier(&mut self) -> Result<String> {
        let start = self.pos;
        if self.advance_while(is_identifier_char) == 0 {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedIdentifier,
                format!("Expected an identifier but got \"{}\"", self.rest()),
            ));
        }
        Ok(self.slice(start))
    }

    /// Scan a filename up to end of line or an unquoted `#`.
    ///
    /// Quotes delimit literal content and are dropped. A backslash escapes a
    /// following quote, backslash, `#` or whitespace byte and is otherwise
    /// kept as a path separator. Unquoted trailing whitespace is trimmed.
    /// With `stop_at_space` the name also ends at unquoted whitespace.
    pub fn parse_filename(&mut self, stop_at_space: bool) -> Result<String> {
        let mut out: Vec<u8> = Vec::new();
        let mut keep = 0;
        let mut quote: Option<u8> = None;

        while let Some(ch) = self.peek() {
            match quote {
                Some(q) if ch == q => {
                    quote = None;
                    keep = out.len();
                }
                Some(_) if ch == b'\\' => {
                    self.push_escape(&mut out);
                    keep = out.len();
                }
                Some(_) => {
                    out.push(ch);
                    keep = out.len();
                }
                None => {
                    if ch == b'#' || (stop_at_space && is_space(ch)) {
                        break;
                    }
                    match ch {
                        b'"' | b'\'' => quote = Some(ch),
                        b'\\' => {
                            self.push_escape(&mut out);
                            keep = out.len();
                        }
                        _ => {
                            out.push(ch);
                            if !is_space(ch) {
                                keep = out.len();
                            }
                        }
                    }
                }
            }
            if !self.at_end() {
                self.pos += 1;
            }
        }

        if let Some(q) = quote {
            return Err(ParseError::new(
                ParseErrorKind::UnterminatedQuote,
                format!("Unclosed filename string: missing closing {} character", q as char),
            ));
        }

        out.truncate(keep);
        if out.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedIdentifier,
                "Expected a filename",
            ));
        }
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Handle a backslash at the cursor, leaving the cursor on the last byte consumed.
    fn push_escape(&mut self, out: &mut Vec<u8>) {
        match self.line.get(self.pos + 1).copied() {
            Some(next) if matches!(next, b'"' | b'\'' | b'\\' | b'#') || is_space(next) => {
                self.pos += 1;
                out.push(next);
            }
            _ => out.push(b'\\'),
        }
    }
}

/// Resolve `name` against the directory of the referencing file.
///
/// Absolute names, and names referenced from a file with no directory
/// component, are returned unchanged.
pub fn resolve_path(base_dir: &Path, name: &str) -> PathBuf {
    let name_path = Path::new(name);
    if base_dir.as_os_str().is_empty() || name_path.is_absolute() {
        name_path.to_path_buf()
    } else {
        base_dir.join(name_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(s: &str) -> LineScanner<'_> {
        LineScanner::new(s.as_bytes())
    }

    #[test]
    fn test_parse_float_forms() {
        for (text, expected) in [
            ("1", 1.0),
            ("-2.5", -2.5),
            ("+.5", 0.5),
            ("3.", 3.0),
            ("1e3", 1000.0),
            ("-1.5E-2", -0.015),
        ] {
            let mut s = scan(text);
            assert_eq!(s.parse_float().unwrap(), expected, "{}", text);
            assert!(s.at_end());
        }
    }

    #[test]
    fn test_parse_float_stops_at_lexeme_end() {
        let mut s = scan("0.25/7");
        assert_eq!(s.parse_float().unwrap(), 0.25);
        assert_eq!(s.peek(), Some(b'/'));
    }

    #[test]
    fn test_parse_float_dangling_exponent() {
        let mut s = scan("1e");
        assert_eq!(s.parse_float().unwrap(), 1.0);
        assert_eq!(s.peek(), Some(b'e'));

        let mut s = scan("2.5E+ 3");
        assert_eq!(s.parse_float().unwrap(), 2.5);
        assert_eq!(s.pos(), 3);
    }

    #[test]
    fn test_parse_float_rejects_garbage() {
        let mut s = scan("garbage");
        let err = s.parse_float().unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::MalformedNumber);
        assert_eq!(s.pos(), 0);

        let mut s = scan("-");
        assert!(s.parse_float().is_err());
    }

    #[test]
    fn test_parse_int() {
        let mut s = scan("-12/3");
        assert_eq!(s.parse_int().unwrap(), -12);
        assert_eq!(s.pos(), 3);

        let mut s = scan("/3");
        assert_eq!(s.parse_int().unwrap_err().kind(), ParseErrorKind::MalformedNumber);
    }

    #[test]
    fn test_parse_identifier() {
        let mut s = scan("Mat_01.(red)-x trailing");
        assert_eq!(s.parse_identifier().unwrap(), "Mat_01.(red)-x");
        assert_eq!(s.peek(), Some(b' '));

        let mut s = scan("!bad");
        assert_eq!(s.parse_identifier().unwrap_err().kind(), ParseErrorKind::ExpectedIdentifier);
    }

    #[test]
    fn test_parse_filename_plain_and_comment() {
        let mut s = scan("textures/brick.png   # a comment");
        assert_eq!(s.parse_filename(false).unwrap(), "textures/brick.png");
        assert!(s.at_end_or_comment());
    }

    #[test]
    fn test_parse_filename_quotes_and_escapes() {
        let mut s = scan("\"my file #1.png\"");
        assert_eq!(s.parse_filename(false).unwrap(), "my file #1.png");

        let mut s = scan("my\\ file.png");
        assert_eq!(s.parse_filename(true).unwrap(), "my file.png");

        let mut s = scan("'quoted \\' mark.png'");
        assert_eq!(s.parse_filename(false).unwrap(), "quoted ' mark.png");
    }

    #[test]
    fn test_parse_filename_keeps_windows_separators() {
        let mut s = scan("textures\\brick.png");
        assert_eq!(s.parse_filename(false).unwrap(), "textures\\brick.png");

        let mut s = scan("\"C:\\maps\\wood.png\"");
        assert_eq!(s.parse_filename(false).unwrap(), "C:\\maps\\wood.png");

        let mut s = scan("dir\\\\name\\#1.png");
        assert_eq!(s.parse_filename(false).unwrap(), "dir\\name#1.png");

        let mut s = scan("trailing\\");
        assert_eq!(s.parse_filename(false).unwrap(), "trailing\\");
    }

    #[test]
    fn test_parse_filename_unclosed_quote() {
        let mut s = scan("\"never closed.png");
        assert_eq!(s.parse_filename(false).unwrap_err().kind(), ParseErrorKind::UnterminatedQuote);
    }

    #[test]
    fn test_parse_filename_stop_at_space() {
        let mut s = scan("a.mtl b.mtl");
        assert_eq!(s.parse_filename(true).unwrap(), "a.mtl");
        s.eat_space(true).unwrap();
        assert_eq!(s.parse_filename(true).unwrap(), "b.mtl");
        assert!(s.at_end());
    }

    #[test]
    fn test_eat_space_required() {
        let mut s = scan("x");
        assert_eq!(s.eat_space(true).unwrap_err().kind(), ParseErrorKind::ExpectedWhitespace);
        let mut s = scan(" \t\r\nx");
        s.eat_space(true).unwrap();
        assert_eq!(s.peek(), Some(b'x'));
    }

    #[test]
    fn test_eat_char() {
        let mut s = scan("/x");
        s.eat_char(b'/').unwrap();
        assert_eq!(s.eat_char(b'/').unwrap_err().kind(), ParseErrorKind::UnexpectedCharacter);
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            resolve_path(Path::new("/a/b"), "sub/mat.mtl"),
            PathBuf::from("/a/b/sub/mat.mtl")
        );
        assert_eq!(resolve_path(Path::new("/a/b"), "/abs.mtl"), PathBuf::from("/abs.mtl"));
        assert_eq!(resolve_path(Path::new(""), "rel.mtl"), PathBuf::from("rel.mtl"));
    }
}
