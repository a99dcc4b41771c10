//! # JSON Tokenizer
//!
//! Byte-level tokenizer over a [`ByteSource`], yielding tokens on demand.
//!
//! ## Design Goals
//!
//! 1. **Single pass**: every byte is consumed exactly once through a
//!    one-byte lookahead
//! 2. **Rich error reporting**: 1-based line/column tracking on every byte,
//!    so each token and each error carries the position of its first byte
//! 3. **Strict grammar**: leading-zero numbers, trailing dots, bare control
//!    bytes and malformed escapes are rejected at the lexical level
//!
//! ## Token Set
//!
//! `{` `}` `[` `]` `:` `,` String Number Bool Null Eof
//!
//! ## Literal Rules
//!
//! - Whitespace between tokens: space, tab, carriage return, line feed.
//!   Any other control byte is a lex error, both between tokens and inside
//!   string literals.
//! - Strings support the standard escapes (`\"` `\\` `\/` `\b` `\f` `\n`
//!   `\r` `\t` `\uXXXX`); UTF-16 surrogate pairs are combined, unpaired
//!   surrogates rejected.
//! - Numbers: optional `-`, no leading zeros on a multi-digit integer
//!   part, a fraction needs at least one digit after the `.`, an exponent
//!   at least one digit after `e`/`E` and optional sign.

use smallvec::SmallVec;

use super::error::{JsonError, JsonErrorKind};
use super::source::ByteSource;

/// Lexical token classes.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    Colon,
    Comma,
    String(String),
    Number(f64),
    Bool(bool),
    Null,
    Eof,
}

impl TokenKind {
    /// Short description for grammar error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::ObjectStart => "'{'",
            TokenKind::ObjectEnd => "'}'",
            TokenKind::ArrayStart => "'['",
            TokenKind::ArrayEnd => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::String(_) => "a string",
            TokenKind::Number(_) => "a number",
            TokenKind::Bool(_) => "a boolean",
            TokenKind::Null => "null",
            TokenKind::Eof => "end of input",
        }
    }
}

/// A token together with the position of its first byte.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
    pub column: u32,
}

/// Pull tokenizer over an arbitrary byte source.
pub struct Tokenizer<S> {
    src: S,
    peeked: Option<u8>,
    line: u32,
    column: u32,
    token_line: u32,
    token_column: u32,
}

impl<S: ByteSource> Tokenizer<S> {
    pub fn new(src: S) -> Self {
        Self {
            src,
            peeked: None,
            line: 1,
            column: 1,
            token_line: 1,
            token_column: 1,
        }
    }

    /// Line of the next unconsumed byte (1-based).
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Column of the next unconsumed byte (1-based).
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Scans and returns the next token. At end of input returns
    /// `TokenKind::Eof`, stably.
    pub fn next_token(&mut self) -> Result<Token, JsonError> {
        self.skip_whitespace()?;
        self.token_line = self.line;
        self.token_column = self.column;

        let b = match self.bump()? {
            None => return Ok(self.token(TokenKind::Eof)),
            Some(b) => b,
        };

        match b {
            b'{' => Ok(self.token(TokenKind::ObjectStart)),
            b'}' => Ok(self.token(TokenKind::ObjectEnd)),
            b'[' => Ok(self.token(TokenKind::ArrayStart)),
            b']' => Ok(self.token(TokenKind::ArrayEnd)),
            b':' => Ok(self.token(TokenKind::Colon)),
            b',' => Ok(self.token(TokenKind::Comma)),
            b'"' => self.scan_string(),
            b'-' | b'0'..=b'9' => self.scan_number(b),
            b't' => self.scan_keyword(b"rue", "true", TokenKind::Bool(true)),
            b'f' => self.scan_keyword(b"alse", "false", TokenKind::Bool(false)),
            b'n' => self.scan_keyword(b"ull", "null", TokenKind::Null),
            other => Err(self.lex_error_at_token(format!(
                "unexpected character {}",
                printable(other)
            ))),
        }
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            line: self.token_line,
            column: self.token_column,
        }
    }

    /// Peeks at the next byte without consuming it.
    fn peek(&mut self) -> Result<Option<u8>, JsonError> {
        if self.peeked.is_none() {
            self.peeked = self
                .src
                .next_byte()
                .map_err(|e| self.io_error(&e))?;
        }
        Ok(self.peeked)
    }

    /// Consumes the next byte and advances the position counters past it.
    fn bump(&mut self) -> Result<Option<u8>, JsonError> {
        let b = match self.peeked.take() {
            Some(b) => Some(b),
            None => self
                .src
                .next_byte()
                .map_err(|e| self.io_error(&e))?,
        };
        if let Some(b) = b {
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        Ok(b)
    }

    fn skip_whitespace(&mut self) -> Result<(), JsonError> {
        while let Some(b) = self.peek()? {
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.bump()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn scan_string(&mut self) -> Result<Token, JsonError> {
        let mut bytes: Vec<u8> = Vec::new();
        loop {
            let (line, column) = (self.line, self.column);
            let b = match self.bump()? {
                None => {
                    return Err(JsonError::new(
                        JsonErrorKind::UnterminatedString,
                        "unterminated string",
                        self.token_line,
                        self.token_column,
                    ))
                }
                Some(b) => b,
            };
            match b {
                b'"' => break,
                b'\\' => self.scan_escape(&mut bytes)?,
                // the whitespace set is legal raw; other control bytes are not
                b'\t' | b'\r' | b'\n' => bytes.push(b),
                b if b < 0x20 => {
                    return Err(JsonError::new(
                        JsonErrorKind::Lex,
                        format!("control byte {} in string literal", printable(b)),
                        line,
                        column,
                    ))
                }
                b => bytes.push(b),
            }
        }
        match String::from_utf8(bytes) {
            Ok(text) => Ok(self.token(TokenKind::String(text))),
            Err(_) => Err(self.lex_error_at_token("invalid utf-8 in string literal".to_string())),
        }
    }

    fn scan_escape(&mut self, bytes: &mut Vec<u8>) -> Result<(), JsonError> {
        let (line, column) = (self.line, self.column);
        let e = match self.bump()? {
            None => {
                return Err(JsonError::new(
                    JsonErrorKind::UnterminatedString,
                    "unterminated string",
                    self.token_line,
                    self.token_column,
                ))
            }
            Some(e) => e,
        };
        match e {
            b'"' => bytes.push(b'"'),
            b'\\' => bytes.push(b'\\'),
            b'/' => bytes.push(b'/'),
            b'b' => bytes.push(0x08),
            b'f' => bytes.push(0x0C),
            b'n' => bytes.push(b'\n'),
            b'r' => bytes.push(b'\r'),
            b't' => bytes.push(b'\t'),
            b'u' => {
                let ch = self.scan_unicode_escape(line, column)?;
                let mut tmp = [0u8; 4];
                bytes.extend_from_slice(ch.encode_utf8(&mut tmp).as_bytes());
            }
            other => {
                return Err(JsonError::new(
                    JsonErrorKind::Lex,
                    format!("invalid escape sequence '\\{}'", other as char),
                    line,
                    column,
                ))
            }
        }
        Ok(())
    }

    fn scan_unicode_escape(&mut self, line: u32, column: u32) -> Result<char, JsonError> {
        let unit = self.scan_hex4(line, column)?;
        let codepoint = match unit {
            0xD800..=0xDBFF => {
                // high surrogate, a \uXXXX low surrogate must follow
                if self.bump()? != Some(b'\\') || self.bump()? != Some(b'u') {
                    return Err(JsonError::new(
                        JsonErrorKind::Lex,
                        "unpaired utf-16 surrogate",
                        line,
                        column,
                    ));
                }
                let low = self.scan_hex4(line, column)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(JsonError::new(
                        JsonErrorKind::Lex,
                        "invalid utf-16 low surrogate",
                        line,
                        column,
                    ));
                }
                0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(JsonError::new(
                    JsonErrorKind::Lex,
                    "unpaired utf-16 surrogate",
                    line,
                    column,
                ))
            }
            unit => unit,
        };
        char::from_u32(codepoint).ok_or_else(|| {
            JsonError::new(
                JsonErrorKind::Lex,
                format!("invalid unicode codepoint U+{:04X}", codepoint),
                line,
                column,
            )
        })
    }

    fn scan_hex4(&mut self, line: u32, column: u32) -> Result<u32, JsonError> {
        let mut value = 0u32;
        for _ in 0..4 {
            let digit = match self.bump()? {
                Some(b @ b'0'..=b'9') => (b - b'0') as u32,
                Some(b @ b'a'..=b'f') => (b - b'a') as u32 + 10,
                Some(b @ b'A'..=b'F') => (b - b'A') as u32 + 10,
                _ => {
                    return Err(JsonError::new(
                        JsonErrorKind::Lex,
                        "invalid unicode escape, expected 4 hex digits",
                        line,
                        column,
                    ))
                }
            };
            value = (value << 4) | digit;
        }
        Ok(value)
    }

    fn scan_number(&mut self, first: u8) -> Result<Token, JsonError> {
        let mut text: SmallVec<[u8; 24]> = SmallVec::new();
        text.push(first);

        let lead = if first == b'-' {
            match self.bump()? {
                Some(b @ b'0'..=b'9') => {
                    text.push(b);
                    b
                }
                _ => return Err(self.lex_error_at_token("expected a digit after '-'".to_string())),
            }
        } else {
            first
        };

        if lead == b'0' {
            if let Some(b'0'..=b'9') = self.peek()? {
                return Err(
                    self.lex_error_at_token("leading zeros are not allowed in numbers".to_string())
                );
            }
        } else {
            while let Some(b @ b'0'..=b'9') = self.peek()? {
                text.push(b);
                self.bump()?;
            }
        }

        if self.peek()? == Some(b'.') {
            let (line, column) = (self.line, self.column);
            self.bump()?;
            text.push(b'.');
            match self.peek()? {
                Some(b'0'..=b'9') => {
                    while let Some(b @ b'0'..=b'9') = self.peek()? {
                        text.push(b);
                        self.bump()?;
                    }
                }
                _ => {
                    return Err(JsonError::new(
                        JsonErrorKind::Lex,
                        "expected a digit after '.'",
                        line,
                        column,
                    ))
                }
            }
        }

        if let Some(e @ (b'e' | b'E')) = self.peek()? {
            text.push(e);
            self.bump()?;
            if let Some(sign @ (b'+' | b'-')) = self.peek()? {
                text.push(sign);
                self.bump()?;
            }
            let (line, column) = (self.line, self.column);
            match self.peek()? {
                Some(b'0'..=b'9') => {
                    while let Some(b @ b'0'..=b'9') = self.peek()? {
                        text.push(b);
                        self.bump()?;
                    }
                }
                _ => {
                    return Err(JsonError::new(
                        JsonErrorKind::Lex,
                        "expected a digit in exponent",
                        line,
                        column,
                    ))
                }
            }
        }

        // the scratch is pure ASCII by construction
        let value = std::str::from_utf8(&text)
            .ok()
            .and_then(|s| s.parse::<f64>().ok());
        match value {
            Some(n) => Ok(self.token(TokenKind::Number(n))),
            None => Err(self.lex_error_at_token("invalid number".to_string())),
        }
    }

    fn scan_keyword(
        &mut self,
        rest: &[u8],
        name: &str,
        kind: TokenKind,
    ) -> Result<Token, JsonError> {
        for &expected in rest {
            match self.bump()? {
                Some(b) if b == expected => {}
                _ => {
                    return Err(self.lex_error_at_token(format!("expected '{}'", name)));
                }
            }
        }
        Ok(self.token(kind))
    }

    fn lex_error_at_token(&self, message: String) -> JsonError {
        JsonError::new(
            JsonErrorKind::Lex,
            message,
            self.token_line,
            self.token_column,
        )
    }

    fn io_error(&self, err: &std::io::Error) -> JsonError {
        JsonError::new(
            JsonErrorKind::Io,
            format!("read failed: {}", err),
            self.line,
            self.column,
        )
    }
}

fn printable(b: u8) -> String {
    if b.is_ascii_graphic() || b == b' ' {
        format!("'{}'", b as char)
    } else {
        format!("0x{:02x}", b)
    }
}
