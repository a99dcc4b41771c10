//! # JSON Grammar Driver
//!
//! Recursive-descent parser over the token stream, emitting a SAX-style
//! event stream into an [`EventSink`] as structural elements are
//! recognized:
//!
//! ```text
//! value  := object | array | STRING | NUMBER | TRUE | FALSE | NULL
//! object := '{' (pair (',' pair)*)? '}'
//! pair   := STRING ':' value
//! array  := '[' (value (',' value)*)? ']'
//! ```
//!
//! For a valid document the event stream is well-balanced: every
//! `begin_*` has a matching `end_*`, every `key` is followed by exactly
//! one value subtree, and element order is document order. Exactly one
//! top-level value is accepted; anything after it is trailing garbage.
//!
//! ## Failure Discipline
//!
//! The reader carries a per-reader [`Mode`] chosen at construction.
//! `parse()` returns `Ok(true)` on success; on a lex or grammar error a
//! strict reader returns the positioned [`JsonError`] while a lenient
//! reader collapses it to `Ok(false)`. On any failure the sink may have
//! seen a prefix of the event stream; consumers must discard in-progress
//! state.

use std::io::Read;

use super::error::{JsonError, JsonErrorKind};
use super::source::{ByteSource, SliceSource, StreamSource};
use super::tokenizer::{Token, TokenKind, Tokenizer};

/// Consumer of the reader's event stream.
///
/// All methods default to no-ops so a sink only implements the events it
/// cares about. Events arrive synchronously on the reader's thread, one at
/// a time, in document order. Borrowed `&str` arguments are transient;
/// a sink must copy what it keeps.
pub trait EventSink {
    fn begin_object(&mut self) {}
    fn end_object(&mut self) {}
    fn key(&mut self, _key: &str) {}
    fn begin_array(&mut self) {}
    fn end_array(&mut self) {}
    fn number(&mut self, _value: f64) {}
    fn string(&mut self, _value: &str) {}
    fn boolean(&mut self, _value: bool) {}
    fn null_value(&mut self) {}
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn begin_object(&mut self) {
        (**self).begin_object()
    }
    fn end_object(&mut self) {
        (**self).end_object()
    }
    fn key(&mut self, key: &str) {
        (**self).key(key)
    }
    fn begin_array(&mut self) {
        (**self).begin_array()
    }
    fn end_array(&mut self) {
        (**self).end_array()
    }
    fn number(&mut self, value: f64) {
        (**self).number(value)
    }
    fn string(&mut self, value: &str) {
        (**self).string(value)
    }
    fn boolean(&mut self, value: bool) {
        (**self).boolean(value)
    }
    fn null_value(&mut self) {
        (**self).null_value()
    }
}

/// Sink that discards every event; used for validate-only parsing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {}

/// Per-reader failure discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Errors are returned as positioned [`JsonError`]s.
    Strict,
    /// Errors collapse `parse()` to `Ok(false)`.
    Lenient,
}

/// Streaming JSON reader driving events into its sink.
///
/// A reader owns its tokenizer state and parses a single document; a new
/// parse needs a fresh reader.
pub struct Reader<S, C> {
    tokens: Tokenizer<S>,
    sink: C,
    mode: Mode,
}

impl<'a, C: EventSink> Reader<SliceSource<'a>, C> {
    /// Constructs a reader over an in-memory byte slice.
    pub fn from_bytes(data: &'a [u8], sink: C, mode: Mode) -> Self {
        Self {
            tokens: Tokenizer::new(SliceSource::new(data)),
            sink,
            mode,
        }
    }
}

impl<R: Read, C: EventSink> Reader<StreamSource<R>, C> {
    /// Constructs a reader over a blocking byte stream.
    pub fn from_stream(input: R, sink: C, mode: Mode) -> Self {
        Self {
            tokens: Tokenizer::new(StreamSource::new(input)),
            sink,
            mode,
        }
    }
}

impl<S: ByteSource, C: EventSink> Reader<S, C> {
    /// Parses the single top-level value, emitting events as it goes.
    ///
    /// Returns `Ok(true)` on success. On failure, behavior follows the
    /// reader's [`Mode`]: strict readers return the error, lenient readers
    /// return `Ok(false)`.
    pub fn parse(&mut self) -> Result<bool, JsonError> {
        match self.document() {
            Ok(()) => Ok(true),
            Err(err) => match self.mode {
                Mode::Strict => Err(err),
                Mode::Lenient => Ok(false),
            },
        }
    }

    /// Borrows the sink.
    pub fn sink(&self) -> &C {
        &self.sink
    }

    /// Consumes the reader, returning the sink.
    pub fn into_sink(self) -> C {
        self.sink
    }

    fn document(&mut self) -> Result<(), JsonError> {
        let token = self.tokens.next_token()?;
        self.value(token)?;
        let tail = self.tokens.next_token()?;
        match tail.kind {
            TokenKind::Eof => Ok(()),
            other => Err(JsonError::new(
                JsonErrorKind::TrailingGarbage,
                format!("unexpected {} after the top-level value", other.describe()),
                tail.line,
                tail.column,
            )),
        }
    }

    fn value(&mut self, token: Token) -> Result<(), JsonError> {
        match token.kind {
            TokenKind::ObjectStart => self.object(),
            TokenKind::ArrayStart => self.array(),
            TokenKind::String(s) => {
                self.sink.string(&s);
                Ok(())
            }
            TokenKind::Number(n) => {
                self.sink.number(n);
                Ok(())
            }
            TokenKind::Bool(b) => {
                self.sink.boolean(b);
                Ok(())
            }
            TokenKind::Null => {
                self.sink.null_value();
                Ok(())
            }
            TokenKind::Eof => Err(JsonError::new(
                JsonErrorKind::UnexpectedEof,
                "expected a value",
                token.line,
                token.column,
            )),
            other => Err(JsonError::new(
                JsonErrorKind::UnexpectedToken,
                format!("expected a value, found {}", other.describe()),
                token.line,
                token.column,
            )),
        }
    }

    fn object(&mut self) -> Result<(), JsonError> {
        self.sink.begin_object();

        let token = self.tokens.next_token()?;
        match token.kind {
            TokenKind::ObjectEnd => {
                self.sink.end_object();
                return Ok(());
            }
            TokenKind::String(key) => self.pair(key)?,
            TokenKind::Eof => {
                return Err(JsonError::new(
                    JsonErrorKind::UnexpectedEof,
                    "unterminated object",
                    token.line,
                    token.column,
                ))
            }
            other => {
                return Err(JsonError::new(
                    JsonErrorKind::UnexpectedToken,
                    format!("expected a key or '}}', found {}", other.describe()),
                    token.line,
                    token.column,
                ))
            }
        }

        loop {
            let token = self.tokens.next_token()?;
            match token.kind {
                TokenKind::ObjectEnd => {
                    self.sink.end_object();
                    return Ok(());
                }
                TokenKind::Comma => {
                    let token = self.tokens.next_token()?;
                    match token.kind {
                        TokenKind::String(key) => self.pair(key)?,
                        TokenKind::Eof => {
                            return Err(JsonError::new(
                                JsonErrorKind::UnexpectedEof,
                                "unterminated object",
                                token.line,
                                token.column,
                            ))
                        }
                        other => {
                            return Err(JsonError::new(
                                JsonErrorKind::UnexpectedToken,
                                format!("expected a key after ',', found {}", other.describe()),
                                token.line,
                                token.column,
                            ))
                        }
                    }
                }
                TokenKind::String(_) => {
                    return Err(JsonError::new(
                        JsonErrorKind::MissingComma,
                        "missing ',' between object members",
                        token.line,
                        token.column,
                    ))
                }
                TokenKind::Colon => {
                    return Err(JsonError::new(
                        JsonErrorKind::DuplicateColon,
                        "unexpected ':' after a member value",
                        token.line,
                        token.column,
                    ))
                }
                TokenKind::Eof => {
                    return Err(JsonError::new(
                        JsonErrorKind::UnexpectedEof,
                        "unterminated object",
                        token.line,
                        token.column,
                    ))
                }
                other => {
                    return Err(JsonError::new(
                        JsonErrorKind::UnexpectedToken,
                        format!("expected ',' or '}}', found {}", other.describe()),
                        token.line,
                        token.column,
                    ))
                }
            }
        }
    }

    fn pair(&mut self, key: String) -> Result<(), JsonError> {
        self.sink.key(&key);

        let token = self.tokens.next_token()?;
        match token.kind {
            TokenKind::Colon => {}
            TokenKind::Eof => {
                return Err(JsonError::new(
                    JsonErrorKind::UnexpectedEof,
                    "expected ':' after key",
                    token.line,
                    token.column,
                ))
            }
            other => {
                return Err(JsonError::new(
                    JsonErrorKind::MissingColon,
                    format!("expected ':' after key, found {}", other.describe()),
                    token.line,
                    token.column,
                ))
            }
        }

        let token = self.tokens.next_token()?;
        self.value(token)
    }

    fn array(&mut self) -> Result<(), JsonError> {
        self.sink.begin_array();

        let token = self.tokens.next_token()?;
        match token.kind {
            TokenKind::ArrayEnd => {
                self.sink.end_array();
                return Ok(());
            }
            TokenKind::Eof => {
                return Err(JsonError::new(
                    JsonErrorKind::UnexpectedEof,
                    "unterminated array",
                    token.line,
                    token.column,
                ))
            }
            _ => self.value(token)?,
        }

        loop {
            let token = self.tokens.next_token()?;
            match token.kind {
                TokenKind::ArrayEnd => {
                    self.sink.end_array();
                    return Ok(());
                }
                TokenKind::Comma => {
                    let token = self.tokens.next_token()?;
                    match token.kind {
                        TokenKind::ArrayEnd => {
                            return Err(JsonError::new(
                                JsonErrorKind::UnexpectedToken,
                                "expected a value after ','",
                                token.line,
                                token.column,
                            ))
                        }
                        _ => self.value(token)?,
                    }
                }
                TokenKind::ObjectStart
                | TokenKind::ArrayStart
                | TokenKind::String(_)
                | TokenKind::Number(_)
                | TokenKind::Bool(_)
                | TokenKind::Null => {
                    return Err(JsonError::new(
                        JsonErrorKind::MissingComma,
                        "missing ',' between array elements",
                        token.line,
                        token.column,
                    ))
                }
                TokenKind::Eof => {
                    return Err(JsonError::new(
                        JsonErrorKind::UnexpectedEof,
                        "unterminated array",
                        token.line,
                        token.column,
                    ))
                }
                other => {
                    return Err(JsonError::new(
                        JsonErrorKind::UnexpectedToken,
                        format!("expected ',' or ']', found {}", other.describe()),
                        token.line,
                        token.column,
                    ))
                }
            }
        }
    }
}
