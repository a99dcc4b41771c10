//! JSON error type carrying a failure kind and the 1-based source position.

use thiserror::Error;

/// Failure classes the reader distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonErrorKind {
    /// Bad byte, bad escape, bad number shape or bad keyword.
    Lex,
    UnterminatedString,
    /// Grammar mismatch: a token that cannot appear here.
    UnexpectedToken,
    UnexpectedEof,
    MissingColon,
    DuplicateColon,
    MissingComma,
    /// Input continues after the single top-level value.
    TrailingGarbage,
    /// The byte source failed mid-parse.
    Io,
}

/// A lex or grammar failure with its source position.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} at line {line}, column {column}")]
pub struct JsonError {
    pub kind: JsonErrorKind,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl JsonError {
    pub fn new(kind: JsonErrorKind, message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column,
        }
    }
}
