//! # Streaming JSON Reader
//!
//! This module provides the engine's JSON input path: schema and
//! configuration payloads arrive as JSON and flow through here.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐    ┌───────────┐    ┌──────────────┐
//! │ ByteSource │───>│ Tokenizer │───>│ Reader       │
//! └────────────┘    └───────────┘    │ (grammar)    │
//!                                    └──────┬───────┘
//!                                           │ events
//!                              ┌────────────┴────────────┐
//!                              v                         v
//!                       ┌────────────┐           ┌───────────────┐
//!                       │ EventSink  │           │ ObjectBuilder │
//!                       │ (callback) │           │ -> JsonValue  │
//!                       └────────────┘           └───────────────┘
//! ```
//!
//! Two consumer shapes share one grammar driver: implement [`EventSink`]
//! for a SAX-style callback stream, or hand the reader an
//! [`ObjectBuilder`] to materialize a navigable [`JsonValue`] tree.
//! [`NullSink`] validates without materializing anything.
//!
//! The grammar is RFC 8259 with strict extras: no leading zeros, no
//! trailing dot, control bytes rejected outside escapes. Errors carry a
//! 1-based line/column position.

mod error;
mod object;
mod parser;
mod source;
mod tokenizer;

pub use error::{JsonError, JsonErrorKind};
pub use object::{JsonValue, ObjectBuilder};
pub use parser::{EventSink, Mode, NullSink, Reader};
pub use source::{ByteSource, SliceSource, StreamSource};
pub use tokenizer::{Token, TokenKind, Tokenizer};
