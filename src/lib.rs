//! # csvql - Embedded SQL-over-CSV Engine Core
//!
//! csvql is the data-representation core of a small embedded SQL engine
//! that executes queries over CSV files. Every row cell an executor
//! operator touches, and every schema or configuration payload the engine
//! reads, flows through one of the two subsystems in this crate:
//!
//! - **Typed values** ([`types`]): a closed, nullable, SQL-compatible
//!   value model with total comparison, tolerant REAL equality, consistent
//!   hashing, byte-size accounting and canonical rendering
//! - **Streaming JSON** ([`json`]): a byte-source-driven JSON reader
//!   emitting a SAX-style event stream, with a pluggable builder that
//!   materializes a navigable tree from the same events
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   SQL Layer (parser / executor)     │   (separate crates)
//! ├──────────────────┬──────────────────┤
//! │   TypedValue     │   JsonReader     │
//! │   (row cells)    │   (events/DOM)   │
//! ├──────────────────┴──────────────────┤
//! │   CSV / config input                │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use csvql::{Kind, TypedValue};
//! use csvql::json::{Mode, ObjectBuilder, Reader};
//!
//! let cell = TypedValue::from_text(Kind::Real, "3.14")?;
//! assert_eq!(cell.to_string(), "3.140000");
//!
//! let doc = br#"{ "page_size" : 4096 }"#;
//! let mut reader = Reader::from_bytes(doc, ObjectBuilder::new(), Mode::Strict);
//! reader.parse()?;
//! let root = reader.into_sink().take_root().unwrap();
//! assert_eq!(root["page_size"].as_long()?, 4096);
//! ```
//!
//! ## Guarantees
//!
//! - Values are immutable after construction and safe to share by read
//! - `equals(a, b)` implies `hash(a) == hash(b)`, including tolerant REAL
//!   equality
//! - JSON events arrive in document order, well-balanced, one at a time
//! - Every rejected JSON document reports a 1-based line/column position
//!   at the first offending byte

pub mod json;
pub mod types;

pub use json::{EventSink, JsonError, JsonErrorKind, JsonValue, Mode, NullSink, ObjectBuilder, Reader};
pub use types::{AnyValue, Kind, TypedValue, ValueError, ValueKey};
