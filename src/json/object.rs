//! # Materialized JSON Values
//!
//! `ObjectBuilder` is an [`EventSink`] that materializes the reader's event
//! stream into a navigable `JsonValue` tree. Containers are kept on a
//! stack while in progress; closing a container attaches it to its parent,
//! and the last value standing when the stack empties becomes the root.
//!
//! Object member order is preserved for iteration. A duplicate key
//! overwrites the earlier value in place (last write wins). The tree owns
//! its children exclusively; dropping the root drops everything below it.

use smallvec::SmallVec;
use std::ops::Index;

use super::parser::EventSink;
use crate::types::ValueError;

/// A node in the materialized JSON tree.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),
}

static NULL: JsonValue = JsonValue::Null;

impl JsonValue {
    fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }

    /// Number accessor, truncated toward zero.
    pub fn as_long(&self) -> Result<i64, ValueError> {
        match self {
            JsonValue::Number(n) => Ok(*n as i64),
            other => Err(mismatch("number", other)),
        }
    }

    /// Number accessor.
    pub fn as_double(&self) -> Result<f64, ValueError> {
        match self {
            JsonValue::Number(n) => Ok(*n),
            other => Err(mismatch("number", other)),
        }
    }

    /// String accessor.
    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            JsonValue::String(s) => Ok(s.as_str()),
            other => Err(mismatch("string", other)),
        }
    }

    /// Boolean accessor.
    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            JsonValue::Bool(b) => Ok(*b),
            other => Err(mismatch("boolean", other)),
        }
    }

    /// Array accessor.
    pub fn as_array(&self) -> Result<&[JsonValue], ValueError> {
        match self {
            JsonValue::Array(items) => Ok(items.as_slice()),
            other => Err(mismatch("array", other)),
        }
    }

    /// Object accessor, members in insertion order.
    pub fn as_object(&self) -> Result<&[(String, JsonValue)], ValueError> {
        match self {
            JsonValue::Object(entries) => Ok(entries.as_slice()),
            other => Err(mismatch("object", other)),
        }
    }

    /// Returns true if this node is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Object member lookup.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(entries) => {
                entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Array element lookup.
    pub fn at(&self, index: usize) -> Option<&JsonValue> {
        match self {
            JsonValue::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Replays this value's event stream into `sink`, in document order.
    pub fn emit<C: EventSink>(&self, sink: &mut C) {
        match self {
            JsonValue::Null => sink.null_value(),
            JsonValue::Bool(b) => sink.boolean(*b),
            JsonValue::Number(n) => sink.number(*n),
            JsonValue::String(s) => sink.string(s),
            JsonValue::Array(items) => {
                sink.begin_array();
                for item in items {
                    item.emit(sink);
                }
                sink.end_array();
            }
            JsonValue::Object(entries) => {
                sink.begin_object();
                for (key, value) in entries {
                    sink.key(key);
                    value.emit(sink);
                }
                sink.end_object();
            }
        }
    }
}

fn mismatch(expected: &'static str, found: &JsonValue) -> ValueError {
    ValueError::KindMismatch {
        expected,
        found: found.type_name(),
    }
}

/// Missing keys index to `Null` so navigation chains stay total.
impl Index<&str> for JsonValue {
    type Output = JsonValue;

    fn index(&self, key: &str) -> &JsonValue {
        self.get(key).unwrap_or(&NULL)
    }
}

/// Out-of-range indexes yield `Null` so navigation chains stay total.
impl Index<usize> for JsonValue {
    type Output = JsonValue;

    fn index(&self, index: usize) -> &JsonValue {
        self.at(index).unwrap_or(&NULL)
    }
}

enum Frame {
    Object {
        entries: Vec<(String, JsonValue)>,
        pending_key: Option<String>,
    },
    Array(Vec<JsonValue>),
}

/// Event sink that materializes the document tree.
///
/// `root()` is meaningful only after a successful parse; an aborted parse
/// leaves the builder mid-construction and its state must be discarded.
#[derive(Default)]
pub struct ObjectBuilder {
    stack: SmallVec<[Frame; 8]>,
    root: Option<JsonValue>,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrows the root value, if a complete document has been built.
    pub fn root(&self) -> Option<&JsonValue> {
        self.root.as_ref()
    }

    /// Takes the root value out of the builder.
    pub fn take_root(&mut self) -> Option<JsonValue> {
        self.root.take()
    }

    fn attach(&mut self, value: JsonValue) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object {
                entries,
                pending_key,
            }) => {
                if let Some(key) = pending_key.take() {
                    match entries.iter_mut().find(|(k, _)| *k == key) {
                        Some(slot) => slot.1 = value,
                        None => entries.push((key, value)),
                    }
                }
            }
        }
    }
}

impl EventSink for ObjectBuilder {
    fn begin_object(&mut self) {
        self.stack.push(Frame::Object {
            entries: Vec::new(),
            pending_key: None,
        });
    }

    fn end_object(&mut self) {
        if let Some(Frame::Object { entries, .. }) = self.stack.pop() {
            self.attach(JsonValue::Object(entries));
        }
    }

    fn key(&mut self, key: &str) {
        if let Some(Frame::Object { pending_key, .. }) = self.stack.last_mut() {
            *pending_key = Some(key.to_string());
        }
    }

    fn begin_array(&mut self) {
        self.stack.push(Frame::Array(Vec::new()));
    }

    fn end_array(&mut self) {
        if let Some(Frame::Array(items)) = self.stack.pop() {
            self.attach(JsonValue::Array(items));
        }
    }

    fn number(&mut self, value: f64) {
        self.attach(JsonValue::Number(value));
    }

    fn string(&mut self, value: &str) {
        self.attach(JsonValue::String(value.to_string()));
    }

    fn boolean(&mut self, value: bool) {
        self.attach(JsonValue::Bool(value));
    }

    fn null_value(&mut self) {
        self.attach(JsonValue::Null);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::parser::{Mode, Reader};

    fn build(input: &str) -> JsonValue {
        let mut reader =
            Reader::from_bytes(input.as_bytes(), ObjectBuilder::new(), Mode::Strict);
        assert!(reader.parse().unwrap());
        reader.into_sink().take_root().unwrap()
    }

    #[test]
    fn scalars_become_the_root() {
        assert_eq!(build("42"), JsonValue::Number(42.0));
        assert_eq!(build("true"), JsonValue::Bool(true));
        assert_eq!(build("null"), JsonValue::Null);
    }

    #[test]
    fn containers_nest() {
        let root = build(r#"{ "a" : [ 1, { "b" : "x" } ] }"#);
        assert_eq!(root["a"][0].as_long().unwrap(), 1);
        assert_eq!(root["a"][1]["b"].as_str().unwrap(), "x");
    }

    #[test]
    fn member_order_is_preserved() {
        let root = build(r#"{ "z" : 1, "a" : 2, "m" : 3 }"#);
        let keys: Vec<&str> = root
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn duplicate_keys_take_the_last_value() {
        let root = build(r#"{ "k" : 1, "other" : 2, "k" : 3 }"#);
        assert_eq!(root["k"].as_long().unwrap(), 3);
        assert_eq!(root.as_object().unwrap().len(), 2);
    }

    #[test]
    fn wrong_variant_access_is_a_typed_error() {
        let root = build(r#"{ "n" : 1 }"#);
        assert_eq!(
            root["n"].as_str(),
            Err(ValueError::KindMismatch {
                expected: "string",
                found: "number"
            })
        );
        assert_eq!(
            root.as_array(),
            Err(ValueError::KindMismatch {
                expected: "array",
                found: "object"
            })
        );
    }

    #[test]
    fn missing_members_index_to_null() {
        let root = build(r#"{ "a" : [ 1 ] }"#);
        assert!(root["nope"].is_null());
        assert!(root["a"][7].is_null());
        assert!(root["a"][0]["deeper"].is_null());
    }

    #[test]
    fn emit_replays_the_event_stream() {
        let root = build(r#"{ "a" : [ 1, true, null ], "b" : "s" }"#);
        let mut rebuilt = ObjectBuilder::new();
        root.emit(&mut rebuilt);
        assert_eq!(rebuilt.take_root().unwrap(), root);
    }

    #[test]
    fn aborted_parse_leaves_no_root() {
        let mut reader = Reader::from_bytes(
            br#"{ "a" : [ 1, 2"#,
            ObjectBuilder::new(),
            Mode::Lenient,
        );
        assert_eq!(reader.parse().unwrap(), false);
        assert!(reader.into_sink().take_root().is_none());
    }
}
