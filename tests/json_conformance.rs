//! # JSON Conformance Test
//!
//! Source of truth for reader behavior: the accepted document set, the
//! rejected document set with error kinds and positions, strict/lenient
//! failure discipline, DOM navigation, and slice/stream equivalence.

use std::io::Write as _;

use csvql::json::{
    EventSink, JsonError, JsonErrorKind, JsonValue, Mode, NullSink, ObjectBuilder, Reader,
};
use csvql::types::ValueError;

const NESTED_IMAGE: &str = "                        \
{\
    \"Image\": { \
       \"Width\":  800, \
       \"Height\": 600, \
       \"Title\":  \"View from \t15th Floor\", \
       \"Thumbnail\": { \
            \"Url\":    \"http://www.example.com/image/481989943\", \
            \"Height\": 125, \
            \"Width\":  \"100\" \
        }, \
        \"IDs\": [116.47, 943, 234, -38793, null, false], \
        \"Cool\": true \
    } \
} ";

const RECORD_ARRAY: &str = r#"[
 {
 "precision": "zip",
 "Latitude":  37.7668,
 "Longitude": -122.3959,
 "Address":   "",
 "City":      "SAN FRANCISCO",
 "State":     "CA",
 "Zip":       "94107",
 "Country":   "US"
 },
 {
 "precision": "zip",
 "Latitude":  37.371991,
 "Longitude": -122.026020,
 "Address":   "",
 "City":      "SUNNYVALE",
 "State":     "CA",
 "Zip":       "94085",
 "Country":   "US"
 }
 ]"#;

/// NESTED_IMAGE with the Thumbnail "Width" key dropped.
const NESTED_IMAGE_BAD: &str = "                        \
{\
    \"Image\": { \
       \"Width\":  800, \
       \"Height\": 600, \
       \"Title\":  \"View from \t15th Floor\", \
       \"Thumbnail\": { \
            \"Url\":    \"http://www.example.com/image/481989943\", \
            \"Height\": 125, \
            \"100\" \
        }, \
        \"IDs\": [116.47, 943, 234, -38793, null, false], \
        \"Cool\": true \
    } \
} ";

fn parse_dom(input: &str) -> JsonValue {
    let mut reader = Reader::from_bytes(input.as_bytes(), ObjectBuilder::new(), Mode::Strict);
    assert!(reader.parse().unwrap());
    reader.into_sink().take_root().unwrap()
}

fn strict_error(input: &str) -> JsonError {
    let mut reader = Reader::from_bytes(input.as_bytes(), NullSink, Mode::Strict);
    reader.parse().unwrap_err()
}

fn lenient_ok(input: &str) -> bool {
    let mut reader = Reader::from_bytes(input.as_bytes(), NullSink, Mode::Lenient);
    reader.parse().unwrap()
}

#[test]
fn nested_object_with_mixed_scalars() {
    let root = parse_dom(NESTED_IMAGE);
    assert_eq!(root["Image"]["Width"].as_long().unwrap(), 800);
    assert_eq!(
        root["Image"]["Title"].as_str().unwrap(),
        "View from \t15th Floor"
    );
    assert_eq!(
        root["Image"]["Thumbnail"]["Url"].as_str().unwrap(),
        "http://www.example.com/image/481989943"
    );
    // "Width" in the thumbnail is a string, not a number
    assert_eq!(root["Image"]["Thumbnail"]["Width"].as_str().unwrap(), "100");

    let ids = &root["Image"]["IDs"];
    assert_eq!(ids.as_array().unwrap().len(), 6);
    assert!((ids[0].as_double().unwrap() - 116.47).abs() <= 0.001);
    assert_eq!(ids[3].as_long().unwrap(), -38793);
    assert!(ids[4].is_null());
    assert_eq!(ids[5].as_bool().unwrap(), false);
    assert_eq!(root["Image"]["Cool"].as_bool().unwrap(), true);
}

#[test]
fn top_level_array_of_records() {
    let root = parse_dom(RECORD_ARRAY);
    assert_eq!(root.as_array().unwrap().len(), 2);
    assert_eq!(root[0]["City"].as_str().unwrap(), "SAN FRANCISCO");
    assert_eq!(root[1]["City"].as_str().unwrap(), "SUNNYVALE");
    assert!((root[1]["Latitude"].as_double().unwrap() - 37.371991).abs() <= 1e-9);
    assert!((root[0]["Longitude"].as_double().unwrap() + 122.3959).abs() <= 1e-9);
    assert_eq!(root[0]["Zip"].as_str().unwrap(), "94107");
}

#[test]
fn rejected_documents_by_kind() {
    let cases: [(&str, JsonErrorKind); 10] = [
        ("{ \"Test\" : 0123 }", JsonErrorKind::Lex),
        ("{ \"Te\x0bst\" : 0123 }", JsonErrorKind::Lex),
        ("{ \"Test : 123 }", JsonErrorKind::UnterminatedString),
        ("{ \"Test : 12  ", JsonErrorKind::UnterminatedString),
        (
            "{ \"Test\" : 123 \"Test2\" : 236 }",
            JsonErrorKind::MissingComma,
        ),
        (
            "{ \"Test\" : 123, \"Test2\" : [ 127, 27  }",
            JsonErrorKind::UnexpectedToken,
        ),
        (
            "{ \"Test\" : 123, \"Test2\" : [ 127, 27 23 ] }",
            JsonErrorKind::MissingComma,
        ),
        ("{ \"Test\" : 123. }", JsonErrorKind::Lex),
        ("{ \"Test\" }", JsonErrorKind::MissingColon),
        (
            "{ \"Test\" : [ \"Test\" : 123 ] }",
            JsonErrorKind::UnexpectedToken,
        ),
    ];
    for (doc, expected) in cases {
        let err = strict_error(doc);
        assert_eq!(err.kind, expected, "wrong kind for {doc:?}: {err}");
        assert!(!lenient_ok(doc), "lenient parse accepted {doc:?}");
    }
}

#[test]
fn error_positions_point_at_the_offense() {
    // the '0' of the leading-zero number
    let err = strict_error("{ \"Test\" : 0123 }");
    assert_eq!((err.line, err.column), (1, 12));

    // the vertical tab inside the key
    let err = strict_error("{ \"Te\x0bst\" : 0123 }");
    assert_eq!((err.line, err.column), (1, 6));

    // the trailing dot
    let err = strict_error("{ \"Test\" : 123. }");
    assert_eq!((err.line, err.column), (1, 15));

    // positions track line breaks
    let err = strict_error("{\n  \"a\" : 01\n}");
    assert_eq!((err.line, err.column), (2, 9));
}

#[test]
fn accepted_edge_cases() {
    for doc in ["{ \"Test\" : [  ] }", "{  }", "[ 123.12e-34 ]", "{ \"length\" : 0 }"] {
        assert!(lenient_ok(doc), "rejected {doc:?}");
        let err = {
            let mut reader = Reader::from_bytes(doc.as_bytes(), NullSink, Mode::Strict);
            reader.parse()
        };
        assert!(err.is_ok(), "strict mode rejected {doc:?}");
    }

    let root = parse_dom("{ \"Test\" : [  ] }");
    assert_eq!(root["Test"].as_array().unwrap().len(), 0);
    let root = parse_dom("{  }");
    assert_eq!(root.as_object().unwrap().len(), 0);
    let root = parse_dom("[ 123.12e-34 ]");
    assert!((root[0].as_double().unwrap() - 123.12e-34).abs() <= 1e-40);
    let root = parse_dom("{ \"length\" : 0 }");
    assert_eq!(root["length"].as_long().unwrap(), 0);
}

#[test]
fn validate_only_with_a_null_sink() {
    let mut reader = Reader::from_bytes(NESTED_IMAGE.as_bytes(), NullSink, Mode::Lenient);
    assert!(reader.parse().unwrap());

    let mut reader = Reader::from_bytes(NESTED_IMAGE_BAD.as_bytes(), NullSink, Mode::Lenient);
    assert!(!reader.parse().unwrap());
}

#[test]
fn strict_reader_raises_where_lenient_collapses() {
    let mut strict = Reader::from_bytes(
        NESTED_IMAGE_BAD.as_bytes(),
        ObjectBuilder::new(),
        Mode::Strict,
    );
    let err = strict.parse().unwrap_err();
    assert_eq!(err.kind, JsonErrorKind::MissingColon);
    assert!(err.line >= 1 && err.column >= 1);
}

#[test]
fn streaming_source_matches_in_memory_source() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(NESTED_IMAGE.as_bytes()).unwrap();
    file.flush().unwrap();

    let handle = std::fs::File::open(file.path()).unwrap();
    let mut reader = Reader::from_stream(handle, ObjectBuilder::new(), Mode::Strict);
    assert!(reader.parse().unwrap());
    let from_stream = reader.into_sink().take_root().unwrap();

    assert_eq!(from_stream, parse_dom(NESTED_IMAGE));
}

#[test]
fn truncated_stream_is_a_truncated_input_error() {
    let truncated = &NESTED_IMAGE.as_bytes()[..40];
    let mut reader = Reader::from_stream(truncated, NullSink, Mode::Strict);
    let err = reader.parse().unwrap_err();
    assert!(matches!(
        err.kind,
        JsonErrorKind::UnexpectedEof | JsonErrorKind::UnterminatedString
    ));
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    BeginObject,
    EndObject,
    Key(String),
    BeginArray,
    EndArray,
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl EventSink for Recorder {
    fn begin_object(&mut self) {
        self.events.push(Event::BeginObject);
    }
    fn end_object(&mut self) {
        self.events.push(Event::EndObject);
    }
    fn key(&mut self, key: &str) {
        self.events.push(Event::Key(key.to_string()));
    }
    fn begin_array(&mut self) {
        self.events.push(Event::BeginArray);
    }
    fn end_array(&mut self) {
        self.events.push(Event::EndArray);
    }
    fn number(&mut self, value: f64) {
        self.events.push(Event::Number(value));
    }
    fn string(&mut self, value: &str) {
        self.events.push(Event::Str(value.to_string()));
    }
    fn boolean(&mut self, value: bool) {
        self.events.push(Event::Bool(value));
    }
    fn null_value(&mut self) {
        self.events.push(Event::Null);
    }
}

#[test]
fn dom_traversal_replays_the_parse_event_stream() {
    for doc in [NESTED_IMAGE, RECORD_ARRAY, "{  }", "[ 123.12e-34 ]"] {
        let mut reader = Reader::from_bytes(doc.as_bytes(), Recorder::default(), Mode::Strict);
        assert!(reader.parse().unwrap());
        let parsed_events = reader.into_sink().events;

        let mut replayed = Recorder::default();
        parse_dom(doc).emit(&mut replayed);
        assert_eq!(replayed.events, parsed_events);
    }
}

#[test]
fn dom_accessors_fail_with_typed_errors() {
    let root = parse_dom(NESTED_IMAGE);
    assert!(matches!(
        root["Image"]["Width"].as_str(),
        Err(ValueError::KindMismatch { .. })
    ));
    assert!(matches!(
        root["Image"].as_array(),
        Err(ValueError::KindMismatch { .. })
    ));
    // missing keys navigate to Null, whose typed access then fails
    assert!(matches!(
        root["Missing"].as_long(),
        Err(ValueError::KindMismatch { .. })
    ));
}
