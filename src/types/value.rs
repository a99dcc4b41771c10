//! # Typed Row Values
//!
//! This module provides `TypedValue`, the runtime representation for every
//! row cell the engine manipulates. Values are immutable once constructed
//! and own their payload exclusively.
//!
//! ## Design Goals
//!
//! 1. **Closed variant set**: a tagged sum type, no dynamic dispatch on the
//!    hot comparison/hash/render paths
//! 2. **Nullability by construction**: every variant carries an explicit
//!    `Option` payload, so a null bit can never desynchronize from the data
//! 3. **SQL semantics**: comparing against NULL yields UNKNOWN (`None`)
//! 4. **Hash/equality consistency**: `equals(a, b)` implies equal hashes,
//!    including tolerant REAL equality
//!
//! ## Variants
//!
//! | Variant | Rust payload | Rendered form |
//! |-----------|--------------------|---------------------------|
//! | Int | `Option<i64>` | decimal integer |
//! | Real | `Option<f64>` | fixed-point, 6 fraction digits |
//! | Bool | `Option<bool>` | `1` / `0` |
//! | Date | `Option<NaiveDate>` | `YYYY-MM-DD` |
//! | Time | `Option<NaiveTime>` | `HH:MM:SS` |
//! | Timestamp | `Option<NaiveDateTime>` | `YYYY-MM-DDTHH:MM:SS` |
//! | String | `Option<String>` | raw bytes, no quoting |
//!
//! A null of any kind renders as `NULL`.
//!
//! ## Comparison Semantics
//!
//! - NULL compared to anything returns `None` (SQL UNKNOWN); callers that
//!   need a total order pick a side via [`TypedValue::compare_for_sort`]
//! - Int vs Real: Int promoted to Real
//! - REAL equality is tolerant ([`float::approx_eq`]); `<` stays bitwise
//! - STRING ordering goes through the single [`collate`] seam

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use eyre::{bail, Result, WrapErr};
use std::cmp::Ordering;
use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use thiserror::Error;

use super::float;
use super::Kind;

/// Days between 0001-01-01 (proleptic Gregorian) and the Julian day epoch.
const JULIAN_DAY_OFFSET: i64 = 1_721_425;

/// Contract violations on the typed value surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("typed access expected {expected}, found {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("typed access on a NULL {0} value")]
    NullAccess(&'static str),
    #[error("cannot convert a {from} payload into {into}")]
    ConversionFailed {
        from: &'static str,
        into: &'static str,
    },
}

/// Untyped payload holder consumed by [`TypedValue::make`].
///
/// This is what the engine's parsers hand over before a column kind has
/// been pinned down: a literal with its natural dynamic type.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue {
    Null,
    Int(i64),
    Real(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    String(String),
}

impl AnyValue {
    fn type_name(&self) -> &'static str {
        match self {
            AnyValue::Null => "null",
            AnyValue::Int(_) => "integer",
            AnyValue::Real(_) => "real",
            AnyValue::Bool(_) => "boolean",
            AnyValue::Date(_) => "date",
            AnyValue::Time(_) => "time",
            AnyValue::Timestamp(_) => "timestamp",
            AnyValue::String(_) => "string",
        }
    }
}

impl From<i64> for AnyValue {
    fn from(v: i64) -> Self {
        AnyValue::Int(v)
    }
}

impl From<f64> for AnyValue {
    fn from(v: f64) -> Self {
        AnyValue::Real(v)
    }
}

impl From<bool> for AnyValue {
    fn from(v: bool) -> Self {
        AnyValue::Bool(v)
    }
}

impl From<NaiveDate> for AnyValue {
    fn from(v: NaiveDate) -> Self {
        AnyValue::Date(v)
    }
}

impl From<NaiveTime> for AnyValue {
    fn from(v: NaiveTime) -> Self {
        AnyValue::Time(v)
    }
}

impl From<NaiveDateTime> for AnyValue {
    fn from(v: NaiveDateTime) -> Self {
        AnyValue::Timestamp(v)
    }
}

impl From<String> for AnyValue {
    fn from(v: String) -> Self {
        AnyValue::String(v)
    }
}

impl From<&str> for AnyValue {
    fn from(v: &str) -> Self {
        AnyValue::String(v.to_string())
    }
}

/// Runtime representation of a row cell.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Int(Option<i64>),
    Real(Option<f64>),
    Bool(Option<bool>),
    Date(Option<NaiveDate>),
    Time(Option<NaiveTime>),
    Timestamp(Option<NaiveDateTime>),
    String(Option<String>),
}

/// Julian day number of a calendar date.
pub fn julian_day(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 + JULIAN_DAY_OFFSET
}

/// Calendar date for a Julian day number, if representable.
pub fn date_from_julian_day(day: i64) -> Option<NaiveDate> {
    let days_from_ce = day.checked_sub(JULIAN_DAY_OFFSET)?;
    NaiveDate::from_num_days_from_ce_opt(i32::try_from(days_from_ce).ok()?)
}

/// String comparator used for every STRING ordering and equality decision.
///
/// Currently byte order; swapping in a collation-aware comparator here
/// changes the ordering crate-wide.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

impl TypedValue {
    /// Constructs a non-null INT value.
    pub fn int(v: i64) -> Self {
        TypedValue::Int(Some(v))
    }

    /// Constructs a non-null REAL value.
    pub fn real(v: f64) -> Self {
        TypedValue::Real(Some(v))
    }

    /// Constructs a non-null BOOLEAN value.
    pub fn boolean(v: bool) -> Self {
        TypedValue::Bool(Some(v))
    }

    /// Constructs a non-null DATE value.
    pub fn date(v: NaiveDate) -> Self {
        TypedValue::Date(Some(v))
    }

    /// Constructs a non-null TIME value.
    pub fn time(v: NaiveTime) -> Self {
        TypedValue::Time(Some(v))
    }

    /// Constructs a non-null TIMESTAMP value.
    pub fn timestamp(v: NaiveDateTime) -> Self {
        TypedValue::Timestamp(Some(v))
    }

    /// Constructs a non-null STRING value, copying the payload.
    pub fn string(v: impl Into<String>) -> Self {
        TypedValue::String(Some(v.into()))
    }

    /// Constructs a null of the given kind. A naked untyped null is not
    /// representable; nullness is always parameterized by kind.
    pub fn null_of(kind: Kind) -> Self {
        match kind {
            Kind::Int => TypedValue::Int(None),
            Kind::Real => TypedValue::Real(None),
            Kind::Bool => TypedValue::Bool(None),
            Kind::Date => TypedValue::Date(None),
            Kind::Time => TypedValue::Time(None),
            Kind::Timestamp => TypedValue::Timestamp(None),
            Kind::String => TypedValue::String(None),
        }
    }

    /// Constructs a value of `kind` from an untyped payload holder.
    ///
    /// A `Null` payload yields the null of `kind`. An integer payload
    /// satisfies REAL by widening; every other pairing must match exactly.
    pub fn make(kind: Kind, any: AnyValue) -> Result<TypedValue, ValueError> {
        match (kind, any) {
            (kind, AnyValue::Null) => Ok(TypedValue::null_of(kind)),
            (Kind::Int, AnyValue::Int(v)) => Ok(TypedValue::int(v)),
            (Kind::Real, AnyValue::Real(v)) => Ok(TypedValue::real(v)),
            (Kind::Real, AnyValue::Int(v)) => Ok(TypedValue::real(v as f64)),
            (Kind::Bool, AnyValue::Bool(v)) => Ok(TypedValue::boolean(v)),
            (Kind::Date, AnyValue::Date(v)) => Ok(TypedValue::date(v)),
            (Kind::Time, AnyValue::Time(v)) => Ok(TypedValue::time(v)),
            (Kind::Timestamp, AnyValue::Timestamp(v)) => Ok(TypedValue::timestamp(v)),
            (Kind::String, AnyValue::String(v)) => Ok(TypedValue::String(Some(v))),
            (kind, other) => Err(ValueError::ConversionFailed {
                from: other.type_name(),
                into: kind.name(),
            }),
        }
    }

    /// Parses the canonical rendered form back into a value of `kind`.
    ///
    /// `"NULL"` parses as the null of the requested kind. BOOLEAN accepts
    /// `1`/`0` as well as `true`/`false`.
    pub fn from_text(kind: Kind, text: &str) -> Result<TypedValue> {
        if text == "NULL" {
            return Ok(TypedValue::null_of(kind));
        }
        let value = match kind {
            Kind::Int => TypedValue::int(
                text.trim()
                    .parse()
                    .wrap_err_with(|| format!("cannot parse '{}' as INT", text))?,
            ),
            Kind::Real => TypedValue::real(
                text.trim()
                    .parse()
                    .wrap_err_with(|| format!("cannot parse '{}' as REAL", text))?,
            ),
            Kind::Bool => match text.trim() {
                "1" | "true" => TypedValue::boolean(true),
                "0" | "false" => TypedValue::boolean(false),
                other => bail!("cannot parse '{}' as BOOLEAN", other),
            },
            Kind::Date => TypedValue::date(
                NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                    .wrap_err_with(|| format!("cannot parse '{}' as DATE", text))?,
            ),
            Kind::Time => TypedValue::time(
                NaiveTime::parse_from_str(text.trim(), "%H:%M:%S")
                    .wrap_err_with(|| format!("cannot parse '{}' as TIME", text))?,
            ),
            Kind::Timestamp => TypedValue::timestamp(
                NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%dT%H:%M:%S")
                    .wrap_err_with(|| format!("cannot parse '{}' as TIMESTAMP", text))?,
            ),
            Kind::String => TypedValue::string(text),
        };
        Ok(value)
    }

    /// Returns the variant tag.
    pub fn kind(&self) -> Kind {
        match self {
            TypedValue::Int(_) => Kind::Int,
            TypedValue::Real(_) => Kind::Real,
            TypedValue::Bool(_) => Kind::Bool,
            TypedValue::Date(_) => Kind::Date,
            TypedValue::Time(_) => Kind::Time,
            TypedValue::Timestamp(_) => Kind::Timestamp,
            TypedValue::String(_) => Kind::String,
        }
    }

    /// Returns true if this value is a null of its kind.
    pub fn is_null(&self) -> bool {
        match self {
            TypedValue::Int(v) => v.is_none(),
            TypedValue::Real(v) => v.is_none(),
            TypedValue::Bool(v) => v.is_none(),
            TypedValue::Date(v) => v.is_none(),
            TypedValue::Time(v) => v.is_none(),
            TypedValue::Timestamp(v) => v.is_none(),
            TypedValue::String(v) => v.is_none(),
        }
    }

    /// INT payload accessor.
    pub fn as_int(&self) -> Result<i64, ValueError> {
        match self {
            TypedValue::Int(Some(v)) => Ok(*v),
            TypedValue::Int(None) => Err(ValueError::NullAccess(Kind::Int.name())),
            other => Err(ValueError::KindMismatch {
                expected: Kind::Int.name(),
                found: other.kind().name(),
            }),
        }
    }

    /// REAL payload accessor.
    pub fn as_real(&self) -> Result<f64, ValueError> {
        match self {
            TypedValue::Real(Some(v)) => Ok(*v),
            TypedValue::Real(None) => Err(ValueError::NullAccess(Kind::Real.name())),
            other => Err(ValueError::KindMismatch {
                expected: Kind::Real.name(),
                found: other.kind().name(),
            }),
        }
    }

    /// BOOLEAN payload accessor.
    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            TypedValue::Bool(Some(v)) => Ok(*v),
            TypedValue::Bool(None) => Err(ValueError::NullAccess(Kind::Bool.name())),
            other => Err(ValueError::KindMismatch {
                expected: Kind::Bool.name(),
                found: other.kind().name(),
            }),
        }
    }

    /// DATE payload accessor.
    pub fn as_date(&self) -> Result<NaiveDate, ValueError> {
        match self {
            TypedValue::Date(Some(v)) => Ok(*v),
            TypedValue::Date(None) => Err(ValueError::NullAccess(Kind::Date.name())),
            other => Err(ValueError::KindMismatch {
                expected: Kind::Date.name(),
                found: other.kind().name(),
            }),
        }
    }

    /// TIME payload accessor.
    pub fn as_time(&self) -> Result<NaiveTime, ValueError> {
        match self {
            TypedValue::Time(Some(v)) => Ok(*v),
            TypedValue::Time(None) => Err(ValueError::NullAccess(Kind::Time.name())),
            other => Err(ValueError::KindMismatch {
                expected: Kind::Time.name(),
                found: other.kind().name(),
            }),
        }
    }

    /// TIMESTAMP payload accessor.
    pub fn as_timestamp(&self) -> Result<NaiveDateTime, ValueError> {
        match self {
            TypedValue::Timestamp(Some(v)) => Ok(*v),
            TypedValue::Timestamp(None) => Err(ValueError::NullAccess(Kind::Timestamp.name())),
            other => Err(ValueError::KindMismatch {
                expected: Kind::Timestamp.name(),
                found: other.kind().name(),
            }),
        }
    }

    /// STRING payload accessor.
    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            TypedValue::String(Some(v)) => Ok(v.as_str()),
            TypedValue::String(None) => Err(ValueError::NullAccess(Kind::String.name())),
            other => Err(ValueError::KindMismatch {
                expected: Kind::String.name(),
                found: other.kind().name(),
            }),
        }
    }

    /// Appends the canonical textual form to `out`.
    pub fn render(&self, out: &mut String) {
        let _ = write!(out, "{}", self);
    }

    /// Compares two values with SQL NULL semantics.
    /// Returns `None` if either operand is null or the kinds are incomparable.
    pub fn compare(&self, other: &TypedValue) -> Option<Ordering> {
        match (self, other) {
            (TypedValue::Int(Some(a)), TypedValue::Int(Some(b))) => Some(a.cmp(b)),
            (TypedValue::Real(Some(a)), TypedValue::Real(Some(b))) => {
                if a.is_nan() || b.is_nan() {
                    None
                } else if float::approx_eq(*a, *b) {
                    Some(Ordering::Equal)
                } else {
                    a.partial_cmp(b)
                }
            }
            (TypedValue::Int(Some(i)), TypedValue::Real(Some(f))) => {
                if f.is_nan() {
                    None
                } else {
                    (*i as f64).partial_cmp(f)
                }
            }
            (TypedValue::Real(Some(f)), TypedValue::Int(Some(i))) => {
                if f.is_nan() {
                    None
                } else {
                    f.partial_cmp(&(*i as f64))
                }
            }
            (TypedValue::Bool(Some(a)), TypedValue::Bool(Some(b))) => Some(a.cmp(b)),
            (TypedValue::Date(Some(a)), TypedValue::Date(Some(b))) => Some(a.cmp(b)),
            (TypedValue::Time(Some(a)), TypedValue::Time(Some(b))) => Some(a.cmp(b)),
            (TypedValue::Timestamp(Some(a)), TypedValue::Timestamp(Some(b))) => Some(a.cmp(b)),
            (TypedValue::String(Some(a)), TypedValue::String(Some(b))) => Some(collate(a, b)),
            _ => None,
        }
    }

    /// Compares two values for sorting, collapsing incomparable pairs to
    /// `Equal` so the caller's sort stays stable.
    pub fn compare_for_sort(&self, other: &TypedValue) -> Ordering {
        self.compare(other).unwrap_or(Ordering::Equal)
    }

    /// Returns true iff both operands are non-null, of the same kind, and
    /// payload-equal. REAL uses tolerant equality; STRING equality goes
    /// through [`collate`].
    pub fn equals(&self, other: &TypedValue) -> bool {
        match (self, other) {
            (TypedValue::Int(Some(a)), TypedValue::Int(Some(b))) => a == b,
            (TypedValue::Real(Some(a)), TypedValue::Real(Some(b))) => float::approx_eq(*a, *b),
            (TypedValue::Bool(Some(a)), TypedValue::Bool(Some(b))) => a == b,
            (TypedValue::Date(Some(a)), TypedValue::Date(Some(b))) => a == b,
            (TypedValue::Time(Some(a)), TypedValue::Time(Some(b))) => a == b,
            (TypedValue::Timestamp(Some(a)), TypedValue::Timestamp(Some(b))) => a == b,
            (TypedValue::String(Some(a)), TypedValue::String(Some(b))) => {
                collate(a, b) == Ordering::Equal
            }
            _ => false,
        }
    }

    /// Hashes this value for use in hash joins and grouping.
    ///
    /// The kind tag is always mixed in; REAL payloads are quantized so
    /// tolerant equality and hashing agree; DATE hashes its Julian day,
    /// TIME and TIMESTAMP their backing integers.
    pub fn hash_to<H: Hasher>(&self, hasher: &mut H) {
        (self.kind() as u8).hash(hasher);
        match self {
            TypedValue::Int(Some(v)) => v.hash(hasher),
            TypedValue::Real(Some(v)) => float::hash_bits(*v).hash(hasher),
            TypedValue::Bool(Some(v)) => v.hash(hasher),
            TypedValue::Date(Some(v)) => julian_day(*v).hash(hasher),
            TypedValue::Time(Some(v)) => v.num_seconds_from_midnight().hash(hasher),
            TypedValue::Timestamp(Some(v)) => v.and_utc().timestamp().hash(hasher),
            TypedValue::String(Some(v)) => v.as_bytes().hash(hasher),
            _ => 0u8.hash(hasher),
        }
    }

    /// Reports an upper bound on the value's inline-plus-heap footprint.
    /// For STRING this is the base size plus payload length plus one
    /// terminating sentinel byte.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            TypedValue::String(Some(s)) => Self::base_size() + s.len() + 1,
            _ => Self::base_size(),
        }
    }

    /// Inline size of any value, independent of variant.
    pub fn base_size() -> usize {
        std::mem::size_of::<TypedValue>()
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Int(Some(v)) => write!(f, "{}", v),
            TypedValue::Real(Some(v)) => write!(f, "{:.6}", v),
            TypedValue::Bool(Some(v)) => f.write_str(if *v { "1" } else { "0" }),
            TypedValue::Date(Some(v)) => write!(f, "{}", v.format("%Y-%m-%d")),
            TypedValue::Time(Some(v)) => write!(f, "{}", v.format("%H:%M:%S")),
            TypedValue::Timestamp(Some(v)) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S")),
            TypedValue::String(Some(v)) => f.write_str(v),
            _ => f.write_str("NULL"),
        }
    }
}

/// Hash/equality adapter making [`TypedValue`] usable as a grouping key.
///
/// Differs from [`TypedValue::equals`] in two ways required of a map key:
/// two nulls of the same kind key the same group (SQL GROUP BY semantics),
/// and REAL payloads compare by their quantized hash bits so equality is a
/// true equivalence relation.
#[derive(Debug, Clone)]
pub struct ValueKey(pub TypedValue);

impl PartialEq for ValueKey {
    fn eq(&self, other: &Self) -> bool {
        if self.0.kind() != other.0.kind() {
            return false;
        }
        match (&self.0, &other.0) {
            (TypedValue::Real(Some(a)), TypedValue::Real(Some(b))) => {
                float::hash_bits(*a) == float::hash_bits(*b)
            }
            (a, b) if a.is_null() && b.is_null() => true,
            (a, b) => a.equals(b),
        }
    }
}

impl Eq for ValueKey {}

impl Hash for ValueKey {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.0.hash_to(hasher);
    }
}
