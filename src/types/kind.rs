//! # Value Kind Discriminants
//!
//! This module provides the canonical `Kind` enum, the closed set of variant
//! tags a row cell can carry. Every cell the engine manipulates is tagged
//! with exactly one of these kinds; the tag is fixed at construction and
//! never changes for the lifetime of the value.
//!
//! ## Design Principles
//!
//! 1. **Single source of truth**: one `Kind` enum used by values, schemas
//!    and projections alike
//! 2. **Storage-efficient**: `#[repr(u8)]` for a single-byte discriminant
//! 3. **Closed set**: adding a kind is a deliberate, crate-wide decision
//!
//! ## Kinds
//!
//! | Kind | Payload | Wire tag |
//! |-----------|----------------------------------|-----------|
//! | Int | 64-bit signed integer | INT |
//! | Real | IEEE-754 double | REAL |
//! | Bool | boolean | BOOLEAN |
//! | Date | calendar day (Julian-day-backed) | DATE |
//! | Time | time of day (seconds-backed) | TIME |
//! | Timestamp | instant (seconds-backed) | TIMESTAMP |
//! | String | owned byte sequence | STRING |

use std::fmt;

/// Variant tag for a [`TypedValue`](super::TypedValue).
///
/// Uses `#[repr(u8)]` for efficient single-byte storage encoding.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Int = 0,
    Real = 1,
    Bool = 2,
    Date = 3,
    Time = 4,
    Timestamp = 5,
    String = 6,
}

impl Kind {
    /// Returns the wire-level type tag for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Int => "INT",
            Kind::Real => "REAL",
            Kind::Bool => "BOOLEAN",
            Kind::Date => "DATE",
            Kind::Time => "TIME",
            Kind::Timestamp => "TIMESTAMP",
            Kind::String => "STRING",
        }
    }

    /// Returns true if this is a numeric kind.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Kind::Int | Kind::Real)
    }

    /// Returns true if this is a date/time kind.
    pub fn is_datetime(&self) -> bool {
        matches!(self, Kind::Date | Kind::Time | Kind::Timestamp)
    }

    /// Returns all kinds, in discriminant order.
    pub fn all() -> [Kind; 7] {
        [
            Kind::Int,
            Kind::Real,
            Kind::Bool,
            Kind::Date,
            Kind::Time,
            Kind::Timestamp,
            Kind::String,
        ]
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Kind {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Kind::Int),
            1 => Ok(Kind::Real),
            2 => Ok(Kind::Bool),
            3 => Ok(Kind::Date),
            4 => Ok(Kind::Time),
            5 => Ok(Kind::Timestamp),
            6 => Ok(Kind::String),
            _ => eyre::bail!("invalid Kind discriminant: {}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminant_roundtrip() {
        for kind in Kind::all() {
            assert_eq!(Kind::try_from(kind as u8).unwrap(), kind);
        }
        assert!(Kind::try_from(7).is_err());
        assert!(Kind::try_from(255).is_err());
    }

    #[test]
    fn wire_names() {
        assert_eq!(Kind::Int.name(), "INT");
        assert_eq!(Kind::Bool.name(), "BOOLEAN");
        assert_eq!(Kind::Timestamp.to_string(), "TIMESTAMP");
    }

    #[test]
    fn categories() {
        assert!(Kind::Int.is_numeric());
        assert!(Kind::Real.is_numeric());
        assert!(!Kind::Date.is_numeric());
        assert!(Kind::Time.is_datetime());
        assert!(!Kind::String.is_datetime());
    }
}
