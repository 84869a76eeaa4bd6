//! The [`Value`] enum: an owned TOML value of any kind.

#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;

use crate::table::Table;
use crate::time::{Date, LocalDateTime, OffsetDateTime, Time};

/// An owned TOML value.
///
/// Tables created by a `[header]` (or implicitly by one) and tables created
/// by `{…}` syntax are distinct variants: an [`InlineTable`](Value::InlineTable)
/// is closed the moment its brace is and can never be extended, and that
/// distinction is preserved in the parsed document.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    /// A string, with escapes decoded and multiline newlines normalized.
    String(String),
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit float, including ±infinity and NaN.
    Float(f64),
    /// A boolean.
    Boolean(bool),
    /// A date-time carrying a UTC offset.
    OffsetDateTime(OffsetDateTime),
    /// A date-time with no offset.
    LocalDateTime(LocalDateTime),
    /// A calendar date.
    LocalDate(Date),
    /// A wall-clock time.
    LocalTime(Time),
    /// An ordered sequence of values, possibly of mixed kinds.
    Array(Vec<Value>),
    /// A table defined by a header or created implicitly by one.
    Table(Table),
    /// A table defined by `{…}` syntax; never extendable.
    InlineTable(Table),
}

/// The kind of a [`Value`], without its payload.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Kind {
    String,
    Integer,
    Float,
    Boolean,
    OffsetDateTime,
    LocalDateTime,
    LocalDate,
    LocalTime,
    Array,
    Table,
    InlineTable,
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Integer(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::Boolean(_) => Kind::Boolean,
            Value::OffsetDateTime(_) => Kind::OffsetDateTime,
            Value::LocalDateTime(_) => Kind::LocalDateTime,
            Value::LocalDate(_) => Kind::LocalDate,
            Value::LocalTime(_) => Kind::LocalTime,
            Value::Array(_) => Kind::Array,
            Value::Table(_) => Kind::Table,
            Value::InlineTable(_) => Kind::InlineTable,
        }
    }

    /// Gets the type of the value as a string.
    pub fn type_str(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::OffsetDateTime(_) => "offset date-time",
            Value::LocalDateTime(_) => "local date-time",
            Value::LocalDate(_) => "local date",
            Value::LocalTime(_) => "local time",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
            Value::InlineTable(_) => "inline table",
        }
    }

    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float payload, if this is a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the array elements, if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the table payload for either table kind.
    ///
    /// Path walking treats header tables and inline tables alike; use
    /// [`Value::kind`] when the distinction matters.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) | Value::InlineTable(t) => Some(t),
            _ => None,
        }
    }
}
