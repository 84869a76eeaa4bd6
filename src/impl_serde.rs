#![cfg_attr(docsrs, doc(cfg(feature = "serde")))]

//! Serde serialization support for [`Value`] and [`Table`].
//!
//! Enabled by the `serde` feature flag. Tables serialize as maps, arrays as
//! sequences, and date-time values as RFC 3339-shaped strings via their
//! `Display` impls. Only [`serde::Serialize`] is provided; building a
//! document goes through [`crate::parse`].

use crate::{Table, Value};
use serde::ser::{SerializeMap, SerializeSeq};

impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::OffsetDateTime(dt) => serializer.collect_str(dt),
            Value::LocalDateTime(dt) => serializer.collect_str(dt),
            Value::LocalDate(d) => serializer.collect_str(d),
            Value::LocalTime(t) => serializer.collect_str(t),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Table(t) | Value::InlineTable(t) => t.serialize(serializer),
        }
    }
}

impl serde::Serialize for Table {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
