//! The [`Table`] map type and the dotted-path accessor façade.

#[cfg(test)]
#[path = "./table_tests.rs"]
mod tests;

use crate::value::Value;
use indexmap::IndexMap;

type Entries = IndexMap<String, Value, foldhash::fast::RandomState>;

/// A TOML table: an insertion-ordered map from key to [`Value`].
///
/// Duplicate keys are rejected during parsing, so every key is unique. The
/// document root is itself a [`Table`]; see [`Document`](crate::Document).
#[derive(Clone, PartialEq, Default)]
pub struct Table {
    entries: Entries,
}

impl Table {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a reference to the value for a single key (no path walking).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns `true` if the table contains the key.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over `(key, value)` entries in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Table {
    /// Walks a dotted path (`"server.host"`) and returns the value at its
    /// end, if every intermediate component is a table or inline table and
    /// the final component exists.
    ///
    /// The path is a naive split on `.`: a key whose name itself contains a
    /// dot (possible when quoted at definition time) is not addressable this
    /// way; use [`Table::get_value_path`] with pre-split components instead.
    pub fn get_value(&self, path: &str) -> Option<&Value> {
        let mut components = path.split('.');
        // split always yields at least one component
        let last = components.next_back()?;
        let mut table = self;
        for component in components {
            table = table.get(component)?.as_table()?;
        }
        table.get(last)
    }

    /// Like [`Table::get_value`], but takes already-split path components,
    /// so keys containing literal dots stay addressable.
    pub fn get_value_path(&self, path: &[&str]) -> Option<&Value> {
        let (last, init) = path.split_last()?;
        let mut table = self;
        for component in init {
            table = table.get(component)?.as_table()?;
        }
        table.get(last)
    }

    /// Returns the string at `path`, if present and a string.
    pub fn get_string(&self, path: &str) -> Option<&str> {
        self.get_value(path)?.as_str()
    }

    /// Returns the integer at `path`, if present and an integer.
    pub fn get_int(&self, path: &str) -> Option<i64> {
        self.get_value(path)?.as_integer()
    }

    /// Returns the float at `path`, if present and a float.
    pub fn get_float(&self, path: &str) -> Option<f64> {
        self.get_value(path)?.as_float()
    }

    /// Returns the boolean at `path`, if present and a boolean.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get_value(path)?.as_bool()
    }

    /// Returns the array at `path` as strings, if present, an array, and
    /// every element is a string.
    pub fn get_string_array(&self, path: &str) -> Option<Vec<&str>> {
        self.get_value(path)?
            .as_array()?
            .iter()
            .map(Value::as_str)
            .collect()
    }

    /// Returns the table at `path`, if present and a header (non-inline)
    /// table.
    pub fn get_table(&self, path: &str) -> Option<&Table> {
        match self.get_value(path)? {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the inline table at `path`, if present and an inline table.
    /// Its entries are iterable in insertion order via [`Table::iter`].
    pub fn get_inline_table(&self, path: &str) -> Option<&Table> {
        match self.get_value(path)? {
            Value::InlineTable(t) => Some(t),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

/// Borrowing iterator over a [`Table`], yielding `(&str, &Value)` pairs.
pub struct Iter<'a> {
    inner: indexmap::map::Iter<'a, String, Value>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
