//! A TOML 1.0.0 parser producing a fully owned document tree with typed
//! dotted-path accessors.
//!
//! The returned [`Document`] owns all of its data: nothing borrows from the
//! input text, so it can be moved or shared across threads freely. Parsing
//! either succeeds for the whole input or returns the first [`Error`] with a
//! byte offset; partial documents are never produced.
//!
//! # Quick start
//!
//! ```
//! let doc = toml_dom::parse(
//!     "title = \"My App\"\n\
//!      [server]\n\
//!      host = \"0.0.0.0\"\n\
//!      port = 3000\n",
//! )?;
//!
//! assert_eq!(doc.get_string("title"), Some("My App"));
//! assert_eq!(doc.get_string("server.host"), Some("0.0.0.0"));
//! assert_eq!(doc.get_int("server.port"), Some(3000));
//! # Ok::<(), toml_dom::Error>(())
//! ```
//!
//! Accessors never fail: a missing path or a type mismatch is reported as
//! `None`. For untyped traversal use [`Table::get_value`] and match on
//! [`Value`]:
//!
//! ```
//! use toml_dom::Value;
//!
//! let doc = toml_dom::parse("answer = 42")?;
//! match doc.get_value("answer") {
//!     Some(Value::Integer(n)) => assert_eq!(*n, 42),
//!     _ => panic!("expected an integer"),
//! }
//! # Ok::<(), toml_dom::Error>(())
//! ```
//!
//! Errors carry a zero-based byte offset into the input:
//!
//! ```
//! let err = toml_dom::parse("port = 0x").unwrap_err();
//! assert_eq!(err.offset(), 7);
//! ```

mod assemble;
mod error;
mod parser;
mod section;
mod table;
mod time;
mod value;

pub use error::{Error, ErrorKind, Span};
pub use table::{Iter, Table};
pub use time::{Date, LocalDateTime, OffsetDateTime, Time};
pub use value::{Kind, Value};

#[cfg(feature = "serde")]
pub mod impl_serde;

/// The root table of a parsed TOML document.
pub type Document = Table;

/// Parses a TOML 1.0.0 string into a [`Document`].
///
/// The input may start with a UTF-8 BOM, which is skipped. On failure the
/// returned [`Error`] describes the first problem encountered, with a byte
/// offset into the input.
pub fn parse(input: &str) -> Result<Document, Error> {
    assemble::assemble(parser::parse_stream(input)?)
}
