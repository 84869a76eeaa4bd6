use std::fmt::{self, Debug, Display};
use std::ops::Range;

/// The byte offsets of an offending piece of input, reported with every
/// [`Error`] and, for structural errors, with the first definition of a
/// contested key or table.
///
/// Offsets are stored as `u32`; [`crate::parse`] rejects inputs too large
/// for that before parsing begins.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl Span {
    #[inline]
    pub(crate) fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// The span as a [`Range<usize>`], ready for slicing the input text.
    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Span> for Range<usize> {
    fn from(s: Span) -> Self {
        s.to_range()
    }
}

/// Error that can occur while parsing a TOML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The error kind.
    pub kind: ErrorKind,
    /// The span where the error occurs.
    ///
    /// Note some [`ErrorKind`] variants carry additional span information.
    pub span: Span,
}

impl Error {
    /// Zero-based byte offset into the input where the error occurred.
    #[inline]
    pub fn offset(&self) -> usize {
        self.span.start as usize
    }
}

impl std::error::Error for Error {}

/// The kinds of errors that can occur while parsing a TOML document.
#[derive(Clone, PartialEq)]
pub enum ErrorKind {
    /// EOF was reached when looking for a value.
    UnexpectedEof,

    /// The input is larger than the maximum supported size of 4GiB.
    FileTooLarge,

    /// An invalid character not allowed in a string was found.
    InvalidCharInString(char),

    /// An invalid character was found as an escape.
    InvalidEscape(char),

    /// An invalid character was found in a hex escape.
    InvalidHexEscape(char),

    /// An invalid escape value was specified in a hex escape in a string.
    ///
    /// Valid values are in the plane of unicode codepoints.
    InvalidEscapeValue(u32),

    /// An unexpected character was encountered, typically when looking for a
    /// value.
    Unexpected(char),

    /// EOF was found before the string terminator.
    UnterminatedString,

    /// A number failed to parse.
    InvalidNumber,

    /// An integer literal does not fit in a signed 64-bit integer.
    IntegerOverflow,

    /// A date or time began but its fields are malformed or out of range.
    InvalidDateTime,

    /// Nested arrays and inline tables exceeded the recursion depth limit.
    RecursionLimit,

    /// Wanted one sort of token, but found another.
    Wanted {
        /// Expected token type.
        expected: &'static str,
        /// Actually found token type.
        found: &'static str,
    },

    /// A table header names a table that was already explicitly defined.
    DuplicateTable {
        /// The name of the duplicate table.
        name: String,
        /// The span where the table was first defined.
        first: Span,
    },

    /// Duplicate key in table.
    DuplicateKey {
        /// The duplicate key.
        key: String,
        /// The span where the first key is located.
        first: Span,
    },

    /// A header or dotted key attempted to extend an inline table.
    CannotExtendInlineTable {
        /// The key bound to the inline table.
        key: String,
        /// The span where the inline table was bound.
        first: Span,
    },

    /// A key path attempted to traverse a key already bound to a
    /// non-extendable value.
    KeyConflict {
        /// The conflicting key.
        key: String,
        /// The span where the key was first bound.
        first: Span,
    },

    /// An array-of-tables header names a key holding something other than an
    /// array of tables.
    RedefineAsArray {
        /// The name in the header.
        name: String,
        /// The span where the key was first bound.
        first: Span,
    },

    /// Multiline strings are not allowed for keys.
    MultilineStringKey,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnexpectedEof => "unexpected-eof",
            Self::FileTooLarge => "file-too-large",
            Self::InvalidCharInString(..) => "invalid-char-in-string",
            Self::InvalidEscape(..) => "invalid-escape",
            Self::InvalidHexEscape(..) => "invalid-hex-escape",
            Self::InvalidEscapeValue(..) => "invalid-escape-value",
            Self::Unexpected(..) => "unexpected",
            Self::UnterminatedString => "unterminated-string",
            Self::InvalidNumber => "invalid-number",
            Self::IntegerOverflow => "integer-overflow",
            Self::InvalidDateTime => "invalid-datetime",
            Self::RecursionLimit => "recursion-limit",
            Self::Wanted { .. } => "wanted",
            Self::DuplicateTable { .. } => "duplicate-table",
            Self::DuplicateKey { .. } => "duplicate-key",
            Self::CannotExtendInlineTable { .. } => "cannot-extend-inline-table",
            Self::KeyConflict { .. } => "key-conflict",
            Self::RedefineAsArray { .. } => "redefine-as-array",
            Self::MultilineStringKey => "multiline-string-key",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

struct Escape(char);

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        if self.0.is_whitespace() || self.0.is_control() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::UnexpectedEof => f.write_str("unexpected eof encountered"),
            ErrorKind::FileTooLarge => f.write_str("file is too large (maximum 4GiB)"),
            ErrorKind::InvalidCharInString(c) => {
                write!(f, "invalid character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidEscape(c) => {
                write!(f, "invalid escape character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidHexEscape(c) => {
                write!(f, "invalid hex escape character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidEscapeValue(v) => write!(f, "invalid escape value: `{v}`"),
            ErrorKind::Unexpected(c) => {
                write!(f, "unexpected character found: `{}`", Escape(*c))
            }
            ErrorKind::UnterminatedString => f.write_str("unterminated string"),
            ErrorKind::InvalidNumber => f.write_str("invalid number"),
            ErrorKind::IntegerOverflow => {
                f.write_str("integer does not fit in a signed 64-bit range")
            }
            ErrorKind::InvalidDateTime => f.write_str("invalid date or time"),
            ErrorKind::RecursionLimit => f.write_str("recursion depth limit exceeded"),
            ErrorKind::Wanted { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            ErrorKind::DuplicateTable { name, .. } => {
                write!(f, "redefinition of table `{name}`")
            }
            ErrorKind::DuplicateKey { key, .. } => write!(f, "duplicate key: `{key}`"),
            ErrorKind::CannotExtendInlineTable { key, .. } => {
                write!(f, "inline table `{key}` cannot be extended")
            }
            ErrorKind::KeyConflict { key, .. } => {
                write!(f, "key `{key}` is already bound and cannot be extended as a table")
            }
            ErrorKind::RedefineAsArray { name, .. } => {
                write!(f, "`{name}` redefined as an array of tables")
            }
            ErrorKind::MultilineStringKey => {
                f.write_str("multiline strings are not allowed for key")
            }
        }
    }
}

#[cfg(feature = "reporting")]
#[cfg_attr(docsrs, doc(cfg(feature = "reporting")))]
impl Error {
    /// Converts this [`Error`] into a [`codespan_reporting::diagnostic::Diagnostic`].
    pub fn to_diagnostic<FileId: Copy + PartialEq>(
        &self,
        fid: FileId,
    ) -> codespan_reporting::diagnostic::Diagnostic<FileId> {
        use codespan_reporting::diagnostic::{Diagnostic, Label};

        let diag = Diagnostic::error().with_code(self.kind.to_string());

        match &self.kind {
            ErrorKind::DuplicateKey { first, .. } => diag.with_labels(vec![
                Label::secondary(fid, *first).with_message("first key instance"),
                Label::primary(fid, self.span).with_message("duplicate key"),
            ]),
            ErrorKind::DuplicateTable { first, .. } => diag.with_labels(vec![
                Label::secondary(fid, *first).with_message("first table instance"),
                Label::primary(fid, self.span).with_message("duplicate table"),
            ]),
            ErrorKind::CannotExtendInlineTable { first, .. } => diag.with_labels(vec![
                Label::secondary(fid, *first).with_message("inline table bound here"),
                Label::primary(fid, self.span).with_message("attempted to extend it here"),
            ]),
            ErrorKind::KeyConflict { first, .. } => diag.with_labels(vec![
                Label::secondary(fid, *first).with_message("key first bound here"),
                Label::primary(fid, self.span).with_message("conflicting use"),
            ]),
            ErrorKind::RedefineAsArray { first, .. } => diag.with_labels(vec![
                Label::secondary(fid, *first).with_message("first bound here"),
                Label::primary(fid, self.span).with_message("redefined as array of tables"),
            ]),
            ErrorKind::Unexpected(c) => diag.with_labels(vec![
                Label::primary(fid, self.span)
                    .with_message(format!("unexpected character '{}'", Escape(*c))),
            ]),
            ErrorKind::InvalidCharInString(c) => diag.with_labels(vec![
                Label::primary(fid, self.span)
                    .with_message(format!("invalid character '{}' in string", Escape(*c))),
            ]),
            ErrorKind::InvalidEscape(c) => diag.with_labels(vec![
                Label::primary(fid, self.span)
                    .with_message(format!("invalid escape character '{}' in string", Escape(*c))),
            ]),
            ErrorKind::InvalidHexEscape(c) => diag.with_labels(vec![
                Label::primary(fid, self.span)
                    .with_message(format!("invalid hex escape '{}'", Escape(*c))),
            ]),
            ErrorKind::InvalidEscapeValue(_) => diag.with_labels(vec![
                Label::primary(fid, self.span).with_message("invalid escape value"),
            ]),
            ErrorKind::InvalidNumber => diag.with_labels(vec![
                Label::primary(fid, self.span).with_message("unable to parse number"),
            ]),
            ErrorKind::IntegerOverflow => diag.with_labels(vec![
                Label::primary(fid, self.span)
                    .with_message("integer is out of the signed 64-bit range"),
            ]),
            ErrorKind::InvalidDateTime => diag.with_labels(vec![
                Label::primary(fid, self.span).with_message("malformed or out-of-range date-time"),
            ]),
            ErrorKind::Wanted { expected, .. } => diag.with_labels(vec![
                Label::primary(fid, self.span).with_message(format!("expected {expected}")),
            ]),
            ErrorKind::MultilineStringKey => diag.with_labels(vec![
                Label::primary(fid, self.span).with_message("multiline keys are not allowed"),
            ]),
            ErrorKind::UnterminatedString => diag.with_labels(vec![
                Label::primary(fid, self.span).with_message("eof reached before string terminator"),
            ]),
            ErrorKind::UnexpectedEof => diag
                .with_message("unexpected end of file")
                .with_labels(vec![Label::primary(fid, self.span)]),
            ErrorKind::RecursionLimit | ErrorKind::FileTooLarge => diag
                .with_message(self.to_string())
                .with_labels(vec![Label::primary(fid, self.span)]),
        }
    }
}
