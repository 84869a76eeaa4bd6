//! The flat section stream produced by the structural parser.
//!
//! Syntactic recognition and TOML's semantic rules are decoupled: the parser
//! emits root pairs plus a sequence of tagged sections, and the assembler in
//! [`crate::assemble`] folds that stream into the document tree.

use crate::Span;
use crate::value::Value;

/// A single decoded key with the span it was written at.
#[derive(Clone, Debug)]
pub(crate) struct Key {
    pub name: String,
    pub span: Span,
}

/// One `dotted.key = value` assignment.
#[derive(Debug)]
pub(crate) struct Pair {
    pub path: Vec<Key>,
    pub value: Value,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum SectionKind {
    /// Opened by `[path]`.
    Table,
    /// Opened by `[[path]]`.
    ArrayOfTables,
}

/// A header and the key-value pairs that follow it.
#[derive(Debug)]
pub(crate) struct Section {
    pub kind: SectionKind,
    pub path: Vec<Key>,
    /// Span of the header line, for duplicate-table reporting.
    pub span: Span,
    pub pairs: Vec<Pair>,
}

/// The full output of the structural parser, in source order.
#[derive(Debug, Default)]
pub(crate) struct SectionStream {
    /// Assignments appearing before the first header.
    pub root: Vec<Pair>,
    pub sections: Vec<Section>,
}
