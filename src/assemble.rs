//! Folds a [`SectionStream`] into the document tree.
//!
//! The working tree tracks, per table, how the table came to exist (explicit
//! header, implicit header segment, or dotted key) because TOML's reopening
//! rules depend on it: an implicitly created table may be defined by a later
//! header exactly once, a dotted-created table may only be extended by dotted
//! keys of the same section, and inline tables may never be extended. Once
//! the whole stream is applied the tree is converted into plain
//! [`Table`]/[`Value`] data.

#[cfg(test)]
#[path = "./assemble_tests.rs"]
mod tests;

use crate::{
    Span,
    error::{Error, ErrorKind},
    section::{Key, Pair, SectionKind, SectionStream},
    table::Table,
    value::Value,
};
use indexmap::IndexMap;
use indexmap::map::Entry as MapEntry;

type NodeMap = IndexMap<String, Slot, foldhash::fast::RandomState>;

/// Identifies the section a dotted table was created in. Root pairs are
/// section 0; headers count from 1 in source order.
type SectionId = u32;

struct Slot {
    /// Span of the key that first bound this entry.
    span: Span,
    node: Node,
}

enum Node {
    /// A closed value: scalar, array literal, or inline table.
    Value(Value),
    Table(TableNode),
    /// An array of tables; non-empty by construction.
    TableArray(Vec<TableNode>),
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Origin {
    Header,
    Implicit,
    Dotted { section: SectionId },
}

struct TableNode {
    entries: NodeMap,
    origin: Origin,
    /// Header span for explicit tables, first key span otherwise.
    defined_at: Span,
}

impl TableNode {
    fn new(origin: Origin, defined_at: Span) -> Self {
        Self {
            entries: NodeMap::default(),
            origin,
            defined_at,
        }
    }

    fn into_table(self) -> Table {
        let mut table = Table::new();
        for (name, slot) in self.entries {
            table.insert(name, slot.node.into_value());
        }
        table
    }
}

impl Node {
    fn into_value(self) -> Value {
        match self {
            Node::Value(value) => value,
            Node::Table(node) => Value::Table(node.into_table()),
            Node::TableArray(nodes) => Value::Array(
                nodes
                    .into_iter()
                    .map(|node| Value::Table(node.into_table()))
                    .collect(),
            ),
        }
    }
}

/// Applies root pairs and sections in source order, stopping at the first
/// structural violation.
pub(crate) fn assemble(stream: SectionStream) -> Result<Table, Error> {
    let mut root = TableNode::new(Origin::Implicit, Span::new(0, 0));
    for pair in stream.root {
        assign_pair(&mut root, pair, 0)?;
    }
    for (index, section) in stream.sections.into_iter().enumerate() {
        let section_id = index as SectionId + 1;
        let table = match section.kind {
            SectionKind::Table => open_table(&mut root, &section.path, section.span)?,
            SectionKind::ArrayOfTables => {
                open_array_entry(&mut root, &section.path, section.span)?
            }
        };
        for pair in section.pairs {
            assign_pair(table, pair, section_id)?;
        }
    }
    Ok(root.into_table())
}

fn err(kind: ErrorKind, span: Span) -> Error {
    Error { kind, span }
}

/// Descends one intermediate segment of a header path, creating an implicit
/// table when the key is vacant. An array-of-tables descends into its latest
/// entry, which is what lets `[products.details]` follow `[[products]]`.
fn descend<'t>(table: &'t mut TableNode, key: &Key) -> Result<&'t mut TableNode, Error> {
    match table.entries.entry(key.name.clone()) {
        MapEntry::Occupied(entry) => {
            let first = entry.get().span;
            match &mut entry.into_mut().node {
                Node::Table(node) => Ok(node),
                // non-empty by construction
                Node::TableArray(nodes) => Ok(nodes.last_mut().unwrap()),
                Node::Value(Value::InlineTable(_)) => Err(err(
                    ErrorKind::CannotExtendInlineTable {
                        key: key.name.clone(),
                        first,
                    },
                    key.span,
                )),
                Node::Value(_) => Err(err(
                    ErrorKind::KeyConflict {
                        key: key.name.clone(),
                        first,
                    },
                    key.span,
                )),
            }
        }
        MapEntry::Vacant(entry) => {
            let slot = entry.insert(Slot {
                span: key.span,
                node: Node::Table(TableNode::new(Origin::Implicit, key.span)),
            });
            let Node::Table(node) = &mut slot.node else {
                unreachable!()
            };
            Ok(node)
        }
    }
}

/// Opens the table for a `[path]` header and returns it.
fn open_table<'t>(
    root: &'t mut TableNode,
    path: &[Key],
    header_span: Span,
) -> Result<&'t mut TableNode, Error> {
    // the parser never emits an empty header path
    let (last, intermediates) = path.split_last().unwrap();
    let mut current = root;
    for key in intermediates {
        current = descend(current, key)?;
    }
    match current.entries.entry(last.name.clone()) {
        MapEntry::Occupied(entry) => {
            let first = entry.get().span;
            match &mut entry.into_mut().node {
                Node::Table(node) => match node.origin {
                    // Defining a super-table of implicitly created tables is
                    // permitted, once.
                    Origin::Implicit => {
                        node.origin = Origin::Header;
                        node.defined_at = header_span;
                        Ok(node)
                    }
                    Origin::Header => Err(err(
                        ErrorKind::DuplicateTable {
                            name: last.name.clone(),
                            first: node.defined_at,
                        },
                        header_span,
                    )),
                    Origin::Dotted { .. } => Err(err(
                        ErrorKind::DuplicateKey {
                            key: last.name.clone(),
                            first,
                        },
                        last.span,
                    )),
                },
                Node::Value(Value::InlineTable(_)) => Err(err(
                    ErrorKind::CannotExtendInlineTable {
                        key: last.name.clone(),
                        first,
                    },
                    last.span,
                )),
                Node::TableArray(_) | Node::Value(_) => Err(err(
                    ErrorKind::DuplicateKey {
                        key: last.name.clone(),
                        first,
                    },
                    last.span,
                )),
            }
        }
        MapEntry::Vacant(entry) => {
            let slot = entry.insert(Slot {
                span: last.span,
                node: Node::Table(TableNode::new(Origin::Header, header_span)),
            });
            let Node::Table(node) = &mut slot.node else {
                unreachable!()
            };
            Ok(node)
        }
    }
}

/// Opens a fresh entry for a `[[path]]` header and returns it.
fn open_array_entry<'t>(
    root: &'t mut TableNode,
    path: &[Key],
    header_span: Span,
) -> Result<&'t mut TableNode, Error> {
    // the parser never emits an empty header path
    let (last, intermediates) = path.split_last().unwrap();
    let mut current = root;
    for key in intermediates {
        current = descend(current, key)?;
    }
    match current.entries.entry(last.name.clone()) {
        MapEntry::Occupied(entry) => {
            let first = entry.get().span;
            match &mut entry.into_mut().node {
                Node::TableArray(nodes) => {
                    nodes.push(TableNode::new(Origin::Header, header_span));
                    // just pushed
                    Ok(nodes.last_mut().unwrap())
                }
                Node::Table(_) => Err(err(
                    ErrorKind::RedefineAsArray {
                        name: last.name.clone(),
                        first,
                    },
                    header_span,
                )),
                // Closed values, static arrays included, are plain duplicates.
                Node::Value(_) => Err(err(
                    ErrorKind::DuplicateKey {
                        key: last.name.clone(),
                        first,
                    },
                    last.span,
                )),
            }
        }
        MapEntry::Vacant(entry) => {
            let slot = entry.insert(Slot {
                span: last.span,
                node: Node::TableArray(vec![TableNode::new(Origin::Header, header_span)]),
            });
            let Node::TableArray(nodes) = &mut slot.node else {
                unreachable!()
            };
            Ok(nodes.last_mut().unwrap())
        }
    }
}

/// Descends one intermediate segment of a dotted key. Only tables created by
/// dotted keys of the same section may be traversed; everything else is
/// sealed against dotted extension.
fn descend_dotted<'t>(
    table: &'t mut TableNode,
    key: &Key,
    section_id: SectionId,
) -> Result<&'t mut TableNode, Error> {
    match table.entries.entry(key.name.clone()) {
        MapEntry::Occupied(entry) => {
            let first = entry.get().span;
            match &mut entry.into_mut().node {
                Node::Table(node) if node.origin == (Origin::Dotted { section: section_id }) => {
                    Ok(node)
                }
                Node::Value(Value::InlineTable(_)) => Err(err(
                    ErrorKind::CannotExtendInlineTable {
                        key: key.name.clone(),
                        first,
                    },
                    key.span,
                )),
                _ => Err(err(
                    ErrorKind::KeyConflict {
                        key: key.name.clone(),
                        first,
                    },
                    key.span,
                )),
            }
        }
        MapEntry::Vacant(entry) => {
            let slot = entry.insert(Slot {
                span: key.span,
                node: Node::Table(TableNode::new(
                    Origin::Dotted {
                        section: section_id,
                    },
                    key.span,
                )),
            });
            let Node::Table(node) = &mut slot.node else {
                unreachable!()
            };
            Ok(node)
        }
    }
}

/// Binds one `dotted.key = value` pair inside `table`.
fn assign_pair(table: &mut TableNode, pair: Pair, section_id: SectionId) -> Result<(), Error> {
    let Pair { path, value } = pair;
    // the parser never emits an empty key path
    let (last, intermediates) = path.split_last().unwrap();
    let mut current = table;
    for key in intermediates {
        current = descend_dotted(current, key, section_id)?;
    }
    match current.entries.entry(last.name.clone()) {
        MapEntry::Occupied(entry) => Err(err(
            ErrorKind::DuplicateKey {
                key: last.name.clone(),
                first: entry.get().span,
            },
            last.span,
        )),
        MapEntry::Vacant(entry) => {
            entry.insert(Slot {
                span: last.span,
                node: Node::Value(value),
            });
            Ok(())
        }
    }
}
