use crate::{ErrorKind, Table, Value};

fn parse_ok(input: &str) -> Table {
    crate::parse(input).unwrap_or_else(|e| panic!("parse failed for {input:?}: {e}"))
}

fn parse_err(input: &str) -> crate::Error {
    match crate::parse(input) {
        Ok(doc) => panic!("expected parse failure for {input:?}, got {doc:?}"),
        Err(e) => e,
    }
}

#[test]
fn table_headers_and_structure() {
    // simple header
    let doc = parse_ok("[table]\nkey = 1");
    assert_eq!(doc.get_int("table.key"), Some(1));

    // multiple headers
    let doc = parse_ok("[a]\nx = 1\n[b]\ny = 2");
    assert_eq!(doc.get_int("a.x"), Some(1));
    assert_eq!(doc.get_int("b.y"), Some(2));

    // dotted header creates intermediate tables
    let doc = parse_ok("[a.b.c]\nkey = 1");
    assert_eq!(doc.get_int("a.b.c.key"), Some(1));

    // dotted key-value
    let doc = parse_ok("a.b.c = 1");
    assert_eq!(doc.get_int("a.b.c"), Some(1));

    // sibling dotted keys extend the same table
    let doc = parse_ok("a.x = 1\na.y = 2");
    assert_eq!(doc.get_int("a.x"), Some(1));
    assert_eq!(doc.get_int("a.y"), Some(2));

    // a header may define a super-table of implicitly created tables
    let doc = parse_ok("[a.b]\nx = 1\n[a]\ny = 2");
    assert_eq!(doc.get_int("a.y"), Some(2));
    assert_eq!(doc.get_int("a.b.x"), Some(1));

    // an empty section is a table nonetheless
    let doc = parse_ok("[empty]");
    assert!(doc.get_table("empty").unwrap().is_empty());
}

#[test]
fn duplicate_keys_and_tables() {
    let e = parse_err("a = 1\na = 2");
    assert!(matches!(e.kind, ErrorKind::DuplicateKey { .. }));

    let e = parse_err("[a]\nb = 1\nb = 2");
    assert!(matches!(e.kind, ErrorKind::DuplicateKey { .. }));

    // no partial document on failure: parse returns only the error
    assert!(crate::parse("[a]\nb = 1\nb = 2").is_err());

    let e = parse_err("[t]\na = 1\n[t]\nb = 2");
    assert!(matches!(e.kind, ErrorKind::DuplicateTable { .. }));

    // defining the promoted super-table twice is still a duplicate
    let e = parse_err("[a.b]\n[a]\n[a]");
    assert!(matches!(e.kind, ErrorKind::DuplicateTable { .. }));

    // a key and a header cannot share a name
    let e = parse_err("a = 1\n[a]\nb = 2");
    assert!(matches!(e.kind, ErrorKind::DuplicateKey { .. }));

    // quoted and bare spellings collide on the decoded key
    let e = parse_err("a = 1\n\"a\" = 2");
    assert!(matches!(e.kind, ErrorKind::DuplicateKey { .. }));
}

#[test]
fn dotted_key_rules() {
    // dotted keys may not reopen a table defined by a header
    let e = parse_err("[a.b]\nx = 1\n[a]\nb.y = 2");
    assert!(matches!(e.kind, ErrorKind::KeyConflict { .. }));

    // nor pass through a scalar
    let e = parse_err("a = 1\na.b = 2");
    assert!(matches!(e.kind, ErrorKind::KeyConflict { .. }));

    // a dotted table can still gain header sub-tables in later sections
    let doc = parse_ok("[a2]\nb.c = 1\n[a2.b.d]\ne = 2");
    assert_eq!(doc.get_int("a2.b.c"), Some(1));
    assert_eq!(doc.get_int("a2.b.d.e"), Some(2));

    // the table a dotted key points at cannot later get a header
    let e = parse_err("[fruit]\napple.color = \"red\"\n[fruit.apple]");
    assert!(matches!(e.kind, ErrorKind::DuplicateKey { .. }));

    // but sub-tables within it can
    let doc = parse_ok("[fruit]\napple.color = \"red\"\n[fruit.apple.texture]\nsmooth = true");
    assert_eq!(doc.get_bool("fruit.apple.texture.smooth"), Some(true));

    // assigning over a dotted table is a duplicate
    let e = parse_err("a.b = 1\na = 2");
    assert!(matches!(e.kind, ErrorKind::DuplicateKey { .. }));
}

#[test]
fn inline_tables_are_frozen() {
    // a later header cannot open an inline table
    let e = parse_err("a = {x = 1}\n[a]\ny = 2");
    assert!(matches!(e.kind, ErrorKind::CannotExtendInlineTable { .. }));

    // nor reach inside it
    let e = parse_err("a = {x = 1}\n[a.sub]\ny = 2");
    assert!(matches!(e.kind, ErrorKind::CannotExtendInlineTable { .. }));

    // nor a dotted key
    let e = parse_err("a = {x = 1}\na.y = 2");
    assert!(matches!(e.kind, ErrorKind::CannotExtendInlineTable { .. }));
}

#[test]
fn arrays_of_tables() {
    let doc = parse_ok("[[products]]\nname = \"Hammer\"\n[[products]]\nname = \"Nail\"");
    let products = doc.get("products").unwrap().as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].as_table().unwrap().get("name").unwrap().as_str(), Some("Hammer"));
    assert_eq!(products[1].as_table().unwrap().get("name").unwrap().as_str(), Some("Nail"));

    // entries are header tables, not inline tables
    assert!(matches!(products[0], Value::Table(_)));

    // a sub-table header binds into the latest entry
    let doc = parse_ok(
        "[[fruit]]\nname = \"apple\"\n[fruit.physical]\ncolor = \"red\"\n\
         [[fruit]]\nname = \"banana\"",
    );
    let fruit = doc.get("fruit").unwrap().as_array().unwrap();
    assert_eq!(fruit.len(), 2);
    let apple = fruit[0].as_table().unwrap();
    assert_eq!(apple.get_string("physical.color"), Some("red"));
    assert!(fruit[1].as_table().unwrap().get("physical").is_none());

    // nested arrays-of-tables
    let doc = parse_ok("[[a]]\nx = 1\n[[a.b]]\ny = 2");
    let a = doc.get("a").unwrap().as_array().unwrap();
    let b = a[0].as_table().unwrap().get("b").unwrap().as_array().unwrap();
    assert_eq!(b[0].as_table().unwrap().get("y").unwrap().as_integer(), Some(2));
}

#[test]
fn array_of_tables_conflicts() {
    // a plain table cannot become an array of tables
    let e = parse_err("[a]\nx = 1\n[[a]]");
    assert!(matches!(e.kind, ErrorKind::RedefineAsArray { .. }));

    // implicitly created tables cannot either
    let e = parse_err("[a.b]\nx = 1\n[[a]]");
    assert!(matches!(e.kind, ErrorKind::RedefineAsArray { .. }));

    // a static array is a closed value, so appending is a duplicate key
    let e = parse_err("a = [1, 2]\n[[a]]");
    assert!(matches!(e.kind, ErrorKind::DuplicateKey { .. }));

    // an array of tables cannot become a plain table
    let e = parse_err("[[a]]\nx = 1\n[a]");
    assert!(matches!(e.kind, ErrorKind::DuplicateKey { .. }));

    // a scalar blocks the header entirely
    let e = parse_err("a = 1\n[[a]]");
    assert!(matches!(e.kind, ErrorKind::DuplicateKey { .. }));

    // headers cannot traverse a static array
    let e = parse_err("a = [1]\n[a.b]");
    assert!(matches!(e.kind, ErrorKind::KeyConflict { .. }));
}

#[test]
fn section_ordering() {
    // sections apply in source order; the first violation wins
    let e = parse_err("[a]\nx = 1\n[a]\ny = 2\nz = 3\nz = 4");
    assert!(matches!(e.kind, ErrorKind::DuplicateTable { .. }));

    // root pairs bind before any section
    let doc = parse_ok("top = 1\n[sect]\ninner = 2");
    assert_eq!(doc.get_int("top"), Some(1));
    assert_eq!(doc.get_int("sect.inner"), Some(2));

    // duplicate-key spans point at both occurrences
    let input = "first = 1\nfirst = 2";
    let e = parse_err(input);
    let ErrorKind::DuplicateKey { key, first } = &e.kind else {
        panic!("expected duplicate key")
    };
    assert_eq!(key, "first");
    assert_eq!(&input[first.to_range()], "first");
    assert_eq!(&input[e.span.to_range()], "first");
    assert_eq!(e.offset(), 10);
}
