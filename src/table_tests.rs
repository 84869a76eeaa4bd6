use crate::{Table, Value};

fn parse_ok(input: &str) -> Table {
    crate::parse(input).unwrap_or_else(|e| panic!("parse failed for {input:?}: {e}"))
}

#[test]
fn typed_accessors() {
    let doc = parse_ok("key = \"value\"");
    assert_eq!(doc.get_string("key"), Some("value"));

    let doc = parse_ok(
        "title = \"My App\"\n\
         [server]\n\
         host = \"0.0.0.0\"\n\
         port = 3000\n\
         threads = 4.5\n\
         debug = false",
    );
    assert_eq!(doc.get_string("title"), Some("My App"));
    assert_eq!(doc.get_string("server.host"), Some("0.0.0.0"));
    assert_eq!(doc.get_int("server.port"), Some(3000));
    assert_eq!(doc.get_float("server.threads"), Some(4.5));
    assert_eq!(doc.get_bool("server.debug"), Some(false));

    // a type mismatch is absence, never an error
    assert_eq!(doc.get_int("title"), None);
    assert_eq!(doc.get_string("server.port"), None);
    assert_eq!(doc.get_bool("server"), None);
}

#[test]
fn path_coherence() {
    let doc = parse_ok("[a.b]\nc = 1");

    assert!(doc.get_value("a").is_some());
    assert!(doc.get_value("a.b").is_some());
    assert!(doc.get_value("a.b.c").is_some());

    // missing leaf or intermediate
    assert_eq!(doc.get_value("a.b.d"), None);
    assert_eq!(doc.get_value("a.x.c"), None);
    assert_eq!(doc.get_value("z"), None);

    // descending through a non-table
    assert_eq!(doc.get_value("a.b.c.d"), None);
}

#[test]
fn string_arrays() {
    let doc = parse_ok("a = [\"x\", \"y\"]\nb = [1, \"y\"]\nc = []\nd = 1");
    assert_eq!(doc.get_string_array("a"), Some(vec!["x", "y"]));
    // any non-string element means absence
    assert_eq!(doc.get_string_array("b"), None);
    assert_eq!(doc.get_string_array("c"), Some(vec![]));
    assert_eq!(doc.get_string_array("d"), None);
    assert_eq!(doc.get_string_array("missing"), None);
}

#[test]
fn table_accessors_distinguish_inline() {
    let doc = parse_ok("inline = {x = 1}\n[header]\ny = 2");

    assert!(doc.get_table("header").is_some());
    assert!(doc.get_inline_table("header").is_none());

    assert!(doc.get_inline_table("inline").is_some());
    assert!(doc.get_table("inline").is_none());

    // both kinds are descendable in paths
    assert_eq!(doc.get_int("inline.x"), Some(1));
    assert_eq!(doc.get_int("header.y"), Some(2));

    // inline table entries keep their written order
    let doc = parse_ok("t = {b = 1, a = 2, c = 3}");
    let entries: Vec<_> = doc.get_inline_table("t").unwrap().iter().collect();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].0, "b");
    assert_eq!(entries[2], ("c", &Value::Integer(3)));
}

#[test]
fn key_iteration() {
    let doc = parse_ok("b = 1\na = 2\n[z]\n[y.sub]");
    let keys: Vec<_> = doc.keys().collect();
    assert_eq!(keys, ["b", "a", "z", "y"]);

    let doc = parse_ok("");
    assert_eq!(doc.keys().next(), None);

    // iter yields the same order with values
    let doc = parse_ok("one = 1\ntwo = 2");
    let pairs: Vec<_> = doc.iter().map(|(k, v)| (k, v.as_integer().unwrap())).collect();
    assert_eq!(pairs, [("one", 1), ("two", 2)]);
}

#[test]
fn dotted_path_is_a_naive_split() {
    // a quoted key containing a dot is not reachable through get_value…
    let doc = parse_ok("\"a.b\" = 1");
    assert_eq!(doc.get_value("a.b"), None);

    // …but is through pre-split components
    assert_eq!(
        doc.get_value_path(&["a.b"]).and_then(Value::as_integer),
        Some(1)
    );

    let doc = parse_ok("[outer]\n\"x.y\" = 2");
    assert_eq!(
        doc.get_value_path(&["outer", "x.y"]).and_then(Value::as_integer),
        Some(2)
    );
    assert_eq!(doc.get_value_path(&[]), None);
}
