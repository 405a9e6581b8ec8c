//! Command Dispatch Tests
//!
//! Tests verify:
//! - Each built-in command against a real store
//! - Unknown commands and missing arguments reply -1
//! - Custom commands registered on the table

use bytes::Bytes;
use hashbase::{Buffer, CommandTable, KeyValueStore, Reply, Store};

fn run(table: &CommandTable, store: &Store, line: &str) -> Reply {
    table.execute_line(line.as_bytes(), store)
}

fn setup() -> (CommandTable, Store) {
    (CommandTable::builtin(), Store::new(16))
}

// =============================================================================
// Built-in Command Tests
// =============================================================================

#[test]
fn test_builtin_names_in_order() {
    let table = CommandTable::builtin();
    let names: Vec<&str> = table.names().collect();
    assert_eq!(names, vec!["inf", "set", "get", "del", "len", "clr"]);
}

#[test]
fn test_inf() {
    let (table, store) = setup();
    let reply = run(&table, &store, "inf");
    assert_eq!(reply, Reply::Text(format!("hashbase {}", hashbase::VERSION)));
}

#[test]
fn test_set_then_get() {
    let (table, store) = setup();
    assert_eq!(run(&table, &store, "set foo bar"), Reply::OK);
    assert_eq!(
        run(&table, &store, "get foo"),
        Reply::Value(Bytes::from_static(b"bar"))
    );
}

#[test]
fn test_set_quoted_value() {
    let (table, store) = setup();
    run(&table, &store, r#"set name "John Smith""#);
    assert_eq!(store.get(b"name").unwrap(), Bytes::from("John Smith"));
}

#[test]
fn test_get_missing() {
    let (table, store) = setup();
    assert_eq!(run(&table, &store, "get nothing"), Reply::ERR);
}

#[test]
fn test_del_existing_and_missing() {
    let (table, store) = setup();
    run(&table, &store, "set k v");

    assert_eq!(run(&table, &store, "del k"), Reply::OK);
    assert_eq!(run(&table, &store, "get k"), Reply::ERR);
    assert_eq!(run(&table, &store, "del k"), Reply::OK);
}

#[test]
fn test_len_and_clr() {
    let (table, store) = setup();
    run(&table, &store, "set a 1");
    run(&table, &store, "set b 2");
    run(&table, &store, "set a 3");

    assert_eq!(run(&table, &store, "len"), Reply::integer(2));
    assert_eq!(run(&table, &store, "clr"), Reply::OK);
    assert_eq!(run(&table, &store, "len"), Reply::integer(0));
}

#[test]
fn test_set_on_full_store() {
    let table = CommandTable::builtin();
    let store = Store::new(1);

    assert_eq!(run(&table, &store, "set a 1"), Reply::OK);
    assert_eq!(run(&table, &store, "set b 2"), Reply::ERR);
    assert_eq!(run(&table, &store, "set a 9"), Reply::OK);
}

// =============================================================================
// Error Path Tests
// =============================================================================

#[test]
fn test_unknown_command() {
    let (table, store) = setup();
    assert_eq!(run(&table, &store, "foo"), Reply::ERR);
}

#[test]
fn test_names_are_case_sensitive() {
    let (table, store) = setup();
    assert_eq!(run(&table, &store, "GET foo"), Reply::ERR);
    assert_eq!(run(&table, &store, "Len"), Reply::ERR);
}

#[test]
fn test_missing_arguments() {
    let (table, store) = setup();
    assert_eq!(run(&table, &store, "set onlykey"), Reply::ERR);
    assert_eq!(run(&table, &store, "get"), Reply::ERR);
    assert_eq!(run(&table, &store, "del"), Reply::ERR);
    assert!(store.is_empty());
}

#[test]
fn test_extra_arguments_ignored() {
    let (table, store) = setup();
    assert_eq!(run(&table, &store, "set k v extra junk"), Reply::OK);
    assert_eq!(store.get(b"k").unwrap(), Bytes::from("v"));
    assert_eq!(run(&table, &store, "len now"), Reply::integer(1));
}

#[test]
fn test_empty_line() {
    let (table, store) = setup();
    assert_eq!(run(&table, &store, ""), Reply::ERR);
    assert_eq!(run(&table, &store, "   "), Reply::ERR);
}

#[test]
fn test_bad_quoting() {
    let (table, store) = setup();
    assert_eq!(run(&table, &store, r#"set k "unterminated"#), Reply::ERR);
    assert_eq!(run(&table, &store, r#"set k "a"b"#), Reply::ERR);
    assert!(store.is_empty());
}

#[test]
fn test_dispatch_pre_tokenized() {
    let (table, store) = setup();
    let tokens = vec![Buffer::from("set"), Buffer::from("bin"), Buffer::new(b"\x00\xff")];
    assert_eq!(table.dispatch(&tokens, &store), Reply::OK);
    assert_eq!(store.get(b"bin").unwrap(), Bytes::from_static(b"\x00\xff"));
}

// =============================================================================
// Custom Command Tests
// =============================================================================

#[test]
fn test_register_custom_command() {
    let mut table = CommandTable::builtin();
    table.register("echo", 1, |args, _store| {
        Ok(Reply::Value(Bytes::copy_from_slice(&args[0])))
    });

    let store = Store::new(4);
    assert_eq!(
        run(&table, &store, "echo hello"),
        Reply::Value(Bytes::from_static(b"hello"))
    );
    assert_eq!(run(&table, &store, "echo"), Reply::ERR);
}

#[test]
fn test_first_registration_wins() {
    let mut table = CommandTable::builtin();
    table.register("len", 0, |_args, _store| Ok(Reply::integer(42)));

    let store = Store::new(4);
    assert_eq!(run(&table, &store, "len"), Reply::integer(0));
}

#[test]
fn test_handler_error_becomes_err_reply() {
    let mut table = CommandTable::new();
    table.register("fail", 0, |_args, _store| {
        Err(hashbase::HashbaseError::Command("always fails".to_string()))
    });

    let store = Store::new(4);
    assert_eq!(run(&table, &store, "fail"), Reply::ERR);
}

#[test]
fn test_lookup() {
    let table = CommandTable::builtin();
    let set = table.lookup(b"set").unwrap();
    assert_eq!(set.name(), "set");
    assert_eq!(set.min_args(), 2);
    assert!(table.lookup(b"nope").is_none());
}
