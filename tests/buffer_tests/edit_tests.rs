//! Buffer Editing Tests
//!
//! Tests verify:
//! - trim / range semantics, including negative and out-of-range indices
//! - case mapping and byte substitution
//! - split / join
//! - quoted representation

use hashbase::Buffer;

fn ranged(s: &str, start: isize, end: isize) -> Buffer {
    let mut buf = Buffer::from(s);
    buf.range(start, end);
    buf
}

// =============================================================================
// Trim Tests
// =============================================================================

#[test]
fn test_trim_both_ends() {
    let mut buf = Buffer::from("AA.Hello.AA");
    buf.trim(b"A.");
    assert_eq!(buf, "Hello");
}

#[test]
fn test_trim_keeps_inner_matches() {
    let mut buf = Buffer::from("  a b  ");
    buf.trim(b" ");
    assert_eq!(buf, "a b");
}

#[test]
fn test_trim_everything() {
    let mut buf = Buffer::from("xxxx");
    buf.trim(b"x");
    assert!(buf.is_empty());
}

#[test]
fn test_trim_nothing_to_strip() {
    let mut buf = Buffer::from("hello");
    buf.trim(b"xyz");
    assert_eq!(buf, "hello");
}

#[test]
fn test_trim_empty_buffer() {
    let mut buf = Buffer::empty();
    buf.trim(b"abc");
    assert!(buf.is_empty());
}

#[test]
fn test_trim_crlf() {
    let mut buf = Buffer::from("get foo\r\n");
    buf.trim(b"\r\n");
    assert_eq!(buf, "get foo");
}

// =============================================================================
// Range Tests
// =============================================================================

#[test]
fn test_range_negative_end() {
    assert_eq!(ranged("Hello World", 1, -1), "ello World");
}

#[test]
fn test_range_whole() {
    assert_eq!(ranged("Hello World", 0, -1), "Hello World");
}

#[test]
fn test_range_inner() {
    assert_eq!(ranged("Hello World", 1, 1), "e");
    assert_eq!(ranged("Hello World", 6, 10), "World");
}

#[test]
fn test_range_negative_start() {
    assert_eq!(ranged("Hello World", -5, -1), "World");
}

#[test]
fn test_range_negative_clamped_to_zero() {
    assert_eq!(ranged("Hello", -100, 1), "He");
}

#[test]
fn test_range_end_clamped_to_last_byte() {
    assert_eq!(ranged("Hello", 2, 100), "llo");
}

#[test]
fn test_range_start_past_end_is_empty() {
    assert!(ranged("Hello", 5, 10).is_empty());
    assert!(ranged("Hello", 100, 200).is_empty());
}

#[test]
fn test_range_inverted_is_empty() {
    assert!(ranged("Hello World", 2, 1).is_empty());
    assert!(ranged("Hello World", -1, 0).is_empty());
}

#[test]
fn test_range_on_empty_buffer() {
    assert!(ranged("", 0, -1).is_empty());
}

// =============================================================================
// Case / Mapping Tests
// =============================================================================

#[test]
fn test_case_mapping() {
    let mut buf = Buffer::from("MiXeD 123");
    buf.to_lowercase();
    assert_eq!(buf, "mixed 123");
    buf.to_uppercase();
    assert_eq!(buf, "MIXED 123");
}

#[test]
fn test_map_bytes() {
    let mut buf = Buffer::from("hello");
    buf.map_bytes(b"ho", b"01");
    assert_eq!(buf, "0ell1");
}

// =============================================================================
// Split / Join Tests
// =============================================================================

#[test]
fn test_split_single_byte_separator() {
    let parts = Buffer::from("a,b,,c").split(b",");
    assert_eq!(parts, vec![Buffer::from("a"), Buffer::from("b"), Buffer::empty(), Buffer::from("c")]);
}

#[test]
fn test_split_multi_byte_separator() {
    let parts = Buffer::from("one--two--three").split(b"--");
    assert_eq!(parts, vec![Buffer::from("one"), Buffer::from("two"), Buffer::from("three")]);
}

#[test]
fn test_split_trailing_separator() {
    let parts = Buffer::from("a|").split(b"|");
    assert_eq!(parts, vec![Buffer::from("a"), Buffer::empty()]);
}

#[test]
fn test_split_empty_input() {
    assert!(Buffer::empty().split(b",").is_empty());
}

#[test]
fn test_split_without_separator_match() {
    let parts = Buffer::from("abc").split(b"xyz-long");
    assert_eq!(parts, vec![Buffer::from("abc")]);
}

#[test]
fn test_join() {
    let joined = Buffer::join(&["a", "b", "c"], b", ").unwrap();
    assert_eq!(joined, "a, b, c");

    let empty: [&str; 0] = [];
    assert!(Buffer::join(&empty, b",").unwrap().is_empty());
}

#[test]
fn test_split_then_join_restores_input() {
    let original = Buffer::from("x::y::::z");
    let parts = original.split(b"::");
    assert_eq!(Buffer::join(parts.as_slice(), b"::").unwrap(), original);
}

// =============================================================================
// Representation Tests
// =============================================================================

#[test]
fn test_cat_repr_escapes() {
    let mut buf = Buffer::from("val=");
    buf.cat_repr(b"a\\b\"c\r\n\t\x07\x08\x00\xff").unwrap();
    assert_eq!(buf, r#"val="a\\b\"c\r\n\t\a\b\x00\xff""#);
}

#[test]
fn test_cat_repr_printable_untouched() {
    let mut buf = Buffer::empty();
    buf.cat_repr(b"John Smith ~!").unwrap();
    assert_eq!(buf, "\"John Smith ~!\"");
}
