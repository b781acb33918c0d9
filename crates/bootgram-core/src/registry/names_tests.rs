use super::names::{check_format, split_member};

#[test]
fn accepts_dotted_identifiers() {
    assert!(check_format("a"));
    assert!(check_format("a.b.c"));
    assert!(check_format("_private._x1"));
    assert!(check_format("ArithmeticsTest.BinaryOperation.set_Left"));
}

#[test]
fn rejects_malformed_names() {
    assert!(!check_format(""));
    assert!(!check_format("a..b"));
    assert!(!check_format(".b.c"));
    assert!(!check_format("a.b."));
    assert!(!check_format("."));
    assert!(!check_format("1a"));
    assert!(!check_format("a.1b"));
    assert!(!check_format("a b"));
    assert!(!check_format("a-b"));
}

#[test]
fn split_member_uses_last_dot() {
    assert_eq!(split_member("a.b.c"), Some(("a.b", "c")));
    assert_eq!(split_member("a.b"), Some(("a", "b")));
    assert_eq!(split_member("a"), None);
}
