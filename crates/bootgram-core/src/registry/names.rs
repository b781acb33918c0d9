//! Dotted-name syntax.

/// Checks that `name` is a dot-separated list of identifiers.
///
/// Identifiers are `[A-Za-z_][A-Za-z0-9_]*`. Empty names, empty segments
/// and leading or trailing dots are rejected.
pub fn check_format(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_identifier)
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Splits `Owner.Path.member` into `("Owner.Path", "member")`.
///
/// Returns `None` for names without a dot.
pub fn split_member(name: &str) -> Option<(&str, &str)> {
    name.rsplit_once('.')
}
