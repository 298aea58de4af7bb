//! Path utilities for URI normalization and bucketing
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;

/// Path separator used in templates and URIs
pub const SEPARATOR: char = '/';

/// Normalizes a request URI before it is matched against route patterns
///
/// Strips a single trailing separator; an empty URI, or one that is only the
/// separator, becomes `/`.
///
/// # Examples
///
/// ```
/// use switchboard::path::normalize_uri;
///
/// assert_eq!(normalize_uri("/users/12/"), "/users/12");
/// assert_eq!(normalize_uri("/users//"), "/users/");
/// assert_eq!(normalize_uri(""), "/");
/// assert_eq!(normalize_uri("/"), "/");
/// ```
pub fn normalize_uri(uri: &str) -> &str {
    match uri.strip_suffix(SEPARATOR).unwrap_or(uri) {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Ensures a route template begins with the separator
///
/// # Examples
///
/// ```
/// use switchboard::path::normalize_template;
///
/// assert_eq!(normalize_template("users/(\\d+)"), "/users/(\\d+)");
/// assert_eq!(normalize_template("/users"), "/users");
/// ```
pub fn normalize_template(template: &str) -> Cow<'_, str> {
    if template.starts_with(SEPARATOR) {
        Cow::Borrowed(template)
    } else {
        Cow::Owned(format!("{}{}", SEPARATOR, template))
    }
}

/// Bucket index of a template or URI: the number of separators it contains
///
/// The root path `/` is bucket 0.
///
/// # Examples
///
/// ```
/// use switchboard::path::bucket_of;
///
/// assert_eq!(bucket_of("/"), 0);
/// assert_eq!(bucket_of("path1"), 0);
/// assert_eq!(bucket_of("path5/(\\d+)"), 1);
/// assert_eq!(bucket_of("/a/b"), 2);
/// ```
pub fn bucket_of(path: &str) -> usize {
    if path == "/" {
        return 0;
    }
    path.matches(SEPARATOR).count()
}

/// Bucket a request URI starts scanning from
///
/// Computed on the normalized URI so `X/` and `X` scan the same buckets.
pub fn uri_bucket(uri: &str) -> usize {
    bucket_of(normalize_uri(uri))
}

/// Joins a parent path and a nested path segment
///
/// Empty segments leave the parent unchanged; an empty parent yields the segment.
///
/// # Examples
///
/// ```
/// use switchboard::path::join_segment;
///
/// assert_eq!(join_segment("", "path4"), "path4");
/// assert_eq!(join_segment("path4", "(\\d+)"), "path4/(\\d+)");
/// assert_eq!(join_segment("path6", ""), "path6");
/// ```
pub fn join_segment(parent: &str, segment: &str) -> String {
    match (parent.is_empty(), segment.is_empty()) {
        (_, true) => parent.to_string(),
        (true, false) => segment.to_string(),
        (false, false) => format!("{}{}{}", parent, SEPARATOR, segment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "/")]
    #[case("/", "/")]
    #[case("/a", "/a")]
    #[case("/a/", "/a")]
    #[case("/a/b/", "/a/b")]
    fn test_normalize_uri(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_uri(input), expected);
    }

    #[test]
    fn test_normalize_template() {
        assert!(matches!(normalize_template("/x"), Cow::Borrowed("/x")));
        assert_eq!(normalize_template("x"), "/x");
    }

    #[rstest]
    #[case("/", 0)]
    #[case("", 0)]
    #[case("a", 0)]
    #[case("a/b", 1)]
    #[case("/a/b", 2)]
    #[case("path3\\-with\\-argument/(\\d+)", 1)]
    fn test_bucket_of(#[case] path: &str, #[case] expected: usize) {
        assert_eq!(bucket_of(path), expected);
    }

    #[test]
    fn test_uri_bucket_ignores_trailing_separator() {
        assert_eq!(uri_bucket("/a/b/"), uri_bucket("/a/b"));
        assert_eq!(uri_bucket("/"), 0);
        assert_eq!(uri_bucket(""), 0);
    }

    #[test]
    fn test_join_segment() {
        assert_eq!(join_segment("a", "b"), "a/b");
        assert_eq!(join_segment("", ""), "");
    }
}
