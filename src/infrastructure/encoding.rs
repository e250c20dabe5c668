//! URL component encoding on top of `percent-encoding`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except the RFC 3986 unreserved set (`A-Z a-z 0-9 - . _ ~`).
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Component set that also keeps `*`, the PostgREST `ilike` wildcard.
const FILTER_VALUE: &AsciiSet = &COMPONENT.remove(b'*');

/// Percent-encodes a URL query component.
///
/// # Example
///
/// ```rust
/// use listagain::infrastructure::percent_encode;
///
/// assert_eq!(percent_encode("desk lamp, $15"), "desk%20lamp%2C%20%2415");
/// ```
#[must_use]
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// Encodes a PostgREST filter value, leaving `*` wildcards readable.
#[must_use]
pub fn encode_filter_value(input: &str) -> String {
    utf8_percent_encode(input, FILTER_VALUE).to_string()
}
