//! Parameter codec.
//!
//! Maps a [`RouteParams`] set to a single, human-editable URL path segment
//! and back:
//!
//! ```text
//! {page: "2", query: "tag:red sky"}  <->  page=2;query=tag:red%20sky
//! ```
//!
//! Pairs are joined with `;`, key and value are separated by `=`, and both
//! are percent-encoded so that neither separator (nor `/`, `?`, `#`) can leak
//! into the path. Keys are emitted in lexicographic order and pairs with an
//! empty value are dropped, which makes [`encode`] deterministic and
//! `decode(encode(p)) == p` for every map without empty values.
//!
//! [`decode`] fails soft: a hand-edited segment that cannot be decoded yields
//! an empty map instead of an error.

use crate::params::RouteParams;
use crate::trace_log;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a key or a value.
///
/// Besides the separators this covers everything a browser would rewrite in
/// a path, so that the encoded form survives a trip through the address bar.
const PARAM_COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'/')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

const PAIR_SEPARATOR: char = ';';
const KEY_VALUE_SEPARATOR: char = '=';

/// Encode parameters into a single path segment.
///
/// # Example
///
/// ```
/// use page_navigator::{codec, RouteParams};
///
/// let params = RouteParams::new()
///     .with("query", "tag:red sky")
///     .with("page", "2")
///     .with("empty", "");
///
/// assert_eq!(codec::encode(&params), "page=2;query=tag:red%20sky");
/// ```
pub fn encode(params: &RouteParams) -> String {
    params
        .iter()
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .map(|(key, value)| {
            format!(
                "{}{}{}",
                utf8_percent_encode(key, PARAM_COMPONENT),
                KEY_VALUE_SEPARATOR,
                utf8_percent_encode(value, PARAM_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join(&PAIR_SEPARATOR.to_string())
}

/// Decode a path segment produced by [`encode`] (or typed by hand).
///
/// Words without a `=` or with an empty key or value are skipped. A segment
/// whose percent-escapes do not decode to UTF-8 yields an empty map.
///
/// ```
/// use page_navigator::codec;
///
/// let params = codec::decode("page=2;query=tag:red%20sky;junk");
/// assert_eq!(params.get("page"), Some("2"));
/// assert_eq!(params.get("query"), Some("tag:red sky"));
/// assert_eq!(params.len(), 2);
///
/// assert!(codec::decode("query=%FF%FE").is_empty());
/// ```
pub fn decode(segment: &str) -> RouteParams {
    let mut params = RouteParams::new();

    for word in segment.split(PAIR_SEPARATOR) {
        let Some((raw_key, raw_value)) = word.split_once(KEY_VALUE_SEPARATOR) else {
            continue;
        };
        if raw_key.is_empty() || raw_value.is_empty() {
            continue;
        }
        let (Some(key), Some(value)) = (decode_component(raw_key), decode_component(raw_value))
        else {
            trace_log!("Discarding undecodable parameter segment '{}'", segment);
            return RouteParams::new();
        };
        params.insert(key, value);
    }

    params
}

/// Build `prefix` followed by the encoded parameters.
///
/// This is the usual shape of a feature URL, `/<feature>/<encodedParameters>`.
///
/// ```
/// use page_navigator::{codec, RouteParams};
///
/// let url = codec::url_with_parameters("/items/", &RouteParams::new().with("page", "2"));
/// assert_eq!(url, "/items/page=2");
/// assert_eq!(codec::url_with_parameters("/items/", &RouteParams::new()), "/items/");
/// ```
pub fn url_with_parameters(prefix: &str, params: &RouteParams) -> String {
    format!("{}{}", prefix, encode(params))
}

/// Turn raw pattern captures into decoded parameters.
///
/// The capture named `blob_key` is expanded with [`decode`]; every other
/// capture is percent-decoded under its own name. A capture that does not
/// decode is kept raw. Decoded blob entries win over same-named captures.
///
/// ```
/// use page_navigator::{codec, RouteParams};
///
/// let captures = RouteParams::new()
///     .with("id", "42")
///     .with("parameters", "page=3");
/// let params = codec::decode_captures(&captures, "parameters");
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.get("page"), Some("3"));
/// ```
pub fn decode_captures(captures: &RouteParams, blob_key: &str) -> RouteParams {
    let mut named = RouteParams::new();
    let mut blob = RouteParams::new();

    for (key, raw) in captures {
        if key == blob_key {
            blob = decode(raw);
        } else {
            let value = decode_component(raw).unwrap_or_else(|| raw.to_string());
            named.insert(key.to_string(), value);
        }
    }

    RouteParams::merge(&named, &blob)
}

/// Percent-decode a single path component, `None` if it is not valid UTF-8.
pub(crate) fn decode_component(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|cow| cow.into_owned())
}
