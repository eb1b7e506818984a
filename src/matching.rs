//! Route patterns and URL matching.
//!
//! A [`RoutePattern`] is an ordered template of literal segments and named
//! captures, compiled once into a [`regex::Regex`].
//!
//! # Syntax
//!
//! | Segment           | Matches                                           |
//! |-------------------|---------------------------------------------------|
//! | `items`           | the literal segment `items`                       |
//! | `:id`             | one segment, captured as `id`                     |
//! | `:id(\d+)`        | one segment matching the constraint               |
//! | `:section?`       | an optional trailing segment                      |
//! | `:path+`          | one or more segments (greedy)                     |
//! | `:path*` / `*path`| zero or more segments (greedy)                    |
//! | `*` (whole)       | anything: the catch-all                           |
//!
//! Constraints may contain `/`, so `:parameters(.*)?` captures everything
//! after the prefix. A trailing `/` in the URL is tolerated, so
//! `/items/:parameters?` matches `/items`, `/items/` and `/items/page=2`.
//!
//! Captured values are returned **raw** (still percent-encoded).

use crate::params::RouteParams;
use crate::NavigationError;
use regex::Regex;
use std::fmt;

/// Default constraint of a capture: exactly one path segment.
const SEGMENT: &str = "[^/]+";

/// Name given to an anonymous `*` segment inside a longer pattern.
const WILDCARD_NAME: &str = "wildcard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Capture {
        name: String,
        constraint: Option<String>,
        modifier: Modifier,
    },
}

/// A compiled route pattern.
///
/// # Example
///
/// ```
/// use page_navigator::RoutePattern;
///
/// let pattern = RoutePattern::parse("/tag/:name/:section?").unwrap();
///
/// let params = pattern.match_url("/tag/sky/merge").unwrap();
/// assert_eq!(params.get("name"), Some("sky"));
/// assert_eq!(params.get("section"), Some("merge"));
///
/// let params = pattern.match_url("/tag/sky").unwrap();
/// assert_eq!(params.get("section"), None);
///
/// assert!(pattern.match_url("/tags/").is_none());
/// ```
#[derive(Clone)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
    regex: Regex,
    catch_all: bool,
}

impl RoutePattern {
    /// Compile a pattern.
    pub fn parse(source: &str) -> Result<Self, NavigationError> {
        let invalid = |message: String| NavigationError::InvalidPattern {
            pattern: source.to_string(),
            message,
        };

        if source.trim() == "*" {
            return Ok(Self::catch_all());
        }

        let mut segments = Vec::new();
        for raw in split_pattern(source).map_err(invalid)? {
            segments.push(parse_segment(raw).map_err(invalid)?);
        }

        let regex = Regex::new(&compile(&segments)).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            source: source.to_string(),
            segments,
            regex,
            catch_all: false,
        })
    }

    /// The pattern that matches every URL.
    pub fn catch_all() -> Self {
        Self {
            source: "*".to_string(),
            segments: Vec::new(),
            regex: Regex::new("^.*$").expect("catch-all regex is valid"),
            catch_all: true,
        }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether this is the unconditional catch-all.
    pub fn is_catch_all(&self) -> bool {
        self.catch_all
    }

    /// Names of all captures, in pattern order.
    pub fn capture_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Capture { name, .. } => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Match a URL, returning the raw captures.
    ///
    /// Any `?query` or `#fragment` suffix is ignored. Optional captures that
    /// did not participate (or matched an empty string) are left out.
    pub fn match_url(&self, url: &str) -> Option<RouteParams> {
        let path = strip_suffix(url);
        if self.catch_all {
            return Some(RouteParams::new());
        }

        let captures = self.regex.captures(path)?;
        let mut params = RouteParams::new();
        for name in self.capture_names() {
            if let Some(value) = captures.name(name) {
                if !value.as_str().is_empty() {
                    params.set(name, value.as_str());
                }
            }
        }
        Some(params)
    }

    /// Reverse the pattern: substitute `params` into the captures.
    ///
    /// Values are inserted as given, so they must already be URL-safe.
    /// Returns `None` for the catch-all, when a required capture is missing,
    /// or when the result would not match the pattern's own constraints.
    ///
    /// ```
    /// use page_navigator::{RoutePattern, RouteParams};
    ///
    /// let pattern = RoutePattern::parse("/post/:id(\\d+)/:section?").unwrap();
    /// let params = RouteParams::new().with("id", "42");
    /// assert_eq!(pattern.build(&params).as_deref(), Some("/post/42"));
    ///
    /// let params = RouteParams::new().with("id", "abc");
    /// assert_eq!(pattern.build(&params), None);
    /// ```
    pub fn build(&self, params: &RouteParams) -> Option<String> {
        if self.catch_all {
            return None;
        }

        let mut url = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => {
                    url.push('/');
                    url.push_str(literal);
                }
                Segment::Capture { name, modifier, .. } => {
                    match (params.get(name).filter(|v| !v.is_empty()), modifier) {
                        (Some(value), _) => {
                            url.push('/');
                            url.push_str(value);
                        }
                        (None, Modifier::Optional | Modifier::ZeroOrMore) => {}
                        (None, Modifier::One | Modifier::OneOrMore) => return None,
                    }
                }
            }
        }
        if url.is_empty() {
            url.push('/');
        }

        self.regex.is_match(&url).then_some(url)
    }
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePattern")
            .field("source", &self.source)
            .field("catch_all", &self.catch_all)
            .finish_non_exhaustive()
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

// ============================================================================
// Parsing helpers
// ============================================================================

/// Split a pattern on `/`, ignoring slashes inside `( … )` constraints.
fn split_pattern(source: &str) -> Result<Vec<&str>, String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in source.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced ')'".to_string())?;
            }
            '/' if depth == 0 => {
                parts.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced '('".to_string());
    }
    parts.push(&source[start..]);

    Ok(parts.into_iter().filter(|s| !s.is_empty()).collect())
}

fn parse_segment(raw: &str) -> Result<Segment, String> {
    if is_wildcard_segment(raw) {
        let name = raw.trim_start_matches('*');
        let name = if name.is_empty() { WILDCARD_NAME } else { name };
        validate_name(name)?;
        return Ok(Segment::Capture {
            name: name.to_string(),
            constraint: None,
            modifier: Modifier::ZeroOrMore,
        });
    }

    let Some(rest) = raw.strip_prefix(':') else {
        return Ok(Segment::Literal(raw.to_string()));
    };

    let name_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let (name, mut rest) = rest.split_at(name_len);
    validate_name(name)?;

    let mut constraint = None;
    if rest.starts_with('(') {
        let close = matching_paren(rest).ok_or_else(|| format!("unclosed constraint in '{raw}'"))?;
        constraint = Some(rest[1..close].to_string());
        rest = &rest[close + 1..];
    }

    let modifier = match rest {
        "" => Modifier::One,
        "?" => Modifier::Optional,
        "*" => Modifier::ZeroOrMore,
        "+" => Modifier::OneOrMore,
        other => return Err(format!("unexpected '{other}' after capture '{name}'")),
    };

    Ok(Segment::Capture {
        name: name.to_string(),
        constraint,
        modifier,
    })
}

fn validate_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => Ok(()),
        Some(_) => Err(format!("capture name '{name}' must start with a letter")),
        None => Err("capture name is empty".to_string()),
    }
}

/// Index of the `)` closing the `(` at position 0.
fn matching_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn compile(segments: &[Segment]) -> String {
    let mut re = String::from("^");
    for segment in segments {
        match segment {
            Segment::Literal(literal) => {
                re.push('/');
                re.push_str(&regex::escape(literal));
            }
            Segment::Capture {
                name,
                constraint,
                modifier,
            } => {
                let c = constraint.as_deref().unwrap_or(SEGMENT);
                let piece = match modifier {
                    Modifier::One => format!("/(?P<{name}>(?:{c}))"),
                    Modifier::Optional => format!("(?:/(?P<{name}>(?:{c})))?"),
                    Modifier::OneOrMore => format!("/(?P<{name}>(?:{c})(?:/(?:{c}))*)"),
                    Modifier::ZeroOrMore => format!("(?:/(?P<{name}>(?:{c})(?:/(?:{c}))*))?"),
                };
                re.push_str(&piece);
            }
        }
    }
    re.push_str("/?$");
    re
}

fn strip_suffix(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// Check if a route segment is a wildcard
pub fn is_wildcard_segment(segment: &str) -> bool {
    segment == "*" || segment.starts_with('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(source: &str) -> RoutePattern {
        RoutePattern::parse(source).unwrap()
    }

    #[test]
    fn test_is_wildcard_segment() {
        assert!(is_wildcard_segment("*"));
        assert!(is_wildcard_segment("*path"));
        assert!(!is_wildcard_segment("path"));
        assert!(!is_wildcard_segment(":id"));
    }

    #[test]
    fn test_literal_match() {
        let p = pattern("/help/about");
        assert!(p.match_url("/help/about").is_some());
        assert!(p.match_url("/help/about/").is_some());
        assert!(p.match_url("/help").is_none());
        assert!(p.match_url("/help/about/more").is_none());
    }

    #[test]
    fn test_root_pattern() {
        let p = pattern("/");
        assert!(p.match_url("/").is_some());
        assert!(p.match_url("").is_some());
        assert!(p.match_url("/x").is_none());
    }

    #[test]
    fn test_literal_with_regex_metacharacters() {
        let p = pattern("/a.b");
        assert!(p.match_url("/a.b").is_some());
        assert!(p.match_url("/aXb").is_none());
    }

    #[test]
    fn test_optional_trailing_capture() {
        let p = pattern("/history/:parameters?");
        assert!(p.match_url("/history").unwrap().is_empty());
        assert!(p.match_url("/history/").unwrap().is_empty());
        assert_eq!(
            p.match_url("/history/page=2").unwrap().get("parameters"),
            Some("page=2")
        );
        assert!(p.match_url("/history/a/b").is_none());
    }

    #[test]
    fn test_greedy_constraint_with_optional() {
        let p = pattern("/posts/:parameters(.*)?");
        assert!(p.match_url("/posts").unwrap().is_empty());
        assert!(p.match_url("/posts/").unwrap().is_empty());
        assert_eq!(
            p.match_url("/posts/query=a%2Fb;page=3").unwrap().get("parameters"),
            Some("query=a%2Fb;page=3")
        );
    }

    #[test]
    fn test_constraint() {
        let p = pattern("/post/:id(\\d+)");
        assert_eq!(p.match_url("/post/12").unwrap().get("id"), Some("12"));
        assert!(p.match_url("/post/abc").is_none());
    }

    #[test]
    fn test_one_or_more_and_zero_or_more() {
        let plus = pattern("/files/:path+");
        assert!(plus.match_url("/files").is_none());
        assert_eq!(plus.match_url("/files/a/b").unwrap().get("path"), Some("a/b"));

        let star = pattern("/files/*rest");
        assert!(star.match_url("/files").unwrap().is_empty());
        assert_eq!(star.match_url("/files/a/b/c").unwrap().get("rest"), Some("a/b/c"));
    }

    #[test]
    fn test_catch_all() {
        let p = pattern("*");
        assert!(p.is_catch_all());
        assert!(p.match_url("/anything/at/all").is_some());
        assert!(p.match_url("").is_some());
        assert!(!pattern("/x").is_catch_all());
    }

    #[test]
    fn test_query_and_fragment_are_ignored() {
        let p = pattern("/items/:parameters?");
        assert!(p.match_url("/items/?x=1#top").is_some());
    }

    #[test]
    fn test_invalid_patterns() {
        for bad in ["/x/:", "/x/:1abc", "/x/:id(", "/x/:id)", "/x/:id!", "/x/:id([)"] {
            let err = RoutePattern::parse(bad).unwrap_err();
            assert!(
                matches!(err, NavigationError::InvalidPattern { .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_capture_names() {
        let p = pattern("/tag/:name/:section?");
        assert_eq!(p.capture_names(), vec!["name", "section"]);
    }

    #[test]
    fn test_build() {
        let p = pattern("/tag/:name/:section?");
        let params = RouteParams::new().with("name", "sky");
        assert_eq!(p.build(&params).as_deref(), Some("/tag/sky"));

        let params = params.with("section", "merge");
        assert_eq!(p.build(&params).as_deref(), Some("/tag/sky/merge"));

        assert_eq!(p.build(&RouteParams::new()), None);
        assert_eq!(pattern("/").build(&RouteParams::new()).as_deref(), Some("/"));
        assert_eq!(RoutePattern::catch_all().build(&RouteParams::new()), None);
    }
}
