//! Route definitions.
//!
//! A [`Route`] couples a [`RoutePattern`] with its entry and exit
//! middleware chains. Routes are assembled with a builder API and handed to
//! the [`NavigatorBuilder`](crate::NavigatorBuilder), which validates them
//! all at once:
//!
//! ```
//! use page_navigator::{middleware_fn, NavigationAction, ParseParameters, Route};
//!
//! let history = Route::new("/history/:parameters?")
//!     .name("history")
//!     .enter(ParseParameters::new())
//!     .enter(middleware_fn(|_ctx| NavigationAction::Continue));
//!
//! assert_eq!(history.pattern_str(), "/history/:parameters?");
//! assert_eq!(history.entry_chain().len(), 2);
//! ```

use crate::error::NavigationError;
use crate::matching::RoutePattern;
use crate::middleware::{MiddlewareChain, RouteMiddleware};
use crate::params::RouteParams;
use std::fmt;

/// A registered URL pattern with its middleware chains.
pub struct Route {
    source: String,
    pattern: Result<RoutePattern, NavigationError>,
    name: Option<String>,
    entry: MiddlewareChain,
    exit: MiddlewareChain,
}

impl Route {
    /// Create a route for `pattern`.
    ///
    /// Pattern errors are kept and reported when the navigator is built, so
    /// that route tables can be written as a single expression.
    pub fn new(pattern: impl Into<String>) -> Self {
        let source = pattern.into();
        let compiled = RoutePattern::parse(&source);
        Self {
            source,
            pattern: compiled,
            name: None,
            entry: MiddlewareChain::new(),
            exit: MiddlewareChain::new(),
        }
    }

    /// Route matching every URL. Must be registered last.
    pub fn catch_all() -> Self {
        Self {
            source: "*".to_string(),
            pattern: Ok(RoutePattern::catch_all()),
            name: None,
            entry: MiddlewareChain::new(),
            exit: MiddlewareChain::new(),
        }
    }

    /// Name the route so URLs can be built with
    /// [`RouteTable::url_for`](crate::RouteTable::url_for).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append an entry middleware.
    pub fn enter(mut self, middleware: impl RouteMiddleware) -> Self {
        self.entry.push(middleware);
        self
    }

    /// Append an exit middleware.
    pub fn exit(mut self, middleware: impl RouteMiddleware) -> Self {
        self.exit.push(middleware);
        self
    }

    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The pattern as written.
    pub fn pattern_str(&self) -> &str {
        &self.source
    }

    /// The compiled pattern, or the error it failed with.
    pub fn pattern(&self) -> Result<&RoutePattern, &NavigationError> {
        self.pattern.as_ref()
    }

    pub fn is_catch_all(&self) -> bool {
        self.pattern.as_ref().is_ok_and(RoutePattern::is_catch_all)
    }

    pub fn entry_chain(&self) -> &MiddlewareChain {
        &self.entry
    }

    pub fn exit_chain(&self) -> &MiddlewareChain {
        &self.exit
    }

    /// Raw captures if `url` matches. A route with an invalid pattern never
    /// matches.
    pub fn matches(&self, url: &str) -> Option<RouteParams> {
        self.pattern.as_ref().ok()?.match_url(url)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.source)
            .field("name", &self.name)
            .field("entry", &self.entry)
            .field("exit", &self.exit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::middleware_fn;
    use crate::lifecycle::NavigationAction;

    #[test]
    fn test_route_matches() {
        let route = Route::new("/post/:id");
        assert_eq!(route.matches("/post/5").unwrap().get("id"), Some("5"));
        assert!(route.matches("/posts/").is_none());
        assert!(!route.is_catch_all());
    }

    #[test]
    fn test_invalid_pattern_is_kept() {
        let route = Route::new("/post/:id(");
        assert!(route.pattern().is_err());
        assert!(route.matches("/post/(").is_none());
    }

    #[test]
    fn test_catch_all_route() {
        let route = Route::catch_all();
        assert!(route.is_catch_all());
        assert!(route.matches("/anything/at/all").is_some());
    }

    #[test]
    fn test_builder_chains() {
        let route = Route::new("/settings")
            .name("settings")
            .enter(middleware_fn(|_| NavigationAction::Continue))
            .exit(middleware_fn(|_| NavigationAction::Continue))
            .exit(middleware_fn(|_| NavigationAction::Continue));

        assert_eq!(route.route_name(), Some("settings"));
        assert_eq!(route.entry_chain().len(), 1);
        assert_eq!(route.exit_chain().len(), 2);
    }
}
