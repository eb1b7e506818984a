//! The route table.
//!
//! Routes are kept in registration order and resolution is first match
//! wins, so specific patterns must be registered before general ones and the
//! catch-all last. [`RouteTable::validate`] enforces the catch-all rules at
//! startup instead of leaving them to be discovered at navigation time.
//!
//! Besides per-route chains the table holds the global chains, run before
//! every route's own chain: `enter_all` on every entry, `exit_all` on every
//! exit.

use crate::error::NavigationError;
use crate::middleware::{MiddlewareChain, RouteMiddleware};
use crate::params::RouteParams;
use crate::route::Route;
use crate::{debug_log, info_log, trace_log};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[cfg(feature = "cache")]
use crate::cache::ResolveCache;
#[cfg(feature = "cache")]
use std::cell::RefCell;

/// A resolved URL.
#[derive(Clone)]
pub struct RouteMatch {
    /// The matching route.
    pub route: Rc<Route>,
    /// Raw captures of its pattern.
    pub captures: RouteParams,
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.route.pattern_str())
            .field("captures", &self.captures)
            .finish()
    }
}

/// Ordered set of routes plus the global middleware chains.
///
/// ```
/// use page_navigator::{Route, RouteTable};
///
/// let mut table = RouteTable::new();
/// table.register(Route::new("/post/:id").name("post"));
/// table.register(Route::new("/posts/:parameters(.*)?"));
/// table.register(Route::catch_all());
/// assert!(table.validate(true).is_ok());
///
/// let matched = table.resolve("/post/12").unwrap();
/// assert_eq!(matched.captures.get("id"), Some("12"));
/// assert_eq!(matched.route.route_name(), Some("post"));
/// ```
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Rc<Route>>,
    names: HashMap<String, usize>,
    enter_all: MiddlewareChain,
    exit_all: MiddlewareChain,
    #[cfg(feature = "cache")]
    cache: RefCell<ResolveCache>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table whose resolve cache holds `capacity` URLs.
    #[cfg(feature = "cache")]
    pub fn with_cache_capacity(capacity: std::num::NonZeroUsize) -> Self {
        Self {
            cache: RefCell::new(ResolveCache::with_capacity(capacity)),
            ..Self::default()
        }
    }

    /// Append a route. Earlier routes take precedence.
    pub fn register(&mut self, route: Route) {
        info_log!(
            "Registering route #{} '{}'",
            self.routes.len(),
            route.pattern_str()
        );
        if let Some(name) = route.route_name() {
            // First registration of a name wins, like resolution.
            self.names
                .entry(name.to_string())
                .or_insert(self.routes.len());
        }
        self.routes.push(Rc::new(route));

        #[cfg(feature = "cache")]
        self.cache.borrow_mut().clear();
    }

    /// Append a middleware run on entry to every route.
    pub fn enter_all(&mut self, middleware: impl RouteMiddleware) {
        self.enter_all.push(middleware);
    }

    /// Append a middleware run on exit from every route.
    pub fn exit_all(&mut self, middleware: impl RouteMiddleware) {
        self.exit_all.push(middleware);
    }

    pub(crate) fn enter_all_shared(&mut self, middleware: Rc<dyn RouteMiddleware>) {
        self.enter_all.push_shared(middleware);
    }

    pub(crate) fn exit_all_shared(&mut self, middleware: Rc<dyn RouteMiddleware>) {
        self.exit_all.push_shared(middleware);
    }

    pub fn global_entry_chain(&self) -> &MiddlewareChain {
        &self.enter_all
    }

    pub fn global_exit_chain(&self) -> &MiddlewareChain {
        &self.exit_all
    }

    pub fn routes(&self) -> &[Rc<Route>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Check that the table can be used.
    ///
    /// Fails on the first invalid pattern, on a catch-all that is not the
    /// last route, and, when `require_catch_all` is set, on a table without
    /// one.
    pub fn validate(&self, require_catch_all: bool) -> Result<(), NavigationError> {
        for route in &self.routes {
            if let Err(err) = route.pattern() {
                return Err(err.clone());
            }
        }

        let last = self.routes.len().saturating_sub(1);
        if let Some((_, route)) = self
            .routes
            .iter()
            .enumerate()
            .find(|(index, route)| route.is_catch_all() && *index != last)
        {
            return Err(NavigationError::CatchAllNotLast {
                pattern: route.pattern_str().to_string(),
            });
        }

        let has_catch_all = self.routes.last().is_some_and(|r| r.is_catch_all());
        if require_catch_all && !has_catch_all {
            return Err(NavigationError::MissingCatchAll);
        }

        debug_log!(
            "Route table valid: {} routes, catch-all: {}",
            self.routes.len(),
            has_catch_all
        );
        Ok(())
    }

    /// Find the first route matching `url`.
    pub fn resolve(&self, url: &str) -> Option<RouteMatch> {
        #[cfg(feature = "cache")]
        if let Some((index, captures)) = self.cache.borrow_mut().get(url) {
            if let Some(route) = self.routes.get(index) {
                return Some(RouteMatch {
                    route: route.clone(),
                    captures,
                });
            }
        }

        let (index, route, captures) = self
            .routes
            .iter()
            .enumerate()
            .find_map(|(index, route)| route.matches(url).map(|c| (index, route, c)))?;

        trace_log!(
            "'{}' resolved to route #{} '{}'",
            url,
            index,
            route.pattern_str()
        );

        #[cfg(feature = "cache")]
        self.cache
            .borrow_mut()
            .insert(url, index, captures.clone());

        Some(RouteMatch {
            route: route.clone(),
            captures,
        })
    }

    /// Build the URL of the route registered under `name`.
    ///
    /// ```
    /// use page_navigator::{Route, RouteParams, RouteTable};
    ///
    /// let mut table = RouteTable::new();
    /// table.register(Route::new("/user/:name/history").name("user-history"));
    ///
    /// let url = table.url_for("user-history", &RouteParams::new().with("name", "ann"));
    /// assert_eq!(url.as_deref(), Some("/user/ann/history"));
    /// assert_eq!(table.url_for("missing", &RouteParams::new()), None);
    /// ```
    pub fn url_for(&self, name: &str, params: &RouteParams) -> Option<String> {
        let route = self.routes.get(*self.names.get(name)?)?;
        route.pattern().ok()?.build(params)
    }

    /// Hit and miss counters of the resolve cache.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> crate::cache::CacheStats {
        self.cache.borrow().stats().clone()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes)
            .field("enter_all", &self.enter_all)
            .field("exit_all", &self.exit_all)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(patterns: &[&str]) -> RouteTable {
        let mut table = RouteTable::new();
        for pattern in patterns {
            if *pattern == "*" {
                table.register(Route::catch_all());
            } else {
                table.register(Route::new(*pattern));
            }
        }
        table
    }

    #[test]
    fn test_first_registered_wins() {
        let table = table(&["/post/:id(\\d+)", "/post/:slug", "*"]);
        assert_eq!(
            table.resolve("/post/42").unwrap().route.pattern_str(),
            "/post/:id(\\d+)"
        );
        assert_eq!(
            table.resolve("/post/hello").unwrap().route.pattern_str(),
            "/post/:slug"
        );
        assert_eq!(table.resolve("/nowhere").unwrap().route.pattern_str(), "*");
    }

    #[test]
    fn test_no_match_without_catch_all() {
        let table = table(&["/items/:parameters?"]);
        assert!(table.resolve("/other").is_none());
    }

    #[test]
    fn test_validate_catch_all_position() {
        let err = table(&["/a", "*", "/b"]).validate(false).unwrap_err();
        assert_eq!(
            err,
            NavigationError::CatchAllNotLast {
                pattern: "*".to_string()
            }
        );
        assert!(table(&["/a", "*"]).validate(true).is_ok());
    }

    #[test]
    fn test_validate_requires_catch_all() {
        assert_eq!(
            table(&["/a"]).validate(true).unwrap_err(),
            NavigationError::MissingCatchAll
        );
        assert!(table(&["/a"]).validate(false).is_ok());
        assert!(table(&[]).validate(false).is_ok());
    }

    #[test]
    fn test_validate_reports_bad_pattern() {
        let err = table(&["/a", "/b/:(", "*"]).validate(false).unwrap_err();
        assert!(matches!(err, NavigationError::InvalidPattern { .. }));
    }

    #[test]
    fn test_url_for_unknown_or_unbuildable() {
        let mut table = RouteTable::new();
        table.register(Route::new("/post/:id(\\d+)").name("post"));
        assert_eq!(
            table.url_for("post", &RouteParams::new().with("id", "7")).as_deref(),
            Some("/post/7")
        );
        assert_eq!(
            table.url_for("post", &RouteParams::new().with("id", "x")),
            None
        );
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_resolve_uses_cache() {
        let table = table(&["/post/:id", "*"]);
        table.resolve("/post/1");
        let again = table.resolve("/post/1").unwrap();
        assert_eq!(again.captures.get("id"), Some("1"));
        assert_eq!(table.cache_stats().hits, 1);
        assert_eq!(table.cache_stats().misses, 1);
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_register_invalidates_cache() {
        let mut table = table(&["/post/:id"]);
        table.resolve("/post/1");
        let before = table.cache_stats().invalidations;

        table.register(Route::catch_all());
        assert_eq!(table.cache_stats().invalidations, before + 1);

        table.resolve("/post/1");
        assert_eq!(table.cache_stats().hits, 0);
    }
}
