//! Per-navigation context.
//!
//! A [`NavigationContext`] is created when a URL is matched and lives as long
//! as the route stays active. The entry chain fills it in (decoded
//! parameters, attached controller), the exit chain of the next navigation
//! reads it, and finally the engine disposes the controller it holds.

use crate::history::HistoryState;
use crate::lifecycle::{NavigationKind, RouteController};
use crate::navigator::WeakNavigator;
use crate::params::RouteParams;
use std::fmt;

// ============================================================================
// NavigationContext
// ============================================================================

/// Mutable bag of state for one active route.
///
/// # Example
///
/// ```
/// use page_navigator::{NavigationContext, NavigationKind};
///
/// let ctx = NavigationContext::new("/items/page=2", NavigationKind::Push);
/// assert_eq!(ctx.url, "/items/page=2");
/// assert!(ctx.controller.is_none());
/// ```
pub struct NavigationContext {
    /// The URL being entered (or, for exit chains, the URL being left).
    pub url: String,

    /// URL of the route that was active before this one.
    pub from: Option<String>,

    /// How the navigation was triggered.
    pub kind: NavigationKind,

    /// Raw, still percent-encoded pattern captures.
    pub captures: RouteParams,

    /// Decoded parameters, filled by [`ParseParameters`](crate::ParseParameters).
    pub parameters: RouteParams,

    /// Opaque history state of this entry.
    pub state: HistoryState,

    /// Name of the matched route, if it was given one.
    pub route_name: Option<String>,

    /// Source of the matched pattern.
    pub pattern: Option<String>,

    /// Feature controller attached by an entry middleware.
    pub controller: Option<Box<dyn RouteController>>,

    navigator: WeakNavigator,
}

impl NavigationContext {
    /// Create a context for `url` with nothing matched yet.
    pub fn new(url: impl Into<String>, kind: NavigationKind) -> Self {
        Self {
            url: url.into(),
            from: None,
            kind,
            captures: RouteParams::new(),
            parameters: RouteParams::new(),
            state: HistoryState::default(),
            route_name: None,
            pattern: None,
            controller: None,
            navigator: WeakNavigator::default(),
        }
    }

    pub(crate) fn with_navigator(mut self, navigator: WeakNavigator) -> Self {
        self.navigator = navigator;
        self
    }

    /// Handle to the engine running this navigation.
    ///
    /// Feature controllers keep it to trigger follow-up navigations. It is
    /// empty for contexts built outside an engine.
    pub fn navigator(&self) -> WeakNavigator {
        self.navigator.clone()
    }

    /// Attach a controller, disposing the one attached before, if any.
    pub fn attach(&mut self, controller: impl RouteController) {
        if let Some(mut previous) = self.controller.replace(Box::new(controller)) {
            previous.dispose();
        }
    }

    /// Name of the attached controller.
    pub fn controller_name(&self) -> Option<&str> {
        self.controller.as_deref().map(|c| c.name())
    }

    /// Dispose and drop the attached controller.
    pub(crate) fn dispose_controller(&mut self) {
        if let Some(mut controller) = self.controller.take() {
            controller.dispose();
        }
    }
}

impl fmt::Debug for NavigationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationContext")
            .field("url", &self.url)
            .field("from", &self.from)
            .field("kind", &self.kind)
            .field("captures", &self.captures)
            .field("parameters", &self.parameters)
            .field("route_name", &self.route_name)
            .field("controller", &self.controller_name())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
