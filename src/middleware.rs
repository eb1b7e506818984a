//! Entry and exit middleware.
//!
//! Every route carries two ordered [`MiddlewareChain`]s: the **entry** chain
//! runs when the route is entered, the **exit** chain runs when the route is
//! left. Each middleware receives the mutable
//! [`NavigationContext`] and answers with a [`NavigationAction`]:
//! `Continue` hands over to the next middleware, anything else stops the
//! chain.
//!
//! Middlewares are asynchronous so that a step can wait for a user
//! confirmation before deciding. Steps run strictly one after the other.
//!
//! # Creating middleware
//!
//! | Approach | When to use |
//! |----------|-------------|
//! | Implement [`RouteMiddleware`] | Asynchronous work, named, reusable |
//! | [`middleware_fn`] | Synchronous one-off from a closure |
//!
//! # Example
//!
//! ```
//! use page_navigator::{middleware_fn, NavigationAction};
//!
//! let reset_shortcuts = middleware_fn(|ctx| {
//!     ctx.state.extra.remove("shortcuts");
//!     NavigationAction::Continue
//! })
//! .named("reset-shortcuts");
//! # let _ = reset_shortcuts;
//! ```

use crate::codec;
use crate::context::NavigationContext;
use crate::lifecycle::NavigationAction;
use crate::trace_log;
use futures::future::{self, FutureExt, LocalBoxFuture};
use std::fmt;
use std::rc::Rc;

// ============================================================================
// RouteMiddleware trait
// ============================================================================

/// One step of an entry or exit chain.
///
/// # Example
///
/// ```
/// use futures::future::{FutureExt, LocalBoxFuture};
/// use page_navigator::{NavigationAction, NavigationContext, RouteMiddleware};
///
/// struct RequireParameters;
///
/// impl RouteMiddleware for RequireParameters {
///     fn handle<'a>(
///         &'a self,
///         ctx: &'a mut NavigationContext,
///     ) -> LocalBoxFuture<'a, NavigationAction> {
///         async move {
///             if ctx.parameters.is_empty() {
///                 NavigationAction::deny("Nothing to show")
///             } else {
///                 NavigationAction::Continue
///             }
///         }
///         .boxed_local()
///     }
///
///     fn name(&self) -> &str {
///         "RequireParameters"
///     }
/// }
/// ```
pub trait RouteMiddleware: 'static {
    /// Run this step.
    fn handle<'a>(&'a self, ctx: &'a mut NavigationContext) -> LocalBoxFuture<'a, NavigationAction>;

    /// Middleware name for debugging.
    fn name(&self) -> &str {
        "RouteMiddleware"
    }
}

// ============================================================================
// middleware_fn helper
// ============================================================================

/// Create a synchronous middleware from a closure.
///
/// ```
/// use page_navigator::{middleware_fn, NavigationAction};
///
/// let mw = middleware_fn(|ctx| {
///     if ctx.url.contains("admin") {
///         NavigationAction::redirect("/")
///     } else {
///         NavigationAction::Continue
///     }
/// });
/// # let _ = mw;
/// ```
pub fn middleware_fn<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(&mut NavigationContext) -> NavigationAction + 'static,
{
    FnMiddleware {
        f,
        name: "FnMiddleware",
    }
}

/// Middleware created from a closure via [`middleware_fn`].
pub struct FnMiddleware<F> {
    f: F,
    name: &'static str,
}

impl<F> FnMiddleware<F> {
    /// Give the middleware a name for logs.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<F> RouteMiddleware for FnMiddleware<F>
where
    F: Fn(&mut NavigationContext) -> NavigationAction + 'static,
{
    fn handle<'a>(&'a self, ctx: &'a mut NavigationContext) -> LocalBoxFuture<'a, NavigationAction> {
        future::ready((self.f)(ctx)).boxed_local()
    }

    fn name(&self) -> &str {
        self.name
    }
}

// ============================================================================
// MiddlewareChain
// ============================================================================

/// Ordered list of middlewares, run sequentially with short-circuit.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Rc<dyn RouteMiddleware>>,
}

impl MiddlewareChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware.
    pub fn push(&mut self, middleware: impl RouteMiddleware) {
        self.middlewares.push(Rc::new(middleware));
    }

    /// Append an already shared middleware.
    pub fn push_shared(&mut self, middleware: Rc<dyn RouteMiddleware>) {
        self.middlewares.push(middleware);
    }

    /// Number of middlewares in the chain.
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Run every middleware in order until one does not answer `Continue`.
    ///
    /// `stage` only labels the log output (`"entry"`, `"exit"`).
    pub async fn run(&self, ctx: &mut NavigationContext, stage: &str) -> NavigationAction {
        for middleware in &self.middlewares {
            trace_log!(
                "Running {} middleware '{}' for '{}'",
                stage,
                middleware.name(),
                ctx.url
            );
            let action = middleware.handle(ctx).await;
            if !action.is_continue() {
                trace_log!(
                    "{} middleware '{}' stopped the chain: {:?}",
                    stage,
                    middleware.name(),
                    action
                );
                return action;
            }
        }
        NavigationAction::Continue
    }
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.middlewares.iter().map(|m| m.name()))
            .finish()
    }
}

// ============================================================================
// ParseParameters
// ============================================================================

/// Entry middleware that fills [`NavigationContext::parameters`].
///
/// The capture named by the parameters key (default `"parameters"`) is
/// decoded with the [`codec`]; every other capture is percent-decoded and
/// copied under its own name. Decoding never fails the navigation.
#[derive(Debug, Clone)]
pub struct ParseParameters {
    key: String,
}

impl ParseParameters {
    /// Decode the capture named `parameters`.
    pub fn new() -> Self {
        Self::with_key(crate::config::DEFAULT_PARAMETERS_KEY)
    }

    /// Decode the capture named `key`.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for ParseParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteMiddleware for ParseParameters {
    fn handle<'a>(&'a self, ctx: &'a mut NavigationContext) -> LocalBoxFuture<'a, NavigationAction> {
        ctx.parameters = codec::decode_captures(&ctx.captures, &self.key);
        future::ready(NavigationAction::Continue).boxed_local()
    }

    fn name(&self) -> &str {
        "ParseParameters"
    }
}

// ============================================================================
// Tests
// ============================================================================
