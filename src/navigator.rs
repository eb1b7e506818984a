//! The navigation engine.
//!
//! [`Navigator`] owns the route table, the history, the scroll store and the
//! active route's [`NavigationContext`]. Navigations run one at a time
//! through a small state machine:
//!
//! ```text
//! Idle ──► ExitingOld ──► MatchingNew ──► EnteringNew ──► Idle
//!              │ refused                      │ redirect
//!              ▼                              ▼
//!            Idle                       replace(target)
//! ```
//!
//! A request arriving while another one is in flight is queued and runs,
//! in arrival order, once the current navigation settles.
//!
//! # Example
//!
//! ```
//! use page_navigator::{middleware_fn, NavigationAction, Navigator, Route};
//!
//! let navigator = Navigator::builder()
//!     .route(Route::new("/items/:parameters?").enter(middleware_fn(|_| NavigationAction::Continue)))
//!     .route(Route::catch_all())
//!     .build()
//!     .unwrap();
//!
//! let result = pollster::block_on(navigator.start("/items/"));
//! assert!(result.is_success());
//! assert_eq!(navigator.current_url().as_deref(), Some("/items/"));
//! ```

use crate::codec;
use crate::config::NavigatorConfig;
use crate::context::NavigationContext;
use crate::error::{ErrorHandlers, NavigationError, NavigationResult};
use crate::history::{History, HistoryEntry, HistoryState, MemoryHistory};
use crate::lifecycle::{NavigationAction, NavigationKind, NavigationPhase, RouteController};
use crate::middleware::RouteMiddleware;
use crate::params::RouteParams;
use crate::route::Route;
use crate::scroll::{MemoryViewport, ScrollPosition, ScrollStore, Viewport};
use crate::table::RouteTable;
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

// ============================================================================
// Builder
// ============================================================================

/// Assembles a [`Navigator`].
///
/// Routes are tried in the order they are added. Everything is validated in
/// [`build`](Self::build): configuration values, route patterns and the
/// catch-all rules.
pub struct NavigatorBuilder {
    config: NavigatorConfig,
    routes: Vec<Route>,
    enter_all: Vec<Rc<dyn RouteMiddleware>>,
    exit_all: Vec<Rc<dyn RouteMiddleware>>,
    history: Option<Box<dyn History>>,
    viewport: Option<Rc<dyn Viewport>>,
    error_handlers: ErrorHandlers,
}

impl NavigatorBuilder {
    pub fn new() -> Self {
        Self {
            config: NavigatorConfig::default(),
            routes: Vec::new(),
            enter_all: Vec::new(),
            exit_all: Vec::new(),
            history: None,
            viewport: None,
            error_handlers: ErrorHandlers::default(),
        }
    }

    pub fn config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a route after the ones already added.
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Middleware run before every route's own entry chain.
    pub fn enter_all(mut self, middleware: impl RouteMiddleware) -> Self {
        self.enter_all.push(Rc::new(middleware));
        self
    }

    /// Middleware run before every route's own exit chain.
    pub fn exit_all(mut self, middleware: impl RouteMiddleware) -> Self {
        self.exit_all.push(Rc::new(middleware));
        self
    }

    /// Use `history` instead of a fresh [`MemoryHistory`].
    pub fn history(mut self, history: impl History) -> Self {
        self.history = Some(Box::new(history));
        self
    }

    /// Use `viewport` instead of a [`MemoryViewport`].
    pub fn viewport(mut self, viewport: Rc<dyn Viewport>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn error_handlers(mut self, handlers: ErrorHandlers) -> Self {
        self.error_handlers = handlers;
        self
    }

    /// Validate everything and create the navigator.
    pub fn build(self) -> Result<Navigator, NavigationError> {
        if let Err(err) = self.config.validate() {
            error_log!("Rejected navigator configuration: {}", err);
            return Err(err);
        }

        #[cfg(feature = "cache")]
        let mut table = RouteTable::with_cache_capacity(self.config.cache_capacity_nonzero()?);
        #[cfg(not(feature = "cache"))]
        let mut table = RouteTable::new();

        for route in self.routes {
            table.register(route);
        }
        for middleware in self.enter_all {
            table.enter_all_shared(middleware);
        }
        for middleware in self.exit_all {
            table.exit_all_shared(middleware);
        }
        if let Err(err) = table.validate(self.config.require_catch_all) {
            error_log!("Rejected route table: {}", err);
            return Err(err);
        }

        let scroll = ScrollStore::new(self.config.scroll_capacity_nonzero()?);
        info_log!("Navigator ready with {} routes", table.len());

        Ok(Navigator {
            inner: Rc::new(RefCell::new(Inner {
                config: self.config,
                table,
                history: self
                    .history
                    .unwrap_or_else(|| Box::new(MemoryHistory::new())),
                viewport: self
                    .viewport
                    .unwrap_or_else(|| Rc::new(MemoryViewport::new())),
                scroll,
                error_handlers: self.error_handlers,
                phase: NavigationPhase::Idle,
                queue: VecDeque::new(),
                active: None,
                leaving: None,
                pending_scroll: None,
                scroll_deferred: false,
                content_ready: false,
            })),
        })
    }
}

impl Default for NavigatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Engine state
// ============================================================================

#[derive(Debug, Clone)]
struct Request {
    url: String,
    kind: NavigationKind,
    redirect_depth: usize,
}

impl Request {
    fn new(url: String, kind: NavigationKind) -> Self {
        Self {
            url,
            kind,
            redirect_depth: 0,
        }
    }

    fn redirected(&self, url: String, kind: NavigationKind) -> Self {
        Self {
            url,
            kind,
            redirect_depth: self.redirect_depth + 1,
        }
    }
}

/// The route currently shown.
struct Active {
    route: Option<Rc<Route>>,
    context: NavigationContext,
}

/// What a rendered view may still read about the route being left while
/// its exit chain holds the context.
struct Leaving {
    url: String,
    parameters: RouteParams,
    controller_name: Option<String>,
}

impl Leaving {
    fn of(context: &NavigationContext) -> Self {
        Self {
            url: context.url.clone(),
            parameters: context.parameters.clone(),
            controller_name: context.controller_name().map(str::to_string),
        }
    }
}

struct Inner {
    config: NavigatorConfig,
    table: RouteTable,
    history: Box<dyn History>,
    viewport: Rc<dyn Viewport>,
    scroll: ScrollStore,
    error_handlers: ErrorHandlers,
    phase: NavigationPhase,
    queue: VecDeque<Request>,
    active: Option<Active>,
    leaving: Option<Leaving>,
    /// Scroll target of the last navigation, not applied yet.
    pending_scroll: Option<ScrollPosition>,
    /// The entered page asked to restore scroll only after it rendered.
    scroll_deferred: bool,
    /// The deferred content rendered before the entry chain finished.
    content_ready: bool,
}

// ============================================================================
// Navigator
// ============================================================================

/// Cloneable handle to the navigation engine.
///
/// All clones share one engine. Feature controllers should hold a
/// [`WeakNavigator`] instead, so they do not keep the engine alive.
#[derive(Clone)]
pub struct Navigator {
    inner: Rc<RefCell<Inner>>,
}

impl Navigator {
    pub fn builder() -> NavigatorBuilder {
        NavigatorBuilder::new()
    }

    pub fn downgrade(&self) -> WeakNavigator {
        WeakNavigator {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // ------------------------------------------------------------------------
    // Navigation API
    // ------------------------------------------------------------------------

    /// Enter the first URL. The history entry is replaced, not pushed.
    pub async fn start(&self, url: impl Into<String>) -> NavigationResult {
        self.navigate(url.into(), NavigationKind::Replace).await
    }

    /// Navigate to `url`, adding a history entry.
    pub async fn push(&self, url: impl Into<String>) -> NavigationResult {
        self.navigate(url.into(), NavigationKind::Push).await
    }

    /// Navigate to `url`, rewriting the current history entry.
    pub async fn replace(&self, url: impl Into<String>) -> NavigationResult {
        self.navigate(url.into(), NavigationKind::Replace).await
    }

    /// Go one entry back. `None` if there is nothing to go back to.
    pub async fn back(&self) -> Option<NavigationResult> {
        self.traverse(-1, NavigationKind::Back).await
    }

    /// Go one entry forward. `None` if there is nothing to go forward to.
    pub async fn forward(&self) -> Option<NavigationResult> {
        self.traverse(1, NavigationKind::Forward).await
    }

    /// The target entry is looked up when the request runs, so a traversal
    /// queued behind other navigations moves relative to where they left the
    /// history.
    async fn traverse(&self, offset: isize, kind: NavigationKind) -> Option<NavigationResult> {
        let url = self.inner.borrow().history.peek(offset)?.url.clone();
        Some(self.navigate(url, kind).await)
    }

    /// Add a history entry for `url` without leaving the active route.
    ///
    /// The exit and entry chains are skipped: the active context only gets
    /// the new URL and re-decoded parameters. Used by paginated views to keep
    /// the address in sync with the page shown.
    ///
    /// While another navigation is running the request is queued as an
    /// ordinary push. If `url` belongs to a different route nothing happens
    /// and the result is `Blocked` with `url` as redirect, telling the caller
    /// to use [`push`](Self::push).
    pub fn push_in_place(&self, url: impl Into<String>) -> NavigationResult {
        self.navigate_in_place(url.into(), NavigationKind::Push)
    }

    /// Rewrite the current history entry to `url` without leaving the
    /// active route.
    ///
    /// Same rules as [`push_in_place`](Self::push_in_place), but the history
    /// keeps its length. Used after a rename, when the address should show
    /// the new name without a second entry.
    pub fn replace_in_place(&self, url: impl Into<String>) -> NavigationResult {
        self.navigate_in_place(url.into(), NavigationKind::Replace)
    }

    fn navigate_in_place(&self, url: String, kind: NavigationKind) -> NavigationResult {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;

        if inner.phase != NavigationPhase::Idle {
            debug_log!("In-place navigation to '{}' queued as {:?}", url, kind);
            inner.queue.push_back(Request::new(url.clone(), kind));
            return NavigationResult::Queued { url };
        }

        let Some(active) = inner.active.as_mut() else {
            return NavigationResult::Blocked {
                reason: "No active route".to_string(),
                redirect: Some(url),
            };
        };

        let same_route = match (inner.table.resolve(&url), &active.route) {
            (Some(matched), Some(route)) if Rc::ptr_eq(&matched.route, route) => Some(matched),
            _ => None,
        };
        let Some(matched) = same_route else {
            debug_log!("'{}' leaves the active route, in-place navigation refused", url);
            return NavigationResult::Blocked {
                reason: "URL belongs to another route".to_string(),
                redirect: Some(url),
            };
        };

        let context = &mut active.context;
        if kind == NavigationKind::Push {
            let position = inner.viewport.scroll_position();
            inner.scroll.record(&context.url, position);
            let mut state = context.state.clone();
            state.scroll = Some(position);
            inner
                .history
                .replace(HistoryEntry::with_state(context.url.clone(), state));
            inner.history.push(HistoryEntry::new(url.clone()));
            context.from = Some(std::mem::replace(&mut context.url, url.clone()));
        } else {
            inner.history.replace(HistoryEntry::new(url.clone()));
            context.url = url.clone();
        }

        context.parameters = codec::decode_captures(&matched.captures, &inner.config.parameters_key);
        context.captures = matched.captures;
        context.state = HistoryState::default();

        info_log!("In-place {:?} to '{}'", kind, url);
        NavigationResult::Success { url }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn phase(&self) -> NavigationPhase {
        self.inner.borrow().phase
    }

    /// URL of the current history entry.
    pub fn current_url(&self) -> Option<String> {
        self.inner.borrow().history.current().map(|e| e.url.clone())
    }

    /// Decoded parameters of the active route.
    ///
    /// While the exit chain of the route being left runs, these are still
    /// that route's parameters.
    pub fn current_parameters(&self) -> RouteParams {
        let inner = self.inner.borrow();
        match (&inner.active, &inner.leaving) {
            (Some(active), _) => active.context.parameters.clone(),
            (None, Some(leaving)) => leaving.parameters.clone(),
            (None, None) => RouteParams::default(),
        }
    }

    /// Name of the controller attached to the active route, or to the route
    /// being left while its exit chain runs.
    pub fn controller_name(&self) -> Option<String> {
        let inner = self.inner.borrow();
        match (&inner.active, &inner.leaving) {
            (Some(active), _) => active.context.controller_name().map(str::to_string),
            (None, Some(leaving)) => leaving.controller_name.clone(),
            (None, None) => None,
        }
    }

    /// Run `f` against the active controller.
    ///
    /// The controller is taken out of the engine for the duration of the
    /// call, so `f` may use the navigator. A controller attached in the
    /// meantime wins and the taken one is disposed.
    ///
    /// Returns `None` while the exit chain of the route being left runs:
    /// the chain owns that route's controller until it settles.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut dyn RouteController) -> R) -> Option<R> {
        let mut controller = self
            .inner
            .borrow_mut()
            .active
            .as_mut()?
            .context
            .controller
            .take()?;

        let result = f(controller.as_mut());

        let mut inner = self.inner.borrow_mut();
        if let Some(active) = inner
            .active
            .as_mut()
            .filter(|active| active.context.controller.is_none())
        {
            active.context.controller = Some(controller);
            return Some(result);
        }
        drop(inner);
        controller.dispose();
        Some(result)
    }

    pub fn can_go_back(&self) -> bool {
        self.inner.borrow().history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.inner.borrow().history.can_go_forward()
    }

    pub fn history_len(&self) -> usize {
        self.inner.borrow().history.len()
    }

    /// Build the URL of a named route.
    pub fn url_for(&self, name: &str, params: &RouteParams) -> Option<String> {
        self.inner.borrow().table.url_for(name, params)
    }

    pub fn config(&self) -> NavigatorConfig {
        self.inner.borrow().config.clone()
    }

    /// Number of requests waiting behind the running navigation.
    pub fn queued(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    // ------------------------------------------------------------------------
    // Scroll coordination
    // ------------------------------------------------------------------------

    /// Hold the scroll restoration of the navigation being entered until
    /// [`content_rendered`](Self::content_rendered) is called.
    ///
    /// Only meaningful from an entry middleware; ignored otherwise.
    pub fn defer_scroll_restore(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.phase == NavigationPhase::EnteringNew {
            trace_log!("Scroll restoration deferred until content renders");
            inner.scroll_deferred = true;
            inner.content_ready = false;
        }
    }

    /// Signal that the entered page finished rendering its content.
    pub fn content_rendered(&self) {
        let target = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase == NavigationPhase::EnteringNew {
                inner.content_ready = true;
                return;
            }
            inner.scroll_deferred = false;
            inner.pending_scroll.take().map(|p| (p, inner.viewport.clone()))
        };
        if let Some((position, viewport)) = target {
            trace_log!("Restoring scroll to {:?} after render", position);
            viewport.scroll_to(position);
        }
    }

    // ------------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------------

    async fn navigate(&self, url: String, kind: NavigationKind) -> NavigationResult {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.phase != NavigationPhase::Idle {
                debug_log!(
                    "Navigation to '{}' queued behind the current one ({} waiting)",
                    url,
                    inner.queue.len()
                );
                inner.queue.push_back(Request::new(url.clone(), kind));
                return NavigationResult::Queued { url };
            }
        }

        let result = self.process(Request::new(url, kind)).await;
        self.drain_queue().await;
        result
    }

    async fn drain_queue(&self) {
        loop {
            let next = self.inner.borrow_mut().queue.pop_front();
            let Some(request) = next else {
                break;
            };
            trace_log!("Running queued navigation to '{}'", request.url);
            let result = self.process(request).await;
            trace_log!("Queued navigation finished: {:?}", result);
        }
    }

    fn set_phase(&self, phase: NavigationPhase) {
        trace_log!("Navigation phase: {:?}", phase);
        self.inner.borrow_mut().phase = phase;
    }

    fn finish(&self, result: NavigationResult) -> NavigationResult {
        self.set_phase(NavigationPhase::Idle);
        result
    }

    /// Run one request through exit, match and entry.
    fn process(&self, mut request: Request) -> LocalBoxFuture<'_, NavigationResult> {
        async move {
            if let Some(offset) = traversal_offset(request.kind) {
                let target = self.inner.borrow().history.peek(offset).map(|e| e.url.clone());
                let Some(url) = target else {
                    debug_log!("Nothing to traverse to ({:?}), request dropped", request.kind);
                    return self.finish(NavigationResult::Blocked {
                        reason: "No history entry to go to".to_string(),
                        redirect: None,
                    });
                };
                request.url = url;
            }

            let max_depth = self.inner.borrow().config.max_redirect_depth;
            if request.redirect_depth > max_depth {
                error_log!(
                    "Redirect loop: gave up after {} redirects at '{}'",
                    max_depth,
                    request.url
                );
                return self.finish(NavigationResult::Error(NavigationError::RedirectLoop {
                    depth: max_depth,
                    url: request.url,
                }));
            }

            // ---------------- ExitingOld ----------------
            self.set_phase(NavigationPhase::ExitingOld);
            let previous_url = self.current_url();
            info_log!(
                "Navigation {:?}: {:?} → '{}'",
                request.kind,
                previous_url,
                request.url
            );

            let (previous, global_exit) = {
                let mut inner = self.inner.borrow_mut();
                let global_exit = inner.table.global_exit_chain().clone();
                let previous = inner.active.take();
                inner.leaving = previous.as_ref().map(|active| Leaving::of(&active.context));
                (previous, global_exit)
            };

            if let Some(mut active) = previous {
                self.capture_scroll(&mut active.context);

                let mut action = global_exit.run(&mut active.context, "exit").await;
                if action.is_continue() {
                    if let Some(route) = active.route.clone() {
                        action = route.exit_chain().run(&mut active.context, "exit").await;
                    }
                }
                if let Some(leaving) = self.inner.borrow_mut().leaving.take() {
                    trace_log!("Exit chain of '{}' settled", leaving.url);
                }

                match action {
                    NavigationAction::Continue => {
                        trace_log!("Leaving '{}'", active.context.url);
                        active.context.dispose_controller();
                    }
                    NavigationAction::Deny { reason } => {
                        warn_log!("Leaving '{}' refused: {}", active.context.url, reason);
                        self.inner.borrow_mut().active = Some(active);
                        return self.finish(NavigationResult::Blocked {
                            reason,
                            redirect: None,
                        });
                    }
                    NavigationAction::Redirect { to, reason } => {
                        debug_log!("Exit chain of '{}' redirected to '{}'", active.context.url, to);
                        let mut inner = self.inner.borrow_mut();
                        inner.active = Some(active);
                        inner
                            .queue
                            .push_front(request.redirected(to.clone(), NavigationKind::Push));
                        drop(inner);
                        return self.finish(NavigationResult::Blocked {
                            reason: reason.unwrap_or_else(|| "Redirected".to_string()),
                            redirect: Some(to),
                        });
                    }
                }
            }

            // ---------------- MatchingNew ----------------
            self.set_phase(NavigationPhase::MatchingNew);
            let (matched, state, scroll_target) = {
                let mut guard = self.inner.borrow_mut();
                let inner = &mut *guard;

                let state = match request.kind {
                    NavigationKind::Push => {
                        inner.history.push(HistoryEntry::new(request.url.clone()));
                        HistoryState::default()
                    }
                    NavigationKind::Replace => {
                        inner.history.replace(HistoryEntry::new(request.url.clone()));
                        HistoryState::default()
                    }
                    NavigationKind::Back | NavigationKind::Forward => {
                        let offset = traversal_offset(request.kind).unwrap_or_default();
                        let revisited = inner
                            .history
                            .go(offset)
                            .filter(|entry| entry.url == request.url)
                            .map(|entry| entry.state.clone());
                        match revisited {
                            Some(state) => state,
                            None => {
                                // The history moved since the request was made.
                                inner.history.push(HistoryEntry::new(request.url.clone()));
                                HistoryState::default()
                            }
                        }
                    }
                };

                let scroll_target = if !inner.config.restore_scroll {
                    None
                } else if request.kind.is_traversal() {
                    let stored = inner.scroll.take(&request.url);
                    Some(state.scroll.or(stored).unwrap_or(ScrollPosition::TOP))
                } else {
                    Some(ScrollPosition::TOP)
                };

                (inner.table.resolve(&request.url), state, scroll_target)
            };

            let mut context = NavigationContext::new(request.url.clone(), request.kind)
                .with_navigator(self.downgrade());
            context.from = previous_url;
            context.state = state;

            let Some(matched) = matched else {
                error_log!("No route matches '{}'", request.url);
                let handlers = self.inner.borrow().error_handlers.clone();
                context.controller = handlers.render_not_found(&request.url);
                let mut inner = self.inner.borrow_mut();
                inner.active = Some(Active {
                    route: None,
                    context,
                });
                inner.pending_scroll = scroll_target;
                drop(inner);
                self.apply_scroll();
                return self.finish(NavigationResult::NotFound { url: request.url });
            };

            context.captures = matched.captures;
            context.route_name = matched.route.route_name().map(str::to_string);
            context.pattern = Some(matched.route.pattern_str().to_string());

            // ---------------- EnteringNew ----------------
            let global_entry = {
                let mut inner = self.inner.borrow_mut();
                inner.phase = NavigationPhase::EnteringNew;
                inner.pending_scroll = scroll_target;
                inner.scroll_deferred = false;
                inner.content_ready = false;
                inner.table.global_entry_chain().clone()
            };
            trace_log!("Navigation phase: {:?}", NavigationPhase::EnteringNew);

            let mut action = global_entry.run(&mut context, "entry").await;
            if action.is_continue() {
                action = matched.route.entry_chain().run(&mut context, "entry").await;
            }

            let result = match action {
                NavigationAction::Continue => {
                    debug_log!(
                        "Entered '{}' via '{}'",
                        request.url,
                        matched.route.pattern_str()
                    );
                    NavigationResult::Success {
                        url: request.url.clone(),
                    }
                }
                NavigationAction::Deny { reason } => {
                    warn_log!("Entering '{}' refused: {}", request.url, reason);
                    if context.controller.is_none() {
                        let error = NavigationError::Refused {
                            reason: reason.clone(),
                        };
                        let handlers = self.inner.borrow().error_handlers.clone();
                        context.controller = handlers.render_error(&error);
                    }
                    if let Some(controller) = context.controller.as_mut() {
                        controller.show_error(&reason);
                    }
                    NavigationResult::Blocked {
                        reason,
                        redirect: None,
                    }
                }
                NavigationAction::Redirect { to, reason } => {
                    debug_log!(
                        "Entry chain of '{}' redirected to '{}' ({:?})",
                        request.url,
                        to,
                        reason
                    );
                    context.dispose_controller();
                    self.inner.borrow_mut().pending_scroll = None;
                    let redirected = request.redirected(to, NavigationKind::Replace);
                    return self.process(redirected).await;
                }
            };

            self.inner.borrow_mut().active = Some(Active {
                route: Some(matched.route),
                context,
            });

            let apply_now = {
                let inner = self.inner.borrow();
                !inner.scroll_deferred || inner.content_ready
            };
            if apply_now {
                self.apply_scroll();
            }
            self.finish(result)
        }
        .boxed_local()
    }

    /// Record the viewport offset of the page being left.
    fn capture_scroll(&self, context: &mut NavigationContext) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let position = inner.viewport.scroll_position();
        inner.scroll.record(&context.url, position);
        context.state.scroll = Some(position);

        if inner.history.current().is_some_and(|e| e.url == context.url) {
            inner
                .history
                .replace(HistoryEntry::with_state(context.url.clone(), context.state.clone()));
        }
    }

    fn apply_scroll(&self) {
        let target = {
            let mut inner = self.inner.borrow_mut();
            inner.scroll_deferred = false;
            inner.pending_scroll.take().map(|p| (p, inner.viewport.clone()))
        };
        if let Some((position, viewport)) = target {
            trace_log!("Scrolling to {:?}", position);
            viewport.scroll_to(position);
        }
    }
}

/// History offset a traversal moves by.
fn traversal_offset(kind: NavigationKind) -> Option<isize> {
    match kind {
        NavigationKind::Back => Some(-1),
        NavigationKind::Forward => Some(1),
        NavigationKind::Push | NavigationKind::Replace => None,
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Navigator")
                .field("phase", &inner.phase)
                .field("current", &inner.history.current().map(|e| &e.url))
                .field("queued", &inner.queue.len())
                .field("routes", &inner.table.len())
                .finish(),
            Err(_) => f.debug_struct("Navigator").finish_non_exhaustive(),
        }
    }
}

// ============================================================================
// WeakNavigator
// ============================================================================

/// Non-owning handle to a [`Navigator`].
#[derive(Clone, Default)]
pub struct WeakNavigator {
    inner: Weak<RefCell<Inner>>,
}

impl WeakNavigator {
    /// The navigator, if it is still alive.
    pub fn upgrade(&self) -> Option<Navigator> {
        self.inner.upgrade().map(|inner| Navigator { inner })
    }
}

impl fmt::Debug for WeakNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakNavigator")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
