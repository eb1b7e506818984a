//! Paginated list controller.
//!
//! A [`PageController`] drives a list view: it reads the page number from
//! the route parameters, asks the caller-supplied fetcher for that page,
//! and hands the result to the caller-supplied renderer. It deals with the
//! awkward parts:
//!
//! - **Last request wins.** Every fetch gets a sequence number; a result
//!   that arrives after a newer request was issued is dropped.
//! - **Out-of-range pages.** A page past the last one redirects, once per
//!   controller, to the last page.
//! - **In-place page changes.** The page-change callback given to the view
//!   updates the URL without re-entering the route.
//! - **Cleanup.** The previous view is disposed before anything new is
//!   shown, and [`dispose`](PageController::dispose) silences in-flight
//!   fetches.
//!
//! # Example
//!
//! ```
//! use futures::executor::LocalPool;
//! use page_navigator::{
//!     codec, FetchError, PageController, PageRequestConfig, PageResult, RouteParams,
//!     ViewHandle, WeakNavigator,
//! };
//!
//! struct ListView;
//! impl ViewHandle for ListView {}
//!
//! let mut pool = LocalPool::new();
//! let controller = PageController::<String>::new(WeakNavigator::default(), pool.spawner());
//!
//! controller.run(PageRequestConfig::new(
//!     RouteParams::new().with("page", "2"),
//!     |page| codec::url_with_parameters("/items/", &RouteParams::new().with("page", page.to_string())),
//!     |page| async move {
//!         Ok::<_, FetchError>(PageResult {
//!             items: vec![format!("item on page {page}")],
//!             total_pages: 5,
//!             current_page: page,
//!         })
//!     },
//!     |ctx| {
//!         assert_eq!(ctx.current_page, 2);
//!         Box::new(ListView)
//!     },
//! ));
//!
//! pool.run_until_stalled();
//! assert_eq!(controller.current_page(), Some(2));
//! ```

use crate::config::DEFAULT_PAGE_KEY;
use crate::error::{FetchError, NavigationResult};
use crate::events::{Subject, Subscription};
use crate::lifecycle::RouteController;
use crate::navigator::WeakNavigator;
use crate::params::RouteParams;
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use futures::future::{FutureExt, LocalBoxFuture};
use futures::task::{LocalSpawn, LocalSpawnExt};
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

// ============================================================================
// Collaborator types
// ============================================================================

/// One page of results, as returned by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    /// Total number of pages; `0` for an empty result.
    pub total_pages: u32,
    /// Page the server says it returned. Informational only.
    pub current_page: u32,
}

/// Future produced by a page fetcher.
pub type PageFuture<T> = LocalBoxFuture<'static, Result<PageResult<T>, FetchError>>;

/// A rendered view owned by a controller.
pub trait ViewHandle {
    /// Release the view. Called exactly once, before it is replaced.
    fn dispose(&mut self) {}
}

type UrlForPage = Rc<dyn Fn(u32) -> String>;
type RequestPage<T> = Rc<dyn Fn(u32) -> PageFuture<T>>;
type RenderPage<T> = Rc<dyn Fn(PageContext<T>) -> Box<dyn ViewHandle>>;
type RenderError = Rc<dyn Fn(&str) -> Box<dyn ViewHandle>>;

/// What a [`PageController`] needs from its feature.
pub struct PageRequestConfig<T> {
    parameters: RouteParams,
    url_for_page: UrlForPage,
    request_page: RequestPage<T>,
    render: RenderPage<T>,
    render_error: Option<RenderError>,
}

impl<T: 'static> PageRequestConfig<T> {
    /// `parameters` are the decoded route parameters; `url_for_page` builds
    /// the URL showing a given page; `request_page` fetches a page;
    /// `render` turns a loaded page into a view.
    pub fn new<U, F, Fut, R>(parameters: RouteParams, url_for_page: U, request_page: F, render: R) -> Self
    where
        U: Fn(u32) -> String + 'static,
        F: Fn(u32) -> Fut + 'static,
        Fut: Future<Output = Result<PageResult<T>, FetchError>> + 'static,
        R: Fn(PageContext<T>) -> Box<dyn ViewHandle> + 'static,
    {
        Self {
            parameters,
            url_for_page: Rc::new(url_for_page),
            request_page: Rc::new(move |page| request_page(page).boxed_local()),
            render: Rc::new(render),
            render_error: None,
        }
    }

    /// View shown in place of the list when a fetch fails.
    #[must_use]
    pub fn on_error(mut self, render_error: impl Fn(&str) -> Box<dyn ViewHandle> + 'static) -> Self {
        self.render_error = Some(Rc::new(render_error));
        self
    }

    pub fn parameters(&self) -> &RouteParams {
        &self.parameters
    }
}

impl<T> fmt::Debug for PageRequestConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRequestConfig")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Everything the renderer gets for one page.
pub struct PageContext<T> {
    pub items: Vec<T>,
    /// 1-based page shown, clamped to `1..=max(1, total_pages)`.
    pub current_page: u32,
    pub total_pages: u32,
    /// Route parameters with the page number filled in.
    pub parameters: RouteParams,
    /// Call to switch pages without re-entering the route.
    pub on_page_changed: PageChangeHandle,
    url_for_page: UrlForPage,
}

impl<T> PageContext<T> {
    /// URL showing `page`, for pagination links.
    pub fn url_for_page(&self, page: u32) -> String {
        (self.url_for_page)(page)
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }
}

impl<T: fmt::Debug> fmt::Debug for PageContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageContext")
            .field("items", &self.items)
            .field("current_page", &self.current_page)
            .field("total_pages", &self.total_pages)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Page-change callback handed to views.
#[derive(Clone)]
pub struct PageChangeHandle {
    callback: Rc<dyn Fn(u32)>,
}

impl PageChangeHandle {
    pub fn change_page(&self, page: u32) {
        (self.callback)(page);
    }
}

impl fmt::Debug for PageChangeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PageChangeHandle")
    }
}

// ============================================================================
// Events and status
// ============================================================================

/// Lifecycle notifications published by a [`PageController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A fetch for `page` was issued.
    Loading { page: u32 },
    /// `page` was rendered.
    Rendered { page: u32, total_pages: u32 },
    /// The fetch for `page` failed with a user-facing message.
    Failed { page: u32, message: String },
    /// `page` was past the last page; the controller moved to `url`.
    Redirected { page: u32, url: String },
}

/// Where a [`PageController`] currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageStatus {
    /// Created, `run` not called yet.
    #[default]
    Idle,
    Loading { page: u32 },
    Ready { page: u32, total_pages: u32 },
    Failed { message: String },
    Disposed,
}

/// Page number held by `parameters` under `key`.
///
/// Missing, non-numeric and non-positive values all mean page 1.
///
/// ```
/// use page_navigator::{page_from_parameters, RouteParams};
///
/// assert_eq!(page_from_parameters(&RouteParams::new().with("page", "4"), "page"), 4);
/// assert_eq!(page_from_parameters(&RouteParams::new().with("page", "0"), "page"), 1);
/// assert_eq!(page_from_parameters(&RouteParams::new().with("page", "x"), "page"), 1);
/// assert_eq!(page_from_parameters(&RouteParams::new(), "page"), 1);
/// ```
pub fn page_from_parameters(parameters: &RouteParams, key: &str) -> u32 {
    parameters
        .get_as::<u32>(key)
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

// ============================================================================
// PageController
// ============================================================================

/// Controller of a paginated list.
///
/// Cheap, cloneable handle. The state is shared with the tasks it spawns,
/// which only hold weak references and go quiet once every handle is
/// dropped.
pub struct PageController<T: 'static> {
    shared: Rc<Shared<T>>,
}

struct Shared<T: 'static> {
    navigator: WeakNavigator,
    spawner: Rc<dyn LocalSpawn>,
    events: Subject<PageEvent>,
    state: RefCell<State<T>>,
}

struct State<T: 'static> {
    config: Option<Rc<PageRequestConfig<T>>>,
    parameters: RouteParams,
    page_key: String,
    sequence: u64,
    view: Option<Box<dyn ViewHandle>>,
    status: PageStatus,
    redirected: bool,
}

impl<T: 'static> PageController<T> {
    /// Create a controller. `navigator` is used for URL updates and
    /// redirects; with an empty handle pages change in place only.
    pub fn new(navigator: WeakNavigator, spawner: impl LocalSpawn + 'static) -> Self {
        let page_key = navigator
            .upgrade()
            .map_or_else(|| DEFAULT_PAGE_KEY.to_string(), |n| n.config().page_key);
        Self {
            shared: Rc::new(Shared {
                navigator,
                spawner: Rc::new(spawner),
                events: Subject::new(),
                state: RefCell::new(State {
                    config: None,
                    parameters: RouteParams::new(),
                    page_key,
                    sequence: 0,
                    view: None,
                    status: PageStatus::Idle,
                    redirected: false,
                }),
            }),
        }
    }

    /// Start showing the page named by the configured parameters.
    pub fn run(&self, config: PageRequestConfig<T>) {
        let page = {
            let mut state = self.shared.state.borrow_mut();
            if state.status == PageStatus::Disposed {
                warn_log!("run() called on a disposed page controller");
                return;
            }
            let page = page_from_parameters(&config.parameters, &state.page_key);
            state.parameters = config.parameters.clone();
            state.config = Some(Rc::new(config));
            page
        };
        self.shared.load(page);
    }

    /// Switch to `page`, updating the URL in place.
    pub fn change_page(&self, page: u32) {
        self.shared.change_page(page);
    }

    /// Drop the view and ignore every fetch still in flight.
    pub fn dispose(&self) {
        let view = {
            let mut state = self.shared.state.borrow_mut();
            if state.status == PageStatus::Disposed {
                return;
            }
            state.sequence += 1;
            state.status = PageStatus::Disposed;
            state.config = None;
            state.view.take()
        };
        trace_log!("Page controller disposed");
        if let Some(mut view) = view {
            view.dispose();
        }
    }

    pub fn status(&self) -> PageStatus {
        self.shared.state.borrow().status.clone()
    }

    /// Page currently rendered.
    pub fn current_page(&self) -> Option<u32> {
        match self.shared.state.borrow().status {
            PageStatus::Ready { page, .. } => Some(page),
            _ => None,
        }
    }

    pub fn events(&self) -> &Subject<PageEvent> {
        &self.shared.events
    }

    /// Listen to [`PageEvent`]s until the subscription is dropped.
    pub fn subscribe(&self, listener: impl Fn(&PageEvent) + 'static) -> Subscription {
        self.shared.events.subscribe(listener)
    }
}

impl<T: 'static> RouteController for PageController<T> {
    fn name(&self) -> &str {
        "PageController"
    }

    fn show_error(&mut self, message: &str) {
        self.shared.show_failure(0, FetchError::new(message));
    }

    fn dispose(&mut self) {
        PageController::dispose(self);
    }
}

impl<T: 'static> Clone for PageController<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: 'static> fmt::Debug for PageController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("PageController")
            .field("status", &state.status)
            .field("sequence", &state.sequence)
            .field("redirected", &state.redirected)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Shared<T> {
    fn load(self: &Rc<Self>, page: u32) {
        let (sequence, config, previous) = {
            let mut state = self.state.borrow_mut();
            if state.status == PageStatus::Disposed {
                return;
            }
            let Some(config) = state.config.clone() else {
                return;
            };
            state.sequence += 1;
            state.status = PageStatus::Loading { page };
            (state.sequence, config, state.view.take())
        };
        if let Some(mut view) = previous {
            view.dispose();
        }
        if let Some(navigator) = self.navigator.upgrade() {
            navigator.defer_scroll_restore();
        }

        debug_log!("Requesting page {} (request #{})", page, sequence);
        self.events.emit(&PageEvent::Loading { page });

        let fetch = (config.request_page)(page);
        let weak = Rc::downgrade(self);
        let navigator = self.navigator.clone();
        let task = async move {
            let result = fetch.await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let Some((url, last_page)) = shared.complete(sequence, page, result) else {
                return;
            };
            drop(shared);

            let Some(navigator) = navigator.upgrade() else {
                return;
            };
            let outcome = navigator.replace(url).await;
            if !matches!(
                outcome,
                NavigationResult::Success { .. } | NavigationResult::Queued { .. }
            ) {
                debug_log!("Redirect to the last page did not go through: {:?}", outcome);
                if let Some(shared) = weak.upgrade() {
                    shared.load(last_page);
                }
            }
        };

        if let Err(err) = self.spawner.spawn_local(task) {
            error_log!("Could not spawn the request for page {}: {}", page, err);
            self.show_failure(page, FetchError::new("Could not start loading the page."));
        }
    }

    /// Handle a finished fetch. Returns the redirect URL and target page
    /// when the page was out of range and a navigator should take over.
    fn complete(
        self: &Rc<Self>,
        sequence: u64,
        page: u32,
        result: Result<PageResult<T>, FetchError>,
    ) -> Option<(String, u32)> {
        {
            let state = self.state.borrow();
            if state.status == PageStatus::Disposed || state.sequence != sequence {
                trace_log!(
                    "Discarding stale result for page {} (request #{}, latest #{})",
                    page,
                    sequence,
                    state.sequence
                );
                return None;
            }
        }

        match result {
            Ok(response) => self.show_page(sequence, page, response),
            Err(error) => {
                self.show_failure(page, error);
                None
            }
        }
    }

    fn show_page(
        self: &Rc<Self>,
        sequence: u64,
        page: u32,
        response: PageResult<T>,
    ) -> Option<(String, u32)> {
        let total_pages = response.total_pages;
        let (config, mut parameters, page_key, redirect) = {
            let mut state = self.state.borrow_mut();
            let config = state.config.clone()?;
            let redirect = total_pages > 0 && page > total_pages && !state.redirected;
            if redirect {
                state.redirected = true;
            }
            (config, state.parameters.clone(), state.page_key.clone(), redirect)
        };

        if redirect {
            let url = (config.url_for_page)(total_pages);
            info_log!(
                "Page {} is past the last page {}, redirecting to '{}'",
                page,
                total_pages,
                url
            );
            self.events.emit(&PageEvent::Redirected {
                page,
                url: url.clone(),
            });
            if self.navigator.upgrade().is_some() {
                return Some((url, total_pages));
            }
            self.load(total_pages);
            return None;
        }

        let current_page = page.clamp(1, total_pages.max(1));
        parameters.set(page_key, current_page.to_string());
        let context = PageContext {
            items: response.items,
            current_page,
            total_pages,
            parameters,
            on_page_changed: self.change_handle(),
            url_for_page: config.url_for_page.clone(),
        };

        let previous = self.state.borrow_mut().view.take();
        if let Some(mut view) = previous {
            view.dispose();
        }
        let view = (config.render)(context);

        let mut state = self.state.borrow_mut();
        if state.sequence != sequence || state.status == PageStatus::Disposed {
            // The renderer itself moved on (changed page or disposed us).
            drop(state);
            let mut view = view;
            view.dispose();
            return None;
        }
        state.view = Some(view);
        state.status = PageStatus::Ready {
            page: current_page,
            total_pages,
        };
        drop(state);

        debug_log!("Rendered page {} of {}", current_page, total_pages);
        self.events.emit(&PageEvent::Rendered {
            page: current_page,
            total_pages,
        });
        if let Some(navigator) = self.navigator.upgrade() {
            navigator.content_rendered();
        }
        None
    }

    fn show_failure(self: &Rc<Self>, page: u32, error: FetchError) {
        warn_log!("Loading page {} failed: {}", page, error);
        let (config, previous) = {
            let mut state = self.state.borrow_mut();
            if state.status == PageStatus::Disposed {
                return;
            }
            state.status = PageStatus::Failed {
                message: error.message().to_string(),
            };
            (state.config.clone(), state.view.take())
        };
        if let Some(mut view) = previous {
            view.dispose();
        }

        let view = config
            .and_then(|config| config.render_error.clone())
            .map(|render_error| render_error(error.message()));
        self.state.borrow_mut().view = view;

        self.events.emit(&PageEvent::Failed {
            page,
            message: error.message().to_string(),
        });
        if let Some(navigator) = self.navigator.upgrade() {
            navigator.content_rendered();
        }
    }

    fn change_page(self: &Rc<Self>, page: u32) {
        let page = page.max(1);
        let config = {
            let state = self.state.borrow();
            match (&state.status, state.config.clone()) {
                (PageStatus::Disposed, _) | (_, None) => return,
                (_, Some(config)) => config,
            }
        };
        let url = (config.url_for_page)(page);

        let Some(navigator) = self.navigator.upgrade() else {
            self.set_page_parameter(page);
            self.load(page);
            return;
        };

        match navigator.push_in_place(url.clone()) {
            NavigationResult::Success { .. } => {
                self.set_page_parameter(page);
                self.load(page);
            }
            NavigationResult::Queued { .. } => {
                trace_log!("Page change to '{}' queued behind a navigation", url);
            }
            other => {
                debug_log!("In-place page change refused ({:?}), navigating to '{}'", other, url);
                let task = async move {
                    navigator.push(url).await;
                };
                if let Err(err) = self.spawner.spawn_local(task) {
                    error_log!("Could not spawn navigation for page {}: {}", page, err);
                }
            }
        }
    }

    fn set_page_parameter(&self, page: u32) {
        let mut state = self.state.borrow_mut();
        let key = state.page_key.clone();
        state.parameters.set(key, page.to_string());
    }

    fn change_handle(self: &Rc<Self>) -> PageChangeHandle {
        let weak = Rc::downgrade(self);
        PageChangeHandle {
            callback: Rc::new(move |page| {
                if let Some(shared) = weak.upgrade() {
                    shared.change_page(page);
                }
            }),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
