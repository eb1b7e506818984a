//! # Page Navigator
//!
//! A client-side navigation engine for single-page applications:
//!
//! - **Route Table** - Ordered URL patterns with named captures, constraints
//!   and a catch-all, validated at startup
//! - **Middleware Chains** - Asynchronous entry and exit chains per route,
//!   plus global chains run for every route
//! - **Serialized Navigation** - One navigation at a time, later requests
//!   queued in arrival order
//! - **Scroll Restoration** - Offsets saved on exit and restored on back and
//!   forward
//! - **Parameter Codec** - A parameter map as one editable path segment,
//!   `page=2;query=tag:red`
//! - **Pagination** - [`PageController`] with stale-response suppression,
//!   out-of-range redirect and in-place page changes
//!
//! The engine runs on a single thread. Handles are `Rc`-based and futures are
//! `!Send`; drive them with any local executor.
//!
//! # Quick Start
//!
//! ```
//! use page_navigator::*;
//! use std::rc::Rc;
//!
//! struct HistoryController;
//! impl RouteController for HistoryController {
//!     fn name(&self) -> &str {
//!         "history"
//!     }
//! }
//!
//! let session = Rc::new(|privilege: &str| privilege == "snapshots:list");
//!
//! let navigator = Navigator::builder()
//!     .route(
//!         Route::new("/history/:parameters?")
//!             .enter(PrivilegeGuard::new(session, "snapshots:list"))
//!             .enter(ParseParameters::new())
//!             .enter(middleware_fn(|ctx| {
//!                 ctx.attach(HistoryController);
//!                 NavigationAction::Continue
//!             })),
//!     )
//!     .route(Route::catch_all())
//!     .build()
//!     .unwrap();
//!
//! let result = pollster::block_on(navigator.push("/history/page=3"));
//! assert!(result.is_success());
//! assert_eq!(navigator.current_parameters().get("page"), Some("3"));
//! assert_eq!(navigator.controller_name().as_deref(), Some("history"));
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `guard` (default) - Privilege and exit-confirmation guards
//! - `cache` (default) - LRU cache for URL resolution

#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Core routing modules
pub mod codec;
pub mod config;
pub mod matching;
pub mod params;
pub mod route;
pub mod table;

// Error handling
pub mod error;

// Navigation lifecycle
pub mod context;
pub mod history;
pub mod lifecycle;
pub mod middleware;
pub mod navigator;
pub mod scroll;

// Guards
#[cfg(feature = "guard")]
pub mod guards;

// Features
pub mod events;
pub mod page;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, ResolveCache};
pub use config::NavigatorConfig;
pub use context::NavigationContext;
pub use error::{
    ErrorHandler, ErrorHandlers, FetchError, NavigationError, NavigationResult, NotFoundHandler,
};
pub use events::{Subject, Subscription};
#[cfg(feature = "guard")]
pub use guards::{Confirm, ConfirmExit, ExitConfirmation, PrivilegeCheck, PrivilegeGuard};
pub use history::{History, HistoryEntry, HistoryState, MemoryHistory};
pub use lifecycle::{NavigationAction, NavigationKind, NavigationPhase, RouteController};
pub use matching::RoutePattern;
pub use middleware::{middleware_fn, FnMiddleware, MiddlewareChain, ParseParameters, RouteMiddleware};
pub use navigator::{Navigator, NavigatorBuilder, WeakNavigator};
pub use page::{
    page_from_parameters, PageChangeHandle, PageContext, PageController, PageEvent, PageFuture,
    PageRequestConfig, PageResult, PageStatus, ViewHandle,
};
pub use params::RouteParams;
pub use route::Route;
pub use scroll::{MemoryViewport, ScrollPosition, ScrollStore, Viewport};
pub use table::{RouteMatch, RouteTable};
