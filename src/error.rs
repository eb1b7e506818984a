//! Error handling for the router.
//!
//! This module defines the types returned when a navigation attempt cannot
//! complete successfully:
//!
//! - [`NavigationResult`]: the top-level outcome of any navigation
//!   (`Success`, `Queued`, `NotFound`, `Blocked`, `Error`).
//! - [`NavigationError`]: configuration and routing errors.
//! - [`FetchError`]: the user-displayable failure of a page fetch.
//! - [`ErrorHandlers`]: a builder for registering the controllers that
//!   render not-found and refused/error views.
//!
//! # Examples
//!
//! ```
//! use page_navigator::NavigationResult;
//!
//! let result = NavigationResult::Success { url: "/items/".into() };
//! assert!(result.is_success());
//!
//! let blocked = NavigationResult::Blocked {
//!     reason: "Unsaved changes".into(),
//!     redirect: None,
//! };
//! assert!(blocked.is_blocked());
//! ```

use crate::lifecycle::RouteController;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// Navigation completed and `url` is now current.
    Success { url: String },
    /// Another navigation was in progress; this one runs after it.
    Queued { url: String },
    /// No route matched `url`.
    NotFound { url: String },
    /// A middleware refused the navigation.
    Blocked {
        reason: String,
        redirect: Option<String>,
    },
    /// Navigation failed.
    Error(NavigationError),
}

impl NavigationResult {
    /// Check if navigation was successful
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    /// Check if navigation was queued behind another one
    pub fn is_queued(&self) -> bool {
        matches!(self, NavigationResult::Queued { .. })
    }

    /// Check if route was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationResult::NotFound { .. })
    }

    /// Check if navigation was blocked
    pub fn is_blocked(&self) -> bool {
        matches!(self, NavigationResult::Blocked { .. })
    }

    /// Check if there was an error
    pub fn is_error(&self) -> bool {
        matches!(self, NavigationResult::Error(_))
    }

    /// Get redirect path if blocked with redirect
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            NavigationResult::Blocked {
                redirect: Some(path),
                ..
            } => Some(path),
            _ => None,
        }
    }
}

/// Routing and configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// A middleware refused to let navigation proceed.
    #[error("Navigation refused: {reason}")]
    Refused { reason: String },

    /// A route pattern could not be compiled.
    #[error("Invalid route pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The configuration requires a catch-all route but none is registered.
    #[error("No catch-all route registered")]
    MissingCatchAll,

    /// A catch-all route is followed by other routes, which could never match.
    #[error("Catch-all route '{pattern}' must be registered last")]
    CatchAllNotLast { pattern: String },

    /// Middlewares kept redirecting.
    #[error("Redirect loop detected (depth {depth}): target '{url}'")]
    RedirectLoop { depth: usize, url: String },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Failure of a page fetch.
///
/// The message is shown to the user as-is, so collaborators should produce
/// something readable rather than a transport error dump.
///
/// ```
/// use page_navigator::FetchError;
///
/// let error = FetchError::from("Connection lost");
/// assert_eq!(error.to_string(), "Connection lost");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    /// Create a fetch error with a user-facing message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The user-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for FetchError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for FetchError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

// ============================================================================
// Error Handlers
// ============================================================================

/// Builds the controller shown when a navigation is refused or fails.
pub type ErrorHandler = Rc<dyn Fn(&NavigationError) -> Box<dyn RouteController>>;

/// Builds the controller shown when no route matches.
pub type NotFoundHandler = Rc<dyn Fn(&str) -> Box<dyn RouteController>>;

/// Builder for registering not-found and error views.
///
/// # Examples
///
/// ```
/// use page_navigator::{ErrorHandlers, RouteController};
///
/// struct Message(String);
/// impl RouteController for Message {}
///
/// let handlers = ErrorHandlers::new()
///     .on_not_found(|url| Box::new(Message(format!("404: {url}"))))
///     .on_error(|err| Box::new(Message(err.to_string())));
///
/// assert!(handlers.render_not_found("/nope").is_some());
/// ```
#[derive(Clone, Default)]
pub struct ErrorHandlers {
    /// Handler for unmatched URLs
    pub not_found: Option<NotFoundHandler>,

    /// Handler for refused or failed navigations
    pub error: Option<ErrorHandler>,
}

impl ErrorHandlers {
    /// Create new empty error handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the not-found handler
    pub fn on_not_found<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) -> Box<dyn RouteController> + 'static,
    {
        self.not_found = Some(Rc::new(handler));
        self
    }

    /// Set the error handler
    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&NavigationError) -> Box<dyn RouteController> + 'static,
    {
        self.error = Some(Rc::new(handler));
        self
    }

    /// Build the not-found controller, if a handler is registered.
    pub fn render_not_found(&self, url: &str) -> Option<Box<dyn RouteController>> {
        self.not_found.as_ref().map(|handler| handler(url))
    }

    /// Build the error controller, if a handler is registered.
    pub fn render_error(&self, error: &NavigationError) -> Option<Box<dyn RouteController>> {
        self.error.as_ref().map(|handler| handler(error))
    }
}

impl fmt::Debug for ErrorHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandlers")
            .field("not_found", &self.not_found.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
