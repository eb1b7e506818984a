//! Navigation actions, phases, and the feature-controller contract.
//!
//! This module defines the vocabulary shared by the engine and everything
//! plugged into it:
//!
//! - [`NavigationAction`]: the outcome of every middleware. It says whether
//!   navigation should continue, be refused, or be redirected.
//! - [`NavigationPhase`]: the states of the navigation state machine.
//! - [`NavigationKind`]: how a navigation was triggered (push, replace,
//!   history traversal), which decides history and scroll handling.
//! - [`RouteController`]: the feature controller attached to a
//!   [`NavigationContext`](crate::NavigationContext) while its route is active.
//!
//! # Navigation pipeline
//!
//! 1. **Exit chain** of the active route (global `exit_all` middlewares
//!    first); any refusal cancels the navigation with no side effects.
//! 2. The active controller is disposed and the history entry is committed.
//! 3. **Match**: the route table resolves the URL.
//! 4. **Entry chain** of the matched route (global `enter_all` first); a
//!    middleware typically attaches the new controller.
//! 5. Scroll position is restored or reset.

// ============================================================================
// NavigationAction
// ============================================================================

/// Result of a middleware step.
///
/// # Example
///
/// ```
/// use page_navigator::NavigationAction;
///
/// let action = NavigationAction::deny("Not authorized");
/// assert!(action.is_deny());
///
/// let action = NavigationAction::redirect("/login");
/// assert_eq!(action.redirect_path(), Some("/login"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    /// Proceed to the next middleware.
    Continue,

    /// Refuse the navigation.
    Deny {
        /// Human-readable reason, shown to the user for entry refusals.
        reason: String,
    },

    /// Abandon this navigation and go somewhere else instead.
    Redirect {
        /// Path to redirect to.
        to: String,
        /// Optional human-readable reason for redirecting.
        reason: Option<String>,
    },
}

impl NavigationAction {
    /// Alias for [`Continue`](Self::Continue).
    pub fn proceed() -> Self {
        Self::Continue
    }

    /// Refuse navigation with a human-readable reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    /// Redirect navigation to a different path.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: None,
        }
    }

    /// Redirect with a human-readable reason.
    pub fn redirect_with_reason(to: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: Some(reason.into()),
        }
    }

    /// Check if this action lets navigation continue.
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if this action refuses navigation.
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    /// Check if this action redirects navigation.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// Get the redirect path, if this is a redirect action.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } => Some(to.as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// NavigationPhase / NavigationKind
// ============================================================================

/// State of the navigation state machine.
///
/// `Idle → ExitingOld → MatchingNew → EnteringNew → Idle`. Requests arriving
/// in any state other than `Idle` are queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationPhase {
    /// No navigation in progress.
    #[default]
    Idle,
    /// Running the exit chain of the active route.
    ExitingOld,
    /// Resolving the target URL against the route table.
    MatchingNew,
    /// Running the entry chain of the matched route.
    EnteringNew,
}

/// How a navigation was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// New history entry (link click, programmatic push).
    Push,
    /// Current history entry rewritten in place (redirects, corrections).
    Replace,
    /// History traversal backwards.
    Back,
    /// History traversal forwards.
    Forward,
}

impl NavigationKind {
    /// Whether this navigation revisits an existing history entry, in which
    /// case a saved scroll position may be restored.
    pub fn is_traversal(self) -> bool {
        matches!(self, Self::Back | Self::Forward)
    }
}

// ============================================================================
// RouteController
// ============================================================================

/// Feature controller attached to the active route.
///
/// An entry middleware creates the controller and stores it in
/// [`NavigationContext::controller`](crate::NavigationContext::controller).
/// The engine keeps it until the next navigation away from the route gets
/// past the exit chain, then calls [`dispose`](Self::dispose) before
/// dropping it. Controllers are expected to release their views and event
/// subscriptions there.
///
/// # Example
///
/// ```
/// use page_navigator::RouteController;
///
/// struct HelpController {
///     message: Option<String>,
/// }
///
/// impl RouteController for HelpController {
///     fn name(&self) -> &str {
///         "help"
///     }
///
///     fn show_error(&mut self, message: &str) {
///         self.message = Some(message.to_string());
///     }
/// }
/// ```
pub trait RouteController: 'static {
    /// Controller name for debugging and logs.
    fn name(&self) -> &str {
        "RouteController"
    }

    /// Display an error message in the controller's view.
    fn show_error(&mut self, _message: &str) {}

    /// Display a success message in the controller's view.
    fn show_success(&mut self, _message: &str) {}

    /// Release views, listeners, and in-flight work.
    fn dispose(&mut self) {}
}

// ============================================================================
// Tests
// ============================================================================
