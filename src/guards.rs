//! Access checks and exit confirmation.
//!
//! Guards are ordinary [`RouteMiddleware`]s with a fixed purpose:
//!
//! | Guard | Chain | Purpose |
//! |-------|-------|---------|
//! | [`PrivilegeGuard`] | entry | Refuse entry without a named privilege |
//! | [`ConfirmExit`] | exit | Ask before leaving a page with unsaved edits |
//!
//! # Example
//!
//! ```
//! use page_navigator::{ParseParameters, PrivilegeGuard, Route};
//! use std::rc::Rc;
//!
//! let session = Rc::new(|privilege: &str| privilege == "snapshots:list");
//!
//! let history = Route::new("/history/:parameters?")
//!     .enter(PrivilegeGuard::new(session, "snapshots:list")
//!         .with_message("You don't have privileges to view history."))
//!     .enter(ParseParameters::new());
//! # let _ = history;
//! ```

use crate::context::NavigationContext;
use crate::lifecycle::NavigationAction;
use crate::middleware::RouteMiddleware;
use crate::{debug_log, warn_log};
use futures::future::{self, FutureExt, LocalBoxFuture};
use std::cell::Cell;
use std::rc::Rc;

// ============================================================================
// PrivilegeGuard
// ============================================================================

/// Answers whether the current session holds a privilege.
pub trait PrivilegeCheck {
    fn has_privilege(&self, privilege: &str) -> bool;
}

impl<F> PrivilegeCheck for F
where
    F: Fn(&str) -> bool,
{
    fn has_privilege(&self, privilege: &str) -> bool {
        self(privilege)
    }
}

/// Entry middleware refusing routes the session may not see.
///
/// The refusal reason is the message shown in place of the page.
pub struct PrivilegeGuard {
    check: Rc<dyn PrivilegeCheck>,
    privilege: String,
    message: String,
    redirect_path: Option<String>,
}

impl PrivilegeGuard {
    pub fn new(check: Rc<dyn PrivilegeCheck>, privilege: impl Into<String>) -> Self {
        Self {
            check,
            privilege: privilege.into(),
            message: "You don't have privileges to access this page.".to_string(),
            redirect_path: None,
        }
    }

    /// Replace the refusal message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Redirect instead of refusing.
    #[must_use]
    pub fn with_redirect(mut self, path: impl Into<String>) -> Self {
        self.redirect_path = Some(path.into());
        self
    }

    fn decide(&self) -> NavigationAction {
        if self.check.has_privilege(&self.privilege) {
            NavigationAction::Continue
        } else if let Some(redirect) = &self.redirect_path {
            debug_log!("Missing privilege '{}', redirecting to '{}'", self.privilege, redirect);
            NavigationAction::redirect_with_reason(redirect, self.message.clone())
        } else {
            debug_log!("Missing privilege '{}'", self.privilege);
            NavigationAction::deny(self.message.clone())
        }
    }
}

impl RouteMiddleware for PrivilegeGuard {
    fn handle<'a>(&'a self, _ctx: &'a mut NavigationContext) -> LocalBoxFuture<'a, NavigationAction> {
        future::ready(self.decide()).boxed_local()
    }

    fn name(&self) -> &str {
        "PrivilegeGuard"
    }
}

// ============================================================================
// Exit confirmation
// ============================================================================

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm<'a>(&'a self, message: &'a str) -> LocalBoxFuture<'a, bool>;
}

/// Shared "there are unsaved changes" flag.
///
/// Editors enable it while dirty; [`ConfirmExit`] only asks while it is set.
#[derive(Debug, Clone, Default)]
pub struct ExitConfirmation {
    enabled: Rc<Cell<bool>>,
}

impl ExitConfirmation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&self) {
        self.enabled.set(true);
    }

    pub fn disable(&self) {
        self.enabled.set(false);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}

/// Exit middleware that asks before abandoning unsaved changes.
///
/// A positive answer clears the flag so the next page starts clean.
pub struct ConfirmExit {
    flag: ExitConfirmation,
    confirm: Rc<dyn Confirm>,
    message: String,
}

impl ConfirmExit {
    pub fn new(flag: ExitConfirmation, confirm: Rc<dyn Confirm>) -> Self {
        Self {
            flag,
            confirm,
            message: "Are you sure you want to leave this page? Changes will be lost.".to_string(),
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl RouteMiddleware for ConfirmExit {
    fn handle<'a>(&'a self, ctx: &'a mut NavigationContext) -> LocalBoxFuture<'a, NavigationAction> {
        async move {
            if !self.flag.is_enabled() {
                return NavigationAction::Continue;
            }
            if self.confirm.confirm(&self.message).await {
                self.flag.disable();
                NavigationAction::Continue
            } else {
                warn_log!("Leaving '{}' cancelled by the user", ctx.url);
                NavigationAction::deny("Navigation cancelled")
            }
        }
        .boxed_local()
    }

    fn name(&self) -> &str {
        "ConfirmExit"
    }
}

// ============================================================================
// Tests
// ============================================================================
