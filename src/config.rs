//! Navigator configuration.
//!
//! [`NavigatorConfig`] gathers the tunables of the engine. Every field has a
//! default, so only the values that differ need to be set:
//!
//! ```
//! use page_navigator::NavigatorConfig;
//!
//! let config = NavigatorConfig::new()
//!     .scroll_capacity(50)
//!     .require_catch_all(true);
//!
//! assert_eq!(config.page_key, "page");
//! assert!(config.validate().is_ok());
//! ```
//!
//! The configuration is validated once, when the navigator is built.

use crate::error::NavigationError;
use std::num::NonZeroUsize;

/// Default name of the parameter holding the page number.
pub const DEFAULT_PAGE_KEY: &str = "page";

/// Default name of the capture holding the encoded parameter blob.
pub const DEFAULT_PARAMETERS_KEY: &str = "parameters";

/// Engine tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Parameter carrying the 1-based page number.
    pub page_key: String,

    /// Capture decoded by [`ParseParameters`](crate::ParseParameters) and by
    /// in-place navigations.
    pub parameters_key: String,

    /// How many URLs the scroll store remembers.
    pub scroll_capacity: usize,

    /// Redirects allowed in a row before the navigation fails.
    pub max_redirect_depth: usize,

    /// Refuse to build a navigator without a catch-all route.
    pub require_catch_all: bool,

    /// Restore scroll on back/forward and reset it otherwise.
    pub restore_scroll: bool,

    /// Capacity of the URL resolution cache.
    #[cfg(feature = "cache")]
    pub cache_capacity: usize,
}

impl NavigatorConfig {
    /// Configuration with every default applied.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_key(mut self, key: impl Into<String>) -> Self {
        self.page_key = key.into();
        self
    }

    pub fn parameters_key(mut self, key: impl Into<String>) -> Self {
        self.parameters_key = key.into();
        self
    }

    pub fn scroll_capacity(mut self, capacity: usize) -> Self {
        self.scroll_capacity = capacity;
        self
    }

    pub fn max_redirect_depth(mut self, depth: usize) -> Self {
        self.max_redirect_depth = depth;
        self
    }

    pub fn require_catch_all(mut self, require: bool) -> Self {
        self.require_catch_all = require;
        self
    }

    pub fn restore_scroll(mut self, restore: bool) -> Self {
        self.restore_scroll = restore;
        self
    }

    #[cfg(feature = "cache")]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Check every value, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), NavigationError> {
        if self.page_key.is_empty() {
            return Err(invalid("page_key must not be empty"));
        }
        if self.parameters_key.is_empty() {
            return Err(invalid("parameters_key must not be empty"));
        }
        if self.scroll_capacity == 0 {
            return Err(invalid("scroll_capacity must be at least 1"));
        }
        if self.max_redirect_depth == 0 {
            return Err(invalid("max_redirect_depth must be at least 1"));
        }
        #[cfg(feature = "cache")]
        if self.cache_capacity == 0 {
            return Err(invalid("cache_capacity must be at least 1"));
        }
        Ok(())
    }

    pub(crate) fn scroll_capacity_nonzero(&self) -> Result<NonZeroUsize, NavigationError> {
        NonZeroUsize::new(self.scroll_capacity)
            .ok_or_else(|| invalid("scroll_capacity must be at least 1"))
    }

    #[cfg(feature = "cache")]
    pub(crate) fn cache_capacity_nonzero(&self) -> Result<NonZeroUsize, NavigationError> {
        NonZeroUsize::new(self.cache_capacity)
            .ok_or_else(|| invalid("cache_capacity must be at least 1"))
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            page_key: DEFAULT_PAGE_KEY.to_string(),
            parameters_key: DEFAULT_PARAMETERS_KEY.to_string(),
            scroll_capacity: 100,
            max_redirect_depth: 5,
            require_catch_all: false,
            restore_scroll: true,
            #[cfg(feature = "cache")]
            cache_capacity: 256,
        }
    }
}

fn invalid(message: &str) -> NavigationError {
    NavigationError::InvalidConfig {
        message: message.to_string(),
    }
}
