//! Locator abstraction for element selection.
//!
//! A [`Selector`] is a (strategy, selector) pair identifying a DOM element.
//! Most strategies render to plain CSS for CDP `DOM.querySelector`; the
//! text-filtered variant only exists as an injected JavaScript query, which
//! is how wait predicates count matches without an element handle.

use std::time::Duration;

use crate::wait::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};

/// Selector strategy for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g. ".inventory_item")
    Css(String),
    /// Element id (e.g. "login-button")
    Id(String),
    /// SauceDemo `data-test` attribute selector
    TestId(String),
    /// CSS selector filtered by text content
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text the element must contain
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Create a `data-test` attribute selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Filter by text content
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: self.as_css().unwrap_or_default(),
            text: text.into(),
        }
    }

    /// Render to a CSS selector string, when the strategy allows it.
    ///
    /// `CssWithText` has no CSS equivalent and returns `None`.
    #[must_use]
    pub fn as_css(&self) -> Option<String> {
        match self {
            Self::Css(s) => Some(s.clone()),
            Self::Id(id) => Some(format!("#{id}")),
            Self::TestId(id) => Some(format!("[data-test=\"{id}\"]")),
            Self::CssWithText { .. } => None,
        }
    }

    /// JavaScript expression that counts matching elements
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?})).length"
            ),
            other => {
                // unwrap: every non-text variant renders to CSS
                let css = other.as_css().unwrap_or_default();
                format!("document.querySelectorAll({css:?}).length")
            }
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CssWithText { css, text } => write!(f, "{css} :text({text:?})"),
            other => write!(f, "{}", other.as_css().unwrap_or_default()),
        }
    }
}

/// Options controlling how a locator is resolved
#[derive(Debug, Clone, Copy)]
pub struct LocatorOptions {
    /// Deadline for auto-waiting
    pub timeout: Duration,
    /// Polling interval for auto-waiting
    pub poll_interval: Duration,
    /// Whether the element must be visible, not merely present
    pub visible: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            visible: true,
        }
    }
}

/// A selector plus resolution options
#[derive(Debug, Clone)]
pub struct Locator {
    selector: Selector,
    options: LocatorOptions,
}

impl Locator {
    /// Create a locator with a CSS selector and default options
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            options: LocatorOptions::default(),
        }
    }

    /// Set a custom deadline
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set the visibility requirement
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.options.visible = visible;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }
}

impl From<Selector> for Locator {
    fn from(selector: Selector) -> Self {
        Self::from_selector(selector)
    }
}
