//! Result and error types for the suite.

use thiserror::Error;

/// Result type for suite operations
pub type ComprarResult<T> = Result<T, ComprarError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum ComprarError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// No element matched the selector within the deadline
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Rendered selector
        selector: String,
    },

    /// A click kept being intercepted by an overlay or animation
    #[error("Click on {selector} intercepted after {attempts} attempts: {message}")]
    ClickIntercepted {
        /// Rendered selector
        selector: String,
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        message: String,
    },

    /// Operation timed out
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the awaited condition
        waited_for: String,
    },

    /// JavaScript evaluation error
    #[error("Script evaluation failed: {message}")]
    Eval {
        /// Error message
        message: String,
    },

    /// Input dispatch error
    #[error("Input dispatch failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// A scraped UI value did not parse as expected
    #[error("Unparseable UI text {text:?}: {message}")]
    UiText {
        /// The raw text read off the page
        text: String,
        /// What was expected of it
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ComprarError {
    /// Shorthand for a timeout error
    #[must_use]
    pub fn timeout(ms: u64, waited_for: impl Into<String>) -> Self {
        Self::Timeout {
            ms,
            waited_for: waited_for.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_names_the_condition() {
        let err = ComprarError::timeout(22_000, "cart badge == 4");
        let msg = err.to_string();
        assert!(msg.contains("22000ms"));
        assert!(msg.contains("cart badge == 4"));
    }

    #[test]
    fn test_element_not_found_display() {
        let err = ComprarError::ElementNotFound {
            selector: "#login-button".to_string(),
        };
        assert_eq!(err.to_string(), "Element not found: #login-button");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ComprarError = io.into();
        assert!(matches!(err, ComprarError::Io(_)));
    }
}
