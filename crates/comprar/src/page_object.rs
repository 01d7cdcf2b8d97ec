//! Page Object Model seam.
//!
//! Every page wrapper implements [`PageObject`] so tests and fixtures can
//! talk about pages generically (logging, URL checks) without caring which
//! concrete page they hold.

/// A wrapper exposing one web page's elements and actions as methods
pub trait PageObject {
    /// URL fragment that identifies this page (e.g. "inventory.html")
    fn url_fragment(&self) -> &str;

    /// Page name for logging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
