//! Browser control over the Chrome DevTools Protocol.
//!
//! One [`Browser`] per test, launched against a throwaway profile so the
//! password manager and first-run UI never leak state between runs. The
//! [`Page`] wrapper carries the suite's synchronization helpers: explicit
//! waits for presence/visibility and the retry-tolerant click used against
//! animated overlays.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::element::Element as CdpElement;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use tokio::sync::Mutex;

use crate::config::SuiteConfig;
use crate::locator::{Locator, Selector};
use crate::result::{ComprarError, ComprarResult};
use crate::wait::{poll_until, WaitOptions};

/// Render a selector to CSS, or error for strategies that only exist as
/// injected queries (those can be counted via [`Page::query_count`] but
/// never yield an element handle).
fn css_of(selector: &Selector) -> ComprarResult<String> {
    selector.as_css().ok_or_else(|| ComprarError::Eval {
        message: format!("selector {selector} is not CSS-expressible"),
    })
}

/// Classify a failed click-with-retry run: a click that happened and kept
/// bouncing is an interception; an element that never became clickable
/// keeps its original lookup error.
fn click_failure(
    selector: &Selector,
    attempts: u32,
    click_err: Option<String>,
    wait_err: Option<ComprarError>,
) -> ComprarError {
    match (click_err, wait_err) {
        (Some(message), _) => ComprarError::ClickIntercepted {
            selector: selector.to_string(),
            attempts,
            message,
        },
        (None, Some(err)) => err,
        (None, None) => ComprarError::ElementNotFound {
            selector: selector.to_string(),
        },
    }
}

/// Chrome switches that keep a fresh profile quiet.
///
/// The password-manager kill switches matter: without them Chrome raises a
/// native breach dialog on the shared SauceDemo password, which no DOM
/// locator can reach.
fn chrome_args(profile_dir: &std::path::Path) -> Vec<String> {
    vec![
        format!("--user-data-dir={}", profile_dir.display()),
        "--incognito".to_string(),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        "--disable-features=PasswordLeakDetection,PasswordManagerOnboarding,AutofillKeychainIntegration".to_string(),
        "--disable-notifications".to_string(),
        "--disable-extensions".to_string(),
    ]
}

/// A running browser session
#[derive(Debug)]
pub struct Browser {
    config: SuiteConfig,
    inner: Arc<Mutex<CdpBrowser>>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
    // dropped (and deleted) with the session
    #[allow(dead_code)]
    profile_dir: tempfile::TempDir,
}

impl Browser {
    /// Launch a browser for the given suite configuration
    pub async fn launch(config: SuiteConfig) -> ComprarResult<Self> {
        let profile_dir = tempfile::Builder::new()
            .prefix("comprar-profile-")
            .tempdir()?;

        let mut builder = CdpConfig::builder()
            .window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }
        for arg in chrome_args(profile_dir.path()) {
            builder = builder.arg(arg);
        }

        // executable auto-detection happens at build time
        let cdp_config = builder.build().map_err(|message| {
            if message.contains("auto detect") {
                ComprarError::BrowserNotFound
            } else {
                ComprarError::BrowserLaunch { message }
            }
        })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config).await.map_err(|e| {
                let message = e.to_string();
                if message.contains("auto detect") || message.contains("No such file") {
                    ComprarError::BrowserNotFound
                } else {
                    ComprarError::BrowserLaunch { message }
                }
            })?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        tracing::debug!(headless = config.headless, "browser launched");

        Ok(Self {
            config,
            inner: Arc::new(Mutex::new(browser)),
            handle,
            profile_dir,
        })
    }

    /// Open a new blank page
    pub async fn new_page(&self) -> ComprarResult<Page> {
        let browser = self.inner.lock().await;
        let cdp_page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ComprarError::Page {
                message: e.to_string(),
            })?;

        Ok(Page {
            inner: cdp_page,
            artifacts_dir: self.config.artifacts_dir.clone(),
            default_timeout: self.config.default_timeout(),
        })
    }

    /// Get the suite configuration
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Close the browser
    pub async fn close(self) -> ComprarResult<()> {
        let mut browser = self.inner.lock().await;
        browser
            .close()
            .await
            .map_err(|e| ComprarError::BrowserLaunch {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

/// A browser page plus the suite's synchronization helpers
#[derive(Debug, Clone)]
pub struct Page {
    inner: CdpPage,
    artifacts_dir: PathBuf,
    default_timeout: Duration,
}

impl Page {
    /// The underlying CDP page, for protocol-level commands
    pub(crate) const fn cdp(&self) -> &CdpPage {
        &self.inner
    }

    /// Default wait deadline for this page
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Navigate and wait for the load event
    pub async fn goto(&self, url: &str) -> ComprarResult<()> {
        self.inner
            .goto(url)
            .await
            .map_err(|e| ComprarError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        self.inner
            .wait_for_navigation()
            .await
            .map_err(|e| ComprarError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Current URL, or empty if the page has none yet
    pub async fn current_url(&self) -> ComprarResult<String> {
        self.inner
            .url()
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| ComprarError::Page {
                message: e.to_string(),
            })
    }

    /// Whether the current URL contains the fragment
    pub async fn url_contains(&self, fragment: &str) -> ComprarResult<bool> {
        Ok(self.current_url().await?.contains(fragment))
    }

    /// Evaluate a JavaScript expression and deserialize the result
    pub async fn evaluate<T: serde::de::DeserializeOwned>(&self, expr: &str) -> ComprarResult<T> {
        let result = self
            .inner
            .evaluate(expr)
            .await
            .map_err(|e| ComprarError::Eval {
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| ComprarError::Eval {
            message: e.to_string(),
        })
    }

    /// Count elements matching a selector, without taking handles
    pub async fn query_count(&self, selector: &Selector) -> ComprarResult<u32> {
        self.evaluate(&selector.to_count_query()).await
    }

    /// Find a single element right now (no waiting)
    pub async fn find(&self, selector: &Selector) -> ComprarResult<Element> {
        let css = css_of(selector)?;
        let element = self
            .inner
            .find_element(&css)
            .await
            .map_err(|_| ComprarError::ElementNotFound {
                selector: css.clone(),
            })?;
        Ok(Element {
            inner: element,
            selector: css,
        })
    }

    /// Find all elements matching a selector right now
    pub async fn find_all(&self, selector: &Selector) -> ComprarResult<Vec<Element>> {
        let css = css_of(selector)?;
        let elements = self
            .inner
            .find_elements(&css)
            .await
            .map_err(|e| ComprarError::Page {
                message: e.to_string(),
            })?;
        Ok(elements
            .into_iter()
            .map(|inner| Element {
                inner,
                selector: css.clone(),
            })
            .collect())
    }

    /// Wait until the element is present in the DOM.
    ///
    /// Fails fast for selectors that cannot yield an element handle
    /// instead of polling a lookup that can never succeed.
    pub async fn wait_present(&self, locator: &Locator) -> ComprarResult<Element> {
        css_of(locator.selector())?;
        let options = WaitOptions::new()
            .with_timeout(locator.options().timeout.as_millis() as u64)
            .with_poll_interval(locator.options().poll_interval.as_millis() as u64);
        let selector = locator.selector();
        poll_until(&format!("{selector} present"), options, || {
            let page = self;
            async move { Ok(page.find(selector).await.is_ok()) }
        })
        .await?;
        self.find(locator.selector()).await
    }

    /// Wait until the element is present and visibly rendered
    pub async fn wait_visible(&self, locator: &Locator) -> ComprarResult<Element> {
        css_of(locator.selector())?;
        if !locator.options().visible {
            return self.wait_present(locator).await;
        }
        let options = WaitOptions::new()
            .with_timeout(locator.options().timeout.as_millis() as u64)
            .with_poll_interval(locator.options().poll_interval.as_millis() as u64);
        let selector = locator.selector();
        poll_until(&format!("{selector} visible"), options, || {
            let page = self;
            async move {
                match page.find(selector).await {
                    Ok(element) => element.is_displayed().await,
                    Err(_) => Ok(false),
                }
            }
        })
        .await?;
        self.find(locator.selector()).await
    }

    /// Wait until no element matches the selector
    pub async fn wait_gone(&self, locator: &Locator) -> ComprarResult<()> {
        let options = WaitOptions::new()
            .with_timeout(locator.options().timeout.as_millis() as u64)
            .with_poll_interval(locator.options().poll_interval.as_millis() as u64);
        let selector = locator.selector();
        poll_until(&format!("{selector} gone"), options, || {
            let page = self;
            async move { Ok(page.query_count(selector).await? == 0) }
        })
        .await?;
        Ok(())
    }

    /// Click with a fixed number of retries.
    ///
    /// Each attempt waits for visibility, scrolls the element into view and
    /// clicks. The final attempt falls back to a JavaScript click, which
    /// bypasses whatever overlay intercepted the pointer.
    pub async fn click_with_retry(&self, locator: &Locator, attempts: u32) -> ComprarResult<()> {
        let mut click_err: Option<String> = None;
        let mut wait_err: Option<ComprarError> = None;
        for attempt in 1..=attempts {
            match self.wait_visible(locator).await {
                Ok(element) => {
                    let _ = element.scroll_into_view().await;
                    match element.click().await {
                        Ok(()) => return Ok(()),
                        Err(err) => click_err = Some(err.to_string()),
                    }
                    if attempt == attempts && element.js_click().await.is_ok() {
                        tracing::debug!(selector = %locator.selector(), "fell back to JS click");
                        return Ok(());
                    }
                }
                Err(err) => wait_err = Some(err),
            }
            tracing::trace!(selector = %locator.selector(), attempt, "click retry");
        }
        Err(click_failure(
            locator.selector(),
            attempts,
            click_err,
            wait_err,
        ))
    }

    /// Click the element if it shows up within the deadline; report whether
    /// a click happened
    pub async fn click_if_present(&self, locator: &Locator) -> ComprarResult<bool> {
        match self.wait_visible(locator).await {
            Ok(element) => {
                element.click().await?;
                Ok(true)
            }
            Err(ComprarError::Timeout { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Capture a PNG screenshot
    pub async fn screenshot(&self) -> ComprarResult<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let screenshot =
            self.inner
                .execute(params)
                .await
                .map_err(|e| ComprarError::Screenshot {
                    message: e.to_string(),
                })?;

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(|e| ComprarError::Screenshot {
                message: e.to_string(),
            })
    }

    /// Save a screenshot under the artifacts directory; returns the path
    pub async fn save_screenshot(&self, tag: &str) -> ComprarResult<PathBuf> {
        let bytes = self.screenshot().await?;
        tokio::fs::create_dir_all(&self.artifacts_dir).await?;
        let path = self.artifacts_dir.join(format!("{tag}.png"));
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), "screenshot saved");
        Ok(path)
    }
}

/// A handle to a located DOM element
#[derive(Debug)]
pub struct Element {
    inner: CdpElement,
    selector: String,
}

impl Element {
    /// The selector this element was found with
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Click via synthesized pointer input
    pub async fn click(&self) -> ComprarResult<()> {
        self.inner.click().await.map_err(|e| ComprarError::Input {
            message: format!("click on {}: {e}", self.selector),
        })?;
        Ok(())
    }

    /// Click via JavaScript, sidestepping pointer interception
    pub async fn js_click(&self) -> ComprarResult<()> {
        self.call_js("function() { this.click(); }").await?;
        Ok(())
    }

    /// Type text into the element
    pub async fn type_str(&self, text: &str) -> ComprarResult<()> {
        self.inner
            .type_str(text)
            .await
            .map_err(|e| ComprarError::Input {
                message: format!("type into {}: {e}", self.selector),
            })?;
        Ok(())
    }

    /// Clear the element's value and type fresh text
    pub async fn clear_and_type(&self, text: &str) -> ComprarResult<()> {
        self.focus().await?;
        self.call_js("function() { this.value = ''; }").await?;
        self.type_str(text).await
    }

    /// Focus the element
    pub async fn focus(&self) -> ComprarResult<()> {
        self.inner.focus().await.map_err(|e| ComprarError::Input {
            message: format!("focus {}: {e}", self.selector),
        })?;
        Ok(())
    }

    /// Scroll the element into view
    pub async fn scroll_into_view(&self) -> ComprarResult<()> {
        self.inner
            .scroll_into_view()
            .await
            .map_err(|e| ComprarError::Input {
                message: format!("scroll to {}: {e}", self.selector),
            })?;
        Ok(())
    }

    /// Trimmed text content, empty if the node has none
    pub async fn text(&self) -> ComprarResult<String> {
        let text = self
            .inner
            .inner_text()
            .await
            .map_err(|e| ComprarError::Page {
                message: e.to_string(),
            })?;
        Ok(text.unwrap_or_default().trim().to_string())
    }

    /// Read an attribute
    pub async fn attribute(&self, name: &str) -> ComprarResult<Option<String>> {
        self.inner
            .attribute(name)
            .await
            .map_err(|e| ComprarError::Page {
                message: e.to_string(),
            })
    }

    /// Read a computed style property (e.g. "display")
    pub async fn computed_style(&self, property: &str) -> ComprarResult<String> {
        let value = self
            .call_js(&format!(
                "function() {{ return window.getComputedStyle(this)[{property:?}]; }}"
            ))
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Whether the element is visibly rendered: non-zero box, not
    /// `display:none` or `visibility:hidden`
    pub async fn is_displayed(&self) -> ComprarResult<bool> {
        let value = self
            .call_js(
                "function() { \
                    const r = this.getBoundingClientRect(); \
                    const s = window.getComputedStyle(this); \
                    return r.width > 0 && r.height > 0 \
                        && s.display !== 'none' && s.visibility !== 'hidden'; \
                }",
            )
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Find a descendant element
    pub async fn find(&self, css: &str) -> ComprarResult<Element> {
        let element =
            self.inner
                .find_element(css)
                .await
                .map_err(|_| ComprarError::ElementNotFound {
                    selector: format!("{} {css}", self.selector),
                })?;
        Ok(Element {
            inner: element,
            selector: format!("{} {css}", self.selector),
        })
    }

    /// Find descendant elements
    pub async fn find_all(&self, css: &str) -> ComprarResult<Vec<Element>> {
        let elements = self
            .inner
            .find_elements(css)
            .await
            .map_err(|e| ComprarError::Page {
                message: e.to_string(),
            })?;
        Ok(elements
            .into_iter()
            .map(|inner| Element {
                inner,
                selector: format!("{} {css}", self.selector),
            })
            .collect())
    }

    async fn call_js(&self, function: &str) -> ComprarResult<serde_json::Value> {
        let ret = self
            .inner
            .call_js_fn(function, false)
            .await
            .map_err(|e| ComprarError::Eval {
                message: format!("call on {}: {e}", self.selector),
            })?;
        Ok(ret.result.value.unwrap_or(serde_json::Value::Null))
    }
}
