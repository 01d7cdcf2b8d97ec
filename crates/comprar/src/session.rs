//! Test session fixture.
//!
//! A [`Session`] owns a freshly launched browser, one page with a dialog
//! auto-responder attached, and the suite configuration. Tests get from
//! zero to a logged-in inventory page in one call.

use std::sync::Once;

use crate::browser::{Browser, Page};
use crate::config::SuiteConfig;
use crate::dialog::{AutoDialogBehavior, DialogWatcher};
use crate::pages::{InventoryPage, LoginPage, ResetPage};
use crate::result::{ComprarError, ComprarResult};

/// The account every happy-path scenario logs in with
pub const STANDARD_USER: &str = "standard_user";
/// Account the site refuses to log in
pub const LOCKED_OUT_USER: &str = "locked_out_user";
/// Account with deliberately broken product images and buttons
pub const PROBLEM_USER: &str = "problem_user";
/// Account with artificial latency on every action
pub const PERFORMANCE_GLITCH_USER: &str = "performance_glitch_user";
/// Account that raises client-side errors on checkout
pub const ERROR_USER: &str = "error_user";
/// Account with visual layout defects
pub const VISUAL_USER: &str = "visual_user";

/// Accounts the login form accepts
pub const LOGIN_OK_USERS: &[&str] = &[
    STANDARD_USER,
    PROBLEM_USER,
    PERFORMANCE_GLITCH_USER,
    ERROR_USER,
    VISUAL_USER,
];

static LOG_INIT: Once = Once::new();

/// Install the test-run tracing subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to info for this crate.
pub fn init_test_logging() {
    LOG_INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("comprar=info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// One browser, one page, one configuration
#[derive(Debug)]
pub struct Session {
    browser: Browser,
    page: Page,
    config: SuiteConfig,
    #[allow(dead_code)]
    watcher: DialogWatcher,
}

impl Session {
    /// Launch a browser and open the working page
    pub async fn launch(config: SuiteConfig) -> ComprarResult<Self> {
        init_test_logging();
        let browser = Browser::launch(config.clone()).await?;
        let page = browser.new_page().await?;
        let watcher = DialogWatcher::attach(&page, AutoDialogBehavior::DismissAll).await?;
        Ok(Self {
            browser,
            page,
            config,
            watcher,
        })
    }

    /// Launch with configuration read from the environment
    pub async fn launch_from_env() -> ComprarResult<Self> {
        Self::launch(SuiteConfig::from_env()).await
    }

    /// The working page
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// The suite configuration
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// The login page object, loaded
    pub async fn login_page(&self) -> ComprarResult<LoginPage> {
        let login = LoginPage::new(self.page.clone(), self.config.base_url.clone());
        login.load().await?;
        Ok(login)
    }

    /// Log in as the given user with the suite password
    pub async fn login_as(&self, username: &str) -> ComprarResult<InventoryPage> {
        let login = self.login_page().await?;
        login.login(username, &self.config.password).await?;
        let inventory = InventoryPage::new(self.page.clone());
        if !inventory.is_loaded().await {
            return Err(ComprarError::UiText {
                text: login.error_text().await.unwrap_or_default(),
                message: format!("login as {username} did not reach the inventory"),
            });
        }
        Ok(inventory)
    }

    /// Log in as the standard user
    pub async fn login_standard(&self) -> ComprarResult<InventoryPage> {
        self.login_as(STANDARD_USER).await
    }

    /// Log in, reset the app state and pick k products with a fixed seed,
    /// so the same products come back run after run
    pub async fn picked_products(
        &self,
        k: usize,
    ) -> ComprarResult<(InventoryPage, Vec<crate::model::Product>)> {
        let inventory = self.login_standard().await?;
        ResetPage::new(self.page.clone()).reset_app_state().await?;
        let picks = inventory.choose_random_products(k, Some(42)).await?;
        Ok((inventory, picks))
    }

    /// Close the browser
    pub async fn close(self) -> ComprarResult<()> {
        self.browser.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_users_exclude_locked_out() {
        assert!(!LOGIN_OK_USERS.contains(&LOCKED_OUT_USER));
        assert!(LOGIN_OK_USERS.contains(&STANDARD_USER));
    }

    #[test]
    fn test_logging_init_is_idempotent() {
        init_test_logging();
        init_test_logging();
    }
}
