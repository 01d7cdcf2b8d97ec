//! The login form.

use std::time::Duration;

use crate::browser::Page;
use crate::locator::{Locator, Selector};
use crate::page_object::PageObject;
use crate::result::{ComprarError, ComprarResult};

const USERNAME: &str = "#user-name";
const PASSWORD: &str = "#password";
const LOGIN_BTN: &str = "#login-button";
// the banner carries a data-test attribute rather than an id
const ERROR_BANNER: &str = "error";

/// Page object for the login form
#[derive(Debug, Clone)]
pub struct LoginPage {
    page: Page,
    base_url: String,
}

impl LoginPage {
    /// Wrap a page plus the storefront base URL
    #[must_use]
    pub fn new(page: Page, base_url: impl Into<String>) -> Self {
        Self {
            page,
            base_url: base_url.into(),
        }
    }

    /// Navigate to the storefront and wait for the form
    pub async fn load(&self) -> ComprarResult<&Self> {
        self.page.goto(&self.base_url).await?;
        self.page
            .wait_visible(&Locator::from_selector(Selector::css(USERNAME)))
            .await?;
        Ok(self)
    }

    /// Whether the login form is visible and ready
    pub async fn is_loaded(&self) -> bool {
        let visible = |css: &str| {
            Locator::from_selector(Selector::css(css)).with_timeout(Duration::from_secs(10))
        };
        self.page.wait_visible(&visible(USERNAME)).await.is_ok()
            && self.page.wait_visible(&visible(PASSWORD)).await.is_ok()
            && self
                .page
                .wait_present(&visible(LOGIN_BTN).with_visible(false))
                .await
                .is_ok()
    }

    /// Fill credentials and submit
    pub async fn login(&self, username: &str, password: &str) -> ComprarResult<()> {
        tracing::info!(username, "logging in");
        let user_field = self
            .page
            .wait_visible(&Locator::from_selector(Selector::css(USERNAME)))
            .await?;
        user_field.clear_and_type(username).await?;

        let password_field = self.page.find(&Selector::css(PASSWORD)).await?;
        password_field.clear_and_type(password).await?;

        self.page.find(&Selector::css(LOGIN_BTN)).await?.click().await
    }

    /// Text of the error banner; empty if none appears
    pub async fn error_text(&self) -> ComprarResult<String> {
        let locator = Locator::from_selector(Selector::test_id(ERROR_BANNER))
            .with_timeout(Duration::from_secs(10));
        match self.page.wait_visible(&locator).await {
            Ok(banner) => banner.text().await,
            Err(ComprarError::Timeout { .. }) => Ok(String::new()),
            Err(err) => Err(err),
        }
    }

    /// Submit credentials expected to be rejected; returns the banner text
    pub async fn login_expect_error(&self, username: &str, password: &str) -> ComprarResult<String> {
        self.login(username, password).await?;
        self.error_text().await
    }
}

impl PageObject for LoginPage {
    fn url_fragment(&self) -> &str {
        // the login form lives at the site root
        ""
    }
}
