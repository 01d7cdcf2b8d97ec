//! The burger side menu and the actions that live inside it.
//!
//! Logout and "Reset App State" share the open-the-menu dance, so both
//! thin wrappers delegate to [`SideMenu`].

use std::time::Duration;

use crate::browser::Page;
use crate::dialog::{dismiss_native_prompt, PromptDismissOptions};
use crate::locator::{Locator, Selector};
use crate::page_object::PageObject;
use crate::result::ComprarResult;
use crate::wait::{poll_until, WaitOptions};

const BURGER: &str = "#react-burger-menu-btn";
const LOGOUT: &str = "#logout_sidebar_link";
const RESET: &str = "#reset_sidebar_link";
const MENU_WRAP: &str = "div.bm-menu-wrap";
const CART_BADGE: &str = ".shopping_cart_badge";

/// Shared burger-menu mechanics
#[derive(Debug, Clone)]
pub struct SideMenu {
    page: Page,
}

impl SideMenu {
    /// Wrap a page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// Whether the slide-out menu is currently showing the given entry.
    ///
    /// The menu animates via inline styles on its wrapper, so displayed
    /// geometry, inline style and computed style are all acceptable
    /// evidence; any one suffices.
    pub async fn is_entry_shown(&self, entry_css: &str) -> bool {
        let Ok(entry) = self.page.find(&Selector::css(entry_css)).await else {
            return false;
        };
        if entry.is_displayed().await.unwrap_or(false) {
            return true;
        }
        let Ok(wrap) = self.page.find(&Selector::css(MENU_WRAP)).await else {
            return false;
        };
        let inline = wrap.attribute("style").await.ok().flatten().unwrap_or_default();
        if inline.contains("display: block") {
            return true;
        }
        wrap.computed_style("display")
            .await
            .map(|d| d == "block")
            .unwrap_or(false)
    }

    /// Open the menu and wait for the entry to be usable
    pub async fn open_for(&self, entry_css: &str) -> ComprarResult<()> {
        if self.is_entry_shown(entry_css).await {
            return Ok(());
        }
        let burger = Locator::from_selector(Selector::css(BURGER))
            .with_timeout(Duration::from_secs(8));
        self.page.click_with_retry(&burger, 3).await?;

        let shown = poll_until(
            &format!("side menu entry {entry_css} shown"),
            WaitOptions::new().with_timeout(8_000),
            || {
                let this = self;
                async move { Ok(this.is_entry_shown(entry_css).await) }
            },
        )
        .await;

        if shown.is_err() {
            let _ = self.page.save_screenshot("menu_open_timeout").await;
        }
        shown.map(|_| ())
    }

    /// Click a menu entry, falling back to a JS click if intercepted
    pub async fn click_entry(&self, entry_css: &str) -> ComprarResult<()> {
        let entry = self.page.find(&Selector::css(entry_css)).await?;
        let _ = entry.scroll_into_view().await;
        if entry.click().await.is_err() {
            entry.js_click().await?;
        }
        Ok(())
    }
}

/// Logout via the side menu
#[derive(Debug, Clone)]
pub struct LogoutPage {
    page: Page,
    menu: SideMenu,
}

impl LogoutPage {
    /// Wrap a page
    #[must_use]
    pub fn new(page: Page) -> Self {
        let menu = SideMenu::new(page.clone());
        Self { page, menu }
    }

    /// Open the menu and log out; lands back on the login form
    pub async fn logout(&self) -> ComprarResult<()> {
        // a lingering password prompt steals the burger click
        let _ = dismiss_native_prompt(&self.page, &PromptDismissOptions::new()).await;
        self.menu.open_for(LOGOUT).await?;
        let _ = dismiss_native_prompt(&self.page, &PromptDismissOptions::new()).await;
        self.menu.click_entry(LOGOUT).await
    }
}

impl PageObject for LogoutPage {
    fn url_fragment(&self) -> &str {
        ""
    }
}

/// "Reset App State" via the side menu
#[derive(Debug, Clone)]
pub struct ResetPage {
    page: Page,
    menu: SideMenu,
}

impl ResetPage {
    /// Wrap a page
    #[must_use]
    pub fn new(page: Page) -> Self {
        let menu = SideMenu::new(page.clone());
        Self { page, menu }
    }

    /// Reset the app state and wait until the cart badge is gone and no
    /// product button is stuck in the Remove state
    pub async fn reset_app_state(&self) -> ComprarResult<()> {
        tracing::info!("resetting app state");
        self.menu.open_for(RESET).await?;
        self.menu.click_entry(RESET).await?;

        let page = &self.page;
        page.wait_gone(&Locator::from_selector(Selector::css(CART_BADGE)))
            .await?;

        // the reset does not always repaint the buttons; verify directly
        poll_until(
            "no Remove buttons after reset",
            WaitOptions::default(),
            || async move {
                page.evaluate(
                    "Array.from(document.querySelectorAll('button.btn_inventory'))\
                     .every(b => !b.textContent.toLowerCase().includes('remove'))",
                )
                .await
            },
        )
        .await?;
        Ok(())
    }
}

impl PageObject for ResetPage {
    fn url_fragment(&self) -> &str {
        "inventory.html"
    }
}
