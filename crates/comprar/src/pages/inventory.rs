//! The product listing.
//!
//! The listing re-renders asynchronously after every add/remove/sort, so
//! every mutation here is paired with an explicit wait on the observable
//! outcome (badge count, button label, rendered order) rather than on the
//! click itself.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::browser::{Element, Page};
use crate::dialog::{dismiss_native_prompt, PromptDismissOptions};
use crate::locator::{Locator, Selector};
use crate::model::{Product, SortOrder};
use crate::page_object::PageObject;
use crate::result::{ComprarError, ComprarResult};
use crate::wait::{poll_until, WaitOptions};

const TITLE: &str = "span.title";
const INVENTORY_LIST: &str = "#inventory_container";
const CART_LINK: &str = ".shopping_cart_link";
const CART_BADGE: &str = ".shopping_cart_badge";
const PRODUCT_CARD: &str = ".inventory_item";
const PRODUCT_NAME: &str = ".inventory_item_name";
const PRODUCT_PRICE: &str = ".inventory_item_price";
const ITEM_BUTTON: &str = "button.btn_inventory";
const SORT_SELECT: &str = "select[data-test='product_sort_container']";
// the markup has drifted between site revisions; class selector as fallback
const SORT_SELECT_FALLBACK: &str = "select.product_sort_container";

/// Deadline for an add-to-cart to become observable (badge or button flip)
const ADD_DEADLINE_MS: u64 = 22_000;

/// Page object for the product listing
#[derive(Debug, Clone)]
pub struct InventoryPage {
    page: Page,
}

impl InventoryPage {
    /// Wrap a page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// The underlying page
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Whether the listing is rendered: title, container and at least one
    /// product card
    pub async fn is_loaded(&self) -> bool {
        let title = Locator::from_selector(Selector::css(TITLE));
        let list = Locator::from_selector(Selector::css(INVENTORY_LIST));
        if self.page.wait_visible(&title).await.is_err()
            || self.page.wait_visible(&list).await.is_err()
        {
            return false;
        }
        self.wait_products_at_least(1).await.is_ok()
    }

    async fn wait_products_at_least(&self, n: u32) -> ComprarResult<()> {
        let page = &self.page;
        let cards = Selector::css(PRODUCT_CARD);
        poll_until(
            &format!("at least {n} product cards"),
            WaitOptions::new().with_poll_interval(500),
            || {
                let cards = &cards;
                async move { Ok(page.query_count(cards).await? >= n) }
            },
        )
        .await?;
        Ok(())
    }

    /// All listed products, in the current visual order
    pub async fn products(&self) -> ComprarResult<Vec<Product>> {
        self.wait_products_at_least(1).await?;
        let cards = self.page.find_all(&Selector::css(PRODUCT_CARD)).await?;
        let mut out = Vec::with_capacity(cards.len());
        for card in &cards {
            let name = card.find(PRODUCT_NAME).await?.text().await?;
            let price_text = card.find(PRODUCT_PRICE).await?.text().await?;
            out.push(Product::from_ui(name, price_text)?);
        }
        Ok(out)
    }

    /// Product names in the current visual order
    pub async fn names_in_ui(&self) -> ComprarResult<Vec<String>> {
        Ok(self.products().await?.into_iter().map(|p| p.name).collect())
    }

    /// Parsed prices in the current visual order
    pub async fn prices_in_ui(&self) -> ComprarResult<Vec<f64>> {
        Ok(self.products().await?.into_iter().map(|p| p.price).collect())
    }

    /// Sample k products without replacement. A seed makes the selection
    /// reproducible across CI runs.
    pub async fn choose_random_products(
        &self,
        k: usize,
        seed: Option<u64>,
    ) -> ComprarResult<Vec<Product>> {
        let all = self.products().await?;
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let picks: Vec<Product> = all
            .choose_multiple(&mut rng, k.min(all.len()))
            .cloned()
            .collect();
        for pick in &picks {
            tracing::info!(name = %pick.name, price = %pick.price_text, "random pick");
        }
        Ok(picks)
    }

    /// Current cart badge count; a missing badge means an empty cart
    pub async fn cart_badge_count(&self) -> ComprarResult<u32> {
        let badges = self.page.find_all(&Selector::css(CART_BADGE)).await?;
        match badges.first() {
            Some(badge) => Ok(badge.text().await?.parse().unwrap_or(0)),
            None => Ok(0),
        }
    }

    async fn find_card_by_name(&self, name: &str) -> ComprarResult<Element> {
        let cards = self.page.find_all(&Selector::css(PRODUCT_CARD)).await?;
        for card in cards {
            // a re-render mid-scan detaches handles; skip and keep looking
            let Ok(label) = card.find(PRODUCT_NAME).await else {
                continue;
            };
            if label.text().await.unwrap_or_default() == name {
                return Ok(card);
            }
        }
        Err(ComprarError::ElementNotFound {
            selector: format!("{PRODUCT_CARD} with name {name:?}"),
        })
    }

    /// Whether the product's button is in the Remove state (item in cart)
    pub async fn is_remove_state(&self, name: &str) -> bool {
        self.button_state(name, "remove", "remove-").await
    }

    /// Whether the product's button is in the Add state (item not in cart)
    pub async fn is_add_state(&self, name: &str) -> bool {
        self.button_state(name, "add to cart", "add-to-cart-").await
    }

    async fn button_state(&self, name: &str, label: &str, id_prefix: &str) -> bool {
        let Ok(card) = self.find_card_by_name(name).await else {
            return false;
        };
        let Ok(button) = card.find(ITEM_BUTTON).await else {
            return false;
        };
        let text = button.text().await.unwrap_or_default().to_lowercase();
        let id = button
            .attribute("id")
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        text == label || id.starts_with(id_prefix)
    }

    /// Click the Add button for one product; false if it is already in the
    /// cart. Falls back to a JS click when an overlay intercepts.
    async fn click_add_for(&self, name: &str) -> ComprarResult<bool> {
        // the password-manager prompt can sit over the listing
        let _ = dismiss_native_prompt(&self.page, &PromptDismissOptions::new()).await;

        if self.is_remove_state(name).await {
            return Ok(false);
        }
        let card = self.find_card_by_name(name).await?;
        let button = card.find(ITEM_BUTTON).await?;
        let _ = button.scroll_into_view().await;
        if let Err(err) = button.click().await {
            tracing::debug!(name, %err, "add click intercepted, retrying via JS");
            let _ = dismiss_native_prompt(&self.page, &PromptDismissOptions::new()).await;
            button.js_click().await?;
        }
        Ok(true)
    }

    /// Add each named product to the cart.
    ///
    /// A click counts as landed once the badge shows the expected count OR
    /// the product's button flips to Remove; either alone can lag behind
    /// the other on a slow re-render.
    pub async fn add_to_cart_by_names(&self, names: &[String]) -> ComprarResult<()> {
        let start = self.cart_badge_count().await?;
        let mut adds_done = 0;

        for name in names {
            if self.click_add_for(name).await? {
                adds_done += 1;
            }
            let expected = start + adds_done;

            let landed = poll_until(
                &format!("{name:?} added (badge == {expected} or Remove shown)"),
                WaitOptions::new().with_timeout(ADD_DEADLINE_MS),
                || {
                    let this = self;
                    async move {
                        Ok(this.cart_badge_count().await? == expected
                            || this.is_remove_state(name).await)
                    }
                },
            )
            .await;

            if let Err(err) = landed {
                let _ = self
                    .page
                    .save_screenshot(&format!("add_timeout_{name}"))
                    .await;
                tracing::warn!(
                    name,
                    badge = self.cart_badge_count().await.unwrap_or(0),
                    expected,
                    "add to cart did not land"
                );
                return Err(err);
            }
        }
        Ok(())
    }

    /// Wait until the badge shows exactly the expected count
    pub async fn wait_cart_badge_equals(&self, expected: u32) -> ComprarResult<u32> {
        poll_until(
            &format!("cart badge == {expected}"),
            WaitOptions::new().with_timeout(15_000),
            || {
                let this = self;
                async move { Ok(this.cart_badge_count().await? == expected) }
            },
        )
        .await?;
        self.cart_badge_count().await
    }

    /// Open the cart via the header icon
    pub async fn open_cart(&self) -> ComprarResult<()> {
        let locator = Locator::from_selector(Selector::css(CART_LINK))
            .with_timeout(Duration::from_secs(5));
        self.page.click_with_retry(&locator, 2).await
    }

    /// Ensure the cart icon is visible and clickable; errors with a
    /// timeout otherwise (e.g. on the login page)
    pub async fn cart_link_visible_and_clickable(&self) -> ComprarResult<()> {
        let locator = Locator::from_selector(Selector::css(CART_LINK));
        self.page.wait_visible(&locator).await?;
        Ok(())
    }

    async fn sort_select_value(&self) -> ComprarResult<String> {
        self.page
            .evaluate(&format!(
                "(document.querySelector({SORT_SELECT:?}) \
                  || document.querySelector({SORT_SELECT_FALLBACK:?})).value"
            ))
            .await
    }

    /// Change the sort order and wait for the re-render.
    ///
    /// Done when the dropdown reflects the requested value AND the rendered
    /// order satisfies it; waiting on "order changed" alone deadlocks when
    /// the requested order is already in effect.
    pub async fn select_sort(&self, order: SortOrder) -> ComprarResult<()> {
        let value = order.widget_value();
        tracing::info!(%order, "changing sort order");
        let applied: String = self
            .page
            .evaluate(&format!(
                "(() => {{ \
                    const sel = document.querySelector({SORT_SELECT:?}) \
                             || document.querySelector({SORT_SELECT_FALLBACK:?}); \
                    sel.value = {value:?}; \
                    sel.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                    return sel.value; \
                }})()"
            ))
            .await?;
        if applied != value {
            return Err(ComprarError::UiText {
                text: applied,
                message: format!("sort widget rejected value {value:?}"),
            });
        }

        poll_until(
            &format!("listing sorted by {order}"),
            WaitOptions::default(),
            || {
                let this = self;
                async move {
                    if this.sort_select_value().await? != value {
                        return Ok(false);
                    }
                    Ok(this.order_satisfied(order).await?)
                }
            },
        )
        .await?;
        Ok(())
    }

    async fn order_satisfied(&self, order: SortOrder) -> ComprarResult<bool> {
        if order.is_by_price() {
            let prices = self.prices_in_ui().await?;
            Ok(crate::model::prices_satisfy(order, &prices))
        } else {
            let names = self.names_in_ui().await?;
            Ok(crate::model::names_satisfy(order, &names))
        }
    }
}

impl PageObject for InventoryPage {
    fn url_fragment(&self) -> &str {
        "inventory.html"
    }
}
