//! The shopping cart.

use std::collections::HashMap;

use crate::browser::Page;
use crate::locator::{Locator, Selector};
use crate::model::CartLineItem;
use crate::page_object::PageObject;
use crate::result::ComprarResult;

const TITLE: &str = "span.title";
const CART_ITEM: &str = ".cart_item";
const ITEM_NAME: &str = ".inventory_item_name";
const ITEM_PRICE: &str = ".inventory_item_price";
const ITEM_QTY: &str = ".cart_quantity";
const CHECKOUT: &str = "#checkout";
const CONTINUE_SHOPPING: &str = "#continue-shopping";

/// Page object for the cart contents
#[derive(Debug, Clone)]
pub struct CartPage {
    page: Page,
}

impl CartPage {
    /// Wrap a page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// Whether the cart page is rendered with its title
    pub async fn is_loaded(&self) -> bool {
        let title = Locator::from_selector(Selector::css(TITLE));
        match self.page.wait_visible(&title).await {
            Ok(element) => element
                .text()
                .await
                .map(|t| t.eq_ignore_ascii_case("your cart"))
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// All line items currently in the cart
    pub async fn line_items(&self) -> ComprarResult<Vec<CartLineItem>> {
        let rows = self.page.find_all(&Selector::css(CART_ITEM)).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let name = row.find(ITEM_NAME).await?.text().await?;
            let price_text = row.find(ITEM_PRICE).await?.text().await?;
            let qty_text = match row.find(ITEM_QTY).await {
                Ok(qty) => qty.text().await?,
                Err(_) => String::new(),
            };
            items.push(CartLineItem::from_ui(name, price_text, &qty_text)?);
        }
        Ok(items)
    }

    /// Names of the items in the cart, in display order
    pub async fn item_names(&self) -> ComprarResult<Vec<String>> {
        Ok(self
            .line_items()
            .await?
            .into_iter()
            .map(|item| item.name)
            .collect())
    }

    /// Line items keyed by product name
    pub async fn items_by_name(&self) -> ComprarResult<HashMap<String, CartLineItem>> {
        Ok(self
            .line_items()
            .await?
            .into_iter()
            .map(|item| (item.name.clone(), item))
            .collect())
    }

    /// Whether the cart holds no items
    pub async fn is_empty(&self) -> ComprarResult<bool> {
        Ok(self.page.query_count(&Selector::css(CART_ITEM)).await? == 0)
    }

    /// Proceed to the checkout information form
    pub async fn go_to_checkout(&self) -> ComprarResult<()> {
        let locator = Locator::from_selector(Selector::css(CHECKOUT));
        self.page.click_with_retry(&locator, 2).await
    }

    /// Return to the product listing
    pub async fn continue_shopping(&self) -> ComprarResult<()> {
        let locator = Locator::from_selector(Selector::css(CONTINUE_SHOPPING));
        self.page.click_with_retry(&locator, 2).await
    }
}

impl PageObject for CartPage {
    fn url_fragment(&self) -> &str {
        "cart.html"
    }
}
