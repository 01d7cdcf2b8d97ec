//! The three-step checkout: information form, overview, confirmation.

use crate::browser::Page;
use crate::locator::{Locator, Selector};
use crate::model::{parse_labeled_amount, Product};
use crate::page_object::PageObject;
use crate::result::ComprarResult;
use crate::wait::wait_until;

const FIRST_NAME: &str = "#first-name";
const LAST_NAME: &str = "#last-name";
const POSTAL: &str = "#postal-code";
const CONTINUE: &str = "#continue";
const OVERVIEW_ITEM: &str = ".cart_item";
const ITEM_NAME: &str = ".inventory_item_name";
const ITEM_PRICE: &str = ".inventory_item_price";
const SUMMARY_SUBTOTAL: &str = ".summary_subtotal_label";
const SUMMARY_TAX: &str = ".summary_tax_label";
const SUMMARY_TOTAL: &str = ".summary_total_label";
const FINISH: &str = "#finish";
const COMPLETE_HEADER: &str = "h2.complete-header";
const BACK_HOME: &str = "#back-to-products";

/// The three labeled amounts on the overview step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryTotals {
    /// "Item total: $X" before tax
    pub item_total: f64,
    /// "Tax: $X"
    pub tax: f64,
    /// "Total: $X" after tax
    pub total: f64,
}

impl SummaryTotals {
    /// Whether total equals item total plus tax, to the cent
    #[must_use]
    pub fn consistent(&self) -> bool {
        (self.item_total + self.tax - self.total).abs() < 0.005
    }
}

/// Page object for all three checkout steps
#[derive(Debug, Clone)]
pub struct CheckoutPage {
    page: Page,
}

impl CheckoutPage {
    /// Wrap a page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// Fill the information form and continue to the overview
    pub async fn fill_info_and_continue(
        &self,
        first_name: &str,
        last_name: &str,
        postal_code: &str,
    ) -> ComprarResult<()> {
        tracing::info!(first_name, last_name, "filling checkout information");
        let first = self
            .page
            .wait_visible(&Locator::from_selector(Selector::css(FIRST_NAME)))
            .await?;
        first.clear_and_type(first_name).await?;
        self.page
            .find(&Selector::css(LAST_NAME))
            .await?
            .clear_and_type(last_name)
            .await?;
        self.page
            .find(&Selector::css(POSTAL))
            .await?
            .clear_and_type(postal_code)
            .await?;
        self.page
            .click_with_retry(&Locator::from_selector(Selector::css(CONTINUE)), 2)
            .await
    }

    /// Whether the overview step is on screen
    pub async fn is_overview_loaded(&self) -> bool {
        let page = &self.page;
        let heading = Selector::css("span.title").with_text("Checkout: Overview");
        wait_until("checkout overview heading", 10_000, || {
            let heading = &heading;
            async move { Ok(page.query_count(heading).await? > 0) }
        })
        .await
        .is_ok()
    }

    /// Products shown on the overview step
    pub async fn overview_items(&self) -> ComprarResult<Vec<Product>> {
        let rows = self.page.find_all(&Selector::css(OVERVIEW_ITEM)).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let name = row.find(ITEM_NAME).await?.text().await?;
            let price_text = row.find(ITEM_PRICE).await?.text().await?;
            items.push(Product::from_ui(name, price_text)?);
        }
        Ok(items)
    }

    /// Parse the three summary amounts from the overview
    pub async fn summary_totals(&self) -> ComprarResult<SummaryTotals> {
        let amount = |css: &'static str| async move {
            let text = self
                .page
                .wait_visible(&Locator::from_selector(Selector::css(css)))
                .await?
                .text()
                .await?;
            parse_labeled_amount(&text)
        };
        Ok(SummaryTotals {
            item_total: amount(SUMMARY_SUBTOTAL).await?,
            tax: amount(SUMMARY_TAX).await?,
            total: amount(SUMMARY_TOTAL).await?,
        })
    }

    /// Place the order
    pub async fn finish(&self) -> ComprarResult<()> {
        self.page
            .click_with_retry(&Locator::from_selector(Selector::css(FINISH)), 2)
            .await
    }

    /// The confirmation header text ("Thank you for your order!")
    pub async fn confirmation_message(&self) -> ComprarResult<String> {
        self.page
            .wait_visible(&Locator::from_selector(Selector::css(COMPLETE_HEADER)))
            .await?
            .text()
            .await
    }

    /// Return to the product listing from the confirmation step
    pub async fn back_home(&self) -> ComprarResult<()> {
        self.page
            .click_with_retry(&Locator::from_selector(Selector::css(BACK_HOME)), 2)
            .await
    }
}

impl PageObject for CheckoutPage {
    fn url_fragment(&self) -> &str {
        "checkout-step-one.html"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_consistent() {
        let totals = SummaryTotals {
            item_total: 49.98,
            tax: 4.0,
            total: 53.98,
        };
        assert!(totals.consistent());
    }

    #[test]
    fn test_totals_inconsistent() {
        let totals = SummaryTotals {
            item_total: 49.98,
            tax: 4.0,
            total: 55.00,
        };
        assert!(!totals.consistent());
    }
}
