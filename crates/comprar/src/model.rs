//! Value records scraped off rendered UI text.
//!
//! Nothing here persists: a [`Product`] or [`CartLineItem`] is only valid
//! for the render it was read from. The single invariant is that displayed
//! price text starts with a currency symbol and parses to a positive
//! number.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::result::{ComprarError, ComprarResult};

/// A product as listed on the inventory page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Displayed product name
    pub name: String,
    /// Displayed price text (e.g. "$29.99")
    pub price_text: String,
    /// Parsed numeric price
    pub price: f64,
}

impl Product {
    /// Build a product from scraped name and price text
    pub fn from_ui(name: impl Into<String>, price_text: impl Into<String>) -> ComprarResult<Self> {
        let name = name.into();
        let price_text = price_text.into();
        let price = parse_price(&price_text)?;
        Ok(Self {
            name,
            price_text,
            price,
        })
    }
}

/// One row of the cart (or checkout overview)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Displayed product name
    pub name: String,
    /// Displayed price text
    pub price_text: String,
    /// Parsed numeric price
    pub price: f64,
    /// Displayed quantity (SauceDemo always shows 1)
    pub qty: u32,
}

impl CartLineItem {
    /// Build a line item from scraped row text
    pub fn from_ui(
        name: impl Into<String>,
        price_text: impl Into<String>,
        qty_text: &str,
    ) -> ComprarResult<Self> {
        let name = name.into();
        let price_text = price_text.into();
        let price = parse_price(&price_text)?;
        // missing/blank quantity cell means a single unit
        let qty = qty_text.trim().parse().unwrap_or(1);
        Ok(Self {
            name,
            price_text,
            price,
            qty,
        })
    }
}

/// Parse a displayed price like "$29.99" into its numeric value.
///
/// Rejects text without the leading `$` or with a non-positive amount,
/// since either means the scrape caught a mid-render state.
pub fn parse_price(text: &str) -> ComprarResult<f64> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix('$')
        .ok_or_else(|| ComprarError::UiText {
            text: text.to_string(),
            message: "expected a leading '$'".to_string(),
        })?;
    let price: f64 = digits.trim().parse().map_err(|_| ComprarError::UiText {
        text: text.to_string(),
        message: "amount did not parse as a number".to_string(),
    })?;
    if price <= 0.0 {
        return Err(ComprarError::UiText {
            text: text.to_string(),
            message: "price must be positive".to_string(),
        });
    }
    Ok(price)
}

fn amount_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\s*([0-9]+(?:\.[0-9]+)?)").expect("static regex"))
}

/// Extract the dollar amount from a summary label such as
/// "Item total: $49.98" or "Tax: $4.00".
pub fn parse_labeled_amount(text: &str) -> ComprarResult<f64> {
    amount_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| ComprarError::UiText {
            text: text.to_string(),
            message: "no '$<amount>' found in label".to_string(),
        })
}

/// The sort orders offered by the inventory dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Name A → Z
    NameAscending,
    /// Name Z → A
    NameDescending,
    /// Price low → high
    PriceAscending,
    /// Price high → low
    PriceDescending,
}

impl SortOrder {
    /// The `value` attribute of the corresponding dropdown option
    #[must_use]
    pub const fn widget_value(&self) -> &'static str {
        match self {
            Self::NameAscending => "az",
            Self::NameDescending => "za",
            Self::PriceAscending => "lohi",
            Self::PriceDescending => "hilo",
        }
    }

    /// All orders, in the dropdown's own order
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [
            Self::NameAscending,
            Self::NameDescending,
            Self::PriceAscending,
            Self::PriceDescending,
        ]
    }

    /// Whether this order sorts by price (as opposed to name)
    #[must_use]
    pub const fn is_by_price(&self) -> bool {
        matches!(self, Self::PriceAscending | Self::PriceDescending)
    }

    /// Whether this order is descending
    #[must_use]
    pub const fn is_descending(&self) -> bool {
        matches!(self, Self::NameDescending | Self::PriceDescending)
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.widget_value())
    }
}

/// Ordering predicate over adjacent pairs
fn pairwise_sorted<T: PartialOrd>(values: &[T], descending: bool) -> bool {
    values.windows(2).all(|w| {
        if descending {
            w[0] >= w[1]
        } else {
            w[0] <= w[1]
        }
    })
}

/// Check a name list against a sort order (lexicographic, as the site sorts)
#[must_use]
pub fn names_satisfy(order: SortOrder, names: &[String]) -> bool {
    !order.is_by_price() && pairwise_sorted(names, order.is_descending())
}

/// Check a price list against a sort order
#[must_use]
pub fn prices_satisfy(order: SortOrder, prices: &[f64]) -> bool {
    order.is_by_price() && pairwise_sorted(prices, order.is_descending())
}
