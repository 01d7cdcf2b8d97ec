//! Page objects for the storefront under test.
//!
//! Selectors in these modules mirror the site's DOM contract: element ids
//! for form controls, `data-test` attributes where the site provides them,
//! CSS classes for the product/cart cards.

mod cart;
mod checkout;
mod inventory;
mod login;
mod menu;

pub use cart::CartPage;
pub use checkout::{CheckoutPage, SummaryTotals};
pub use inventory::InventoryPage;
pub use login::LoginPage;
pub use menu::{LogoutPage, ResetPage, SideMenu};
