//! Comprar: an end-to-end storefront UI test suite driving Chrome over the
//! DevTools Protocol.
//!
//! The crate is a Page Object Model harness for the SauceDemo storefront.
//! Tests talk to page objects; page objects talk to a [`browser::Page`]
//! wrapper that folds explicit waits and retry-tolerant clicks into every
//! interaction.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ tests/                                                  │
//! │   login, cart, sorting, checkout, session scenarios     │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │ session::Session                                        │
//! │   launch, login fixtures, seeded product picks          │
//! └───────┬─────────────────────────────────────┬───────────┘
//!         │                                     │
//! ┌───────▼──────────────────┐   ┌──────────────▼───────────┐
//! │ pages::*                 │   │ dialog::DialogWatcher    │
//! │   Login, Inventory,      │   │   JS dialog responder,   │
//! │   Cart, Checkout, Menu   │   │   native prompt dismissal│
//! └───────┬──────────────────┘   └──────────────┬───────────┘
//!         │                                     │
//! ┌───────▼─────────────────────────────────────▼───────────┐
//! │ browser::{Browser, Page, Element}                       │
//! │   CDP launch, waits, retries, screenshots               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use comprar::config::SuiteConfig;
//! use comprar::session::Session;
//!
//! # async fn run() -> comprar::result::ComprarResult<()> {
//! let session = Session::launch(SuiteConfig::from_env()).await?;
//! let inventory = session.login_standard().await?;
//! let picks = inventory.choose_random_products(4, Some(42)).await?;
//! inventory
//!     .add_to_cart_by_names(&picks.iter().map(|p| p.name.clone()).collect::<Vec<_>>())
//!     .await?;
//! session.close().await
//! # }
//! ```

#![warn(missing_docs)]

pub mod browser;
pub mod config;
pub mod dialog;
pub mod locator;
pub mod model;
pub mod page_object;
pub mod pages;
pub mod result;
pub mod session;
pub mod wait;

pub use browser::{Browser, Element, Page};
pub use config::SuiteConfig;
pub use locator::{Locator, Selector};
pub use model::{CartLineItem, Product, SortOrder};
pub use page_object::PageObject;
pub use result::{ComprarError, ComprarResult};
pub use session::Session;
