//! Session scenarios: cart icon availability, logout and app state reset.

mod common;

use comprar::locator::{Locator, Selector};
use comprar::pages::{InventoryPage, LoginPage, LogoutPage, ResetPage};

#[tokio::test(flavor = "multi_thread")]
async fn test_cart_icon_present_when_logged_in() {
    let Some(session) = common::e2e_session().await else {
        return;
    };

    let inventory = session.login_standard().await.unwrap();
    inventory.cart_link_visible_and_clickable().await.unwrap();

    session.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cart_icon_absent_on_login_form() {
    let Some(session) = common::e2e_session().await else {
        return;
    };

    let login = session.login_page().await.unwrap();
    assert!(login.is_loaded().await);
    assert_eq!(
        session
            .page()
            .query_count(&Selector::css(".shopping_cart_link"))
            .await
            .unwrap(),
        0,
        "the login form must not show a cart icon"
    );
    let clicked = session
        .page()
        .click_if_present(
            &Locator::new(".shopping_cart_link").with_timeout(std::time::Duration::from_secs(2)),
        )
        .await
        .unwrap();
    assert!(!clicked, "nothing to click before login");

    session.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_returns_to_login_form() {
    let Some(session) = common::e2e_session().await else {
        return;
    };

    session.login_standard().await.unwrap();
    LogoutPage::new(session.page().clone()).logout().await.unwrap();

    let login = LoginPage::new(session.page().clone(), session.config().base_url.clone());
    assert!(login.is_loaded().await, "login form should be back");
    assert!(
        !InventoryPage::new(session.page().clone()).is_loaded().await,
        "inventory must be gone after logout"
    );

    session.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_entry_absent_before_login() {
    let Some(session) = common::e2e_session().await else {
        return;
    };

    let login = session.login_page().await.unwrap();
    assert!(login.is_loaded().await);
    assert!(
        session
            .page()
            .wait_present(
                &Locator::from_selector(Selector::id("react-burger-menu-btn"))
                    .with_timeout(std::time::Duration::from_secs(2))
                    .with_visible(false)
            )
            .await
            .is_err(),
        "the burger menu must not exist before login"
    );

    session.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reset_app_state_empties_cart() {
    let Some(session) = common::e2e_session().await else {
        return;
    };

    let (inventory, picks) = session.picked_products(2).await.unwrap();
    let names: Vec<String> = picks.iter().map(|p| p.name.clone()).collect();
    inventory.add_to_cart_by_names(&names).await.unwrap();
    assert!(inventory.cart_badge_count().await.unwrap() > 0);

    ResetPage::new(session.page().clone())
        .reset_app_state()
        .await
        .unwrap();

    assert_eq!(inventory.cart_badge_count().await.unwrap(), 0);
    for name in &names {
        assert!(
            inventory.is_add_state(name).await,
            "{name} should be back to Add after reset"
        );
    }

    session.close().await.unwrap();
}
