//! The full purchase path: pick, add, verify the cart, check out, verify
//! the totals, place the order.

mod common;

use comprar::pages::{CartPage, CheckoutPage};

#[tokio::test(flavor = "multi_thread")]
async fn test_checkout_end_to_end() {
    let Some(session) = common::e2e_session().await else {
        return;
    };

    let (inventory, picks) = session.picked_products(common::PICK_COUNT).await.unwrap();
    let names: Vec<String> = picks.iter().map(|p| p.name.clone()).collect();
    inventory.add_to_cart_by_names(&names).await.unwrap();
    inventory.open_cart().await.unwrap();

    let cart = CartPage::new(session.page().clone());
    assert!(cart.is_loaded().await);
    assert_eq!(cart.item_names().await.unwrap().len(), picks.len());
    cart.go_to_checkout().await.unwrap();

    let checkout = CheckoutPage::new(session.page().clone());
    checkout
        .fill_info_and_continue("Ada", "Lovelace", "10178")
        .await
        .unwrap();
    assert!(checkout.is_overview_loaded().await, "overview should render");

    let overview = checkout.overview_items().await.unwrap();
    assert_eq!(overview.len(), picks.len());
    for pick in &picks {
        assert!(
            overview.iter().any(|p| p.name == pick.name),
            "{} missing from the overview",
            pick.name
        );
    }

    let totals = checkout.summary_totals().await.unwrap();
    let expected_subtotal: f64 = picks.iter().map(|p| p.price).sum();
    assert!(
        (totals.item_total - expected_subtotal).abs() < 0.005,
        "item total {} should equal sum of picks {}",
        totals.item_total,
        expected_subtotal
    );
    assert!(totals.tax > 0.0, "tax should be charged");
    assert!(totals.consistent(), "total should be item total plus tax");

    session
        .page()
        .save_screenshot("checkout_overview")
        .await
        .unwrap();

    checkout.finish().await.unwrap();
    let message = checkout.confirmation_message().await.unwrap();
    assert_eq!(message, "Thank you for your order!");

    checkout.back_home().await.unwrap();
    assert!(inventory.is_loaded().await, "back home should show the listing");
    assert_eq!(inventory.cart_badge_count().await.unwrap(), 0);

    session.close().await.unwrap();
}
