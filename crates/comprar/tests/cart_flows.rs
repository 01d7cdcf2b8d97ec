//! Cart scenarios: seeded random picks, badge counting, and line item
//! verification against what was added.

mod common;

use comprar::pages::CartPage;

#[tokio::test(flavor = "multi_thread")]
async fn test_seeded_picks_are_reproducible() {
    let Some(session) = common::e2e_session().await else {
        return;
    };

    let (inventory, first) = session.picked_products(common::PICK_COUNT).await.unwrap();
    let second = inventory
        .choose_random_products(common::PICK_COUNT, Some(42))
        .await
        .unwrap();

    assert_eq!(first.len(), common::PICK_COUNT);
    for pick in &first {
        assert!(!pick.name.is_empty());
        assert!(pick.price_text.starts_with('$'), "got {:?}", pick.price_text);
        assert!(pick.price > 0.0);
    }
    let names = |picks: &[comprar::Product]| {
        picks.iter().map(|p| p.name.clone()).collect::<Vec<_>>()
    };
    let unique: std::collections::HashSet<_> = names(&first).into_iter().collect();
    assert_eq!(unique.len(), common::PICK_COUNT, "picks must be distinct");
    assert_eq!(
        names(&first),
        names(&second),
        "the same seed should pick the same products"
    );

    session.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_picks_updates_badge() {
    let Some(session) = common::e2e_session().await else {
        return;
    };

    let (inventory, picks) = session.picked_products(common::PICK_COUNT).await.unwrap();
    let names: Vec<String> = picks.iter().map(|p| p.name.clone()).collect();

    inventory.add_to_cart_by_names(&names).await.unwrap();
    let badge = inventory
        .wait_cart_badge_equals(names.len() as u32)
        .await
        .unwrap();
    assert_eq!(badge as usize, names.len());

    for name in &names {
        assert!(
            inventory.is_remove_state(name).await,
            "{name} should show Remove after adding"
        );
    }

    session.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cart_lines_match_picks() {
    let Some(session) = common::e2e_session().await else {
        return;
    };

    let (inventory, picks) = session.picked_products(common::PICK_COUNT).await.unwrap();
    let names: Vec<String> = picks.iter().map(|p| p.name.clone()).collect();
    inventory.add_to_cart_by_names(&names).await.unwrap();
    inventory.open_cart().await.unwrap();

    let cart = CartPage::new(session.page().clone());
    assert!(cart.is_loaded().await, "cart page should render");

    let by_name = cart.items_by_name().await.unwrap();
    assert_eq!(by_name.len(), picks.len());

    let mut expected_total = 0.0;
    for pick in &picks {
        let line = by_name
            .get(&pick.name)
            .unwrap_or_else(|| panic!("{} missing from the cart", pick.name));
        assert_eq!(line.qty, 1, "{} should have quantity 1", pick.name);
        assert!(
            (line.price - pick.price).abs() < 0.005,
            "{}: listed {} but cart shows {}",
            pick.name,
            pick.price,
            line.price
        );
        expected_total += pick.price;
    }
    let cart_total: f64 = by_name.values().map(|line| line.price).sum();
    assert!((cart_total - expected_total).abs() < 0.005);

    session.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_continue_shopping_returns_to_listing() {
    let Some(session) = common::e2e_session().await else {
        return;
    };

    let (inventory, _) = session.picked_products(1).await.unwrap();
    inventory.open_cart().await.unwrap();

    let cart = CartPage::new(session.page().clone());
    assert!(cart.is_loaded().await);
    cart.continue_shopping().await.unwrap();
    assert!(inventory.is_loaded().await, "listing should be back");

    session.close().await.unwrap();
}
