//! Login scenarios: the accepted-user matrix, the locked-out account and
//! malformed credentials.

mod common;

use comprar::page_object::PageObject;
use comprar::pages::InventoryPage;
use comprar::session::{LOCKED_OUT_USER, LOGIN_OK_USERS};

#[tokio::test(flavor = "multi_thread")]
async fn test_accepted_users_reach_inventory() {
    let Some(session) = common::e2e_session().await else {
        return;
    };

    for user in LOGIN_OK_USERS {
        let inventory = session
            .login_as(user)
            .await
            .unwrap_or_else(|e| panic!("{user} should log in: {e}"));
        assert!(
            session
                .page()
                .url_contains(inventory.url_fragment())
                .await
                .unwrap(),
            "{user} should land on the inventory"
        );
        assert!(inventory.is_loaded().await, "{user} inventory should render");

        comprar::pages::LogoutPage::new(session.page().clone())
            .logout()
            .await
            .unwrap_or_else(|e| panic!("{user} should log out: {e}"));
    }

    session.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_locked_out_user_sees_error() {
    let Some(session) = common::e2e_session().await else {
        return;
    };

    let login = session.login_page().await.unwrap();
    let banner = login
        .login_expect_error(LOCKED_OUT_USER, &session.config().password)
        .await
        .unwrap();
    assert!(
        banner.to_lowercase().contains("locked out"),
        "banner should mention the lockout, got {banner:?}"
    );
    assert!(
        !InventoryPage::new(session.page().clone()).is_loaded().await,
        "locked out user must not reach the inventory"
    );

    session.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_credentials_rejected() {
    let Some(session) = common::e2e_session().await else {
        return;
    };

    let cases = [
        ("standard_user", "wrong_password"),
        ("no_such_user", "secret_sauce"),
        ("", "secret_sauce"),
        ("standard_user", ""),
        ("' OR '1'='1", "' OR '1'='1"),
    ];

    for (username, password) in cases {
        let login = session.login_page().await.unwrap();
        let banner = login.login_expect_error(username, password).await.unwrap();
        assert!(
            !banner.is_empty(),
            "({username:?}, {password:?}) should raise an error banner"
        );
        assert!(
            banner.to_lowercase().contains("epic sadface")
                || banner.to_lowercase().contains("required")
                || banner.to_lowercase().contains("do not match"),
            "unexpected banner for ({username:?}, {password:?}): {banner:?}"
        );
    }

    session.close().await.unwrap();
}
