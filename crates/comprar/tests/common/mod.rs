//! Shared fixtures for the live-browser scenarios.

use comprar::session::Session;

/// Launch a session, or skip when live runs are not enabled.
///
/// The scenarios need a Chrome binary and network access to the storefront,
/// so they only run when `SAUCEDEMO_E2E=1` is set; otherwise the test
/// passes as a no-op.
pub async fn e2e_session() -> Option<Session> {
    if std::env::var("SAUCEDEMO_E2E").as_deref() != Ok("1") {
        eprintln!("skipping live scenario: set SAUCEDEMO_E2E=1 to enable");
        return None;
    }
    Some(
        Session::launch_from_env()
            .await
            .expect("browser should launch"),
    )
}

/// How many products the cart scenarios put in the cart
#[allow(dead_code)]
pub const PICK_COUNT: usize = 4;
