//! Browser dialog handling.
//!
//! Two distinct problems hide behind "dialog" here. Page JS dialogs
//! (alert/confirm) are first-class CDP events and get an auto-responder.
//! The Chrome password-manager prompt is NOT: it is native browser UI with
//! no DOM and no CDP event, so the only lever is a best-effort
//! Escape/Enter key sequence sent at whatever currently has focus.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType,
};
use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use futures::StreamExt;

use crate::browser::Page;
use crate::result::{ComprarError, ComprarResult};
use crate::wait::pause;

/// How the watcher answers page JS dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoDialogBehavior {
    /// Accept every dialog (OK / Leave)
    AcceptAll,
    /// Dismiss every dialog (Cancel / Stay)
    #[default]
    DismissAll,
}

/// Auto-responder for page JS dialogs (alert, confirm, prompt)
#[derive(Debug)]
pub struct DialogWatcher {
    behavior: AutoDialogBehavior,
    handled: Arc<AtomicU32>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl DialogWatcher {
    /// Attach a watcher to the page; runs until the page closes
    pub async fn attach(page: &Page, behavior: AutoDialogBehavior) -> ComprarResult<Self> {
        let mut events = page
            .cdp()
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(|e| ComprarError::Page {
                message: e.to_string(),
            })?;

        let handled = Arc::new(AtomicU32::new(0));
        let counter = handled.clone();
        let cdp = page.cdp().clone();
        let accept = matches!(behavior, AutoDialogBehavior::AcceptAll);

        let handle = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                tracing::debug!(message = %event.message, "JS dialog auto-handled");
                let params = HandleJavaScriptDialogParams::builder().accept(accept).build();
                if let Ok(params) = params {
                    let _ = cdp.execute(params).await;
                }
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        Ok(Self {
            behavior,
            handled,
            handle,
        })
    }

    /// The configured behavior
    #[must_use]
    pub const fn behavior(&self) -> AutoDialogBehavior {
        self.behavior
    }

    /// How many dialogs have been answered so far
    #[must_use]
    pub fn handled(&self) -> u32 {
        self.handled.load(Ordering::SeqCst)
    }
}

/// Options for the native prompt dismissal sequence
#[derive(Debug, Clone)]
pub struct PromptDismissOptions {
    /// Escape+Enter rounds to send
    pub rounds: u32,
    /// Pause between key presses, in milliseconds
    pub pause_ms: u64,
    /// Save before/after screenshots under this tag
    pub screenshot_tag: Option<String>,
}

impl Default for PromptDismissOptions {
    fn default() -> Self {
        Self {
            rounds: 2,
            pause_ms: 150,
            screenshot_tag: None,
        }
    }
}

impl PromptDismissOptions {
    /// Create options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of rounds
    #[must_use]
    pub const fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Tag before/after screenshots for debugging
    #[must_use]
    pub fn with_screenshot_tag(mut self, tag: impl Into<String>) -> Self {
        self.screenshot_tag = Some(tag.into());
        self
    }
}

/// Best-effort dismissal of a native (non-DOM) browser prompt.
///
/// Sends Escape, Enter, Escape with short pauses. There is no way to
/// observe whether a native prompt was actually present, so this never
/// fails on account of the prompt itself; only transport errors surface.
pub async fn dismiss_native_prompt(
    page: &Page,
    options: &PromptDismissOptions,
) -> ComprarResult<()> {
    if let Some(ref tag) = options.screenshot_tag {
        let _ = page.save_screenshot(&format!("{tag}_before")).await;
    }

    // make sure key events land on this window
    let _ = page.cdp().bring_to_front().await;

    for _ in 0..options.rounds {
        press_key(page, "Escape", 27).await?;
        pause(options.pause_ms).await;
        press_key(page, "Enter", 13).await?;
        pause(options.pause_ms).await;
    }
    press_key(page, "Escape", 27).await?;

    if let Some(ref tag) = options.screenshot_tag {
        let _ = page.save_screenshot(&format!("{tag}_after")).await;
    }
    Ok(())
}

async fn press_key(page: &Page, key: &str, virtual_key: i64) -> ComprarResult<()> {
    for event_type in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
        let params = DispatchKeyEventParams::builder()
            .r#type(event_type)
            .key(key)
            .windows_virtual_key_code(virtual_key)
            .native_virtual_key_code(virtual_key)
            .build()
            .map_err(|e| ComprarError::Input {
                message: e.to_string(),
            })?;
        page.cdp()
            .execute(params)
            .await
            .map_err(|e| ComprarError::Input {
                message: e.to_string(),
            })?;
    }
    Ok(())
}
