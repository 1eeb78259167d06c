//! Client-side checkout session driver.
//!
//! The hosted checkout widget reports its lifecycle through four callbacks.
//! [`CheckoutSession`] turns them into an explicit state machine; every
//! terminal callback closes the widget and yields the URL the browser must
//! be sent to. That redirect is the only channel carrying the provider's
//! outcome back to the server, which re-verifies it.

use crate::domain::checkout::{ResponseState, response_code};
use crate::domain::config::Mode;
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Settings handed to the checkout page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    pub ticket: String,
    pub mode: Mode,
    #[serde(rename = "containerId")]
    pub container_id: String,
    pub return_url: Url,
    pub cancel_url: Url,
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Loaded,
    Cancelled,
    Errored,
    Completed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Cancelled | SessionState::Errored | SessionState::Completed
        )
    }
}

/// Widget lifecycle callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetCallback {
    PageLoaded,
    CancelTransaction,
    ErrorEvent,
    PaymentComplete,
}

impl WidgetCallback {
    pub const ALL: [WidgetCallback; 4] = [
        WidgetCallback::PageLoaded,
        WidgetCallback::CancelTransaction,
        WidgetCallback::ErrorEvent,
        WidgetCallback::PaymentComplete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WidgetCallback::PageLoaded => "page_loaded",
            WidgetCallback::CancelTransaction => "cancel_transaction",
            WidgetCallback::ErrorEvent => "error_event",
            WidgetCallback::PaymentComplete => "payment_complete",
        }
    }
}

/// The embedded checkout widget.
pub trait CheckoutWidget {
    fn set_mode(&mut self, mode: Mode);
    fn set_checkout_div(&mut self, container_id: &str);
    fn set_callback(&mut self, callback: WidgetCallback);
    fn start_checkout(&mut self, ticket: &str);
    fn close_checkout(&mut self, ticket: &str);
}

/// Payload delivered with every callback. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetEvent {
    #[serde(default)]
    pub ticket: Option<String>,
    #[serde(default)]
    pub response_code: Option<String>,
    #[serde(default)]
    pub response_state: Option<String>,
}

impl WidgetEvent {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug)]
pub struct CheckoutSession {
    settings: CheckoutSettings,
    state: SessionState,
}

impl CheckoutSession {
    /// A session needs a ticket; without one there is nothing to start.
    pub fn new(settings: CheckoutSettings) -> Result<Self> {
        if settings.ticket.is_empty() {
            return Err(PaymentError::ValidationError(
                "checkout settings carry no ticket".to_string(),
            ));
        }
        Ok(Self {
            settings,
            state: SessionState::Idle,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    /// Configures the widget, registers the callbacks and starts the remote
    /// checkout flow.
    pub fn start<W: CheckoutWidget>(&mut self, widget: &mut W) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(PaymentError::ValidationError(
                "checkout session already started".to_string(),
            ));
        }
        if self.settings.debug {
            debug!(settings = ?self.settings, "starting checkout session");
        }

        widget.set_mode(self.settings.mode);
        widget.set_checkout_div(&self.settings.container_id);
        for callback in WidgetCallback::ALL {
            widget.set_callback(callback);
        }
        widget.start_checkout(&self.settings.ticket);
        self.state = SessionState::Loading;
        Ok(())
    }

    /// Applies a widget callback. Returns the redirect target when the
    /// callback ends the session.
    ///
    /// Callbacks arriving after a terminal state are ignored.
    pub fn handle<W: CheckoutWidget>(
        &mut self,
        widget: &mut W,
        callback: WidgetCallback,
        raw_event: &str,
    ) -> Result<Option<Url>> {
        match self.state {
            SessionState::Idle => {
                return Err(PaymentError::ValidationError(
                    "checkout session not started".to_string(),
                ));
            }
            state if state.is_terminal() => {
                debug!(callback = callback.name(), ?state, "callback after session end ignored");
                return Ok(None);
            }
            _ => {}
        }

        let mut event = WidgetEvent::parse(raw_event)?;
        if self.settings.debug {
            debug!(callback = callback.name(), ?event, "checkout callback");
        }

        let (next, tag, target) = match callback {
            WidgetCallback::PageLoaded => {
                let loaded = event
                    .response_code
                    .as_deref()
                    .is_some_and(response_code::is_success);
                if loaded {
                    self.state = SessionState::Loaded;
                    return Ok(None);
                }
                (SessionState::Errored, ResponseState::PageLoad, &self.settings.cancel_url)
            }
            WidgetCallback::CancelTransaction => (
                SessionState::Cancelled,
                ResponseState::Cancel,
                &self.settings.cancel_url,
            ),
            WidgetCallback::ErrorEvent => (
                SessionState::Errored,
                ResponseState::Error,
                &self.settings.cancel_url,
            ),
            WidgetCallback::PaymentComplete => (
                SessionState::Completed,
                ResponseState::Complete,
                &self.settings.return_url,
            ),
        };

        event.response_state = Some(tag.as_str().to_string());
        let redirect = redirect_url(target, &event);
        widget.close_checkout(&self.settings.ticket);
        self.state = next;

        if self.settings.debug {
            debug!(%redirect, "redirecting");
        }
        Ok(Some(redirect))
    }
}

/// Appends `ticket`, `response_code` and `response_state`, in that order,
/// skipping the ones the event does not carry.
pub fn redirect_url(base: &Url, event: &WidgetEvent) -> Url {
    let mut url = base.clone();
    let fields = [
        ("ticket", &event.ticket),
        ("response_code", &event.response_code),
        ("response_state", &event.response_state),
    ];
    let present: Vec<_> = fields
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (*key, v))
        })
        .collect();
    if !present.is_empty() {
        url.query_pairs_mut().extend_pairs(present);
    }
    url
}
