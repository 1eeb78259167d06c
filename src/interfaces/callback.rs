use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Query parameters of an inbound return or cancel callback.
///
/// These come from a browser redirect and are advisory only. Empty values
/// are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackParams {
    pub ticket: Option<String>,
    pub response_code: Option<String>,
    pub response_state: Option<String>,
}

/// The three fields a return callback must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnFields<'a> {
    pub ticket: &'a str,
    pub response_code: &'a str,
    pub response_state: &'a str,
}

impl CallbackParams {
    /// Parses a raw query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = Some(value.into_owned()).filter(|v| !v.is_empty());
            match key.as_ref() {
                "ticket" => params.ticket = value,
                "response_code" => params.response_code = value,
                "response_state" => params.response_state = value,
                _ => {}
            }
        }
        params
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }

    pub fn ticket(&self) -> Option<&str> {
        non_empty(&self.ticket)
    }

    pub fn response_code(&self) -> Option<&str> {
        non_empty(&self.response_code)
    }

    pub fn response_state(&self) -> Option<&str> {
        non_empty(&self.response_state)
    }

    pub fn require_return_fields(&self) -> Result<ReturnFields<'_>> {
        match (self.ticket(), self.response_code(), self.response_state()) {
            (Some(ticket), Some(response_code), Some(response_state)) => Ok(ReturnFields {
                ticket,
                response_code,
                response_state,
            }),
            _ => Err(PaymentError::ValidationError(
                "The required response parameters are missing for this Moneris Checkout transaction."
                    .to_string(),
            )),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
