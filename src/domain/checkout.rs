//! Provider protocol vocabulary: response codes, response states, the JSON
//! envelope returned by the request endpoint and the receipt it carries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub mod response_code {
    pub const SUCCESS: &str = "001";
    pub const THREE_D_SECURE_FAILED: &str = "902";
    pub const INVALID_TICKET: &str = "2001";
    pub const TICKET_REUSE: &str = "2002";
    pub const TICKET_EXPIRED: &str = "2003";

    pub fn is_success(code: &str) -> bool {
        code == SUCCESS
    }

    pub fn describe(code: &str) -> Option<&'static str> {
        match code {
            SUCCESS => Some("success"),
            THREE_D_SECURE_FAILED => Some("3-D Secure failed"),
            INVALID_TICKET => Some("invalid ticket"),
            TICKET_REUSE => Some("ticket re-use"),
            TICKET_EXPIRED => Some("ticket expired"),
            _ => None,
        }
    }
}

/// Coarse lifecycle tag attached to every checkout callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseState {
    Complete,
    Cancel,
    Error,
    PageLoad,
    Other(String),
}

impl ResponseState {
    pub fn parse(value: &str) -> Self {
        match value {
            "complete" => Self::Complete,
            "cancel" => Self::Cancel,
            "error" => Self::Error,
            "page_load" => Self::PageLoad,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Complete => "complete",
            Self::Cancel => "cancel",
            Self::Error => "error",
            Self::PageLoad => "page_load",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for ResponseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action names understood by the request endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Preload,
    Receipt,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Preload => "preload",
            Action::Receipt => "receipt",
        }
    }
}

/// `{"response": {...}}` as returned for every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub response: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(default)]
    pub success: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<ReceiptEnvelope>,
}

impl ResponseBody {
    pub fn is_success(&self) -> bool {
        self.success == "true"
    }

    /// The provider error rendered for humans; objects are kept as JSON.
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(Value::String(message)) => message.clone(),
            Some(Value::Null) | None => "unknown error".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReceiptEnvelope {
    #[serde(default)]
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<Receipt>,
}

impl ReceiptEnvelope {
    pub fn is_approved(&self) -> bool {
        self.result == "a"
    }
}

/// The card receipt sub-object. Only the two fields used for reconciliation
/// are typed, the rest is kept as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Receipt {
    pub order_no: String,
    pub reference_no: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
