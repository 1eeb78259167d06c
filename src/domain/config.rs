use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Test environment host.
pub const QA_GATEWAY_URL: &str = "https://gatewayt.moneris.com";
/// Production host.
pub const PROD_GATEWAY_URL: &str = "https://gateway.moneris.com";
/// Request endpoint, relative to the gateway host.
pub const REQUEST_PATH: &str = "/chktv2/request/request.php";

/// Longest dynamic descriptor the provider accepts.
pub const DYNAMIC_DESCRIPTOR_MAX_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Qa,
    Prod,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Qa => "qa",
            Mode::Prod => "prod",
        }
    }

    pub fn gateway_url(&self) -> &'static str {
        match self {
            Mode::Qa => QA_GATEWAY_URL,
            Mode::Prod => PROD_GATEWAY_URL,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merchant account country.
///
/// Carried for the host's settings form only. No request depends on it, the
/// endpoint is selected by [`Mode`] alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CountryCode {
    #[default]
    #[serde(rename = "CA")]
    Canada,
    #[serde(rename = "US")]
    UnitedStates,
}

/// How the merchant-facing order number sent to the provider is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderNumberStrategy {
    /// The order id, unchanged.
    #[default]
    OrderId,
    /// `{order id}-{request timestamp}`, distinct for every attempt.
    OrderIdTimestamp,
    /// The order's own number, generated early when missing.
    OrderNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiLogging {
    pub request: bool,
    pub response: bool,
}

impl Default for ApiLogging {
    fn default() -> Self {
        Self {
            request: true,
            response: true,
        }
    }
}

/// Merchant configuration for one gateway instance.
///
/// Loaded once and shared read-only by the gateway client, the payload
/// builder and the reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfiguration {
    /// Identifier written onto created payments.
    pub gateway_id: String,
    pub display_label: String,
    pub store_id: String,
    pub api_token: String,
    pub checkout_id: String,
    pub mode: Mode,
    /// Not read by the gateway, see [`CountryCode`].
    pub country_code: CountryCode,
    pub order_number_strategy: OrderNumberStrategy,
    pub api_logging: ApiLogging,
    /// Site name, source of the dynamic descriptor.
    pub site_name: String,
    /// Overrides the mode-selected host, e.g. for a sandbox.
    pub gateway_url: Option<Url>,
}

impl Default for GatewayConfiguration {
    fn default() -> Self {
        Self {
            gateway_id: "moneris_checkout".to_string(),
            display_label: "Moneris Checkout".to_string(),
            store_id: String::new(),
            api_token: String::new(),
            checkout_id: String::new(),
            mode: Mode::default(),
            country_code: CountryCode::default(),
            order_number_strategy: OrderNumberStrategy::default(),
            api_logging: ApiLogging::default(),
            site_name: String::new(),
            gateway_url: None,
        }
    }
}

impl GatewayConfiguration {
    /// Checks the fields the provider cannot work without.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("store_id", &self.store_id),
            ("api_token", &self.api_token),
            ("checkout_id", &self.checkout_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(PaymentError::ValidationError(format!(
                    "{name} must be configured"
                )));
            }
        }
        Ok(())
    }

    /// Full request URL, selected by mode unless overridden.
    pub fn request_url(&self) -> String {
        let base = match &self.gateway_url {
            Some(url) => url.as_str().trim_end_matches('/').to_string(),
            None => self.mode.gateway_url().to_string(),
        };
        format!("{base}{REQUEST_PATH}")
    }

    /// Site name cut to the provider's descriptor limit.
    pub fn dynamic_descriptor(&self) -> String {
        self.site_name
            .chars()
            .take(DYNAMIC_DESCRIPTOR_MAX_LEN)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> GatewayConfiguration {
        GatewayConfiguration {
            store_id: "monca07553".to_string(),
            api_token: "QAZhHds8RGFZFCGb4euC".to_string(),
            checkout_id: "chktSQJ3U07553".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfiguration::default();
        assert_eq!(config.mode, Mode::Qa);
        assert_eq!(config.country_code, CountryCode::Canada);
        assert_eq!(config.order_number_strategy, OrderNumberStrategy::OrderId);
        assert!(config.api_logging.request && config.api_logging.response);
    }

    #[test]
    fn test_request_url_by_mode() {
        let mut config = configured();
        assert_eq!(
            config.request_url(),
            "https://gatewayt.moneris.com/chktv2/request/request.php"
        );
        config.mode = Mode::Prod;
        assert_eq!(
            config.request_url(),
            "https://gateway.moneris.com/chktv2/request/request.php"
        );
    }

    #[test]
    fn test_request_url_override() {
        let mut config = configured();
        config.gateway_url = Some(Url::parse("http://127.0.0.1:9000/").unwrap());
        assert_eq!(
            config.request_url(),
            "http://127.0.0.1:9000/chktv2/request/request.php"
        );
    }

    #[test]
    fn test_validate_requires_credentials() {
        assert!(configured().validate().is_ok());

        let mut config = configured();
        config.api_token = " ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("api_token"));
    }

    #[test]
    fn test_dynamic_descriptor_is_truncated() {
        let mut config = configured();
        config.site_name = "The Very Long Name Of A Store".to_string();
        assert_eq!(config.dynamic_descriptor(), "The Very Long Name O");
        assert_eq!(config.dynamic_descriptor().chars().count(), 20);

        config.site_name = "Shop".to_string();
        assert_eq!(config.dynamic_descriptor(), "Shop");
    }

    #[test]
    fn test_deserialize_partial_configuration() {
        let json = r#"{
            "store_id": "s",
            "api_token": "t",
            "checkout_id": "c",
            "mode": "prod",
            "country_code": "US",
            "order_number_strategy": "order_id_timestamp",
            "api_logging": {"request": false}
        }"#;
        let config: GatewayConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(config.mode, Mode::Prod);
        assert_eq!(config.country_code, CountryCode::UnitedStates);
        assert_eq!(
            config.order_number_strategy,
            OrderNumberStrategy::OrderIdTimestamp
        );
        assert!(!config.api_logging.request);
        assert!(config.api_logging.response);
        assert_eq!(config.display_label, "Moneris Checkout");
    }

    #[test]
    fn test_country_does_not_select_endpoint() {
        let mut config = configured();
        assert_eq!(config.country_code, CountryCode::Canada);
        let canada = config.request_url();

        config.country_code = CountryCode::UnitedStates;
        assert_eq!(config.request_url(), canada);
        assert!(config.validate().is_ok());
    }
}
