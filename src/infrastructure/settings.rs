use crate::domain::config::GatewayConfiguration;
use crate::error::Result;
use config::{Config, Environment, File};
use std::path::Path;

/// Environment variable prefix, e.g. `MCO__STORE_ID`.
pub const ENV_PREFIX: &str = "MCO";

/// Loads the gateway configuration.
///
/// Layers, later ones winning:
/// 1. Built-in defaults
/// 2. The given file (TOML, JSON or YAML by extension), if any
/// 3. Environment variables (`MCO__*`, nested keys separated by `__`)
///
/// The result is validated before it is returned.
pub fn load(path: Option<&Path>) -> Result<GatewayConfiguration> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let gateway: GatewayConfiguration = config.try_deserialize()?;
    gateway.validate()?;
    Ok(gateway)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{Mode, OrderNumberStrategy};
    use std::io::Write;

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
store_id = "monca07553"
api_token = "QAZhHds8RGFZFCGb4euC"
checkout_id = "chktSQJ3U07553"
mode = "prod"
order_number_strategy = "order_number"
site_name = "Maple Leaf Outfitters"

[api_logging]
request = false
"#
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.store_id, "monca07553");
        assert_eq!(config.mode, Mode::Prod);
        assert_eq!(
            config.order_number_strategy,
            OrderNumberStrategy::OrderNumber
        );
        assert!(!config.api_logging.request);
        assert!(config.api_logging.response);
        assert_eq!(config.gateway_id, "moneris_checkout");
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, r#"store_id = "s""#).unwrap();

        let err = load(Some(file.path())).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load(Some(Path::new("/nonexistent/gateway.toml"))).unwrap_err();
        assert!(matches!(err, crate::error::PaymentError::ConfigError(_)));
    }
}
