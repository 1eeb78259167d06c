use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// The provider answered with a non-success envelope, the receipt did not
    /// match the order, or the request never completed.
    #[error("Gateway error: {message}")]
    GatewayError {
        message: String,
        code: Option<String>,
        #[source]
        source: Option<BoxError>,
    },
    /// The receipt was fetched but the provider did not approve the transaction.
    #[error("Hard decline: {0}")]
    HardDecline(String),
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Internal error: {0}")]
    InternalError(BoxError),
}

impl PaymentError {
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::GatewayError {
            message: message.into(),
            code: None,
            source: None,
        }
    }

    pub fn gateway_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::GatewayError {
            message: message.into(),
            code: Some(code.into()),
            source: None,
        }
    }

    pub fn transport(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::GatewayError {
            message: message.into(),
            code: None,
            source: Some(source.into()),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::GatewayError { .. })
    }

    pub fn is_hard_decline(&self) -> bool {
        matches!(self, Self::HardDecline(_))
    }

    /// Provider response code attached to a gateway error, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::GatewayError { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for PaymentError {
    fn from(e: rocksdb::Error) -> Self {
        Self::InternalError(Box::new(e))
    }
}
