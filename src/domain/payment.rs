use super::money::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Completed,
    Authorization,
}

/// A payment recorded after a verified return from the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub state: PaymentState,
    pub amount: Money,
    pub payment_gateway: String,
    pub order_id: String,
    /// Provider reference number from the receipt.
    pub remote_id: String,
    /// Raw response state reported by the checkout callback.
    pub remote_state: String,
}
