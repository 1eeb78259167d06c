use super::money::Money;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key holding the cached checkout ticket.
pub const CHECKOUT_DATA_KEY: &str = "moneris_checkout";

/// Postal address of a billing profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub given_name: String,
    pub family_name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub locality: String,
    pub administrative_area: String,
    pub country_code: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingProfile {
    pub address: Address,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub title: String,
    pub sku: String,
    pub unit_price: Money,
    pub quantity: Decimal,
    /// Canonical product URL, when the purchased entity has one.
    #[serde(default)]
    pub url: Option<String>,
}

/// The slice of an order this gateway reads and writes.
///
/// Orders are owned by the host platform. Besides the listed attributes the
/// gateway only touches the free-form `data` map, see [`CheckoutData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub order_number: Option<String>,
    pub balance: Money,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub billing_profile: Option<BillingProfile>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl Order {
    pub fn new(id: impl Into<String>, balance: Money) -> Self {
        Self {
            id: id.into(),
            order_number: None,
            balance,
            customer_id: None,
            email: None,
            billing_profile: None,
            items: Vec::new(),
            data: BTreeMap::new(),
        }
    }

    pub fn get_data<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.data.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    pub fn set_data<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.data.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn unset_data(&mut self, key: &str) {
        self.data.remove(key);
    }

    pub fn checkout_data(&self) -> Result<Option<CheckoutData>> {
        self.get_data(CHECKOUT_DATA_KEY)
    }

    pub fn set_checkout_data(&mut self, data: &CheckoutData) -> Result<()> {
        self.set_data(CHECKOUT_DATA_KEY, data)
    }

    pub fn clear_checkout_data(&mut self) {
        self.unset_data(CHECKOUT_DATA_KEY);
    }
}

/// Ticket and order number cached on the order for one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutData {
    pub ticket: String,
    pub order_no: String,
}

/// The payment the host is about to collect for an order.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPayment {
    pub order_id: String,
    pub amount: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_checkout_data_round_trip_on_order() {
        let mut order = Order::new("7", Money::new(dec!(10)));
        assert_eq!(order.checkout_data().unwrap(), None);

        let data = CheckoutData {
            ticket: "T1".to_string(),
            order_no: "7".to_string(),
        };
        order.set_checkout_data(&data).unwrap();
        assert_eq!(order.checkout_data().unwrap(), Some(data));

        order.clear_checkout_data();
        assert_eq!(order.checkout_data().unwrap(), None);
        assert!(order.data.is_empty());
    }

    #[test]
    fn test_unrelated_metadata_is_preserved() {
        let mut order = Order::new("7", Money::new(dec!(10)));
        order.set_data("other_module", &"kept").unwrap();
        order
            .set_checkout_data(&CheckoutData {
                ticket: "T1".to_string(),
                order_no: "7".to_string(),
            })
            .unwrap();

        order.clear_checkout_data();
        assert_eq!(
            order.get_data::<String>("other_module").unwrap().as_deref(),
            Some("kept")
        );
    }

    #[test]
    fn test_malformed_checkout_data_is_an_error() {
        let mut order = Order::new("7", Money::new(dec!(10)));
        order.set_data(CHECKOUT_DATA_KEY, &"not an object").unwrap();
        assert!(order.checkout_data().is_err());
    }

    #[test]
    fn test_order_deserializes_with_defaults() {
        let json = r#"{"id": "12", "balance": "25.50"}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, "12");
        assert_eq!(order.balance, Money::new(dec!(25.50)));
        assert!(order.items.is_empty());
        assert!(order.billing_profile.is_none());
    }
}
