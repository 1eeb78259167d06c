//! Request bodies sent to the provider's request endpoint.

use super::checkout::Action;
use serde::{Deserialize, Serialize};

/// Merchant credentials and environment, sent with every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub store_id: String,
    pub api_token: String,
    pub checkout_id: String,
    pub environment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreloadRequest {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub action: Action,
    pub txn_total: String,
    pub order_no: String,
    pub cust_id: String,
    pub dynamic_descriptor: String,
    pub cart: Cart,
    pub contact_details: ContactDetails,
    pub shipping_details: AddressDetails,
    pub billing_details: AddressDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub subtotal: String,
    pub tax: Tax,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub description: String,
    pub product_code: String,
    pub unit_cost: String,
    pub quantity: i64,
}

/// Tax block. Always sent empty, order-level tax is not mapped yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    pub amount: String,
    pub description: String,
    pub rate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressDetails {
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRequest {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub action: Action,
    pub ticket: String,
}
