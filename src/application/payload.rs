use crate::domain::checkout::Action;
use crate::domain::config::GatewayConfiguration;
use crate::domain::order::{Address, Order, OrderItem, PendingPayment};
use crate::domain::request::{
    AddressDetails, Cart, CartItem, ContactDetails, Credentials, PreloadRequest, ReceiptRequest,
    Tax,
};
use rust_decimal::prelude::ToPrimitive;
use std::sync::Arc;
use tracing::warn;

/// Languages the hosted checkout can be rendered in.
pub const ALLOWED_LANGUAGES: [&str; 2] = ["en", "fr"];

/// Assembles request bodies from order data.
///
/// Pure construction: nothing here talks to the provider or persists anything.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    config: Arc<GatewayConfiguration>,
}

impl PayloadBuilder {
    pub fn new(config: Arc<GatewayConfiguration>) -> Self {
        Self { config }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            store_id: self.config.store_id.clone(),
            api_token: self.config.api_token.clone(),
            checkout_id: self.config.checkout_id.clone(),
            environment: self.config.mode.as_str().to_string(),
        }
    }

    /// Builds the preload body for `payment` on `order`.
    ///
    /// Shipping details are taken from the billing profile, there is no
    /// separate shipping source. `language` is dropped unless allow-listed.
    pub fn preload(
        &self,
        order: &Order,
        payment: &PendingPayment,
        order_no: &str,
        language: Option<&str>,
    ) -> PreloadRequest {
        let address = order
            .billing_profile
            .as_ref()
            .map(|profile| &profile.address);

        PreloadRequest {
            credentials: self.credentials(),
            action: Action::Preload,
            txn_total: payment.amount.to_provider_string(),
            order_no: order_no.to_string(),
            cust_id: order.customer_id.clone().unwrap_or_default(),
            dynamic_descriptor: self.config.dynamic_descriptor(),
            cart: self.cart(order, payment),
            contact_details: contact_details(order),
            shipping_details: address_details(address),
            billing_details: address_details(address),
            language: language
                .filter(|lang| ALLOWED_LANGUAGES.contains(lang))
                .map(str::to_string),
        }
    }

    pub fn receipt(&self, ticket: &str) -> ReceiptRequest {
        ReceiptRequest {
            credentials: self.credentials(),
            action: Action::Receipt,
            ticket: ticket.to_string(),
        }
    }

    fn cart(&self, order: &Order, payment: &PendingPayment) -> Cart {
        let items = order
            .items
            .iter()
            .map(|item| CartItem {
                url: item.url.clone(),
                description: item.title.clone(),
                product_code: item.sku.clone(),
                unit_cost: item.unit_price.to_provider_string(),
                quantity: cart_quantity(item),
            })
            .collect();

        Cart {
            items,
            subtotal: payment.amount.to_provider_string(),
            tax: Tax::default(),
        }
    }
}

/// The provider only accepts whole units.
fn cart_quantity(item: &OrderItem) -> i64 {
    let whole = item.quantity.trunc();
    if whole != item.quantity {
        warn!(sku = %item.sku, quantity = %item.quantity, "fractional quantity truncated to whole units");
    }
    whole.to_i64().unwrap_or_else(|| {
        warn!(sku = %item.sku, quantity = %item.quantity, "quantity out of range, sent as 0");
        0
    })
}

fn contact_details(order: &Order) -> ContactDetails {
    let profile = order.billing_profile.as_ref();
    ContactDetails {
        first_name: profile
            .map(|p| p.address.given_name.clone())
            .unwrap_or_default(),
        last_name: profile
            .map(|p| p.address.family_name.clone())
            .unwrap_or_default(),
        email: order.email.clone().unwrap_or_default(),
        phone: profile.and_then(|p| p.phone.clone()).unwrap_or_default(),
    }
}

fn address_details(address: Option<&Address>) -> AddressDetails {
    let Some(address) = address else {
        return AddressDetails::default();
    };
    AddressDetails {
        address_1: address.address_line1.clone(),
        address_2: address.address_line2.clone(),
        city: address.locality.clone(),
        province: address.administrative_area.clone(),
        country: address.country_code.clone(),
        postal_code: address.postal_code.clone(),
    }
}
