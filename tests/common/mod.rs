#![allow(dead_code)]

use async_trait::async_trait;
use moneris_checkout::application::gateway::{Collaborators, MonerisCheckout, RequestContext};
use moneris_checkout::domain::checkout::Receipt;
use moneris_checkout::domain::config::GatewayConfiguration;
use moneris_checkout::domain::events::CheckoutEvent;
use moneris_checkout::domain::money::Money;
use moneris_checkout::domain::order::{Address, BillingProfile, Order, OrderItem, PendingPayment};
use moneris_checkout::domain::ports::{CheckoutGateway, NumberGeneratorBox, OrderStore};
use moneris_checkout::domain::request::PreloadRequest;
use moneris_checkout::error::{PaymentError, Result};
use moneris_checkout::infrastructure::in_memory::{
    BroadcastEventBus, InMemoryMessenger, InMemoryOrderStore, InMemoryPaymentStore,
};
use moneris_checkout::interfaces::callback::CallbackParams;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use url::Url;

#[derive(Clone, Debug)]
pub enum ReceiptOutcome {
    Approved { order_no: String, reference_no: String },
    Declined,
    Failed,
}

#[derive(Default)]
struct StubState {
    preloads: Mutex<Vec<PreloadRequest>>,
    receipts: Mutex<Vec<String>>,
    outcome: Mutex<Option<ReceiptOutcome>>,
    issued: AtomicUsize,
}

/// Provider double: issues `T1`, `T2`, ... and answers receipts with a
/// configurable outcome.
#[derive(Clone, Default)]
pub struct StubGateway {
    state: Arc<StubState>,
    preload_delay: Option<Duration>,
    preload_fails: bool,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preload_delay(delay: Duration) -> Self {
        Self {
            preload_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Every preload answers with a non-success envelope.
    pub fn failing_preload() -> Self {
        Self {
            preload_fails: true,
            ..Self::default()
        }
    }

    pub fn set_receipt(&self, outcome: ReceiptOutcome) {
        *self.state.outcome.lock().unwrap() = Some(outcome);
    }

    pub fn approve(&self, order_no: &str, reference_no: &str) {
        self.set_receipt(ReceiptOutcome::Approved {
            order_no: order_no.to_string(),
            reference_no: reference_no.to_string(),
        });
    }

    pub fn preloads(&self) -> Vec<PreloadRequest> {
        self.state.preloads.lock().unwrap().clone()
    }

    pub fn receipt_calls(&self) -> Vec<String> {
        self.state.receipts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CheckoutGateway for StubGateway {
    async fn preload(&self, request: &PreloadRequest) -> Result<String> {
        if let Some(delay) = self.preload_delay {
            tokio::time::sleep(delay).await;
        }
        self.state.preloads.lock().unwrap().push(request.clone());
        if self.preload_fails {
            return Err(PaymentError::gateway(
                "Moneris checkout preload request failed. Error: Invalid store credentials",
            ));
        }
        let n = self.state.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("T{n}"))
    }

    async fn receipt(&self, ticket: &str) -> Result<Receipt> {
        self.state.receipts.lock().unwrap().push(ticket.to_string());
        let outcome = self.state.outcome.lock().unwrap().clone();
        match outcome {
            Some(ReceiptOutcome::Approved {
                order_no,
                reference_no,
            }) => Ok(Receipt {
                order_no,
                reference_no,
                extra: Default::default(),
            }),
            Some(ReceiptOutcome::Declined) => Err(PaymentError::HardDecline(
                "Moneris payment transaction declined.".to_string(),
            )),
            Some(ReceiptOutcome::Failed) | None => Err(PaymentError::gateway(
                "Moneris payment receipt request failed. Message: invalid ticket.",
            )),
        }
    }
}

pub struct Harness {
    pub gateway: MonerisCheckout,
    pub orders: InMemoryOrderStore,
    pub payments: InMemoryPaymentStore,
    pub messenger: InMemoryMessenger,
    pub events: broadcast::Receiver<CheckoutEvent>,
    pub stub: StubGateway,
}

impl Harness {
    pub async fn insert(&self, order: Order) {
        self.orders.store(order).await.unwrap();
    }

    pub async fn order(&self, id: &str) -> Order {
        self.orders.get(id).await.unwrap().unwrap()
    }

    pub fn drain_events(&mut self) -> Vec<CheckoutEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

pub fn config() -> GatewayConfiguration {
    GatewayConfiguration {
        store_id: "monca07553".to_string(),
        api_token: "QAZhHds8RGFZFCGb4euC".to_string(),
        checkout_id: "chktSQJ3U07553".to_string(),
        site_name: "Maple Leaf Outfitters".to_string(),
        ..Default::default()
    }
}

pub fn harness(config: GatewayConfiguration) -> Harness {
    build(config, StubGateway::new(), None)
}

pub fn build(
    config: GatewayConfiguration,
    stub: StubGateway,
    numbers: Option<NumberGeneratorBox>,
) -> Harness {
    let orders = InMemoryOrderStore::new();
    let payments = InMemoryPaymentStore::new();
    let messenger = InMemoryMessenger::new();
    let bus = BroadcastEventBus::default();
    let events = bus.subscribe();

    let gateway = MonerisCheckout::configure(
        config,
        Collaborators {
            orders: Box::new(orders.clone()),
            payments: Box::new(payments.clone()),
            gateway: Box::new(stub.clone()),
            messenger: Box::new(messenger.clone()),
            events: Box::new(bus),
            numbers,
        },
    )
    .expect("valid configuration");

    Harness {
        gateway,
        orders,
        payments,
        messenger,
        events,
        stub,
    }
}

pub fn order(id: &str) -> Order {
    let mut order = Order::new(id, Money::new(dec!(42.00)));
    order.customer_id = Some("3".to_string());
    order.email = Some("jane@example.com".to_string());
    order.billing_profile = Some(BillingProfile {
        address: Address {
            given_name: "Jane".to_string(),
            family_name: "Doe".to_string(),
            address_line1: "1 Main St".to_string(),
            locality: "Toronto".to_string(),
            administrative_area: "ON".to_string(),
            country_code: "CA".to_string(),
            postal_code: "M5V 2T6".to_string(),
            ..Default::default()
        },
        phone: None,
    });
    order.items = vec![OrderItem {
        title: "Toque".to_string(),
        sku: "TQ-1".to_string(),
        unit_price: Money::new(dec!(21.00)),
        quantity: dec!(2),
        url: None,
    }];
    order
}

pub fn pending(order: &Order) -> PendingPayment {
    PendingPayment {
        order_id: order.id.clone(),
        amount: order.balance,
    }
}

pub fn context(request_time: i64) -> RequestContext {
    RequestContext {
        request_time,
        language: Some("en".to_string()),
        return_url: Url::parse("https://shop.example/checkout/42/payment/return").unwrap(),
        cancel_url: Url::parse("https://shop.example/checkout/42/payment/cancel").unwrap(),
    }
}

pub fn params(ticket: Option<&str>, code: Option<&str>, state: Option<&str>) -> CallbackParams {
    CallbackParams {
        ticket: ticket.map(str::to_string),
        response_code: code.map(str::to_string),
        response_state: state.map(str::to_string),
    }
}
