use super::checkout::Receipt;
use super::events::{CheckoutEvent, MessageLevel};
use super::order::Order;
use super::payment::Payment;
use super::request::PreloadRequest;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn store(&self, order: Order) -> Result<()>;
    async fn get(&self, order_id: &str) -> Result<Option<Order>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn create(&self, payment: Payment) -> Result<()>;
    async fn for_order(&self, order_id: &str) -> Result<Vec<Payment>>;
}

/// Order numbering pattern of the host platform.
#[async_trait]
pub trait NumberGenerator: Send + Sync {
    async fn generate(&self, order: &Order) -> Result<String>;
}

/// User-facing notices.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn add_message(&self, level: MessageLevel, text: String);
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: CheckoutEvent);
}

/// The two provider actions the gateway needs.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Creates a ticket for the given preload body.
    async fn preload(&self, request: &PreloadRequest) -> Result<String>;
    /// Fetches the approved receipt for a ticket.
    async fn receipt(&self, ticket: &str) -> Result<Receipt>;
}

pub type OrderStoreBox = Box<dyn OrderStore>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type NumberGeneratorBox = Box<dyn NumberGenerator>;
pub type MessengerBox = Box<dyn Messenger>;
pub type EventPublisherBox = Box<dyn EventPublisher>;
pub type CheckoutGatewayBox = Box<dyn CheckoutGateway>;
