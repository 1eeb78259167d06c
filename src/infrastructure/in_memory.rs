use crate::domain::events::{CheckoutEvent, Message, MessageLevel};
use crate::domain::order::Order;
use crate::domain::payment::Payment;
use crate::domain::ports::{EventPublisher, Messenger, NumberGenerator, OrderStore, PaymentStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, broadcast};

/// A thread-safe in-memory order store.
///
/// Clones share the same map, so a test can keep a handle while the gateway
/// owns another.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn store(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id.clone(), order);
        Ok(())
    }

    async fn get(&self, order_id: &str) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(order_id).cloned())
    }
}

/// A thread-safe in-memory payment store.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<Vec<Payment>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Payment> {
        self.payments.read().await.clone()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn create(&self, payment: Payment) -> Result<()> {
        self.payments.write().await.push(payment);
        Ok(())
    }

    async fn for_order(&self, order_id: &str) -> Result<Vec<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .iter()
            .filter(|payment| payment.order_id == order_id)
            .cloned()
            .collect())
    }
}

/// Collects shopper notices until the host renders them.
#[derive(Default, Clone)]
pub struct InMemoryMessenger {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl InMemoryMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }

    /// Returns and clears the pending notices.
    pub async fn drain(&self) -> Vec<Message> {
        std::mem::take(&mut *self.messages.write().await)
    }
}

#[async_trait]
impl Messenger for InMemoryMessenger {
    async fn add_message(&self, level: MessageLevel, text: String) {
        self.messages.write().await.push(Message { level, text });
    }
}

/// Fans domain events out over a `tokio` broadcast channel.
///
/// Publishing never fails: with no subscriber the event is dropped.
#[derive(Clone)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<CheckoutEvent>,
}

impl BroadcastEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CheckoutEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventBus {
    async fn publish(&self, event: CheckoutEvent) {
        tracing::debug!(event = event.name(), "publishing checkout event");
        let _ = self.sender.send(event);
    }
}

/// Sequential order numbers with an optional prefix, e.g. `WEB-1001`.
#[derive(Clone)]
pub struct SequentialNumberGenerator {
    prefix: String,
    next: Arc<AtomicU64>,
}

impl SequentialNumberGenerator {
    pub fn new(prefix: impl Into<String>, start: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: Arc::new(AtomicU64::new(start)),
        }
    }
}

#[async_trait]
impl NumberGenerator for SequentialNumberGenerator {
    async fn generate(&self, _order: &Order) -> Result<String> {
        let number = self.next.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}{}", self.prefix, number))
    }
}
