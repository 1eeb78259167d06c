use super::locks::OrderLocks;
use super::payload::PayloadBuilder;
use super::session::CheckoutSettings;
use crate::domain::config::GatewayConfiguration;
use crate::domain::order::{Order, PendingPayment};
use crate::domain::payment::Payment;
use crate::domain::ports::{
    CheckoutGatewayBox, EventPublisherBox, MessengerBox, NumberGeneratorBox, OrderStore,
    OrderStoreBox, PaymentStoreBox,
};
use crate::error::{PaymentError, Result};
use crate::interfaces::callback::CallbackParams;
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Container element the hosted checkout is mounted into.
pub const DEFAULT_CONTAINER_ID: &str = "monerisCheckout";

/// Offsite payment gateway capability, as seen by a checkout flow.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn configuration(&self) -> &GatewayConfiguration;

    /// Obtains (or reuses) a ticket and returns the settings for the checkout page.
    async fn build_checkout(
        &self,
        payment: &PendingPayment,
        context: &RequestContext,
    ) -> Result<CheckoutSettings>;

    async fn on_return(&self, order_id: &str, params: &CallbackParams) -> Result<Payment>;

    async fn on_cancel(&self, order_id: &str, params: &CallbackParams) -> Result<()>;
}

/// Per-request values supplied by the host.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unix timestamp of the current request.
    pub request_time: i64,
    /// Current interface language.
    pub language: Option<String>,
    pub return_url: Url,
    pub cancel_url: Url,
}

/// Everything the gateway needs from the host platform and the provider.
pub struct Collaborators {
    pub orders: OrderStoreBox,
    pub payments: PaymentStoreBox,
    pub gateway: CheckoutGatewayBox,
    pub messenger: MessengerBox,
    pub events: EventPublisherBox,
    /// Numbering pattern of the order type, if one is configured.
    pub numbers: Option<NumberGeneratorBox>,
}

/// The Moneris Checkout offsite gateway.
///
/// Ticket acquisition lives in `ticket.rs`, callback reconciliation in
/// `reconciler.rs`.
pub struct MonerisCheckout {
    pub(crate) config: Arc<GatewayConfiguration>,
    pub(crate) payload: PayloadBuilder,
    pub(crate) orders: OrderStoreBox,
    pub(crate) payments: PaymentStoreBox,
    pub(crate) gateway: CheckoutGatewayBox,
    pub(crate) messenger: MessengerBox,
    pub(crate) events: EventPublisherBox,
    pub(crate) numbers: Option<NumberGeneratorBox>,
    pub(crate) locks: OrderLocks,
}

impl MonerisCheckout {
    /// Validates the configuration and wires the gateway to its collaborators.
    pub fn configure(config: GatewayConfiguration, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);
        Ok(Self {
            payload: PayloadBuilder::new(config.clone()),
            config,
            orders: collaborators.orders,
            payments: collaborators.payments,
            gateway: collaborators.gateway,
            messenger: collaborators.messenger,
            events: collaborators.events,
            numbers: collaborators.numbers,
            locks: OrderLocks::new(),
        })
    }

    pub fn orders(&self) -> &dyn OrderStore {
        self.orders.as_ref()
    }

    pub(crate) async fn load_order(&self, order_id: &str) -> Result<Order> {
        self.orders
            .get(order_id)
            .await?
            .ok_or_else(|| PaymentError::OrderNotFound(order_id.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for MonerisCheckout {
    fn configuration(&self) -> &GatewayConfiguration {
        &self.config
    }

    async fn build_checkout(
        &self,
        payment: &PendingPayment,
        context: &RequestContext,
    ) -> Result<CheckoutSettings> {
        let ticket = self.get_or_create_ticket(payment, context).await?;
        Ok(CheckoutSettings {
            ticket,
            mode: self.config.mode,
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            return_url: context.return_url.clone(),
            cancel_url: context.cancel_url.clone(),
            debug: false,
        })
    }

    async fn on_return(&self, order_id: &str, params: &CallbackParams) -> Result<Payment> {
        self.reconcile_return(order_id, params).await
    }

    async fn on_cancel(&self, order_id: &str, params: &CallbackParams) -> Result<()> {
        self.reconcile_cancel(order_id, params).await
    }
}
