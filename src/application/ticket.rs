use super::gateway::{MonerisCheckout, RequestContext};
use crate::domain::config::OrderNumberStrategy;
use crate::domain::order::{CheckoutData, Order, PendingPayment};
use crate::error::Result;
use tracing::{debug, info, warn};

impl MonerisCheckout {
    /// Returns the order's live ticket, preloading a new one only when the
    /// order carries none.
    ///
    /// The cached `{ticket, order_no}` pair is what makes page reloads during
    /// an active checkout reuse the same ticket. It is cleared by every
    /// return or cancel callback, which forces a fresh ticket on retry.
    pub async fn get_or_create_ticket(
        &self,
        payment: &PendingPayment,
        context: &RequestContext,
    ) -> Result<String> {
        let _guard = self.locks.lock(&payment.order_id).await;
        let mut order = self.load_order(&payment.order_id).await?;

        match order.checkout_data() {
            Ok(Some(data)) => {
                debug!(order_id = %order.id, "reusing cached checkout ticket");
                return Ok(data.ticket);
            }
            Ok(None) => {}
            Err(e) => {
                // Unreadable data would otherwise block every later attempt.
                warn!(order_id = %order.id, error = %e, "discarding malformed checkout data");
                order.clear_checkout_data();
                self.orders.store(order.clone()).await?;
            }
        }

        let order_no = self.order_number(&order, context).await?;
        let request = self
            .payload
            .preload(&order, payment, &order_no, context.language.as_deref());
        let ticket = self.gateway.preload(&request).await?;

        order.set_checkout_data(&CheckoutData {
            ticket: ticket.clone(),
            order_no: order_no.clone(),
        })?;
        self.orders.store(order).await?;

        info!(order_id = %payment.order_id, %order_no, "checkout ticket created");
        Ok(ticket)
    }

    /// Derives the order number sent to the provider.
    ///
    /// With [`OrderNumberStrategy::OrderNumber`] a missing number is generated
    /// here but only assigned to the order once a return is reconciled.
    pub async fn order_number(&self, order: &Order, context: &RequestContext) -> Result<String> {
        let number = match self.config.order_number_strategy {
            OrderNumberStrategy::OrderId => order.id.clone(),
            OrderNumberStrategy::OrderIdTimestamp => {
                format!("{}-{}", order.id, context.request_time)
            }
            OrderNumberStrategy::OrderNumber => match (&order.order_number, &self.numbers) {
                (Some(number), _) => number.clone(),
                (None, Some(numbers)) => numbers.generate(order).await?,
                (None, None) => order.id.clone(),
            },
        };
        Ok(number)
    }
}
