use super::gateway::MonerisCheckout;
use crate::domain::checkout::{ResponseState, response_code};
use crate::domain::config::OrderNumberStrategy;
use crate::domain::events::{CheckoutEvent, MessageLevel};
use crate::domain::order::{CheckoutData, Order};
use crate::domain::payment::{Payment, PaymentState};
use crate::error::{PaymentError, Result};
use crate::interfaces::callback::CallbackParams;
use tracing::{debug, info, warn};
use uuid::Uuid;

impl MonerisCheckout {
    /// Handles the return callback after the shopper completed the hosted
    /// checkout.
    ///
    /// The callback's parameters are never trusted on their own: the receipt
    /// is fetched from the provider and its order number must match the one
    /// cached when the ticket was created. The cached ticket is cleared first,
    /// whatever the outcome.
    pub async fn reconcile_return(&self, order_id: &str, params: &CallbackParams) -> Result<Payment> {
        if self.config.api_logging.response {
            debug!(order_id, ?params, "return callback received");
        }

        let _guard = self.locks.lock(order_id).await;
        let (mut order, cached) = self.take_checkout_data(order_id).await?;

        let fields = params.require_return_fields()?;
        if !response_code::is_success(fields.response_code) {
            warn!(order_id, code = fields.response_code, "return callback with failed response code");
            return Err(PaymentError::gateway_with_code(
                format!(
                    "Payment has failed or errored out by the gateway ({}).",
                    describe_code(fields.response_code)
                ),
                fields.response_code,
            ));
        }

        let receipt = self.gateway.receipt(fields.ticket).await?;
        let cached = match cached {
            Some(data) if data.order_no == receipt.order_no => data,
            _ => {
                warn!(order_id, receipt_order_no = %receipt.order_no, "receipt does not match the cached order number");
                return Err(PaymentError::gateway("The order number is missing or invalid."));
            }
        };

        let state = match ResponseState::parse(fields.response_state) {
            ResponseState::Complete => PaymentState::Completed,
            _ => PaymentState::Authorization,
        };
        let payment = Payment {
            id: Uuid::new_v4(),
            state,
            amount: order.balance,
            payment_gateway: self.config.gateway_id.clone(),
            order_id: order.id.clone(),
            remote_id: receipt.reference_no,
            remote_state: fields.response_state.to_string(),
        };
        self.payments.create(payment.clone()).await?;
        info!(order_id, remote_id = %payment.remote_id, state = ?payment.state, "payment recorded");

        // The number is only consumed once a payment exists for it.
        if self.config.order_number_strategy == OrderNumberStrategy::OrderNumber {
            order.order_number = Some(cached.order_no);
            self.orders.store(order).await?;
        }

        self.events
            .publish(CheckoutEvent::TransactionCompleted {
                payment: payment.clone(),
            })
            .await;

        Ok(payment)
    }

    /// Handles the cancel callback, used for both shopper cancellation and
    /// checkout errors. Never creates or touches a payment.
    pub async fn reconcile_cancel(&self, order_id: &str, params: &CallbackParams) -> Result<()> {
        if self.config.api_logging.response {
            debug!(order_id, ?params, "cancel callback received");
        }

        let _guard = self.locks.lock(order_id).await;
        let (order, _) = self.take_checkout_data(order_id).await?;
        let label = &self.config.display_label;

        match params.response_state().map(ResponseState::parse) {
            Some(ResponseState::Cancel) => {
                self.messenger
                    .add_message(
                        MessageLevel::Info,
                        format!(
                            "You have canceled checkout at {label} but may resume the checkout process here when you are ready."
                        ),
                    )
                    .await;
                self.events
                    .publish(CheckoutEvent::TransactionCancelled { order })
                    .await;
            }
            Some(ResponseState::Error) => {
                let text = match params.response_code() {
                    Some(code) => format!(
                        "Checkout error occurred at {label} with response code: {code}. Please try again with the checkout process."
                    ),
                    None => format!(
                        "Checkout error occurred at {label}. Please try again with the checkout process."
                    ),
                };
                self.messenger.add_message(MessageLevel::Error, text).await;
            }
            other => {
                debug!(order_id, state = ?other, "cancel callback without actionable state");
            }
        }

        Ok(())
    }

    /// Clears the cached ticket on the order, saves it, and hands back the
    /// order together with whatever was cached.
    async fn take_checkout_data(&self, order_id: &str) -> Result<(Order, Option<CheckoutData>)> {
        let mut order = self.load_order(order_id).await?;
        // Malformed data is dropped like valid data, then reported.
        let cached = order.checkout_data();
        order.clear_checkout_data();
        self.orders.store(order.clone()).await?;
        Ok((order, cached?))
    }
}

fn describe_code(code: &str) -> String {
    match response_code::describe(code) {
        Some(description) => format!("{code}: {description}"),
        None => code.to_string(),
    }
}
