use super::order::Order;
use super::payment::Payment;

pub const TRANSACTION_COMPLETE: &str = "moneris_checkout.transaction_complete";
pub const TRANSACTION_CANCEL: &str = "moneris_checkout.transaction_cancel";

/// Domain events published by the reconciler. Informational only.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutEvent {
    TransactionCompleted { payment: Payment },
    TransactionCancelled { order: Order },
}

impl CheckoutEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutEvent::TransactionCompleted { .. } => TRANSACTION_COMPLETE,
            CheckoutEvent::TransactionCancelled { .. } => TRANSACTION_CANCEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Error,
}

/// A notice shown to the shopper on the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}
