//! Application layer: the gateway facade and the checkout flow around it.
//!
//! `MonerisCheckout` owns the collaborators. Ticket acquisition and callback
//! reconciliation are implemented on it in their own modules; the payload
//! builder and the client-side session driver are independent of it.

pub mod gateway;
pub mod locks;
pub mod payload;
pub mod reconciler;
pub mod session;
pub mod ticket;
