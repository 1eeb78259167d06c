//! Domain types and the ports through which the gateway reaches the host
//! platform and the provider.

pub mod checkout;
pub mod config;
pub mod events;
pub mod money;
pub mod order;
pub mod payment;
pub mod ports;
pub mod request;
