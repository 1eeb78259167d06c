//! Inbound interfaces: parsing of the provider's browser callbacks.

pub mod callback;
