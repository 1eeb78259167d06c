//! Adapters for the domain ports: the provider's HTTP endpoint, in-memory
//! collaborators, optional RocksDB persistence and configuration loading.

pub mod http;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod settings;
