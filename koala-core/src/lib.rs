//! Core types and service wiring for the koala menu aggregator.

/// Fetch-and-merge orchestration for full menu requests.
pub mod aggregate;
/// Raw source fetching from files and HTTP endpoints.
pub mod fetch;
/// Canonical menu and location models shared by all providers.
pub mod model;
/// Registry and helpers for plugging provider adapters into the service.
pub mod plugin;
/// Traits describing the provider interfaces.
pub mod ports;
/// High-level service facade used by the transport layer.
pub mod service;

pub use aggregate::*;
pub use fetch::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use service::*;
