//! Datadog API transport
//!
//! Thin HTTP layer the resource types call through. Authentication is
//! limited to forwarding the configured API/application keys as headers;
//! everything above this module speaks in REST paths relative to the API
//! base.

mod client;

pub use client::DatadogClient;
