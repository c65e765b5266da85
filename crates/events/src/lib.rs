//! Event distribution for the payment-code registry.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`; plugs into the registry as an
//!   [`EventSink`](paycode_core::EventSink).
//! - [`PublishedEvent`] — a registry event stamped with sequence and time.
//! - [`EventPersistence`] — best-effort background service appending events
//!   to the `registry_events` ledger table.
//! - [`delivery`] — external delivery channels (webhook).

pub mod bus;
pub mod delivery;
pub mod persistence;

pub use bus::{EventBus, PublishedEvent};
pub use delivery::webhook::WebhookDelivery;
pub use persistence::EventPersistence;
