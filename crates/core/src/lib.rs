//! Payment-code notification registry: domain types and core logic.
//!
//! - [`NotificationRegistry`] — the registry itself (register, notify,
//!   mailbox lookup) layered over a pluggable [`RegistryStore`].
//! - [`MemoryStore`] — in-process storage backend.
//! - [`RegistryEvent`] / [`EventSink`] — the side channel through which
//!   state transitions are published to external consumers.
//! - [`CoreError`] — the error taxonomy shared by every crate.
//!
//! No database or network access happens here.

pub mod error;
pub mod event;
pub mod registry;
pub mod store;
pub mod types;

pub use error::CoreError;
pub use event::{EventSink, RegistryEvent};
pub use registry::NotificationRegistry;
pub use store::{MemoryStore, RegistryStore};
pub use types::RegistryStats;
