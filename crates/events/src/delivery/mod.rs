//! External delivery channels for registry events.
//!
//! Used to push the event stream to indexers and watchers outside the
//! process.

pub mod webhook;
