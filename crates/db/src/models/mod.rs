//! Row types for the registry tables.

pub mod event;
