//! Provider surface
//!
//! The [`SyncProvider`] is what a host embeds: it owns the topic
//! registry, exposes the registration/subscription API to local code,
//! and hands inbound streams to session tasks.

pub mod config;
pub mod sync;

pub use config::ProviderConfig;
pub use sync::{SyncProvider, PROTOCOL_ID, SERVICE_TYPE};
