//! Per-stream session handling
//!
//! Each inbound rendezvous sync stream gets its own session task that
//! lives until the stream fails. Failure of one session never affects
//! other sessions or the shared registry beyond removing the session's
//! own subscriptions.

pub mod handler;

pub use handler::Session;
