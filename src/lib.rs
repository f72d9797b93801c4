//! In-process rendezvous synchronization provider
//!
//! A host announces namespace registrations through a [`SyncProvider`];
//! remote peers subscribe over persistent bidirectional streams and
//! receive every subsequent registration for the namespaces they
//! joined, plus the cached latest record at subscribe time.
//!
//! The crate owns the concurrent topic/subscriber registry and the
//! per-stream session state machine. Connection establishment, peer
//! discovery and stream lifecycle belong to an underlying transport
//! substrate, which binds the session handler via [`PROTOCOL_ID`] and
//! calls [`SyncProvider::handle_stream`] (or
//! [`SyncProvider::spawn_session`]) with each established stream.
//!
//! # Example
//!
//! ```no_run
//! use rendezvous_sync::{PeerId, SyncProvider};
//!
//! # async fn run(stream: tokio::io::DuplexStream) {
//! let provider = SyncProvider::with_defaults(PeerId::from("host"));
//!
//! // Substrate hands over an inbound stream.
//! let _session = provider.spawn_session(PeerId::from("remote"), stream);
//!
//! // Local peer announces itself under a namespace.
//! provider
//!     .register(&PeerId::from("host"), "chat", vec![], 30, 1)
//!     .await;
//! # }
//! ```
//!
//! Delivery is best-effort: a failed write to one subscriber is logged
//! and skipped, never retried, and never affects registry state or the
//! other subscribers.

pub mod error;
pub mod peer;
pub mod provider;
pub mod registry;
pub mod session;
pub mod wire;

pub use error::{FrameError, Result, SyncError};
pub use peer::PeerId;
pub use provider::{ProviderConfig, SyncProvider, PROTOCOL_ID, SERVICE_TYPE};
pub use registry::TopicRegistry;
