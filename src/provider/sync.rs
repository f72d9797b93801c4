//! Rendezvous sync provider
//!
//! The local peer's registration/subscription surface, plus the seam a
//! transport substrate uses to hand inbound streams to the session
//! handler. The provider owns the topic registry; everything else
//! (connection establishment, peer authentication, stream lifecycle)
//! belongs to the substrate.

use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::peer::PeerId;
use crate::registry::TopicRegistry;
use crate::session::Session;
use crate::wire::{RegistrationRecord, SubscriptionDescriptor};

use super::config::ProviderConfig;

/// Service type identifier advertised to peers
pub const SERVICE_TYPE: &str = "inmem";

/// Protocol identifier used to bind the stream handler to the transport
pub const PROTOCOL_ID: &str = "/rendezvous/sync/inmem/1.0.0";

/// In-process rendezvous synchronization provider
///
/// One provider exists per host/service instance. It is cheap to share
/// behind an `Arc`: all mutable state lives in the registry, behind its
/// own guards.
pub struct SyncProvider {
    local_peer: PeerId,
    registry: Arc<TopicRegistry>,
    config: ProviderConfig,
}

impl SyncProvider {
    /// Create a provider for the given local peer
    pub fn new(local_peer: PeerId, config: ProviderConfig) -> Self {
        Self {
            local_peer,
            registry: Arc::new(TopicRegistry::new()),
            config,
        }
    }

    /// Create a provider with default configuration
    pub fn with_defaults(local_peer: PeerId) -> Self {
        Self::new(local_peer, ProviderConfig::default())
    }

    /// The local peer this provider announces as
    pub fn local_peer(&self) -> &PeerId {
        &self.local_peer
    }

    /// The service type identifier
    pub fn service_type(&self) -> &'static str {
        SERVICE_TYPE
    }

    /// The protocol identifier for stream binding
    pub fn protocol_id(&self) -> &'static str {
        PROTOCOL_ID
    }

    /// Shared handle to the topic registry
    pub fn registry(&self) -> &Arc<TopicRegistry> {
        &self.registry
    }

    /// Publish a registration and fan it out to current subscribers
    ///
    /// Fire-and-forget: the record is cached as the namespace's last
    /// announcement, then delivered sequentially to a snapshot of the
    /// subscriber set. A delivery failure is logged, leaves the
    /// subscriber in place, is not retried, and never stops delivery to
    /// the remaining subscribers. `counter` is carried for wire
    /// compatibility but takes no part in ordering or deduplication.
    pub async fn register(
        &self,
        peer: &PeerId,
        namespace: &str,
        addresses: Vec<Bytes>,
        ttl_seconds: u64,
        counter: u64,
    ) {
        let record = RegistrationRecord::new(peer.as_str(), namespace, addresses, ttl_seconds);

        let topic = self.registry.get_or_create(namespace);
        let snapshot = topic.announce(record.clone());

        tracing::debug!(
            namespace = %namespace,
            peer = %peer,
            counter = counter,
            subscribers = snapshot.len(),
            "Registration announced"
        );

        for (subscriber, writer) in snapshot {
            let mut writer = writer.lock().await;
            if let Err(err) = writer.write_message(&record).await {
                tracing::error!(
                    namespace = %namespace,
                    subscriber = %subscriber,
                    error = %err,
                    "Unable to notify registration update"
                );
            }
        }
    }

    /// Active unregistration is not supported; registrations expire
    /// only by TTL
    pub fn unregister(&self, peer: &PeerId, namespace: &str) {
        tracing::debug!(
            namespace = %namespace,
            peer = %peer,
            "Unregister ignored; registrations expire by TTL"
        );
    }

    /// Produce the serialized descriptor a remote peer needs to target
    /// its subscribe request at this provider
    pub fn subscribe(&self, namespace: &str) -> Result<String> {
        let descriptor = SubscriptionDescriptor {
            peer_id: self.local_peer.as_str().to_string(),
            namespace: namespace.to_string(),
        };

        Ok(serde_json::to_string(&descriptor)?)
    }

    /// Run a session for an inbound stream to completion
    ///
    /// The transport substrate calls this with an established
    /// bidirectional stream bound to [`PROTOCOL_ID`] and the remote
    /// peer's identity.
    pub async fn handle_stream<S>(&self, remote: PeerId, stream: S)
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);

        Session::new(
            remote,
            Arc::clone(&self.registry),
            reader,
            Box::new(writer),
            self.config.max_frame_size,
        )
        .run()
        .await;
    }

    /// Spawn a detached session task for an inbound stream
    pub fn spawn_session<S>(&self, remote: PeerId, stream: S) -> JoinHandle<()>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);

        let session = Session::new(
            remote,
            Arc::clone(&self.registry),
            reader,
            Box::new(writer),
            self.config.max_frame_size,
        );

        tokio::spawn(session.run())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{duplex, split, DuplexStream};

    use super::*;
    use crate::registry::SubscriberWriter;
    use crate::wire::{FrameReader, FrameWriter, Request, DEFAULT_MAX_FRAME_SIZE};

    fn live_writer() -> (SubscriberWriter, FrameReader<DuplexStream>) {
        let (local, remote) = duplex(4096);

        let writer: SubscriberWriter = Arc::new(tokio::sync::Mutex::new(FrameWriter::new(
            Box::new(remote) as Box<dyn AsyncWrite + Send + Unpin>,
        )));

        (writer, FrameReader::new(local, DEFAULT_MAX_FRAME_SIZE))
    }

    fn broken_writer() -> SubscriberWriter {
        let (local, remote) = duplex(64);
        drop(remote);

        Arc::new(tokio::sync::Mutex::new(FrameWriter::new(
            Box::new(local) as Box<dyn AsyncWrite + Send + Unpin>,
        )))
    }

    #[tokio::test]
    async fn test_register_without_subscribers_caches_announcement() {
        let provider = SyncProvider::with_defaults(PeerId::from("host"));

        provider
            .register(
                &PeerId::from("p1"),
                "chat",
                vec![Bytes::from_static(&[0x01])],
                30,
                1,
            )
            .await;

        let topic = provider.registry().get_or_create("chat");
        let record = topic.last_announcement().unwrap();

        assert_eq!(record.peer_id, "p1");
        assert_eq!(record.namespace, "chat");
        assert_eq!(topic.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_neither_evicts_nor_blocks_delivery() {
        let provider = SyncProvider::with_defaults(PeerId::from("host"));
        let topic = provider.registry().get_or_create("chat");

        topic.add_subscriber(&PeerId::from("b"), broken_writer());
        let (writer, mut reader) = live_writer();
        topic.add_subscriber(&PeerId::from("c"), writer);

        provider
            .register(
                &PeerId::from("p1"),
                "chat",
                vec![Bytes::from_static(&[0x01])],
                30,
                1,
            )
            .await;
        provider
            .register(
                &PeerId::from("p1"),
                "chat",
                vec![Bytes::from_static(&[0x02])],
                30,
                2,
            )
            .await;

        // c received both broadcasts, in call order.
        let first: RegistrationRecord = reader.read_message().await.unwrap();
        let second: RegistrationRecord = reader.read_message().await.unwrap();
        assert_eq!(first.addresses, vec![Bytes::from_static(&[0x01])]);
        assert_eq!(second.addresses, vec![Bytes::from_static(&[0x02])]);

        // The failed writes left b subscribed; the next broadcast will
        // attempt it again.
        assert!(topic.is_subscribed(&PeerId::from("b")));
        assert_eq!(topic.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_unregister_is_a_noop() {
        let provider = SyncProvider::with_defaults(PeerId::from("host"));

        provider
            .register(&PeerId::from("p1"), "chat", vec![], 30, 1)
            .await;
        provider.unregister(&PeerId::from("p1"), "chat");

        let topic = provider.registry().get_or_create("chat");
        assert_eq!(topic.last_announcement().unwrap().peer_id, "p1");
    }

    #[test]
    fn test_subscribe_returns_descriptor() {
        let provider = SyncProvider::with_defaults(PeerId::from("host"));

        let serialized = provider.subscribe("chat").unwrap();
        let descriptor: SubscriptionDescriptor = serde_json::from_str(&serialized).unwrap();

        assert_eq!(descriptor.peer_id, "host");
        assert_eq!(descriptor.namespace, "chat");
    }

    #[test]
    fn test_identifier_surface() {
        let provider = SyncProvider::with_defaults(PeerId::from("host"));

        assert_eq!(provider.service_type(), "inmem");
        assert_eq!(provider.protocol_id(), "/rendezvous/sync/inmem/1.0.0");
    }

    #[tokio::test]
    async fn test_session_receives_live_updates() {
        let provider = SyncProvider::with_defaults(PeerId::from("host"));
        let (client, server) = duplex(4096);
        let _task = provider.spawn_session(PeerId::from("remote"), server);

        let (read_half, write_half) = split(client);
        let mut writer = FrameWriter::new(write_half);
        let mut reader = FrameReader::new(read_half, DEFAULT_MAX_FRAME_SIZE);

        writer
            .write_message(&Request::DiscoverSubscribe {
                namespace: "chat".to_string(),
            })
            .await
            .unwrap();

        // Wait for the session task to process the subscribe.
        let topic = provider.registry().get_or_create("chat");
        for _ in 0..200 {
            if topic.subscriber_count() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(topic.subscriber_count(), 1);

        provider
            .register(&PeerId::from("p1"), "chat", vec![], 30, 1)
            .await;

        let record: RegistrationRecord = reader.read_message().await.unwrap();
        assert_eq!(record.peer_id, "p1");
        assert_eq!(record.namespace, "chat");
    }
}
