//! Inbound stream session handler
//!
//! One session runs per inbound rendezvous sync stream. The loop is a
//! small state machine: await one framed request, dispatch it, repeat.
//! The first read failure (end-of-stream, decode error, oversized
//! frame) terminates the session, and termination removes the peer from
//! exactly the namespaces this session joined.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::FrameError;
use crate::peer::PeerId;
use crate::registry::{SubscriberWriter, Subscription, TopicRegistry};
use crate::wire::{FrameReader, FrameWriter, Request};

/// Handler for one inbound rendezvous sync stream
///
/// Joined namespaces are tracked locally rather than inferred from the
/// shared registry, so cleanup stays exact while unrelated namespaces
/// see concurrent activity.
pub struct Session<R> {
    remote: PeerId,
    registry: Arc<TopicRegistry>,
    reader: FrameReader<R>,
    writer: SubscriberWriter,
    joined: HashSet<String>,
}

impl<R: AsyncRead + Unpin> Session<R> {
    /// Create a session over a stream's two halves
    pub fn new(
        remote: PeerId,
        registry: Arc<TopicRegistry>,
        reader: R,
        writer: Box<dyn AsyncWrite + Send + Unpin>,
        max_frame_size: usize,
    ) -> Self {
        Self {
            remote,
            registry,
            reader: FrameReader::new(reader, max_frame_size),
            writer: Arc::new(tokio::sync::Mutex::new(FrameWriter::new(writer))),
            joined: HashSet::new(),
        }
    }

    /// Run the session until its stream fails
    ///
    /// A write failure is never fatal here; only the read side decides
    /// when the session ends.
    pub async fn run(mut self) {
        loop {
            let request = match self.reader.read_message::<Request>().await {
                Ok(request) => request,
                Err(err) => {
                    self.terminate(&err);
                    return;
                }
            };

            match request {
                Request::DiscoverSubscribe { namespace } => {
                    self.handle_subscribe(namespace).await;
                }
                other => {
                    tracing::trace!(peer = %self.remote, request = ?other, "Ignoring request");
                }
            }
        }
    }

    /// Join the peer to `namespace` and confirm with the cached
    /// announcement, if one exists
    async fn handle_subscribe(&mut self, namespace: String) {
        let topic = self.registry.get_or_create(&namespace);

        let confirmation = match topic.add_subscriber(&self.remote, Arc::clone(&self.writer)) {
            Subscription::Joined(last) => {
                self.joined.insert(namespace.clone());

                tracing::info!(
                    namespace = %namespace,
                    peer = %self.remote,
                    subscribers = topic.subscriber_count(),
                    "Subscriber added"
                );

                last
            }
            Subscription::Duplicate => return,
        };

        if let Some(record) = confirmation {
            let mut writer = self.writer.lock().await;
            if let Err(err) = writer.write_message(&record).await {
                tracing::error!(
                    namespace = %namespace,
                    peer = %self.remote,
                    error = %err,
                    "Unable to write announcement"
                );
            }
        }
    }

    /// Remove this peer from every namespace the session joined
    fn terminate(&self, err: &FrameError) {
        tracing::debug!(
            peer = %self.remote,
            joined = self.joined.len(),
            error = %err,
            "Session terminated"
        );

        for namespace in &self.joined {
            let topic = self.registry.get_or_create(namespace);
            topic.remove_subscriber(&self.remote);
        }
    }
}
