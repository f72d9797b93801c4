//! Per-namespace topic state
//!
//! A topic owns its subscriber map and the cached most recent
//! announcement behind its own guard. The guard covers map and field
//! mutation only; it is never held across a stream write, so a slow or
//! dead subscriber cannot block new subscriptions or future
//! registrations.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::peer::PeerId;
use crate::wire::{BoxedFrameWriter, RegistrationRecord};

/// Shared handle to a subscriber's outbound frame writer
///
/// The async mutex serializes a session's confirmation write with
/// broadcast writes targeting the same peer.
pub type SubscriberWriter = Arc<tokio::sync::Mutex<BoxedFrameWriter>>;

/// Outcome of attempting to add a subscriber to a topic
#[derive(Debug)]
pub enum Subscription {
    /// Peer was added; carries the cached announcement to confirm with
    Joined(Option<RegistrationRecord>),
    /// Peer already held a subscription; nothing changed
    Duplicate,
}

/// State for one namespace: live subscribers plus the most recent
/// announcement
pub struct Topic {
    namespace: String,
    state: Mutex<TopicState>,
}

#[derive(Default)]
struct TopicState {
    subscribers: HashMap<PeerId, SubscriberWriter>,
    last_announcement: Option<RegistrationRecord>,
}

impl Topic {
    pub(crate) fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            state: Mutex::new(TopicState::default()),
        }
    }

    /// The namespace this topic serves
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Add a subscriber, unless the peer is already one
    ///
    /// On insertion the cached last announcement is returned alongside,
    /// captured in the same critical section, so the caller can push it
    /// to the new subscriber as its confirmation.
    pub fn add_subscriber(&self, peer: &PeerId, writer: SubscriberWriter) -> Subscription {
        let mut state = self.state.lock();

        if state.subscribers.contains_key(peer) {
            return Subscription::Duplicate;
        }

        state.subscribers.insert(peer.clone(), writer);
        Subscription::Joined(state.last_announcement.clone())
    }

    /// Remove a subscriber; returns whether the peer was present
    pub fn remove_subscriber(&self, peer: &PeerId) -> bool {
        self.state.lock().subscribers.remove(peer).is_some()
    }

    /// Store `record` as the last announcement and snapshot the
    /// subscribers to notify
    ///
    /// The snapshot is an owned copy taken under the guard; the caller
    /// performs the actual writes after the guard is released. A
    /// subscriber added after the snapshot misses this broadcast and is
    /// confirmed with the cached record instead.
    pub fn announce(&self, record: RegistrationRecord) -> Vec<(PeerId, SubscriberWriter)> {
        let mut state = self.state.lock();
        state.last_announcement = Some(record);

        state
            .subscribers
            .iter()
            .map(|(peer, writer)| (peer.clone(), Arc::clone(writer)))
            .collect()
    }

    /// Whether `peer` currently holds a subscription
    pub fn is_subscribed(&self, peer: &PeerId) -> bool {
        self.state.lock().subscribers.contains_key(peer)
    }

    /// Number of live subscriber entries
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    /// The most recent announcement, if any registration has been seen
    pub fn last_announcement(&self) -> Option<RegistrationRecord> {
        self.state.lock().last_announcement.clone()
    }
}
