//! Topic registry implementation
//!
//! The central registry mapping namespaces to topics. Topics are
//! created lazily on first reference and never deleted; namespaces
//! accumulate for the registry's lifetime.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::topic::Topic;

/// Central namespace → topic map
///
/// The registry guard serializes topic creation and lookup only; all
/// membership and announcement state lives behind each topic's own
/// guard. The registry guard is never acquired while a topic guard is
/// held.
pub struct TopicRegistry {
    topics: Mutex<HashMap<String, Arc<Topic>>>,
}

impl TopicRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            topics: Mutex::new(HashMap::new()),
        }
    }

    /// Get the topic for `namespace`, creating it on first reference
    ///
    /// Idempotent: every call for the same namespace returns a handle to
    /// the same topic instance.
    pub fn get_or_create(&self, namespace: &str) -> Arc<Topic> {
        let mut topics = self.topics.lock();

        match topics.entry(namespace.to_string()) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                let topic = Arc::new(Topic::new(namespace));
                entry.insert(Arc::clone(&topic));

                tracing::debug!(namespace = %namespace, "Topic created");
                topic
            }
        }
    }

    /// Number of namespaces seen so far
    pub fn topic_count(&self) -> usize {
        self.topics.lock().len()
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_returns_same_instance() {
        let registry = TopicRegistry::new();

        let first = registry.get_or_create("chat");
        let second = registry.get_or_create("chat");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.topic_count(), 1);
    }

    #[test]
    fn test_namespaces_are_independent() {
        let registry = TopicRegistry::new();

        let chat = registry.get_or_create("chat");
        let files = registry.get_or_create("files");

        assert!(!Arc::ptr_eq(&chat, &files));
        assert_eq!(chat.namespace(), "chat");
        assert_eq!(files.namespace(), "files");
        assert_eq!(registry.topic_count(), 2);
    }

    #[test]
    fn test_creation_is_exactly_once_under_contention() {
        let registry = Arc::new(TopicRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.get_or_create("chat"))
            })
            .collect();

        let topics: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(registry.topic_count(), 1);
        for topic in &topics[1..] {
            assert!(Arc::ptr_eq(&topics[0], topic));
        }
    }
}
