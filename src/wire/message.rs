//! Wire message schema
//!
//! Requests flow from a remote peer to the session handler; announcement
//! records flow back. Payloads are JSON; opaque address blobs are carried
//! as raw byte sequences.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A request received on a rendezvous sync stream
///
/// Only [`Request::DiscoverSubscribe`] is acted upon by this provider;
/// the remaining variants exist so that peers speaking the full
/// rendezvous protocol can share a stream without breaking the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Announce a registration to the rendezvous point
    Register { record: RegistrationRecord },
    /// Revoke a registration
    Unregister { peer_id: String, namespace: String },
    /// One-shot namespace query
    Discover { namespace: String, limit: u64 },
    /// Join the live update feed for a namespace
    DiscoverSubscribe { namespace: String },
}

/// Announcement of a peer's presence under a namespace
///
/// Immutable once built; a later registration for the same namespace
/// replaces the previous record wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    /// Announcing peer, in string form
    pub peer_id: String,
    /// Namespace the registration lives under
    pub namespace: String,
    /// Opaque transport addresses for the peer
    pub addresses: Vec<Bytes>,
    /// Absolute expiry, milliseconds since the Unix epoch
    pub expires_at_ms: i64,
}

impl RegistrationRecord {
    /// Build a record expiring `ttl_seconds` from now
    pub fn new(
        peer_id: impl Into<String>,
        namespace: impl Into<String>,
        addresses: Vec<Bytes>,
        ttl_seconds: u64,
    ) -> Self {
        let expires_at = SystemTime::now() + Duration::from_secs(ttl_seconds);
        let expires_at_ms = expires_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        Self {
            peer_id: peer_id.into(),
            namespace: namespace.into(),
            addresses,
            expires_at_ms,
        }
    }

    /// Whether the record's expiry has passed
    ///
    /// Consumers are expected to discard expired records; the registry
    /// itself never evaluates expiry.
    pub fn is_expired(&self) -> bool {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        self.expires_at_ms <= now_ms
    }
}

/// Hand-off details returned by a `subscribe` call
///
/// A remote peer uses the serialized form to target its
/// discover/subscribe request at the right peer and namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDescriptor {
    /// Peer hosting the subscription stream
    pub peer_id: String,
    /// Namespace to subscribe to
    pub namespace: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now_ms() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as i64
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let record = RegistrationRecord::new("p1", "chat", vec![], 0);

        // Expiry equals call time within clock resolution.
        assert!((record.expires_at_ms - now_ms()).abs() < 1_000);
        assert!(record.is_expired());
    }

    #[test]
    fn test_ttl_is_absolute_expiry() {
        let record = RegistrationRecord::new("p1", "chat", vec![], 30);

        let delta = record.expires_at_ms - now_ms();
        assert!(delta > 29_000 && delta <= 30_000);
        assert!(!record.is_expired());
    }

    #[test]
    fn test_request_discriminant_tag() {
        let request = Request::DiscoverSubscribe {
            namespace: "chat".to_string(),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""type":"discover_subscribe""#));

        match serde_json::from_str(&json).unwrap() {
            Request::DiscoverSubscribe { namespace } => assert_eq!(namespace, "chat"),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_record_addresses_survive_encoding() {
        let record = RegistrationRecord::new(
            "p1",
            "chat",
            vec![Bytes::from_static(&[0x01, 0x02]), Bytes::from_static(&[0xff])],
            30,
        );

        let json = serde_json::to_vec(&record).unwrap();
        let decoded: RegistrationRecord = serde_json::from_slice(&json).unwrap();

        assert_eq!(decoded, record);
    }
}
