//! Peer identity
//!
//! Peers are identified by a stable, opaque string supplied by the
//! transport layer (e.g. a libp2p-style multihash rendering). The
//! registry only requires equality, hashing and display.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a peer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    /// Create a peer id from its string form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PeerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_input() {
        let peer = PeerId::new("12D3KooWExample");
        assert_eq!(peer.to_string(), "12D3KooWExample");
        assert_eq!(peer.as_str(), "12D3KooWExample");
    }

    #[test]
    fn test_equality_and_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(PeerId::from("a"));
        set.insert(PeerId::from("a"));
        set.insert(PeerId::from("b"));

        assert_eq!(set.len(), 2);
    }
}
