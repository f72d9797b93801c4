//! Provider configuration

use crate::wire::DEFAULT_MAX_FRAME_SIZE;

/// Configuration options for a sync provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Maximum accepted inbound frame size in bytes
    ///
    /// Supplied by the transport; inbound frames above this limit fail
    /// the session's read permanently.
    pub max_frame_size: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl ProviderConfig {
    /// Set the maximum inbound frame size
    pub fn max_frame_size(mut self, size: usize) -> Self {
        self.max_frame_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProviderConfig::default();

        assert_eq!(config.max_frame_size, DEFAULT_MAX_FRAME_SIZE);
    }

    #[test]
    fn test_builder_max_frame_size() {
        let config = ProviderConfig::default().max_frame_size(1024);

        assert_eq!(config.max_frame_size, 1024);
    }
}
