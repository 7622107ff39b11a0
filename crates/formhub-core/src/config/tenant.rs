//! Tenant resolution configuration.

use serde::{Deserialize, Serialize};

/// Settings for the tenant resolver cache and key extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    /// TTL of a cached tenant lookup in seconds. A suspension takes at most
    /// this long to become visible.
    #[serde(default = "default_ttl")]
    pub cache_ttl_seconds: u64,
    /// Maximum number of cached tenant keys.
    #[serde(default = "default_capacity")]
    pub cache_capacity: u64,
    /// Legacy request header carrying the public tenant key.
    #[serde(default = "default_header")]
    pub header_name: String,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: default_ttl(),
            cache_capacity: default_capacity(),
            header_name: default_header(),
        }
    }
}

fn default_ttl() -> u64 {
    60
}

fn default_capacity() -> u64 {
    10_000
}

fn default_header() -> String {
    "x-tenant-key".to_string()
}
