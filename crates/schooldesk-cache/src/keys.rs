//! Cache key generation.
//!
//! The permission cache uses a fixed set of named entries under one prefix.
//! The permission list and the sidebar list are always written and removed
//! together.

const PERMISSIONS: &str = "permissions";
const SIDEBAR: &str = "sidebar";
const OWNER: &str = "owner";

/// Builds a cache key with the given prefix.
fn build_key(prefix: &str, name: &str) -> String {
    format!("{}:{}", prefix, name)
}

/// Fully-qualified names of the permission cache entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheKeys {
    pub permissions: String,
    pub sidebar: String,
    /// Id of the identity whose fetch produced the cached data.
    pub owner: String,
}

impl CacheKeys {
    pub fn new(prefix: &str) -> Self {
        Self {
            permissions: build_key(prefix, PERMISSIONS),
            sidebar: build_key(prefix, SIDEBAR),
            owner: build_key(prefix, OWNER),
        }
    }

    pub fn all(&self) -> [&str; 3] {
        [&self.permissions, &self.sidebar, &self.owner]
    }
}
