//! # Schooldesk Cache
//!
//! Durable permission cache for the schooldesk client.
//!
//! This crate provides:
//! - A synchronous key-value store abstraction with file-backed and in-memory implementations
//! - The permission cache (load, save, clear) layered on top of it
//! - Cache configuration from environment variables
//! - Cache key generation
//!
//! Loading never fails: absent or corrupt entries come back empty. Saving and
//! clearing are best-effort and only log on failure.
//!
//! # Example
//!
//! ```ignore
//! use schooldesk_cache::{CacheConfig, FileStore, PermissionCache};
//! use std::sync::Arc;
//!
//! let config = CacheConfig::from_env();
//! let cache = PermissionCache::new(Arc::new(FileStore::new(&config.dir)), &config.key_prefix);
//!
//! let cached = cache.load();
//! println!("{} cached permissions", cached.permissions.len());
//! ```

pub mod config;
pub mod keys;
pub mod permissions;
pub mod store;

pub use config::CacheConfig;
pub use keys::CacheKeys;
pub use permissions::{CachedPermissions, PermissionCache};
pub use store::{CacheError, FileStore, KeyValueStore, MemoryStore};
