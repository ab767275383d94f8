//! The permission cache: last-fetched permission codes and sidebar.

use crate::keys::CacheKeys;
use crate::store::{CacheError, KeyValueStore};
use schooldesk_models::{PermissionSet, SidebarItem, UserId};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Data recovered from the durable cache at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachedPermissions {
    pub permissions: PermissionSet,
    pub sidebar: Vec<SidebarItem>,
    /// Identity that wrote the entries, if recorded.
    pub owner: Option<UserId>,
}

/// Best-effort cache of the permission snapshot.
///
/// The cache is an optimization: every failure is logged and otherwise
/// ignored.
#[derive(Clone)]
pub struct PermissionCache {
    store: Arc<dyn KeyValueStore>,
    keys: CacheKeys,
}

impl std::fmt::Debug for PermissionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionCache")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl PermissionCache {
    pub fn new(store: Arc<dyn KeyValueStore>, key_prefix: &str) -> Self {
        Self {
            store,
            keys: CacheKeys::new(key_prefix),
        }
    }

    /// Reads the cached permission set and sidebar.
    ///
    /// Absent or corrupt entries yield empty results. The entries are treated
    /// as a unit: if any of them is corrupt, all are discarded. Data without
    /// an owner entry loads with `owner: None`.
    #[instrument(skip(self))]
    pub fn load(&self) -> CachedPermissions {
        let permissions = self.read_entry::<Vec<String>>(&self.keys.permissions);
        let sidebar = self.read_entry::<Vec<SidebarItem>>(&self.keys.sidebar);
        let owner = self.read_entry::<UserId>(&self.keys.owner);

        let (permissions, sidebar, owner) = match (permissions, sidebar, owner) {
            (Ok(p), Ok(s), Ok(o)) => (p.unwrap_or_default(), s.unwrap_or_default(), o),
            _ => return CachedPermissions::default(),
        };

        debug!(
            cache.permissions = permissions.len(),
            cache.sidebar = sidebar.len(),
            "Permission cache loaded"
        );

        CachedPermissions {
            permissions: permissions.into_iter().collect(),
            sidebar,
            owner,
        }
    }

    /// Writes the permission set and sidebar, tagged with their owner.
    ///
    /// The owner entry is removed first and written last, so an interrupted
    /// save leaves data with no owner rather than under a stale one.
    #[instrument(skip(self, permissions, sidebar))]
    pub fn save(&self, permissions: &PermissionSet, sidebar: &[SidebarItem], owner: Option<UserId>) {
        if let Err(e) = self.try_save(permissions, sidebar, owner) {
            warn!(error = %e, "Failed to write permission cache");
        }
    }

    /// Deletes every permission cache entry.
    #[instrument(skip(self))]
    pub fn clear(&self) {
        for key in self.keys.all() {
            if let Err(e) = self.store.remove(key) {
                warn!(error = %e, cache.key = %key, "Failed to clear permission cache entry");
            }
        }
    }

    fn try_save(
        &self,
        permissions: &PermissionSet,
        sidebar: &[SidebarItem],
        owner: Option<UserId>,
    ) -> Result<(), CacheError> {
        self.store.remove(&self.keys.owner)?;
        self.store
            .set(&self.keys.permissions, &serde_json::to_string(permissions)?)?;
        self.store
            .set(&self.keys.sidebar, &serde_json::to_string(sidebar)?)?;
        if let Some(id) = owner {
            self.store.set(&self.keys.owner, &serde_json::to_string(&id)?)?;
        }
        Ok(())
    }

    fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ()> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(error = %e, cache.key = %key, "Failed to read permission cache entry");
                return Err(());
            }
        };

        serde_json::from_str(&raw).map(Some).map_err(|e| {
            warn!(error = %e, cache.key = %key, "Discarding corrupt permission cache entry");
        })
    }
}
