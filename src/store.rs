//! The permission store.
//!
//! Holds the current [`PermissionSnapshot`], hydrated synchronously from the
//! durable cache on construction and replaced wholesale by each successful
//! refresh. Every refresh is tagged with the identity epoch it was issued in;
//! a result that settles after a logout or identity switch is discarded.

use crate::backend::PermissionSource;
use chrono::Utc;
use schooldesk_cache::PermissionCache;
use schooldesk_models::{
    FetchState, Identity, PermissionSet, PermissionSnapshot, SidebarItem, UserId,
};
use schooldesk_observability::track_permission_refresh;
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

/// How a call to [`PermissionStore::refresh`] settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The snapshot was replaced and the cache rewritten.
    Updated,
    /// The fetch failed; the previous snapshot is untouched.
    Failed,
    /// The identity changed while the fetch was in flight.
    Discarded,
    /// There was no identity to fetch for.
    Skipped,
}

impl RefreshOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshOutcome::Updated => "success",
            RefreshOutcome::Failed => "failed",
            RefreshOutcome::Discarded => "discarded",
            RefreshOutcome::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    snapshot: PermissionSnapshot,
    /// Identity that produced the data currently in `snapshot`.
    data_owner: Option<UserId>,
    /// Identity the store is currently serving.
    identity: Option<UserId>,
    /// Bumped on every identity change; refreshes carry the epoch they started in.
    epoch: u64,
    /// Whether a fetch has settled for the current identity.
    settled: bool,
    in_flight: usize,
}

impl StoreState {
    fn settle_fetch_state(&mut self) {
        self.snapshot.fetch_state = if self.in_flight > 0 {
            FetchState::Fetching
        } else if self.settled {
            FetchState::Settled
        } else {
            FetchState::NeverFetched
        };
    }
}

/// In-memory permission state shared by route guards and fragment gates.
pub struct PermissionStore<S> {
    source: S,
    cache: PermissionCache,
    /// Serializes cache writes against `clear`. Taken before `state`, never
    /// while holding it.
    cache_writes: Mutex<()>,
    state: RwLock<StoreState>,
    changes: watch::Sender<u64>,
}

impl<S> std::fmt::Debug for PermissionStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionStore")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<S: PermissionSource> PermissionStore<S> {
    /// Creates a store and hydrates it from the cache.
    ///
    /// Hydration is synchronous so the first evaluation already sees the last
    /// known permissions.
    pub fn new(source: S, cache: PermissionCache) -> Self {
        let cached = cache.load();
        debug!(
            permissions = cached.permissions.len(),
            sidebar = cached.sidebar.len(),
            "Hydrated permission store from cache"
        );

        let state = StoreState {
            snapshot: PermissionSnapshot::hydrated(cached.permissions, cached.sidebar),
            data_owner: cached.owner,
            ..StoreState::default()
        };
        let (changes, _) = watch::channel(0);

        Self {
            source,
            cache,
            cache_writes: Mutex::new(()),
            state: RwLock::new(state),
            changes,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> PermissionSnapshot {
        self.read().snapshot.clone()
    }

    pub fn fetch_state(&self) -> FetchState {
        self.read().snapshot.fetch_state
    }

    /// True while an identity is active and no fetch has settled for it yet.
    ///
    /// Background refreshes after the first one never report loading.
    pub fn is_loading(&self) -> bool {
        let state = self.read();
        state.identity.is_some() && !state.settled
    }

    /// The sidebar in backend order.
    pub fn visible_sidebar(&self) -> Vec<SidebarItem> {
        self.read().snapshot.sidebar.clone()
    }

    pub fn permissions(&self) -> PermissionSet {
        self.read().snapshot.permissions.clone()
    }

    /// Receiver bumped on every observable change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Starts serving `identity`.
    ///
    /// Switching to a different identity resets the loading state. Data not
    /// known to belong to `identity` (fetched for someone else, or hydrated
    /// without an owner) is dropped before any fetch for it starts.
    pub fn activate(&self, identity: &Identity) {
        {
            let mut state = self.write();
            if state.identity == Some(identity.id) {
                return;
            }

            state.epoch += 1;
            state.identity = Some(identity.id);
            state.settled = false;
            state.in_flight = 0;

            if state.data_owner != Some(identity.id) && !state.snapshot.is_empty() {
                info!(user_id = %identity.id, "Dropping permissions not owned by this identity");
                state.snapshot = PermissionSnapshot::empty();
                state.data_owner = None;
            }
            state.settle_fetch_state();
        }
        self.notify();
    }

    /// Wipes the snapshot and the durable cache.
    pub fn clear(&self) {
        {
            let mut state = self.write();
            state.epoch += 1;
            state.identity = None;
            state.settled = false;
            state.in_flight = 0;
            state.data_owner = None;
            state.snapshot = PermissionSnapshot::empty();
        }
        {
            let _writes = self.lock_cache_writes();
            self.cache.clear();
        }
        info!("Permission store cleared");
        self.notify();
    }

    /// Re-fetches permissions for the active identity.
    ///
    /// Never fails: a fetch error is logged and the current snapshot kept.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let (epoch, identity) = {
            let mut state = self.write();
            let Some(identity) = state.identity else {
                debug!("Skipping permission refresh without an identity");
                return RefreshOutcome::Skipped;
            };
            state.in_flight += 1;
            state.settle_fetch_state();
            (state.epoch, identity)
        };
        self.notify();

        let result = self.source.fetch_permissions().await;

        let mut updated = false;
        let outcome = {
            let mut state = self.write();
            if state.epoch != epoch {
                warn!(user_id = %identity, "Discarding permissions fetched for a previous identity");
                RefreshOutcome::Discarded
            } else {
                state.in_flight = state.in_flight.saturating_sub(1);
                state.settled = true;

                let outcome = match result {
                    Ok(response) => {
                        state.snapshot = PermissionSnapshot::from_response(response, Utc::now());
                        state.data_owner = Some(identity);
                        updated = true;
                        info!(
                            user_id = %identity,
                            permissions = state.snapshot.permissions.len(),
                            sidebar = state.snapshot.sidebar.len(),
                            "Permissions refreshed"
                        );
                        RefreshOutcome::Updated
                    }
                    Err(e) => {
                        error!(user_id = %identity, error = %e, "Failed to refresh permissions");
                        RefreshOutcome::Failed
                    }
                };
                state.settle_fetch_state();
                outcome
            }
        };

        if updated {
            self.write_through(epoch, identity);
        }

        track_permission_refresh(outcome.as_str());
        if outcome != RefreshOutcome::Discarded {
            self.notify();
        }
        outcome
    }

    /// Persists the current snapshot unless the identity changed since
    /// `epoch`.
    ///
    /// The latest snapshot is written, not the caller's, so overlapping
    /// refreshes cannot leave an older result on disk. `clear` bumps the epoch
    /// before taking the write lock, so a save that loses the race to a logout
    /// is skipped.
    fn write_through(&self, epoch: u64, identity: UserId) {
        let _writes = self.lock_cache_writes();
        let (permissions, sidebar) = {
            let state = self.read();
            if state.epoch != epoch {
                debug!(user_id = %identity, "Skipping cache write for a previous identity");
                return;
            }
            (state.snapshot.permissions.clone(), state.snapshot.sidebar.clone())
        };
        self.cache.save(&permissions, &sidebar, Some(identity));
    }

    fn lock_cache_writes(&self) -> std::sync::MutexGuard<'_, ()> {
        self.cache_writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn notify(&self) {
        self.changes.send_modify(|version| *version = version.wrapping_add(1));
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessCheck;
    use crate::backend::FetchError;
    use reqwest::StatusCode;
    use schooldesk_cache::{CacheError, KeyValueStore, MemoryStore};
    use schooldesk_models::{PermissionsResponse, Role};
    use std::collections::VecDeque;
    use std::sync::{Arc, OnceLock, Weak};

    /// Replays scripted responses in order.
    #[derive(Default)]
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<PermissionsResponse, FetchError>>>,
    }

    impl ScriptedSource {
        fn push_ok(&self, permissions: &[&str], modules: &[&str]) {
            self.responses.lock().unwrap().push_back(Ok(PermissionsResponse {
                permissions: permissions.iter().map(|p| p.to_string()).collect(),
                sidebar: modules.iter().map(|m| SidebarItem::new(*m)).collect(),
            }));
        }

        fn push_err(&self) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR)));
        }
    }

    impl PermissionSource for ScriptedSource {
        async fn fetch_permissions(&self) -> Result<PermissionsResponse, FetchError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE)))
        }
    }

    fn store_with(kv: Arc<MemoryStore>) -> PermissionStore<ScriptedSource> {
        PermissionStore::new(ScriptedSource::default(), PermissionCache::new(kv, "test"))
    }

    fn bursar() -> Identity {
        Identity::new(UserId::from_u128(1), Role::Bursar)
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshot() {
        let store = store_with(Arc::new(MemoryStore::new()));
        store.source().push_ok(&["a", "b"], &["x"]);
        store.activate(&bursar());

        assert_eq!(store.refresh().await, RefreshOutcome::Updated);

        let snapshot = store.snapshot();
        assert!(snapshot.has_all_permissions(&["a", "b"]));
        assert!(!snapshot.has_permission("c"));
        assert!(snapshot.can_access_module("x"));
        assert!(!snapshot.can_access_module("y"));
        assert_eq!(snapshot.fetch_state, FetchState::Settled);
        assert!(snapshot.refreshed_at.is_some());
    }

    #[tokio::test]
    async fn test_refresh_never_patches() {
        let store = store_with(Arc::new(MemoryStore::new()));
        store.source().push_ok(&["a", "b"], &["x"]);
        store.source().push_ok(&["c"], &[]);
        store.activate(&bursar());

        store.refresh().await;
        store.refresh().await;

        let snapshot = store.snapshot();
        assert!(!snapshot.has_permission("a"));
        assert!(snapshot.has_permission("c"));
        assert!(snapshot.sidebar.is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_snapshot() {
        let store = store_with(Arc::new(MemoryStore::new()));
        store.source().push_ok(&["a"], &["x"]);
        store.source().push_err();
        store.activate(&bursar());

        store.refresh().await;
        let before = store.snapshot();

        assert_eq!(store.refresh().await, RefreshOutcome::Failed);
        let after = store.snapshot();
        assert_eq!(before.permissions, after.permissions);
        assert_eq!(before.sidebar, after.sidebar);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_loading_until_first_fetch_settles() {
        let store = store_with(Arc::new(MemoryStore::new()));
        assert!(!store.is_loading());

        store.activate(&bursar());
        assert!(store.is_loading());

        store.source().push_err();
        store.refresh().await;
        assert!(!store.is_loading());
        assert_eq!(store.fetch_state(), FetchState::Settled);
    }

    #[tokio::test]
    async fn test_refresh_without_identity_is_skipped() {
        let store = store_with(Arc::new(MemoryStore::new()));
        assert_eq!(store.refresh().await, RefreshOutcome::Skipped);
        assert_eq!(store.fetch_state(), FetchState::NeverFetched);
    }

    #[tokio::test]
    async fn test_refresh_writes_through_to_cache() {
        let kv = Arc::new(MemoryStore::new());
        let store = store_with(kv.clone());
        store.source().push_ok(&["fees.view"], &["fees"]);
        store.activate(&bursar());
        store.refresh().await;

        let reloaded = store_with(kv);
        assert!(reloaded.snapshot().has_permission("fees.view"));
        assert_eq!(reloaded.fetch_state(), FetchState::NeverFetched);
    }

    #[tokio::test]
    async fn test_clear_wipes_snapshot_and_cache() {
        let kv = Arc::new(MemoryStore::new());
        let store = store_with(kv.clone());
        store.source().push_ok(&["a"], &["x"]);
        store.activate(&bursar());
        store.refresh().await;

        store.clear();

        assert!(!store.snapshot().has_permission("a"));
        assert_eq!(store.fetch_state(), FetchState::NeverFetched);
        assert!(kv.get("test:permissions").unwrap().is_none());
        assert!(kv.get("test:sidebar").unwrap().is_none());
        assert!(!store_with(kv).snapshot().has_permission("a"));
    }

    #[tokio::test]
    async fn test_activate_other_identity_drops_hydrated_data() {
        let kv = Arc::new(MemoryStore::new());
        let store = store_with(kv.clone());
        store.source().push_ok(&["a"], &["x"]);
        store.activate(&bursar());
        store.refresh().await;

        let restarted = store_with(kv);
        assert!(restarted.snapshot().has_permission("a"));

        restarted.activate(&Identity::new(UserId::from_u128(2), Role::ClassTeacher));
        assert!(!restarted.snapshot().has_permission("a"));
    }

    #[test]
    fn test_activate_drops_hydrated_data_without_owner() {
        let kv = Arc::new(MemoryStore::new());
        PermissionCache::new(kv.clone(), "test").save(
            &["fees.record_payment"].into_iter().collect(),
            &[SidebarItem::new("fees")],
            None,
        );

        let store = store_with(kv);
        assert!(store.snapshot().has_permission("fees.record_payment"));

        store.activate(&bursar());
        assert!(!store.snapshot().has_permission("fees.record_payment"));
        assert!(!store.snapshot().can_access_module("fees"));
    }

    /// Records whether the store's state was free while the cache was written.
    #[derive(Default)]
    struct LockCheckingStore {
        inner: MemoryStore,
        store: OnceLock<Weak<PermissionStore<ScriptedSource>>>,
        state_free_on_write: Mutex<Vec<bool>>,
    }

    impl KeyValueStore for LockCheckingStore {
        fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
            if let Some(store) = self.store.get().and_then(Weak::upgrade) {
                let free = store.state.try_write().is_ok();
                self.state_free_on_write.lock().unwrap().push(free);
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), CacheError> {
            self.inner.remove(key)
        }
    }

    #[tokio::test]
    async fn test_cache_written_outside_state_lock() {
        let kv = Arc::new(LockCheckingStore::default());
        let store = Arc::new(PermissionStore::new(
            ScriptedSource::default(),
            PermissionCache::new(kv.clone(), "test"),
        ));
        kv.store.set(Arc::downgrade(&store)).ok();
        store.source().push_ok(&["a"], &["x"]);
        store.activate(&bursar());

        assert_eq!(store.refresh().await, RefreshOutcome::Updated);

        let writes = kv.state_free_on_write.lock().unwrap().clone();
        assert!(!writes.is_empty());
        assert!(writes.iter().all(|free| *free));
        assert!(kv.get("test:permissions").unwrap().is_some());
    }

    #[test]
    fn test_cache_write_skipped_after_logout() {
        let kv = Arc::new(MemoryStore::new());
        let store = store_with(kv.clone());
        store.activate(&bursar());
        let epoch = store.read().epoch;

        store.clear();
        store.write_through(epoch, bursar().id);

        assert!(kv.get("test:permissions").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_activate_same_owner_keeps_hydrated_data() {
        let kv = Arc::new(MemoryStore::new());
        let store = store_with(kv.clone());
        store.source().push_ok(&["a"], &["x"]);
        store.activate(&bursar());
        store.refresh().await;

        let restarted = store_with(kv);
        restarted.activate(&bursar());
        assert!(restarted.snapshot().has_permission("a"));
        assert!(restarted.is_loading());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = store_with(Arc::new(MemoryStore::new()));
        let mut rx = store.subscribe();
        store.activate(&bursar());
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        store.source().push_ok(&["a"], &[]);
        store.refresh().await;
        assert!(rx.has_changed().unwrap());
    }
}
