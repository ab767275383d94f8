//! The access session: session state plus the permission store behind one
//! handle.
//!
//! One `AccessSession` exists per running client. Route guards and fragment
//! gates read it through [`AccessSession::context`], which returns session
//! and permission state captured together.
//!
//! Lock order is always session first, store second. Logout clears the store
//! while holding the session lock, so no evaluation can observe "logged out"
//! alongside the previous identity's permissions.

use crate::access::AccessCheck;
use crate::backend::{BearerToken, PermissionSource};
use crate::store::{PermissionStore, RefreshOutcome};
use schooldesk_models::{Identity, PermissionSnapshot};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// Who is logged in, and whether that is still being worked out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub auth_loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Inputs of one guard evaluation cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessContext {
    pub identity: Option<Identity>,
    pub auth_loading: bool,
    pub permissions_loading: bool,
    pub snapshot: PermissionSnapshot,
}

impl AccessCheck for AccessContext {
    fn has_permission(&self, code: &str) -> bool {
        self.snapshot.has_permission(code)
    }

    fn can_access_module(&self, module: &str) -> bool {
        self.snapshot.can_access_module(module)
    }
}

/// Explicit handle owning session state and the permission store.
pub struct AccessSession<S> {
    session: RwLock<SessionState>,
    store: PermissionStore<S>,
    credentials: Option<BearerToken>,
}

impl<S> std::fmt::Debug for AccessSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessSession")
            .field("store", &self.store)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl<S: PermissionSource> AccessSession<S> {
    /// Creates a session whose authentication is still unresolved.
    ///
    /// Call [`restore`](Self::restore) once the persisted login, if any, has
    /// been read.
    pub fn new(store: PermissionStore<S>) -> Self {
        Self {
            session: RwLock::new(SessionState {
                identity: None,
                auth_loading: true,
            }),
            store,
            credentials: None,
        }
    }

    /// Shares a bearer credential slot with the backend client so login and
    /// logout update it.
    pub fn with_credentials(mut self, credentials: BearerToken) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn store(&self) -> &PermissionStore<S> {
        &self.store
    }

    pub fn session(&self) -> SessionState {
        self.read_session().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read_session().identity.clone()
    }

    /// Session and permission state captured together.
    pub fn context(&self) -> AccessContext {
        let session = self.read_session();
        AccessContext {
            identity: session.identity.clone(),
            auth_loading: session.auth_loading,
            permissions_loading: self.store.is_loading(),
            snapshot: self.store.snapshot(),
        }
    }

    /// Receiver bumped on every session or permission change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.store.subscribe()
    }

    /// Marks authentication as in progress, e.g. while a login request is
    /// pending.
    pub fn begin_auth(&self) {
        self.write_session().auth_loading = true;
        self.store.notify();
    }

    /// Resolves startup authentication with the persisted identity, if any.
    pub async fn restore(&self, identity: Option<Identity>) -> RefreshOutcome {
        match identity {
            Some(identity) => self.login(identity).await,
            None => {
                self.logout();
                RefreshOutcome::Skipped
            }
        }
    }

    /// Authenticates `identity` and fetches its permissions.
    pub async fn login(&self, identity: Identity) -> RefreshOutcome {
        self.authenticate(identity);
        self.store.refresh().await
    }

    /// Stores the bearer credential, then logs in.
    pub async fn sign_in(&self, identity: Identity, token: impl Into<String>) -> RefreshOutcome {
        if let Some(credentials) = &self.credentials {
            credentials.set(token);
        }
        self.login(identity).await
    }

    /// Re-fetches permissions for the current identity.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.store.refresh().await
    }

    /// Drops the identity, wipes permissions and the cache, and forgets the
    /// credential.
    pub fn logout(&self) {
        let previous = {
            let mut session = self.write_session();
            self.store.clear();
            if let Some(credentials) = &self.credentials {
                credentials.clear();
            }
            session.auth_loading = false;
            session.identity.take()
        };

        if let Some(identity) = previous {
            info!(user_id = %identity.id, role = %identity.role, "Logged out");
        }
        self.store.notify();
    }

    fn authenticate(&self, identity: Identity) {
        {
            let mut session = self.write_session();
            self.store.activate(&identity);
            info!(user_id = %identity.id, role = %identity.role, "Authenticated");
            session.identity = Some(identity);
            session.auth_loading = false;
        }
        self.store.notify();
    }

    fn read_session(&self) -> RwLockReadGuard<'_, SessionState> {
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_session(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.session.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl<S: PermissionSource + 'static> AccessSession<S> {
    /// Logs in on a background task so the caller can keep rendering.
    ///
    /// The identity is authenticated before this returns; only the fetch
    /// runs in the background.
    pub fn spawn_login(self: &Arc<Self>, identity: Identity) -> JoinHandle<RefreshOutcome> {
        self.authenticate(identity);
        let this = Arc::clone(self);
        tokio::spawn(async move { this.store.refresh().await })
    }
}
