//! The permission snapshot owned by the permission store.

use crate::permissions::{PermissionSet, PermissionsResponse, SidebarItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress of the backend fetch behind a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchState {
    #[default]
    NeverFetched,
    Fetching,
    Settled,
}

/// Permission set, sidebar and fetch state as one unit.
///
/// While `fetch_state` is [`FetchState::Fetching`] the data of the previous
/// snapshot stays in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionSnapshot {
    pub permissions: PermissionSet,
    pub sidebar: Vec<SidebarItem>,
    pub fetch_state: FetchState,
    /// When the last fetch settled successfully.
    #[serde(default)]
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl PermissionSnapshot {
    /// Empty snapshot in the `never-fetched` state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot built from cached data; nothing has been fetched yet.
    pub fn hydrated(permissions: PermissionSet, sidebar: Vec<SidebarItem>) -> Self {
        Self {
            permissions,
            sidebar,
            fetch_state: FetchState::NeverFetched,
            refreshed_at: None,
        }
    }

    /// Settled snapshot built from a backend response.
    pub fn from_response(response: PermissionsResponse, refreshed_at: DateTime<Utc>) -> Self {
        Self {
            permissions: response.permissions.into_iter().collect(),
            sidebar: response.sidebar,
            fetch_state: FetchState::Settled,
            refreshed_at: Some(refreshed_at),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.sidebar.is_empty()
    }
}
