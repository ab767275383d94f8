//! # Schooldesk Models
//!
//! Data structures shared by the schooldesk access-control layer.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed identifiers
//! - [`roles`]: The four school roles
//! - [`identity`]: The authenticated user descriptor
//! - [`permissions`]: Permission sets, sidebar descriptors and the backend response
//! - [`snapshot`]: The cached permission snapshot and its fetch state
//!
//! # Example
//!
//! ```ignore
//! use schooldesk_models::{Identity, PermissionSnapshot, Role, UserId};
//!
//! let identity = Identity::new(UserId::new(), Role::Bursar);
//! let snapshot = PermissionSnapshot::default();
//! assert!(snapshot.permissions.is_empty());
//! ```

pub mod identity;
pub mod ids;
pub mod permissions;
pub mod roles;
pub mod snapshot;

pub use identity::Identity;
pub use ids::{SchoolId, UserId};
pub use permissions::{PermissionSet, PermissionsResponse, SidebarItem};
pub use roles::{ParseRoleError, Role};
pub use snapshot::{FetchState, PermissionSnapshot};
