//! # Schooldesk
//!
//! Client-side access control for the schooldesk school management system.
//!
//! ## Overview
//!
//! The schooldesk front-end serves role-based dashboards (director, head
//! teacher, class teacher, bursar) and administration views over a REST
//! backend. This crate is the part that decides who may see what:
//!
//! - **Session state**: the authenticated identity, if any
//! - **Permission store**: the current permission set and sidebar, hydrated
//!   from a durable cache and refreshed from the backend on login
//! - **Access evaluator**: pure permission and module queries
//! - **Route guard**: allow, wait, or redirect for a whole view
//! - **Fragment gate**: show a piece of UI or its fallback
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── access/          # Evaluator, route guard, fragment gate
//! ├── backend.rs       # "My permissions" client and request signing
//! ├── cli.rs           # Command-line entry points
//! ├── routes.rs        # Application views and their guards
//! ├── session.rs       # AccessSession: session state + permission store
//! └── store.rs         # Permission store
//! ```
//!
//! ## Flow
//!
//! ```text
//! login ─▶ AccessSession ─▶ PermissionStore::refresh ─▶ backend
//!                                   │
//!                                   ├─▶ PermissionCache (write-through)
//!                                   └─▶ watch channel ─▶ RouteGuard / FragmentGate
//! ```
//!
//! ## Director Bypass
//!
//! The director passes every route guard regardless of the permissions the
//! backend granted. Fragment gates have no bypass.
//!
//! ## Modules
//!
//! - [`access`]: Access evaluation, route guards and fragment gates
//! - [`backend`]: Backend client for the permission endpoint
//! - [`cli`]: Command-line interface
//! - [`routes`]: Route table for the application's views
//! - [`session`]: The access session handle
//! - [`store`]: The permission store

pub mod access;
pub mod backend;
pub mod cli;
pub mod routes;
pub mod session;
pub mod store;

// Re-export workspace crates for convenience
pub use schooldesk_cache;
pub use schooldesk_config;
pub use schooldesk_core;
pub use schooldesk_models;

pub use access::{
    AccessCheck, FragmentGate, GuardConfig, GuardDecision, GuardState, MatchMode, Navigator,
    Redirect, Requirement, RouteGuard,
};
pub use backend::{BearerToken, FetchError, HttpPermissionSource, PermissionSource};
pub use session::{AccessContext, AccessSession, SessionState};
pub use store::{PermissionStore, RefreshOutcome};
