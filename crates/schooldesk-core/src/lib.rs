//! # Schooldesk Core
//!
//! Shared vocabulary for the schooldesk client.
//!
//! - [`permissions`]: Permission code constants granted by the backend
//! - [`modules`]: Navigable module names carried in the sidebar
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use schooldesk_core::{modules, permissions};
//!
//! if store.has_permission(permissions::FEES_RECORD_PAYMENT) {
//!     // show the "record payment" button
//! }
//!
//! if store.can_access_module(modules::REPORTS) {
//!     // show the reports link
//! }
//! ```

pub mod modules;
pub mod permissions;
pub mod serde;
