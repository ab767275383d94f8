//! Schooldesk Observability
//!
//! Provides:
//! - Console logging through `tracing-subscriber`
//! - Counters for permission refreshes and access decisions
//!
//! Counters are compiled in with the `observability` feature and can be turned
//! off at runtime with `OBSERVABILITY_ENABLED=false`. Without a recorder
//! installed by the host application they are no-ops.
//!
//! # Examples
//!
//! ```no_run
//! use schooldesk_observability::init_logging;
//!
//! init_logging();
//! tracing::info!("client started");
//! ```

pub mod logging;

#[cfg(feature = "observability")]
pub mod metrics;

pub use logging::init_logging;

#[cfg(feature = "observability")]
pub use metrics::{
    is_observability_enabled, track_fragment_gate_check, track_permission_refresh,
    track_route_guard_decision,
};

#[cfg(not(feature = "observability"))]
pub use stubs::*;

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
mod stubs {
    pub fn is_observability_enabled() -> bool {
        false
    }

    pub fn track_permission_refresh(_outcome: &str) {}

    pub fn track_route_guard_decision(_state: &str) {}

    pub fn track_fragment_gate_check(_allowed: bool) {}
}
