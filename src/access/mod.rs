//! Access evaluation, route guards and fragment gates.
//!
//! - [`evaluator`]: Pure permission and module queries over a snapshot
//! - [`guard`]: The route guard state machine
//! - [`gate`]: In-place gating of UI fragments

pub mod evaluator;
pub mod gate;
pub mod guard;

pub use evaluator::{AccessCheck, MatchMode, Requirement};
pub use gate::FragmentGate;
pub use guard::{GuardConfig, GuardDecision, GuardState, Navigator, Redirect, RouteGuard};
