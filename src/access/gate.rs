//! Fragment gate.
//!
//! Shows a piece of UI only when the current snapshot satisfies a
//! [`Requirement`]. Unlike the route guard there is no director bypass, no
//! loading state and no redirect: an unloaded store simply evaluates as
//! empty until the next change re-renders the gate.

use crate::access::evaluator::{AccessCheck, Requirement};
use schooldesk_observability::track_fragment_gate_check;

/// Conditionally renders content of type `R`, or a fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentGate<R = ()> {
    requirement: Requirement,
    fallback: R,
}

impl<R: Default> FragmentGate<R> {
    pub fn new() -> Self {
        Self {
            requirement: Requirement::default(),
            fallback: R::default(),
        }
    }
}

impl<R> FragmentGate<R> {
    pub fn permissions<I, C>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.requirement = self.requirement.permissions(codes);
        self
    }

    pub fn require_all(mut self, require_all: bool) -> Self {
        self.requirement = self.requirement.require_all(require_all);
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.requirement = self.requirement.module(module);
        self
    }

    pub fn fallback(mut self, fallback: R) -> Self {
        self.fallback = fallback;
        self
    }

    /// Whether the guarded content should be shown.
    pub fn allows(&self, access: &impl AccessCheck) -> bool {
        let allowed = self.requirement.check(access).unwrap_or(true);
        track_fragment_gate_check(allowed);
        allowed
    }

    /// Renders `children` when allowed, otherwise a clone of the fallback.
    ///
    /// `children` is only invoked when the gate allows.
    pub fn render(&self, access: &impl AccessCheck, children: impl FnOnce() -> R) -> R
    where
        R: Clone,
    {
        if self.allows(access) {
            children()
        } else {
            self.fallback.clone()
        }
    }
}
