//! Route guard.
//!
//! A guard decides, for one protected view, whether to render it, show a
//! loading placeholder, or redirect. The decision is the state machine
//! [`GuardState`]; redirects are emitted only on transitions into a deny
//! state, so re-evaluating an unchanged situation never navigates twice.
//!
//! # Precedence
//!
//! 1. Session or permissions still loading → [`GuardState::Resolving`]
//! 2. No identity → [`GuardState::DenyNoIdentity`]
//! 3. Director → [`GuardState::Allow`]
//! 4. Required module not accessible → [`GuardState::DenyForbidden`]
//! 5. Required permissions decide (all/any)
//! 6. Role allow-list decides (only when 4 and 5 are not configured)
//! 7. Otherwise → [`GuardState::Allow`]
//!
//! # Example
//!
//! ```ignore
//! use schooldesk::{GuardConfig, RouteGuard};
//! use schooldesk_core::{modules, permissions};
//!
//! let mut guard = RouteGuard::new(
//!     GuardConfig::new()
//!         .module(modules::FEES)
//!         .permissions([permissions::FEES_RECORD_PAYMENT]),
//!     navigation,
//! );
//!
//! let decision = guard.evaluate(&session.context());
//! if let Some(redirect) = decision.redirect {
//!     router.push(redirect.path());
//! }
//! ```

use crate::access::evaluator::Requirement;
use crate::session::AccessContext;
use schooldesk_config::NavigationConfig;
use schooldesk_models::Role;
use schooldesk_observability::track_route_guard_decision;
use std::fmt;
use tracing::info;

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardState {
    /// Waiting on session or permissions; render a placeholder.
    Resolving,
    /// Nobody is logged in; send to login.
    DenyNoIdentity,
    /// Logged in but lacking the capability; send to the unauthorized page.
    DenyForbidden,
    /// Render the view.
    Allow,
}

impl GuardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardState::Resolving => "resolving",
            GuardState::DenyNoIdentity => "deny_no_identity",
            GuardState::DenyForbidden => "deny_forbidden",
            GuardState::Allow => "allow",
        }
    }
}

impl fmt::Display for GuardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static restriction attached to a protected view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardConfig {
    /// Legacy role allow-list, consulted only without a permission or module
    /// requirement.
    pub allowed_roles: Option<Vec<Role>>,
    pub requirement: Requirement,
}

impl GuardConfig {
    /// No restriction beyond being logged in.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.allowed_roles = Some(roles.into_iter().collect());
        self
    }

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

    /// Applies the precedence rules to one evaluation cycle's inputs.
    pub fn decide(&self, ctx: &AccessContext) -> GuardState {
        if ctx.auth_loading || ctx.permissions_loading {
            return GuardState::Resolving;
        }

        let Some(identity) = &ctx.identity else {
            return GuardState::DenyNoIdentity;
        };

        if identity.role.is_director() {
            return GuardState::Allow;
        }

        let allowed = match self.requirement.check(ctx) {
            Some(allowed) => allowed,
            None => match &self.allowed_roles {
                Some(roles) => roles.contains(&identity.role),
                None => true,
            },
        };

        if allowed {
            GuardState::Allow
        } else {
            GuardState::DenyForbidden
        }
    }
}

/// Navigation requested by a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Login(String),
    Unauthorized(String),
}

impl Redirect {
    pub fn path(&self) -> &str {
        match self {
            Redirect::Login(path) | Redirect::Unauthorized(path) => path,
        }
    }
}

/// Performs redirects on behalf of a guard.
pub trait Navigator {
    fn redirect(&self, redirect: &Redirect);
}

/// Result of one [`RouteGuard::evaluate`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardDecision {
    pub state: GuardState,
    /// Set only when this evaluation entered a deny state.
    pub redirect: Option<Redirect>,
}

impl GuardDecision {
    pub fn should_render(&self) -> bool {
        self.state == GuardState::Allow
    }
}

/// Stateful guard for one mounted view.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    config: GuardConfig,
    navigation: NavigationConfig,
    state: Option<GuardState>,
}

impl RouteGuard {
    pub fn new(config: GuardConfig, navigation: NavigationConfig) -> Self {
        Self {
            config,
            navigation,
            state: None,
        }
    }

    /// State reached by the last evaluation, if any.
    pub fn state(&self) -> Option<GuardState> {
        self.state
    }

    /// Evaluates the guard and reports a redirect if the state just changed
    /// into a deny state.
    pub fn evaluate(&mut self, ctx: &AccessContext) -> GuardDecision {
        let next = self.config.decide(ctx);
        let previous = self.state.replace(next);

        if previous == Some(next) {
            return GuardDecision {
                state: next,
                redirect: None,
            };
        }

        info!(
            from = previous.map(|s| s.as_str()).unwrap_or("unmounted"),
            to = %next,
            user_id = ?ctx.identity.as_ref().map(|i| i.id),
            "Route guard transition"
        );
        track_route_guard_decision(next.as_str());

        let redirect = match next {
            GuardState::DenyNoIdentity => {
                Some(Redirect::Login(self.navigation.login_path.clone()))
            }
            GuardState::DenyForbidden => Some(Redirect::Unauthorized(
                self.navigation.unauthorized_path.clone(),
            )),
            GuardState::Resolving | GuardState::Allow => None,
        };

        GuardDecision {
            state: next,
            redirect,
        }
    }

    /// Evaluates and hands any redirect to `navigator`.
    pub fn evaluate_with(&mut self, ctx: &AccessContext, navigator: &impl Navigator) -> GuardState {
        let decision = self.evaluate(ctx);
        if let Some(redirect) = &decision.redirect {
            navigator.redirect(redirect);
        }
        decision.state
    }
}
