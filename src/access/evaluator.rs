//! Pure access queries.
//!
//! Every query is a function of the snapshot alone: the same snapshot always
//! yields the same answer.

use crate::backend::PermissionSource;
use crate::store::PermissionStore;
use schooldesk_models::PermissionSnapshot;

/// Permission and module queries.
pub trait AccessCheck {
    /// True iff `code` is in the permission set.
    fn has_permission(&self, code: &str) -> bool;

    /// True iff the sidebar contains an item for `module`.
    fn can_access_module(&self, module: &str) -> bool;

    /// True iff at least one code is granted. False for an empty list.
    fn has_any_permission<C: AsRef<str>>(&self, codes: &[C]) -> bool {
        codes.iter().any(|code| self.has_permission(code.as_ref()))
    }

    /// True iff every code is granted. True for an empty list.
    fn has_all_permissions<C: AsRef<str>>(&self, codes: &[C]) -> bool {
        codes.iter().all(|code| self.has_permission(code.as_ref()))
    }

    /// Any of `codes`, or access to `module`.
    fn has_any_permission_or_module<C: AsRef<str>>(&self, codes: &[C], module: &str) -> bool {
        self.has_any_permission(codes) || self.can_access_module(module)
    }

    /// Checks `codes` with the given match mode.
    fn has_permissions<C: AsRef<str>>(&self, codes: &[C], mode: MatchMode) -> bool {
        match mode {
            MatchMode::Any => self.has_any_permission(codes),
            MatchMode::All => self.has_all_permissions(codes),
        }
    }
}

impl AccessCheck for PermissionSnapshot {
    fn has_permission(&self, code: &str) -> bool {
        self.permissions.contains(code)
    }

    fn can_access_module(&self, module: &str) -> bool {
        self.sidebar.iter().any(|item| item.module == module)
    }
}

impl<S: PermissionSource> AccessCheck for PermissionStore<S> {
    fn has_permission(&self, code: &str) -> bool {
        self.snapshot().has_permission(code)
    }

    fn can_access_module(&self, module: &str) -> bool {
        self.snapshot().can_access_module(module)
    }
}

/// How a list of required permissions is matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    #[default]
    Any,
    All,
}

impl MatchMode {
    pub fn from_require_all(require_all: bool) -> Self {
        if require_all {
            MatchMode::All
        } else {
            MatchMode::Any
        }
    }
}

/// Permission and module requirement shared by route guards and fragment
/// gates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    pub permissions: Vec<String>,
    pub mode: MatchMode,
    pub module: Option<String>,
}

impl Requirement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permissions<I, C>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.permissions = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn require_all(mut self, require_all: bool) -> Self {
        self.mode = MatchMode::from_require_all(require_all);
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Whether anything is configured. An empty permission list counts as
    /// not configured.
    pub fn is_configured(&self) -> bool {
        self.module.is_some() || !self.permissions.is_empty()
    }

    /// Evaluates the requirement.
    ///
    /// A configured module that is not accessible denies outright. Otherwise
    /// configured permissions decide. Returns `None` when nothing is
    /// configured so the caller can apply its own fallback rule.
    pub fn check(&self, access: &impl AccessCheck) -> Option<bool> {
        if let Some(module) = &self.module {
            if !access.can_access_module(module) {
                return Some(false);
            }
        }

        if !self.permissions.is_empty() {
            return Some(access.has_permissions(&self.permissions, self.mode));
        }

        self.module.as_ref().map(|_| true)
    }
}
