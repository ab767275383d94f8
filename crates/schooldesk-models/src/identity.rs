//! The authenticated user descriptor held by session state.

use crate::ids::{SchoolId, UserId};
use crate::roles::Role;
use serde::{Deserialize, Serialize};

/// The account currently logged in.
///
/// Created on successful login and dropped on logout. At most one identity is
/// live per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub school_id: Option<SchoolId>,
}

impl Identity {
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role,
            name: None,
            email: None,
            school_id: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
