//! The four school roles an account can hold.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of an authenticated account.
///
/// The director is the top-level administrative role and passes every route
/// guard regardless of the permissions the backend granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Director,
    HeadTeacher,
    ClassTeacher,
    Bursar,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Director,
        Role::HeadTeacher,
        Role::ClassTeacher,
        Role::Bursar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Director => "director",
            Role::HeadTeacher => "head_teacher",
            Role::ClassTeacher => "class_teacher",
            Role::Bursar => "bursar",
        }
    }

    #[inline]
    pub fn is_director(&self) -> bool {
        matches!(self, Role::Director)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "director" => Ok(Role::Director),
            "head_teacher" => Ok(Role::HeadTeacher),
            "class_teacher" => Ok(Role::ClassTeacher),
            "bursar" => Ok(Role::Bursar),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}
