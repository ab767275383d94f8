//! Redirect destinations for denied routes.
//!
//! - `SCHOOLDESK_LOGIN_PATH`: where unauthenticated visitors are sent (default: `/login`)
//! - `SCHOOLDESK_UNAUTHORIZED_PATH`: where forbidden visitors are sent (default: `/unauthorized`)

use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationConfig {
    pub login_path: String,
    pub unauthorized_path: String,
}

impl NavigationConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            login_path: lookup("SCHOOLDESK_LOGIN_PATH").unwrap_or(defaults.login_path),
            unauthorized_path: lookup("SCHOOLDESK_UNAUTHORIZED_PATH")
                .unwrap_or(defaults.unauthorized_path),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".into(),
            unauthorized_path: "/unauthorized".into(),
        }
    }
}
