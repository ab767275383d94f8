//! Route table for the application's protected views.
//!
//! Each view is mounted behind a [`RouteGuard`] built from its
//! [`GuardConfig`]. Role dashboards still use the legacy role allow-list;
//! administration views are gated by sidebar module and permissions.
//!
//! # Example
//!
//! ```ignore
//! use schooldesk::routes;
//!
//! let guard = routes::guard_for("/fees/payments/new", navigation)
//!     .expect("route is registered");
//! ```

use crate::access::{GuardConfig, RouteGuard};
use schooldesk_config::NavigationConfig;
use schooldesk_core::{modules, permissions};
use schooldesk_models::Role;

/// A protected view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub title: &'static str,
    pub guard: GuardConfig,
}

impl Route {
    fn new(path: &'static str, title: &'static str, guard: GuardConfig) -> Self {
        Self { path, title, guard }
    }
}

/// Every protected view, in navigation order.
pub fn route_table() -> Vec<Route> {
    vec![
        // Role dashboards
        Route::new(
            "/dashboard/director",
            "Director dashboard",
            GuardConfig::new().roles([Role::Director]),
        ),
        Route::new(
            "/dashboard/head-teacher",
            "Head teacher dashboard",
            GuardConfig::new().roles([Role::HeadTeacher]),
        ),
        Route::new(
            "/dashboard/class-teacher",
            "Class teacher dashboard",
            GuardConfig::new().roles([Role::ClassTeacher]),
        ),
        Route::new(
            "/dashboard/bursar",
            "Bursar dashboard",
            GuardConfig::new().roles([Role::Bursar]),
        ),
        // Administration
        Route::new(
            "/users",
            "Users",
            GuardConfig::new()
                .module(modules::USERS)
                .permissions([permissions::USERS_VIEW]),
        ),
        Route::new(
            "/users/new",
            "New user",
            GuardConfig::new()
                .module(modules::USERS)
                .permissions([permissions::USERS_CREATE]),
        ),
        Route::new(
            "/classes",
            "Classes",
            GuardConfig::new().module(modules::CLASSES),
        ),
        Route::new(
            "/teachers",
            "Teachers",
            GuardConfig::new().permissions([permissions::TEACHERS_VIEW, permissions::TEACHERS_MANAGE]),
        ),
        Route::new(
            "/students",
            "Students",
            GuardConfig::new()
                .module(modules::STUDENTS)
                .permissions([permissions::STUDENTS_VIEW]),
        ),
        // Finance
        Route::new("/fees", "Fees", GuardConfig::new().module(modules::FEES)),
        Route::new(
            "/fees/payments/new",
            "Record payment",
            GuardConfig::new()
                .module(modules::FEES)
                .permissions([permissions::FEES_RECORD_PAYMENT]),
        ),
        // Reports
        Route::new(
            "/reports",
            "Reports",
            GuardConfig::new().module(modules::REPORTS),
        ),
        Route::new(
            "/reports/generate",
            "Generate report",
            GuardConfig::new()
                .permissions([permissions::REPORTS_VIEW, permissions::REPORTS_GENERATE])
                .require_all(true),
        ),
        // Settings
        Route::new(
            "/settings",
            "Settings",
            GuardConfig::new()
                .permissions([permissions::SETTINGS_MANAGE, permissions::PERMISSIONS_MANAGE]),
        ),
        Route::new("/profile", "Profile", GuardConfig::new()),
    ]
}

/// Looks up a view by exact path.
pub fn find(path: &str) -> Option<Route> {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    route_table().into_iter().find(|route| route.path == path)
}

/// Builds a fresh guard for the view at `path`.
pub fn guard_for(path: &str, navigation: NavigationConfig) -> Option<RouteGuard> {
    find(path).map(|route| RouteGuard::new(route.guard, navigation))
}

/// Landing page after login.
pub fn dashboard_for(role: Role) -> &'static str {
    match role {
        Role::Director => "/dashboard/director",
        Role::HeadTeacher => "/dashboard/head-teacher",
        Role::ClassTeacher => "/dashboard/class-teacher",
        Role::Bursar => "/dashboard/bursar",
    }
}
